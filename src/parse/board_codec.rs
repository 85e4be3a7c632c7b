use chrono::Utc;

use crate::model::Board;
use crate::model::board::derive_prefix;
use crate::parse::front_matter::{FieldMap, FrontMatterDoc};
use crate::parse::title_doc::serialize_title_doc;
use crate::parse::{CodecError, format_timestamp, read_timestamp};

/// Project a board into its `metadata.yml` field block.
pub fn to_metadata(board: &Board) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert_str("id", &board.id);
    fields.insert_str("prefix", &board.prefix);
    fields.insert_str("created", &format_timestamp(board.created_at));
    fields.insert_str("modified", &format_timestamp(board.modified_at));
    fields.insert_str("description", &board.description);
    fields.insert_int("next_task_num", i64::from(board.next_task_num));
    fields
}

/// The `board.md` content: display name heading plus description.
pub fn content_markdown(board: &Board) -> String {
    serialize_title_doc(&board.name, &board.description)
}

/// Build a board from the current split layout. The directory name is the
/// authoritative id; an `id` field disagreeing with it is a consistency
/// error. Columns are attached separately by the loader.
pub fn from_split(
    fields: &FieldMap,
    dir_id: &str,
    title: &str,
    body: &str,
) -> Result<Board, CodecError> {
    if let Some(meta_id) = fields.get_str("id")
        && !meta_id.is_empty()
        && meta_id != dir_id
    {
        return Err(CodecError::IdMismatch {
            metadata: meta_id.to_string(),
            dir: dir_id.to_string(),
        });
    }

    let name = if title.is_empty() { dir_id } else { title };
    let description = match fields.get_str("description") {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => body.to_string(),
    };
    let prefix = match fields.get_str("prefix") {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => derive_prefix(name),
    };

    let now = Utc::now();
    Ok(Board {
        id: dir_id.to_string(),
        name: name.to_string(),
        description,
        prefix,
        created_at: read_timestamp(fields, "created").unwrap_or(now),
        modified_at: read_timestamp(fields, "modified").unwrap_or(now),
        next_task_num: fields.get_int("next_task_num").unwrap_or(1).max(1) as u32,
        columns: Vec::new(),
    })
}

/// Build a board from a legacy front-matter `board.md`.
pub fn from_front_matter(doc: &FrontMatterDoc, dir_id: &str) -> Result<Board, CodecError> {
    let title = doc.fields.get_str("name").unwrap_or_default();
    from_split(&doc.fields, dir_id, title, &doc.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_front_matter;

    fn demo_board() -> Board {
        Board::new("Demo", "A test board.").unwrap()
    }

    #[test]
    fn test_metadata_fields() {
        let board = demo_board();
        let fields = to_metadata(&board);
        assert_eq!(fields.get_str("id"), Some("demo"));
        assert_eq!(fields.get_str("prefix"), Some("DEMO"));
        assert_eq!(fields.get_str("description"), Some("A test board."));
        assert_eq!(fields.get_int("next_task_num"), Some(1));
        assert!(fields.get_str("created").is_some());
    }

    #[test]
    fn test_content_markdown() {
        assert_eq!(content_markdown(&demo_board()), "# Demo\n\nA test board.\n");
    }

    #[test]
    fn test_split_round_trip() {
        let mut board = demo_board();
        board.next_task_num = 7;

        let fields = to_metadata(&board);
        let loaded = from_split(&fields, "demo", "Demo", "A test board.").unwrap();

        assert_eq!(loaded.id, "demo");
        assert_eq!(loaded.name, "Demo");
        assert_eq!(loaded.description, "A test board.");
        assert_eq!(loaded.prefix, "DEMO");
        assert_eq!(loaded.next_task_num, 7);
    }

    #[test]
    fn test_id_mismatch_rejected() {
        let fields = to_metadata(&demo_board());
        let err = from_split(&fields, "other", "Demo", "").unwrap_err();
        assert!(matches!(err, CodecError::IdMismatch { .. }));
    }

    #[test]
    fn test_title_falls_back_to_directory_name() {
        let board = from_split(&FieldMap::new(), "demo-board", "", "").unwrap();
        assert_eq!(board.name, "demo-board");
        assert_eq!(board.prefix, "DEMOBOAR");
        assert_eq!(board.next_task_num, 1);
    }

    #[test]
    fn test_description_prefers_metadata_over_body() {
        let mut fields = FieldMap::new();
        fields.insert_str("description", "from metadata");
        let board = from_split(&fields, "demo", "Demo", "from body").unwrap();
        assert_eq!(board.description, "from metadata");

        let board = from_split(&FieldMap::new(), "demo", "Demo", "from body").unwrap();
        assert_eq!(board.description, "from body");
    }

    #[test]
    fn test_from_front_matter_legacy() {
        let doc = parse_front_matter(
            "---\nname: Demo\nprefix: DEMO\nnext_task_num: 4\n---\nLegacy description\n",
        )
        .unwrap();
        let board = from_front_matter(&doc, "demo").unwrap();
        assert_eq!(board.name, "Demo");
        assert_eq!(board.prefix, "DEMO");
        assert_eq!(board.next_task_num, 4);
        assert_eq!(board.description, "Legacy description");
    }
}
