use crate::model::{Color, Column};
use crate::parse::CodecError;
use crate::parse::front_matter::{FieldMap, FrontMatterDoc};
use crate::parse::title_doc::serialize_title_doc;

/// Project a column into its `metadata.yml` field block. The display name
/// and description live in `column.md`, not here.
pub fn to_metadata(column: &Column) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert_int("order", i64::from(column.order));
    fields.insert_int("wip_limit", i64::from(column.wip_limit));
    if let Some(color) = &column.color {
        fields.insert_str("color", color.as_str());
    }
    fields
}

/// The `column.md` content: display name heading plus description.
pub fn content_markdown(column: &Column) -> String {
    serialize_title_doc(&column.name, &column.description)
}

/// Build a column from the current split layout. `key` is the directory
/// name; it backs the display name when the content file carries no title.
/// Tasks are attached separately by the loader.
pub fn from_split(
    fields: &FieldMap,
    key: &str,
    title: &str,
    body: &str,
) -> Result<Column, CodecError> {
    let name = if title.is_empty() { key } else { title };
    let column = Column::new(
        name,
        body,
        read_index(fields, "order"),
        read_index(fields, "wip_limit"),
        read_color(fields),
    )?;
    Ok(column)
}

/// Build a column from a legacy front-matter `column.md`.
pub fn from_front_matter(doc: &FrontMatterDoc, key: &str) -> Result<Column, CodecError> {
    let name = match doc.fields.get_str("display_name") {
        Some(n) if !n.is_empty() => n,
        _ => key,
    };
    let description = match doc.fields.get_str("description") {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => doc.body.clone(),
    };
    let column = Column::new(
        name,
        &description,
        read_index(&doc.fields, "order"),
        read_index(&doc.fields, "wip_limit"),
        read_color(&doc.fields),
    )?;
    Ok(column)
}

fn read_index(fields: &FieldMap, key: &str) -> u32 {
    fields.get_int(key).unwrap_or(0).max(0) as u32
}

/// An unparseable color degrades to no color rather than failing the load.
fn read_color(fields: &FieldMap) -> Option<Color> {
    fields.get_str("color").and_then(|c| Color::new(c).ok())
}
