pub mod board_codec;
pub mod column_codec;
pub mod front_matter;
pub mod task_codec;
pub mod title_doc;

pub use front_matter::{FieldMap, FrontMatterDoc, parse_front_matter, serialize_front_matter};
pub use title_doc::{TitleDoc, parse_title_doc, serialize_title_doc};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::ModelError;

/// Errors turning a storage document into an entity.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    #[error("id mismatch: metadata has {metadata:?} but directory indicates {dir:?}")]
    IdMismatch { metadata: String, dir: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// RFC 3339 at seconds precision, the timestamp format of every metadata file.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Lenient timestamp read: a missing or malformed value yields `None`.
pub(crate) fn read_timestamp(fields: &FieldMap, key: &str) -> Option<DateTime<Utc>> {
    let raw = fields.get_str(key)?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
