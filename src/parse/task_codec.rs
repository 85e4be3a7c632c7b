use chrono::Utc;

use crate::model::{Priority, Status, Task, TaskId};
use crate::parse::CodecError;
use crate::parse::front_matter::FieldMap;
use crate::parse::{format_timestamp, read_timestamp};

/// Project a task into its `metadata.yml` field block. The metadata stores
/// only the short id; the folder name carries the full form. Empty optional
/// fields are omitted to keep the files terse.
pub fn to_metadata(task: &Task) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert_str("id", &task.id.short());
    fields.insert_str("title", &task.title);
    fields.insert_str("created", &format_timestamp(task.created_at));
    fields.insert_str("modified", &format_timestamp(task.modified_at));
    if let Some(due) = task.due_date {
        fields.insert_str("due_date", &format_timestamp(due));
    }
    if let Some(completed) = task.completed_date {
        fields.insert_str("completed_date", &format_timestamp(completed));
    }
    fields.insert_str("priority", task.priority.as_str());
    fields.insert_str("status", task.status.as_str());
    if !task.tags.is_empty() {
        fields.insert_str_list("tags", &task.tags);
    }
    if !task.metadata.is_empty() {
        fields.insert_str_map("metadata", &task.metadata);
    }
    fields
}

/// The `task.md` content is the raw description with a trailing newline.
pub fn content_markdown(task: &Task) -> String {
    if task.description.is_empty() {
        String::new()
    } else {
        format!("{}\n", task.description.trim_end_matches('\n'))
    }
}

/// Build a task from its field block and body. `id` comes from the folder
/// name and is authoritative; a short id embedded in the metadata must agree
/// with it. Missing priority/status default to none/todo; malformed optional
/// dates are dropped rather than failing the load.
pub fn from_parts(fields: &FieldMap, body: &str, id: TaskId) -> Result<Task, CodecError> {
    if let Some(short) = fields.get_str("id")
        && !short.is_empty()
        && short != id.short()
    {
        return Err(CodecError::IdMismatch {
            metadata: short.to_string(),
            dir: id.short(),
        });
    }

    let title = fields
        .get_str("title")
        .filter(|t| !t.is_empty())
        .ok_or(CodecError::MissingField("title"))?;

    let priority = Priority::parse(fields.get_str("priority").unwrap_or("none"))
        .map_err(CodecError::Model)?;
    let status =
        Status::parse(fields.get_str("status").unwrap_or("todo")).map_err(CodecError::Model)?;

    let description = body.trim_end_matches('\n');
    let mut task = Task::new(id, title, description, priority, status)?;

    for tag in fields.get_str_list("tags") {
        task.add_tag(&tag);
    }
    task.metadata = fields.get_str_map("metadata");

    // Timestamps last: the mutators above stamp modified_at, and the
    // persisted values must win.
    let now = Utc::now();
    task.created_at = read_timestamp(fields, "created").unwrap_or(now);
    task.modified_at = read_timestamp(fields, "modified").unwrap_or(now);
    task.due_date = read_timestamp(fields, "due_date");
    // Task::new stamps a fresh date for done tasks; the persisted stamp
    // wins when present.
    if let Some(completed) = read_timestamp(fields, "completed_date") {
        task.completed_date = Some(completed);
    } else if status != Status::Done {
        task.completed_date = None;
    }

    Ok(task)
}
