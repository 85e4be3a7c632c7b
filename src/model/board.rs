use chrono::{DateTime, Utc};

use crate::model::ModelError;
use crate::model::column::Column;
use crate::model::task::TaskId;
use crate::util::slug::slugify;

/// Maximum length of a derived task-id prefix.
const MAX_PREFIX_LEN: usize = 8;

/// Root aggregate. The id doubles as the on-disk directory name; the task
/// number counter is monotonic and survives task deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Uppercase prefix minted into task ids (`DEMO` in `DEMO-1-fix-bug`).
    pub prefix: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Next task number to mint; starts at 1, never reused.
    pub next_task_num: u32,
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(name: &str, description: &str) -> Result<Board, ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyBoardName);
        }
        let now = Utc::now();
        Ok(Board {
            id: slugify(name),
            name: name.to_string(),
            description: description.to_string(),
            prefix: derive_prefix(name),
            created_at: now,
            modified_at: now,
            next_task_num: 1,
            columns: Vec::new(),
        })
    }

    /// Add a column, rejecting one whose normalized key collides with an
    /// existing column's key.
    pub fn add_column(&mut self, column: Column) -> Result<(), ModelError> {
        let key = column.key();
        if self.columns.iter().any(|c| c.key() == key) {
            return Err(ModelError::DuplicateColumn(column.name.clone()));
        }
        self.columns.push(column);
        self.touch();
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let key = slugify(name);
        let pos = self.columns.iter().position(|c| c.key() == key)?;
        self.touch();
        Some(self.columns.remove(pos))
    }

    /// Look a column up by display name or normalized key.
    pub fn column(&self, name: &str) -> Option<&Column> {
        let key = slugify(name);
        self.columns.iter().find(|c| c.key() == key)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        let key = slugify(name);
        self.columns.iter_mut().find(|c| c.key() == key)
    }

    /// Stable sort by the order field. Must run after every structural
    /// change and after load.
    pub fn reorder_columns(&mut self) {
        self.columns.sort_by_key(|c| c.order);
    }

    /// Mint the next task id and advance the counter.
    pub fn mint_task_id(&mut self, title: &str) -> Result<TaskId, ModelError> {
        let id = TaskId::new(&self.prefix, self.next_task_num, title)?;
        self.next_task_num += 1;
        self.touch();
        Ok(id)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Derive a task-id prefix from a board name: alphanumerics of the first
/// word, uppercased, capped at 8 characters.
pub fn derive_prefix(name: &str) -> String {
    let word = name.split_whitespace().next().unwrap_or("");
    let mut prefix: String = word
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    prefix.truncate(MAX_PREFIX_LEN);
    if prefix.is_empty() {
        return "TASK".to_string();
    }
    prefix
}
