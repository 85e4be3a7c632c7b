use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::ModelError;
use crate::model::task::{Task, TaskId};
use crate::util::slug::slugify;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Display color for a column: a `#rgb`/`#rrggbb` hex value or a plain
/// alphabetic color name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(String);

impl Color {
    pub fn new(s: &str) -> Result<Color, ModelError> {
        let valid = HEX_COLOR.is_match(s)
            || (!s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()));
        if !valid {
            return Err(ModelError::InvalidColor(s.to_string()));
        }
        Ok(Color(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A column on a board. The display name is the source of truth; the on-disk
/// directory key is recomputed from it on every save via [`Column::key`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub description: String,
    /// Display/iteration position within the board.
    pub order: u32,
    /// Work-in-progress limit; 0 means unlimited.
    pub wip_limit: u32,
    pub color: Option<Color>,
    /// Insertion order is creation order unless a move reorders it.
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(
        name: &str,
        description: &str,
        order: u32,
        wip_limit: u32,
        color: Option<Color>,
    ) -> Result<Column, ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        Ok(Column {
            name: name.to_string(),
            description: description.to_string(),
            order,
            wip_limit,
            color,
            tasks: Vec::new(),
        })
    }

    /// The normalized directory key derived from the display name.
    /// Pure: the same name always yields the same key.
    pub fn key(&self) -> String {
        slugify(&self.name)
    }

    /// Add a task, enforcing id uniqueness and the WIP limit. The storage
    /// loader bypasses this and pushes directly so historical overloads
    /// still load.
    pub fn add_task(&mut self, task: Task) -> Result<(), ModelError> {
        if self.task(&task.id).is_some() {
            return Err(ModelError::DuplicateTask(task.id.to_string()));
        }
        if self.wip_limit > 0 && self.tasks.len() >= self.wip_limit as usize {
            return Err(ModelError::WipLimitReached {
                column: self.name.clone(),
                limit: self.wip_limit,
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn remove_task(&mut self, id: &TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Look a task up by either its short (`DEMO-1`) or full id string.
    pub fn task_by_ref(&self, id_ref: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id.short() == id_ref || t.id.to_string() == id_ref)
    }
}
