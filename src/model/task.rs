use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::model::ModelError;
use crate::util::slug::slugify;

/// Task identifier: a board-scoped prefix, a monotonically minted number,
/// and a title-derived slug. The full form (`DEMO-12-fix-parser`) is the
/// on-disk folder name; the short form (`DEMO-12`) is what cross-references
/// and metadata use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    prefix: String,
    number: u32,
    slug: String,
}

impl TaskId {
    /// Mint a new id from a prefix, number, and task title.
    pub fn new(prefix: &str, number: u32, title: &str) -> Result<TaskId, ModelError> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidTaskId(format!("{prefix}-{number}")));
        }
        if number == 0 {
            return Err(ModelError::InvalidTaskId(format!("{prefix}-{number}")));
        }
        Ok(TaskId {
            prefix: prefix.to_ascii_uppercase(),
            number,
            slug: slugify(title),
        })
    }

    /// The short cross-reference form, `PREFIX-NUMBER`.
    pub fn short(&self) -> String {
        format!("{}-{}", self.prefix, self.number)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slug.is_empty() {
            write!(f, "{}-{}", self.prefix, self.number)
        } else {
            write!(f, "{}-{}-{}", self.prefix, self.number, self.slug)
        }
    }
}

impl FromStr for TaskId {
    type Err = ModelError;

    /// Parse a folder name of the form `PREFIX-NUMBER[-slug]`. The slug part
    /// is optional so that short ids parse too.
    fn from_str(s: &str) -> Result<TaskId, ModelError> {
        let invalid = || ModelError::InvalidTaskId(s.to_string());

        let mut parts = s.splitn(3, '-');
        let prefix = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let number: u32 = parts
            .next()
            .ok_or_else(invalid)?
            .parse()
            .map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        let slug = parts.next().unwrap_or("").to_string();

        Ok(TaskId {
            prefix: prefix.to_string(),
            number,
            slug,
        })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Result<Priority, ModelError> {
        match s {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(ModelError::InvalidPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task status. Transitioning to `Done` stamps the completion date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Result<Status, ModelError> {
        match s {
            "todo" => Ok(Status::Todo),
            "in-progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(ModelError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A work item within a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Immutable once minted; the full form is the on-disk folder name.
    pub id: TaskId,
    pub title: String,
    /// Free-text body of `task.md`, not a metadata field.
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    /// Deduplicated, insertion-ordered.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    /// Set the first time status reaches `Done`; never cleared automatically.
    pub completed_date: Option<DateTime<Utc>>,
    /// Open key/value map owned by external sync strategies (e.g. the git
    /// strategy records `git_branch` here). Persisted verbatim.
    pub metadata: IndexMap<String, String>,
}

impl Task {
    pub fn new(
        id: TaskId,
        title: &str,
        description: &str,
        priority: Priority,
        status: Status,
    ) -> Result<Task, ModelError> {
        if title.trim().is_empty() {
            return Err(ModelError::EmptyTaskTitle);
        }

        let now = Utc::now();
        Ok(Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            priority,
            status,
            tags: Vec::new(),
            created_at: now,
            modified_at: now,
            due_date: None,
            completed_date: if status == Status::Done {
                Some(now)
            } else {
                None
            },
            metadata: IndexMap::new(),
        })
    }

    pub fn update_title(&mut self, title: &str) -> Result<(), ModelError> {
        if title.trim().is_empty() {
            return Err(ModelError::EmptyTaskTitle);
        }
        self.title = title.to_string();
        self.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.touch();
    }

    pub fn update_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    /// Change status. The first transition into `Done` stamps
    /// `completed_date`; the stamp survives later status changes.
    pub fn update_status(&mut self, status: Status) {
        self.status = status;
        if status == Status::Done && self.completed_date.is_none() {
            self.completed_date = Some(Utc::now());
        }
        self.touch();
    }

    /// Set a due date. Rejects dates already in the past; persisted past
    /// dates are restored directly by the storage codec instead.
    pub fn set_due_date(&mut self, due: DateTime<Utc>) -> Result<(), ModelError> {
        if due < Utc::now() {
            return Err(ModelError::DueDateInPast);
        }
        self.due_date = Some(due);
        self.touch();
        Ok(())
    }

    pub fn clear_due_date(&mut self) {
        self.due_date = None;
        self.touch();
    }

    /// Add a tag, ignoring duplicates.
    pub fn add_tag(&mut self, tag: &str) {
        if self.tags.iter().any(|t| t == tag) {
            return;
        }
        self.tags.push(tag.to_string());
        self.touch();
    }

    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            self.touch();
        }
    }

    pub fn set_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
        self.touch();
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => self.status != Status::Done && due < Utc::now(),
            None => false,
        }
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
