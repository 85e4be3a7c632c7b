pub mod board;
pub mod column;
pub mod config;
pub mod task;

pub use board::Board;
pub use column::{Color, Column};
pub use task::{Priority, Status, Task, TaskId};

/// Domain-rule violations. The storage layer wraps these when a loaded
/// document cannot produce a valid entity.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("board name cannot be empty")]
    EmptyBoardName,
    #[error("column name cannot be empty")]
    EmptyColumnName,
    #[error("task title cannot be empty")]
    EmptyTaskTitle,
    #[error("column {0:?} collides with an existing column key")]
    DuplicateColumn(String),
    #[error("task {0} already exists in this column")]
    DuplicateTask(String),
    #[error("column {column:?} is at its WIP limit of {limit}")]
    WipLimitReached { column: String, limit: u32 },
    #[error("invalid task id: {0:?}")]
    InvalidTaskId(String),
    #[error("invalid priority: {0:?}")]
    InvalidPriority(String),
    #[error("invalid status: {0:?}")]
    InvalidStatus(String),
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    #[error("due date cannot be in the past")]
    DueDateInPast,
}
