use std::path::{Path, PathBuf};

/// Structured-metadata file name, shared by every entity level.
pub const METADATA_FILE: &str = "metadata.yml";
/// Content file names per entity level.
pub const BOARD_CONTENT_FILE: &str = "board.md";
pub const COLUMN_CONTENT_FILE: &str = "column.md";
pub const TASK_CONTENT_FILE: &str = "task.md";
/// Container directories of the current generation.
pub const COLUMNS_DIR: &str = "columns";
pub const TASKS_DIR: &str = "tasks";

/// Pure path arithmetic for every supported on-disk generation. Performs no
/// I/O; probing which generation is actually present is the store's job.
#[derive(Debug, Clone)]
pub struct BoardPaths {
    root: PathBuf,
}

impl BoardPaths {
    pub fn new(root: impl Into<PathBuf>) -> BoardPaths {
        BoardPaths { root: root.into() }
    }

    /// The boards root holding one subdirectory per board.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn board_dir(&self, board_id: &str) -> PathBuf {
        self.root.join(board_id)
    }

    pub fn board_metadata(&self, board_id: &str) -> PathBuf {
        self.board_dir(board_id).join(METADATA_FILE)
    }

    pub fn board_content(&self, board_id: &str) -> PathBuf {
        self.board_dir(board_id).join(BOARD_CONTENT_FILE)
    }

    /// The `columns/` container of the current generation.
    pub fn columns_dir(&self, board_id: &str) -> PathBuf {
        self.board_dir(board_id).join(COLUMNS_DIR)
    }

    pub fn column_dir(&self, board_id: &str, key: &str) -> PathBuf {
        self.columns_dir(board_id).join(key)
    }

    /// Legacy layout: columns directly under the board directory.
    pub fn legacy_column_dir(&self, board_id: &str, key: &str) -> PathBuf {
        self.board_dir(board_id).join(key)
    }

    pub fn column_metadata(&self, board_id: &str, key: &str) -> PathBuf {
        self.column_dir(board_id, key).join(METADATA_FILE)
    }

    pub fn column_content(&self, board_id: &str, key: &str) -> PathBuf {
        self.column_dir(board_id, key).join(COLUMN_CONTENT_FILE)
    }

    /// The `tasks/` container under a column directory (either layout;
    /// the caller passes whichever column directory is in play).
    pub fn tasks_dir(column_dir: &Path) -> PathBuf {
        column_dir.join(TASKS_DIR)
    }

    pub fn task_dir(column_dir: &Path, task_folder: &str) -> PathBuf {
        Self::tasks_dir(column_dir).join(task_folder)
    }

    /// Legacy layout: tasks directly under the column directory.
    pub fn legacy_task_dir(column_dir: &Path, task_folder: &str) -> PathBuf {
        column_dir.join(task_folder)
    }

    pub fn task_metadata(task_dir: &Path) -> PathBuf {
        task_dir.join(METADATA_FILE)
    }

    pub fn task_content(task_dir: &Path) -> PathBuf {
        task_dir.join(TASK_CONTENT_FILE)
    }
}
