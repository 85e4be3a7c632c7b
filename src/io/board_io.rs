use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::io::atomic::{self, FILE_MODE};
use crate::io::listing::{DirLister, FsLister};
use crate::io::paths::{BoardPaths, COLUMN_CONTENT_FILE, COLUMNS_DIR, METADATA_FILE};
use crate::io::reconcile::stale_entries;
use crate::model::{Board, Column, Task, TaskId};
use crate::parse::front_matter::{FieldMap, FrontMatterDoc, parse_front_matter};
use crate::parse::title_doc::parse_title_doc;
use crate::parse::{CodecError, board_codec, column_codec, task_codec};

/// Error type for board storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("board not found: {id}")]
    NotFound { id: String },
    #[error("could not {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{path}: {source}")]
    Codec {
        path: PathBuf,
        source: CodecError,
    },
    #[error("no readable board data in {dir}")]
    Unrecognized { dir: PathBuf },
}

/// Outcome of probing one entity directory for its schema generation.
/// Detection runs in this fixed priority order: the current split pair,
/// then a legacy front-matter file, then the metadata half alone (content
/// not written yet; a half-migrated state must still load).
enum EntityDocs {
    Split {
        fields: FieldMap,
        title: String,
        body: String,
    },
    FrontMatter(FrontMatterDoc),
    MetadataOnly {
        fields: FieldMap,
    },
}

/// Filesystem-backed board repository. One directory per board under the
/// configured root; saves always write the current generation, loads accept
/// all three. Assumes the caller serializes mutating calls per board.
pub struct BoardStore {
    paths: BoardPaths,
    lister: Box<dyn DirLister>,
}

impl BoardStore {
    pub fn new(boards_root: impl Into<PathBuf>) -> BoardStore {
        BoardStore {
            paths: BoardPaths::new(boards_root),
            lister: Box::new(FsLister),
        }
    }

    /// Inject a directory-listing implementation (tests).
    pub fn with_lister(boards_root: impl Into<PathBuf>, lister: Box<dyn DirLister>) -> BoardStore {
        BoardStore {
            paths: BoardPaths::new(boards_root),
            lister,
        }
    }

    pub fn paths(&self) -> &BoardPaths {
        &self.paths
    }

    pub fn lister(&self) -> &dyn DirLister {
        self.lister.as_ref()
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Persist a board: board files, then every column and its tasks, then
    /// reconcile each container against the in-memory tree. A failed write
    /// aborts without rolling back siblings; the next successful save
    /// converges the filesystem, because reconciliation is recomputed from
    /// scratch every time.
    pub fn save(&self, board: &Board) -> Result<(), StoreError> {
        let board_dir = self.paths.board_dir(&board.id);
        ensure_dir(&board_dir)?;

        self.write_yaml(self.paths.board_metadata(&board.id), &board_codec::to_metadata(board))?;
        self.write_text(
            self.paths.board_content(&board.id),
            &board_codec::content_markdown(board),
        )?;

        for column in &board.columns {
            self.save_column(&board.id, column)?;
        }
        self.reconcile_columns(board)?;

        Ok(())
    }

    fn save_column(&self, board_id: &str, column: &Column) -> Result<(), StoreError> {
        let key = column.key();
        let column_dir = self.paths.column_dir(board_id, &key);
        ensure_dir(&column_dir)?;

        self.write_yaml(
            self.paths.column_metadata(board_id, &key),
            &column_codec::to_metadata(column),
        )?;
        self.write_text(
            self.paths.column_content(board_id, &key),
            &column_codec::content_markdown(column),
        )?;

        for task in &column.tasks {
            self.save_task(&column_dir, task)?;
        }
        self.reconcile_tasks(&column_dir, column)?;

        Ok(())
    }

    fn save_task(&self, column_dir: &Path, task: &Task) -> Result<(), StoreError> {
        // The task folder name is the full id string.
        let task_dir = BoardPaths::task_dir(column_dir, &task.id.to_string());
        ensure_dir(&task_dir)?;

        self.write_yaml(BoardPaths::task_metadata(&task_dir), &task_codec::to_metadata(task))?;
        self.write_text(
            BoardPaths::task_content(&task_dir),
            &task_codec::content_markdown(task),
        )?;

        Ok(())
    }

    fn write_yaml(&self, path: PathBuf, fields: &FieldMap) -> Result<(), StoreError> {
        let text = fields.to_yaml().map_err(|e| StoreError::Yaml {
            path: path.clone(),
            source: e,
        })?;
        self.write_text(path, &text)
    }

    fn write_text(&self, path: PathBuf, content: &str) -> Result<(), StoreError> {
        atomic::atomic_write(&path, content.as_bytes(), FILE_MODE).map_err(|e| StoreError::Io {
            op: "write",
            path,
            source: e,
        })
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Delete column directories whose key is no longer in the in-memory
    /// set. Only the current-generation `columns/` container is reconciled;
    /// legacy directories are left for the migrations.
    fn reconcile_columns(&self, board: &Board) -> Result<(), StoreError> {
        let columns_dir = self.paths.columns_dir(&board.id);
        if !columns_dir.is_dir() {
            return Ok(());
        }

        let actual = self.list_subdirs(&columns_dir)?;
        let desired: BTreeSet<String> = board.columns.iter().map(|c| c.key()).collect();

        for name in stale_entries(&desired, &actual) {
            let dir = columns_dir.join(&name);
            debug!("removing stale column directory {}", dir.display());
            remove_dir(&dir)?;
        }
        Ok(())
    }

    /// Delete task directories under `tasks/` whose id is no longer in the
    /// column's in-memory set.
    fn reconcile_tasks(&self, column_dir: &Path, column: &Column) -> Result<(), StoreError> {
        let tasks_dir = BoardPaths::tasks_dir(column_dir);
        if !tasks_dir.is_dir() {
            return Ok(());
        }

        let actual = self.list_subdirs(&tasks_dir)?;
        let desired: BTreeSet<String> = column.tasks.iter().map(|t| t.id.to_string()).collect();

        for name in stale_entries(&desired, &actual) {
            let dir = tasks_dir.join(&name);
            debug!("removing stale task directory {}", dir.display());
            remove_dir(&dir)?;
        }
        Ok(())
    }

    fn list_subdirs(&self, dir: &Path) -> Result<Vec<String>, StoreError> {
        self.lister.subdirs(dir).map_err(|e| StoreError::Io {
            op: "list",
            path: dir.to_path_buf(),
            source: e,
        })
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Load a board by id. Board-level parse failures are fatal; a column
    /// or task that cannot be loaded is skipped with a warning so one bad
    /// sibling never hides the rest of the tree.
    pub fn find_by_id(&self, id: &str) -> Result<Board, StoreError> {
        let board_dir = self.paths.board_dir(id);
        if !board_dir.is_dir() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        let mut board = self.load_board_shell(id, &board_dir)?;
        self.load_columns(&mut board)?;
        board.reorder_columns();
        Ok(board)
    }

    /// Load every board under the root, skipping ones that fail to load.
    pub fn find_all(&self) -> Result<Vec<Board>, StoreError> {
        ensure_dir(self.paths.root())?;

        let names = self.list_subdirs(self.paths.root())?;
        let mut boards = Vec::new();
        for name in names {
            match self.find_by_id(&name) {
                Ok(board) => boards.push(board),
                Err(e) => warn!("skipping board {name:?}: {e}"),
            }
        }
        Ok(boards)
    }

    /// Find a board by display name.
    pub fn find_by_name(&self, name: &str) -> Result<Board, StoreError> {
        self.find_all()?
            .into_iter()
            .find(|b| b.name == name)
            .ok_or_else(|| StoreError::NotFound {
                id: name.to_string(),
            })
    }

    /// Remove a board and its whole subtree.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let board_dir = self.paths.board_dir(id);
        if !board_dir.is_dir() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        remove_dir(&board_dir)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.paths.board_dir(id).is_dir()
    }

    fn load_board_shell(&self, id: &str, board_dir: &Path) -> Result<Board, StoreError> {
        let meta_path = self.paths.board_metadata(id);
        let content_path = self.paths.board_content(id);

        let docs = probe_docs(&meta_path, &content_path)?.ok_or_else(|| {
            StoreError::Unrecognized {
                dir: board_dir.to_path_buf(),
            }
        })?;

        match docs {
            EntityDocs::Split { fields, title, body } => {
                board_codec::from_split(&fields, id, &title, &body)
                    .map_err(|e| codec_error(meta_path, e))
            }
            EntityDocs::FrontMatter(doc) => board_codec::from_front_matter(&doc, id)
                .map_err(|e| codec_error(content_path, e)),
            // Content file not written yet: the directory name stands in
            // for the title.
            EntityDocs::MetadataOnly { fields } => board_codec::from_split(&fields, id, "", "")
                .map_err(|e| codec_error(meta_path, e)),
        }
    }

    fn load_columns(&self, board: &mut Board) -> Result<(), StoreError> {
        let columns_dir = self.paths.columns_dir(&board.id);
        let (base, legacy_layout) = if columns_dir.is_dir() {
            (columns_dir, false)
        } else {
            (self.paths.board_dir(&board.id), true)
        };

        for name in self.list_subdirs(&base)? {
            let dir = base.join(&name);
            if legacy_layout {
                if name == COLUMNS_DIR {
                    continue;
                }
                // Only directories exhibiting column-shaped files count;
                // anything else under the board root is not ours.
                if !dir.join(METADATA_FILE).is_file() && !dir.join(COLUMN_CONTENT_FILE).is_file() {
                    continue;
                }
            }

            match self.load_column(&dir, &name) {
                Ok(column) => {
                    let key = column.key();
                    if board.columns.iter().any(|c| c.key() == key) {
                        warn!(
                            "skipping column {}: key {key:?} collides with an already-loaded column",
                            dir.display()
                        );
                        continue;
                    }
                    board.columns.push(column);
                }
                Err(e) => warn!("skipping column {}: {e}", dir.display()),
            }
        }
        Ok(())
    }

    fn load_column(&self, column_dir: &Path, folder_name: &str) -> Result<Column, StoreError> {
        let meta_path = column_dir.join(METADATA_FILE);
        let content_path = column_dir.join(COLUMN_CONTENT_FILE);

        let docs = probe_docs(&meta_path, &content_path)?.ok_or_else(|| {
            StoreError::Unrecognized {
                dir: column_dir.to_path_buf(),
            }
        })?;

        let mut column = match docs {
            EntityDocs::Split { fields, title, body } => {
                column_codec::from_split(&fields, folder_name, &title, &body)
                    .map_err(|e| codec_error(meta_path, e))
            }
            EntityDocs::FrontMatter(doc) => column_codec::from_front_matter(&doc, folder_name)
                .map_err(|e| codec_error(content_path, e)),
            EntityDocs::MetadataOnly { fields } => {
                column_codec::from_split(&fields, folder_name, "", "")
                    .map_err(|e| codec_error(meta_path, e))
            }
        }?;

        self.load_tasks(column_dir, &mut column)?;
        Ok(column)
    }

    fn load_tasks(&self, column_dir: &Path, column: &mut Column) -> Result<(), StoreError> {
        let tasks_dir = BoardPaths::tasks_dir(column_dir);
        let (base, legacy_layout) = if tasks_dir.is_dir() {
            (tasks_dir, false)
        } else {
            (column_dir.to_path_buf(), true)
        };

        for name in self.list_subdirs(&base)? {
            let task_dir = base.join(&name);
            let id = match name.parse::<TaskId>() {
                Ok(id) => id,
                Err(_) if legacy_layout => continue, // not a task directory
                Err(e) => {
                    warn!("skipping task {}: {e}", task_dir.display());
                    continue;
                }
            };

            match self.load_task(&task_dir, id) {
                Ok(task) => {
                    if column.task(&task.id).is_some() {
                        warn!("skipping task {}: duplicate id", task_dir.display());
                        continue;
                    }
                    column.tasks.push(task);
                }
                Err(e) => warn!("skipping task {}: {e}", task_dir.display()),
            }
        }
        Ok(())
    }

    /// Load one task. The folder-derived id is authoritative; the split
    /// pair is preferred, a lone front-matter `task.md` is the oldest
    /// generation, and a missing body file degrades to an empty body.
    fn load_task(&self, task_dir: &Path, id: TaskId) -> Result<Task, StoreError> {
        let meta_path = BoardPaths::task_metadata(task_dir);
        let content_path = BoardPaths::task_content(task_dir);

        let meta = read_optional(&meta_path)?;
        let content = read_optional(&content_path)?;

        match (meta, content) {
            (Some(meta), content) => {
                let fields = FieldMap::from_yaml(&meta).map_err(|e| StoreError::Yaml {
                    path: meta_path.clone(),
                    source: e,
                })?;
                task_codec::from_parts(&fields, content.as_deref().unwrap_or(""), id)
                    .map_err(|e| codec_error(meta_path, e))
            }
            (None, Some(content)) => {
                let doc = parse_front_matter(&content).map_err(|e| StoreError::Yaml {
                    path: content_path.clone(),
                    source: e,
                })?;
                task_codec::from_parts(&doc.fields, &doc.body, id)
                    .map_err(|e| codec_error(content_path, e))
            }
            (None, None) => Err(StoreError::Unrecognized {
                dir: task_dir.to_path_buf(),
            }),
        }
    }
}

/// Probe one entity directory for its schema generation.
fn probe_docs(meta_path: &Path, content_path: &Path) -> Result<Option<EntityDocs>, StoreError> {
    let meta = read_optional(meta_path)?;
    let content = read_optional(content_path)?;

    match (meta, content) {
        (Some(meta), Some(content)) => {
            let fields = FieldMap::from_yaml(&meta).map_err(|e| StoreError::Yaml {
                path: meta_path.to_path_buf(),
                source: e,
            })?;
            let doc = parse_title_doc(&content);
            Ok(Some(EntityDocs::Split {
                fields,
                title: doc.title,
                body: doc.body,
            }))
        }
        (None, Some(content)) => {
            let doc = parse_front_matter(&content).map_err(|e| StoreError::Yaml {
                path: content_path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(EntityDocs::FrontMatter(doc)))
        }
        (Some(meta), None) => {
            let fields = FieldMap::from_yaml(&meta).map_err(|e| StoreError::Yaml {
                path: meta_path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(EntityDocs::MetadataOnly { fields }))
        }
        (None, None) => Ok(None),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io {
            op: "read",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    atomic::ensure_dir(path).map_err(|e| StoreError::Io {
        op: "create",
        path: path.to_path_buf(),
        source: e,
    })
}

fn remove_dir(path: &Path) -> Result<(), StoreError> {
    atomic::remove_dir(path).map_err(|e| StoreError::Io {
        op: "remove",
        path: path.to_path_buf(),
        source: e,
    })
}

fn codec_error(path: PathBuf, source: CodecError) -> StoreError {
    StoreError::Codec { path, source }
}
