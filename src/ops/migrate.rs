//! One-way, idempotent layout migrations. Each operation is safe to run
//! repeatedly (e.g. on every startup) and decides per column and per task,
//! so a board mixing generations migrates incrementally.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::io::atomic;
use crate::io::board_io::{BoardStore, StoreError};
use crate::io::paths::{BoardPaths, COLUMN_CONTENT_FILE, COLUMNS_DIR, METADATA_FILE, TASKS_DIR};
use crate::model::TaskId;
use crate::parse::column_codec;
use crate::parse::front_matter::parse_front_matter;
use crate::util::slug::slugify;

/// Move column directories from the board root into the `columns/`
/// container. A column already inside `columns/` is left alone; a no-op
/// when nothing at the root looks like a column.
pub fn promote_columns(store: &BoardStore, board_id: &str) -> Result<(), StoreError> {
    let board_dir = board_dir_checked(store, board_id)?;
    let columns_dir = store.paths().columns_dir(board_id);

    let mut to_move = Vec::new();
    for name in list_subdirs(store, &board_dir)? {
        if name == COLUMNS_DIR {
            continue;
        }
        if is_column_dir(&board_dir.join(&name)) {
            to_move.push(name);
        }
    }
    if to_move.is_empty() {
        return Ok(());
    }

    ensure_dir(&columns_dir)?;
    for name in to_move {
        let target = columns_dir.join(&name);
        if target.exists() {
            // Same name on both sides of the migration boundary is a
            // pre-existing conflict; leave it for the operator.
            warn!("not promoting column {name:?}: {COLUMNS_DIR}/{name} already exists");
            continue;
        }
        debug!("promoting column {name:?} into {COLUMNS_DIR}/");
        rename(&board_dir.join(&name), &target)?;
    }
    Ok(())
}

/// Move task directories from each column root into that column's `tasks/`
/// container. Columns that already have `tasks/` are left alone.
pub fn promote_tasks(store: &BoardStore, board_id: &str) -> Result<(), StoreError> {
    for column_dir in all_column_dirs(store, board_id)? {
        let tasks_dir = BoardPaths::tasks_dir(&column_dir);
        if tasks_dir.is_dir() {
            continue;
        }

        let to_move: Vec<String> = list_subdirs(store, &column_dir)?
            .into_iter()
            .filter(|entry| entry.parse::<TaskId>().is_ok())
            .collect();
        if to_move.is_empty() {
            continue;
        }

        ensure_dir(&tasks_dir)?;
        for task_name in to_move {
            debug!(
                "promoting task {task_name:?} into {}/{TASKS_DIR}/",
                column_dir.display()
            );
            rename(&column_dir.join(&task_name), &tasks_dir.join(&task_name))?;
        }
    }
    Ok(())
}

/// Rewrite columns still stored as a single front-matter `column.md` into
/// the split pair, recomputing the normalized directory key and renaming
/// the directory when the key changed. Columns that already carry a
/// `metadata.yml` are considered migrated.
pub fn rewrite_legacy_columns(store: &BoardStore, board_id: &str) -> Result<(), StoreError> {
    for mut column_dir in all_column_dirs(store, board_id)? {
        if column_dir.join(METADATA_FILE).is_file() {
            continue;
        }
        let content_path = column_dir.join(COLUMN_CONTENT_FILE);
        if !content_path.is_file() {
            continue;
        }

        let Some(folder_name) = dir_name(&column_dir) else {
            continue;
        };
        let text = read(&content_path)?;
        let Ok(doc) = parse_front_matter(&text) else {
            continue;
        };
        let Ok(column) = column_codec::from_front_matter(&doc, &folder_name) else {
            continue;
        };

        // In the legacy layout the folder name is the raw display name;
        // renaming it to the normalized key is part of the rewrite.
        let key = slugify(&folder_name);
        if key != folder_name {
            let renamed = column_dir.with_file_name(&key);
            if renamed.exists() {
                warn!("not renaming column {folder_name:?}: {key:?} already exists");
            } else {
                debug!("renaming column directory {folder_name:?} to {key:?}");
                rename(&column_dir, &renamed)?;
                column_dir = renamed;
            }
        }

        write_file(
            &column_dir.join(METADATA_FILE),
            &yaml(&column_dir, &column_codec::to_metadata(&column))?,
        )?;
        write_file(
            &column_dir.join(COLUMN_CONTENT_FILE),
            &column_codec::content_markdown(&column),
        )?;
    }
    Ok(())
}

/// Run every migration on one board, oldest-layout first.
pub fn migrate_board(store: &BoardStore, board_id: &str) -> Result<(), StoreError> {
    promote_columns(store, board_id)?;
    promote_tasks(store, board_id)?;
    rewrite_legacy_columns(store, board_id)?;
    Ok(())
}

/// A directory counts as a column when it carries either half of the
/// column document pair.
fn is_column_dir(dir: &Path) -> bool {
    dir.join(METADATA_FILE).is_file() || dir.join(COLUMN_CONTENT_FILE).is_file()
}

/// Column directories in both the `columns/` container and, for boards not
/// yet promoted, directly under the board root.
fn all_column_dirs(store: &BoardStore, board_id: &str) -> Result<Vec<PathBuf>, StoreError> {
    let board_dir = board_dir_checked(store, board_id)?;
    let columns_dir = store.paths().columns_dir(board_id);

    let mut dirs = Vec::new();
    if columns_dir.is_dir() {
        for name in list_subdirs(store, &columns_dir)? {
            let dir = columns_dir.join(&name);
            if is_column_dir(&dir) {
                dirs.push(dir);
            }
        }
    }
    for name in list_subdirs(store, &board_dir)? {
        if name == COLUMNS_DIR {
            continue;
        }
        let dir = board_dir.join(&name);
        if is_column_dir(&dir) {
            dirs.push(dir);
        }
    }
    Ok(dirs)
}

fn board_dir_checked(store: &BoardStore, board_id: &str) -> Result<PathBuf, StoreError> {
    let board_dir = store.paths().board_dir(board_id);
    if !board_dir.is_dir() {
        return Err(StoreError::NotFound {
            id: board_id.to_string(),
        });
    }
    Ok(board_dir)
}

fn dir_name(dir: &Path) -> Option<String> {
    dir.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn list_subdirs(store: &BoardStore, dir: &Path) -> Result<Vec<String>, StoreError> {
    store
        .lister()
        .subdirs(dir)
        .map_err(|e| io_error("list", dir, e))
}

fn read(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| io_error("read", path, e))
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    atomic::atomic_write(path, content.as_bytes(), atomic::FILE_MODE)
        .map_err(|e| io_error("write", path, e))
}

fn yaml(
    dir: &Path,
    fields: &crate::parse::front_matter::FieldMap,
) -> Result<String, StoreError> {
    fields.to_yaml().map_err(|e| StoreError::Yaml {
        path: dir.join(METADATA_FILE),
        source: e,
    })
}

fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    atomic::ensure_dir(path).map_err(|e| io_error("create", path, e))
}

fn rename(from: &Path, to: &Path) -> Result<(), StoreError> {
    fs::rename(from, to).map_err(|e| io_error("rename", from, e))
}

fn io_error(op: &'static str, path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}
