use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Default permission bits for data files.
pub const FILE_MODE: u32 = 0o644;

/// Write `content` to `path` so that no reader ever observes a partial
/// file: temp file in the target's own directory (keeping the final rename
/// on one filesystem), write, flush, fsync, chmod, rename. On any failure
/// before the rename the temp file is dropped and the target is untouched.
pub fn atomic_write(path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory (and parents) if it doesn't exist.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Remove a directory and all its contents. Removing a path that does not
/// exist succeeds.
pub fn remove_dir(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
