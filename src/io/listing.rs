use std::fs;
use std::io;
use std::path::Path;

/// Listing of a logical container's child directories. The store depends on
/// this rather than on `fs::read_dir` directly so reconciliation decisions
/// can be exercised against an in-memory tree in tests.
pub trait DirLister: Send + Sync {
    /// Names of the subdirectories of `dir`, sorted. A missing `dir` is an
    /// empty listing, not an error.
    fn subdirs(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// The real-filesystem listing used everywhere outside tests.
#[derive(Debug, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn subdirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
