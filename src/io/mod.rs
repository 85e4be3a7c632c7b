pub mod atomic;
pub mod board_io;
pub mod config_io;
pub mod listing;
pub mod paths;
pub mod reconcile;

pub use atomic::atomic_write;
pub use board_io::{BoardStore, StoreError};
pub use listing::{DirLister, FsLister};
pub use paths::BoardPaths;
