use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from `config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per board.
    #[serde(default = "default_boards_path")]
    pub boards_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            boards_path: default_boards_path(),
        }
    }
}

fn default_boards_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanri")
        .join("boards")
}
