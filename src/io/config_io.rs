use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Path of the user config file, `<config dir>/kanri/config.yml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanri")
        .join("config.yml")
}

/// Load the user configuration. A missing file is not an error (every
/// field has a default), but an unreadable or malformed one is.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_from(&tmp.path().join("config.yml")).unwrap();
        assert!(config.storage.boards_path.ends_with("kanri/boards"));
    }

    #[test]
    fn test_explicit_boards_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(&path, "storage:\n  boards_path: /srv/boards\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.storage.boards_path, PathBuf::from("/srv/boards"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(&path, "storage: [not a map\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
