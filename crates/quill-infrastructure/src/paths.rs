//! Unified path management for quill configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/quill/             # Config directory (or --config-dir / $QUILL_CONFIG_DIR)
//! ├── config.toml              # Coaching settings
//! └── secret.json              # API keys
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "QUILL_CONFIG_DIR";

const APP_DIR_NAME: &str = "quill";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where quill keeps its files.
///
/// Resolution order for the config directory:
/// 1. An explicit base path passed to [`QuillPaths::new`]
/// 2. `$QUILL_CONFIG_DIR`
/// 3. `dirs::config_dir()/quill`
#[derive(Debug, Clone, Default)]
pub struct QuillPaths {
    base_path: Option<PathBuf>,
}

impl QuillPaths {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base_path: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the quill configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_path {
            return Ok(base.clone());
        }
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_wins() {
        let paths = QuillPaths::new(Some(Path::new("/tmp/quill-test")));
        assert_eq!(paths.config_dir().unwrap(), PathBuf::from("/tmp/quill-test"));
    }

    #[test]
    fn test_files_live_under_config_dir() {
        let paths = QuillPaths::new(Some(Path::new("/tmp/quill-test")));
        let config_dir = paths.config_dir().unwrap();

        let config_file = paths.config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let secret_file = paths.secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
        assert!(secret_file.starts_with(&config_dir));
    }
}
