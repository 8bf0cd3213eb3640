//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` in the quill config
//! directory. A missing or empty file yields the default configuration.

use crate::paths::QuillPaths;
use quill_core::config::ConfigRoot;
use quill_core::{QuillError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ConfigRoot>>>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the resolved config dir.
    pub fn new(paths: &QuillPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| QuillError::config(format!("Failed to get config path: {}", e)))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading from an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    pub async fn get_config(&self) -> Result<ConfigRoot> {
        {
            let read_lock = self.config.read().await;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config().await?;

        let mut write_lock = self.config.write().await;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().await;
        *write_lock = None;
    }

    /// Writes `config` to disk and refreshes the cache.
    pub async fn save_config(&self, config: &ConfigRoot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(config)?;
        tokio::fs::write(&self.path, content).await?;

        let mut write_lock = self.config.write().await;
        *write_lock = Some(config.clone());
        Ok(())
    }

    async fn load_config(&self) -> Result<ConfigRoot> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "No config file, using defaults");
                return Ok(ConfigRoot::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(ConfigRoot::default());
        }

        let config: ConfigRoot = toml::from_str(&content)?;
        tracing::debug!(path = ?self.path, model = %config.coach.model, "Loaded config");
        Ok(config)
    }
}
