//! Secret service implementation.
//!
//! Reads `secret.json` from the quill config directory. The
//! `GEMINI_API_KEY` environment variable, when set, takes precedence over the
//! key stored in the file.

use crate::paths::QuillPaths;
use quill_core::config::{GeminiConfig, SecretConfig};
use quill_core::secret::SecretService;
use quill_core::{QuillError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Environment variable holding a Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service for loading secret configuration.
///
/// Loaded secrets are cached to avoid repeated file I/O.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env_api_key: Option<String>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service for the resolved config directory, picking up
    /// `GEMINI_API_KEY` from the process environment.
    pub fn new(paths: &QuillPaths) -> Result<Self> {
        let path = paths
            .secret_file()
            .map_err(|e| QuillError::config(format!("Failed to get secret path: {}", e)))?;
        let env_api_key = std::env::var(GEMINI_API_KEY_ENV).ok();
        Ok(Self::with_path(path).with_env_api_key(env_api_key))
    }

    /// Creates a service reading from an explicit file, ignoring the
    /// environment.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            env_api_key: None,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets the key that overrides the file. Blank keys are ignored.
    pub fn with_env_api_key(mut self, key: Option<String>) -> Self {
        self.env_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    async fn load_from_file(&self) -> Result<SecretConfig> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(SecretConfig::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SecretConfig::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        {
            let read_lock = self.secrets.read().await;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_from_file().await?;
        if let Some(key) = &self.env_api_key {
            tracing::debug!(env = GEMINI_API_KEY_ENV, "Using Gemini API key from environment");
            loaded.gemini = Some(GeminiConfig {
                api_key: key.clone(),
            });
        }

        let mut write_lock = self.secrets.write().await;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::with_path(temp_dir.path().join("secret.json"));

        assert!(!service.secret_file_exists().await);
        let secrets = service.load_secrets().await.unwrap();
        assert_eq!(secrets.gemini_api_key(), None);
    }

    #[tokio::test]
    async fn test_reads_key_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini": {"api_key": "from-file"}}"#).unwrap();

        let service = SecretServiceImpl::with_path(&path);
        assert!(service.secret_file_exists().await);
        let secrets = service.load_secrets().await.unwrap();
        assert_eq!(secrets.gemini_api_key(), Some("from-file"));
    }

    #[tokio::test]
    async fn test_env_key_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini": {"api_key": "from-file"}}"#).unwrap();

        let service =
            SecretServiceImpl::with_path(&path).with_env_api_key(Some("from-env".to_string()));
        let secrets = service.load_secrets().await.unwrap();
        assert_eq!(secrets.gemini_api_key(), Some("from-env"));
    }

    #[tokio::test]
    async fn test_blank_env_key_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::with_path(temp_dir.path().join("secret.json"))
            .with_env_api_key(Some("   ".to_string()));
        let secrets = service.load_secrets().await.unwrap();
        assert_eq!(secrets.gemini_api_key(), None);
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "{ not json").unwrap();

        let service = SecretServiceImpl::with_path(&path);
        let err = service.load_secrets().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
