//! # Session Token Store
//!
//! Keeps the bearer token the order feed is polled with. The notifier only
//! ever reads it; the login flow saves it and a 401 from the backend may
//! remove it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Errors raised by a [`TokenStore`] backend.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// The backing file could not be read or written.
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value slot for the session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when nobody is logged in.
    async fn get(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replaces the stored token.
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Forgets the stored token. Removing an absent token is not an error.
    async fn remove(&self) -> Result<(), TokenStoreError>;
}

/// Process-local token store. Loses the session on restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), TokenStoreError> {
        self.token.write().await.take();
        Ok(())
    }
}

/// Token store backed by a single file holding the raw token.
///
/// A missing file or one with only whitespace means "no session".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get(&self) -> Result<Option<String>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No token file");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token).await?;
        debug!("Token saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn remove(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().await.unwrap(), None);

        store.save("jwt-1").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("jwt-1"));

        store.remove().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_treats_missing_and_blank_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session").join("token"));

        assert_eq!(store.get().await.unwrap(), None);
        store.remove().await.unwrap();

        store.save("  \n").await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);

        store.save("jwt-2\n").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("jwt-2"));

        store.remove().await.unwrap();
        assert!(!store.path().exists());
    }
}
