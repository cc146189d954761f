//! Session storage trait and implementations

use crate::error::{Result, SessionError};
use async_trait::async_trait;
use pomodoro_state::SessionRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Session storage trait
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load a user's record
    async fn load_session(&self, user_id: &str) -> Result<SessionRecord>;

    /// Save a user's record
    async fn save_session(&self, user_id: &str, record: &SessionRecord) -> Result<()>;

    /// Check if a record exists
    async fn session_exists(&self, user_id: &str) -> bool;

    /// Delete a record. Returns whether one existed.
    async fn delete_session(&self, user_id: &str) -> Result<bool>;
}

/// File-based session storage, one JSON file per user.
///
/// User ids are opaque platform strings, so file names are derived from a
/// SHA-256 digest of the id rather than the id itself.
#[derive(Clone)]
pub struct FileSessionStorage {
    base_path: PathBuf,
}

impl FileSessionStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, user_id: &str) -> PathBuf {
        let digest = Sha256::digest(user_id.as_bytes());
        self.base_path.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load_session(&self, user_id: &str) -> Result<SessionRecord> {
        let path = self.session_path(user_id);

        if !path.exists() {
            return Err(SessionError::NotFound(user_id.to_string()));
        }

        let contents = fs::read_to_string(&path).await?;
        let record: SessionRecord = serde_json::from_str(&contents).map_err(|e| {
            SessionError::InvalidData(format!("{}: {}", path.display(), e))
        })?;

        Ok(record)
    }

    async fn save_session(&self, user_id: &str, record: &SessionRecord) -> Result<()> {
        if self.base_path.exists() && !self.base_path.is_dir() {
            return Err(SessionError::StorageError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        fs::create_dir_all(&self.base_path).await?;

        let path = self.session_path(user_id);
        let tmp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(record)?;

        // Readers never observe a partially written record.
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &path).await?;

        tracing::trace!(user_id = %user_id, path = %path.display(), "Session saved");
        Ok(())
    }

    async fn session_exists(&self, user_id: &str) -> bool {
        self.session_path(user_id).exists()
    }

    async fn delete_session(&self, user_id: &str) -> Result<bool> {
        let path = self.session_path(user_id);

        if path.exists() {
            fs::remove_file(&path).await?;
            return Ok(true);
        }

        Ok(false)
    }
}

/// Process-local storage. Records are lost on restart.
#[derive(Clone, Default)]
pub struct InMemorySessionStorage {
    records: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn load_session(&self, user_id: &str) -> Result<SessionRecord> {
        self.records
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(user_id.to_string()))
    }

    async fn save_session(&self, user_id: &str, record: &SessionRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        Ok(())
    }

    async fn session_exists(&self, user_id: &str) -> bool {
        self.records.read().await.contains_key(user_id)
    }

    async fn delete_session(&self, user_id: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(user_id).is_some())
    }
}
