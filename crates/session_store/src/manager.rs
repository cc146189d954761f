//! Session manager - load, run a turn, save.

use crate::error::{Result, SessionError};
use crate::storage::SessionStorage;
use pomodoro_state::SessionRecord;
use std::sync::Arc;

/// Wraps a storage backend with the per-turn load/save cycle.
///
/// Nothing is cached between turns; every turn reads the stored record.
pub struct SessionManager<S: SessionStorage + ?Sized> {
    storage: Arc<S>,
}

impl<S: SessionStorage + ?Sized> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: SessionStorage> SessionManager<S> {
    /// Create a new SessionManager
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }
}

impl<S: SessionStorage + ?Sized> SessionManager<S> {
    pub fn with_storage(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The stored record, or a fresh one for a first-time user.
    pub async fn load_or_default(&self, user_id: &str) -> Result<SessionRecord> {
        validate_user_id(user_id)?;
        match self.storage.load_session(user_id).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(user_id = %user_id, "No stored session, starting fresh");
                Ok(SessionRecord::default())
            }
            other => other,
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<SessionRecord> {
        validate_user_id(user_id)?;
        self.storage.load_session(user_id).await
    }

    /// Stamp and persist a record.
    pub async fn save(&self, user_id: &str, mut record: SessionRecord) -> Result<SessionRecord> {
        validate_user_id(user_id)?;
        record.touch();
        self.storage.save_session(user_id, &record).await?;
        Ok(record)
    }

    pub async fn delete(&self, user_id: &str) -> Result<bool> {
        validate_user_id(user_id)?;
        self.storage.delete_session(user_id).await
    }

    /// Runs one turn: load the record, hand it to `turn`, save what it returns.
    pub async fn apply<T, F>(&self, user_id: &str, turn: F) -> Result<T>
    where
        F: FnOnce(SessionRecord) -> (SessionRecord, T),
    {
        let record = self.load_or_default(user_id).await?;
        let (record, output) = turn(record);
        self.save(user_id, record).await?;
        Ok(output)
    }
}

fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(SessionError::Validation("user id must not be empty".to_string()));
    }
    Ok(())
}
