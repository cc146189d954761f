//! # Session Store
//!
//! Loads and saves the per-user [`SessionRecord`] around each skill turn.
//! Records are keyed by the platform's user id.

pub mod error;
pub mod manager;
pub mod storage;

// Re-exports
pub use error::{Result, SessionError};
pub use manager::SessionManager;
pub use pomodoro_state::SessionRecord;
pub use storage::{FileSessionStorage, InMemorySessionStorage, SessionStorage};
