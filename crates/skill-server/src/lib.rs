//! HTTP front end for the tomato helper skill.
//!
//! Decodes the platform request envelope, runs one turn of the
//! [`pomodoro_state::StateMachine`] against the stored session, and renders
//! the result back into the platform response format.

pub mod assembler;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use config::{ConfigError, SkillConfig, StorageKind};
pub use error::SkillServerError;
pub use state::AppState;
