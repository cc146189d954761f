//! Skill states - the coarse position of a session in the flow.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkillState {
    /// No cycle running; waiting for the user to start one.
    #[default]
    Idle,

    /// A focus interval or break is playing, or was the last thing playing.
    Playing,

    /// Relaunched mid-segment; waiting for a yes/no on resuming.
    ResumeDecision,
}
