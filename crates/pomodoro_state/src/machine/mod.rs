//! State machine module
//!
//! Routes each (state, event) pair to its handler.

mod events;
mod states;
mod transitions;

pub use events::{EventOrigin, SkillEvent};
pub use states::SkillState;
pub use transitions::{StateMachine, StateTransition};
