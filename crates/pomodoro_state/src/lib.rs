//! pomodoro_state - session state machine for the tomato helper skill
//!
//! Each turn takes the stored [`SessionRecord`] and one [`SkillEvent`] and
//! returns the updated record together with the [`SkillResponse`] to send.

pub mod assets;
pub mod lifecycle;
pub mod machine;
pub mod playback;
pub mod record;
pub mod response;
pub mod speech;

pub use assets::{Asset, AssetResolver, AudioAssets};
pub use lifecycle::{LifecycleHandler, LifecycleSignal};
pub use machine::{EventOrigin, SkillEvent, SkillState, StateMachine, StateTransition};
pub use playback::{PlaybackCommand, PlaybackController, UnsupportedOperation};
pub use record::{Phase, SessionRecord};
pub use response::{AudioDirective, AudioStream, Card, PlayBehavior, SkillResponse};
