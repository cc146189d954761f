//! Skill events - the inbound requests that drive the state machine.

use serde::{Deserialize, Serialize};

use crate::lifecycle::LifecycleSignal;

/// Where an event came from. The platform only accepts speech and cards in
/// replies to launches and intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Launch,
    Intent,
    RemoteControl,
    AudioPlayer,
    Session,
}

impl EventOrigin {
    /// Classifies a raw request type or intent name by its namespace.
    pub fn of_request_type(name: &str) -> Self {
        if name.starts_with("PlaybackController.") {
            Self::RemoteControl
        } else if name.starts_with("AudioPlayer.") {
            Self::AudioPlayer
        } else if name.starts_with("System.") || name.starts_with("Session") {
            Self::Session
        } else if name == "LaunchRequest" {
            Self::Launch
        } else {
            Self::Intent
        }
    }

    /// Whether a reply may carry speech, a reprompt or a card.
    pub fn accepts_voice(&self) -> bool {
        matches!(self, Self::Launch | Self::Intent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEvent {
    // ========== Session ==========
    Launch,
    SessionEnded,

    // ========== Voice Intents ==========
    StartFocus,
    StartSilentFocus,
    Next,
    Previous,
    Pause,
    Stop,
    Cancel,
    Resume,
    LoopOn,
    LoopOff,
    ShuffleOn,
    ShuffleOff,
    StartOver,
    Yes,
    No,
    Help,
    Continue,
    Progress,

    // ========== Remote Control ==========
    PlayCommand,
    PauseCommand,
    NextCommand,
    PreviousCommand,

    // ========== Audio Player ==========
    Playback(LifecycleSignal),

    // ========== Unbound ==========
    Unhandled { name: String, origin: EventOrigin },
}

impl SkillEvent {
    /// Decodes an event name that carries no payload.
    ///
    /// Platform namespaces (`PlaybackController.`, `AudioPlayer.`) are ignored.
    /// Audio player signals need their payload and are built directly as
    /// [`SkillEvent::Playback`]; passed here they decode as unhandled.
    pub fn from_name(name: &str) -> Self {
        let short = name
            .strip_prefix("PlaybackController.")
            .or_else(|| name.strip_prefix("AudioPlayer."))
            .unwrap_or(name);

        match short {
            "LaunchRequest" => Self::Launch,
            "SessionEndedRequest" => Self::SessionEnded,
            "StartPomodoro" | "StartFocus" => Self::StartFocus,
            "StartSilentPomodoro" | "StartSilentFocus" => Self::StartSilentFocus,
            "AMAZON.NextIntent" => Self::Next,
            "AMAZON.PreviousIntent" => Self::Previous,
            "AMAZON.PauseIntent" => Self::Pause,
            "AMAZON.StopIntent" => Self::Stop,
            "AMAZON.CancelIntent" => Self::Cancel,
            "AMAZON.ResumeIntent" => Self::Resume,
            "AMAZON.LoopOnIntent" => Self::LoopOn,
            "AMAZON.LoopOffIntent" => Self::LoopOff,
            "AMAZON.ShuffleOnIntent" => Self::ShuffleOn,
            "AMAZON.ShuffleOffIntent" => Self::ShuffleOff,
            "AMAZON.StartOverIntent" => Self::StartOver,
            "AMAZON.YesIntent" => Self::Yes,
            "AMAZON.NoIntent" => Self::No,
            "AMAZON.HelpIntent" => Self::Help,
            "Continue" => Self::Continue,
            "Progress" => Self::Progress,
            "PlayCommandIssued" => Self::PlayCommand,
            "PauseCommandIssued" => Self::PauseCommand,
            "NextCommandIssued" => Self::NextCommand,
            "PreviousCommandIssued" => Self::PreviousCommand,
            _ => Self::Unhandled {
                name: name.to_string(),
                origin: EventOrigin::of_request_type(name),
            },
        }
    }

    /// Canonical inbound name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Self::Launch => "LaunchRequest",
            Self::SessionEnded => "SessionEndedRequest",
            Self::StartFocus => "StartPomodoro",
            Self::StartSilentFocus => "StartSilentPomodoro",
            Self::Next => "AMAZON.NextIntent",
            Self::Previous => "AMAZON.PreviousIntent",
            Self::Pause => "AMAZON.PauseIntent",
            Self::Stop => "AMAZON.StopIntent",
            Self::Cancel => "AMAZON.CancelIntent",
            Self::Resume => "AMAZON.ResumeIntent",
            Self::LoopOn => "AMAZON.LoopOnIntent",
            Self::LoopOff => "AMAZON.LoopOffIntent",
            Self::ShuffleOn => "AMAZON.ShuffleOnIntent",
            Self::ShuffleOff => "AMAZON.ShuffleOffIntent",
            Self::StartOver => "AMAZON.StartOverIntent",
            Self::Yes => "AMAZON.YesIntent",
            Self::No => "AMAZON.NoIntent",
            Self::Help => "AMAZON.HelpIntent",
            Self::Continue => "Continue",
            Self::Progress => "Progress",
            Self::PlayCommand => "PlayCommandIssued",
            Self::PauseCommand => "PauseCommandIssued",
            Self::NextCommand => "NextCommandIssued",
            Self::PreviousCommand => "PreviousCommandIssued",
            Self::Playback(signal) => signal.name(),
            Self::Unhandled { name, .. } => name,
        }
    }

    pub fn origin(&self) -> EventOrigin {
        match self {
            Self::Launch => EventOrigin::Launch,
            Self::SessionEnded => EventOrigin::Session,
            Self::PlayCommand | Self::PauseCommand | Self::NextCommand | Self::PreviousCommand => {
                EventOrigin::RemoteControl
            }
            Self::Playback(_) => EventOrigin::AudioPlayer,
            Self::Unhandled { origin, .. } => *origin,
            _ => EventOrigin::Intent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_decode_to_same_event() {
        assert_eq!(SkillEvent::from_name("StartPomodoro"), SkillEvent::StartFocus);
        assert_eq!(SkillEvent::from_name("StartFocus"), SkillEvent::StartFocus);
        assert_eq!(
            SkillEvent::from_name("StartSilentPomodoro"),
            SkillEvent::StartSilentFocus
        );
    }

    #[test]
    fn test_namespaced_remote_commands() {
        let event = SkillEvent::from_name("PlaybackController.NextCommandIssued");
        assert_eq!(event, SkillEvent::NextCommand);
        assert_eq!(event.origin(), EventOrigin::RemoteControl);
    }

    #[test]
    fn test_unknown_names_are_unhandled() {
        let event = SkillEvent::from_name("OrderPizzaIntent");
        assert_eq!(
            event,
            SkillEvent::Unhandled {
                name: "OrderPizzaIntent".to_string(),
                origin: EventOrigin::Intent,
            }
        );
        assert_eq!(event.origin(), EventOrigin::Intent);
        assert!(matches!(
            SkillEvent::from_name("AudioPlayer.PlaybackStarted"),
            SkillEvent::Unhandled { .. }
        ));
    }

    #[test]
    fn test_event_names_are_case_sensitive() {
        assert!(matches!(
            SkillEvent::from_name("amazon.nextintent"),
            SkillEvent::Unhandled { .. }
        ));
    }

    #[test]
    fn test_origin_detection() {
        assert_eq!(SkillEvent::Launch.origin(), EventOrigin::Launch);
        assert_eq!(SkillEvent::Next.origin(), EventOrigin::Intent);
        let signal = SkillEvent::Playback(LifecycleSignal::Finished {
            token: "pomodoro".to_string(),
        });
        assert_eq!(signal.origin(), EventOrigin::AudioPlayer);
        assert_eq!(signal.name(), "PlaybackFinished");
    }

    #[test]
    fn test_unknown_names_keep_their_namespace() {
        let cases = [
            ("System.ExceptionEncountered", EventOrigin::Session),
            ("AudioPlayer.PlaybackQueueCleared", EventOrigin::AudioPlayer),
            ("PlaybackController.FastForwardCommandIssued", EventOrigin::RemoteControl),
            ("AMAZON.FallbackIntent", EventOrigin::Intent),
        ];
        for (name, origin) in cases {
            let event = SkillEvent::from_name(name);
            assert_eq!(event.origin(), origin, "{name}");
            assert_eq!(event.name(), name);
            assert_eq!(event.origin().accepts_voice(), origin == EventOrigin::Intent);
        }
    }
}
