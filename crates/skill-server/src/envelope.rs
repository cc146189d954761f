//! Inbound request envelope.
//!
//! Only the fields the skill reads are modelled; everything else in the
//! platform payload is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use pomodoro_state::{EventOrigin, LifecycleSignal, SkillEvent};

use crate::error::SkillServerError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemContext {
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub supported_interfaces: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub offset_in_milliseconds: Option<u64>,
    #[serde(default)]
    pub error: Option<PlaybackError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Intent {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybackError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PlaybackError {
    fn describe(&self) -> Option<String> {
        match (&self.error_type, &self.message) {
            (Some(t), Some(m)) => Some(format!("{t}: {m}")),
            (Some(t), None) => Some(t.clone()),
            (None, Some(m)) => Some(m.clone()),
            (None, None) => None,
        }
    }
}

impl RequestEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, SkillServerError> {
        serde_json::from_slice(body).map_err(|e| SkillServerError::InvalidRequest(e.to_string()))
    }

    fn system(&self) -> Option<&SystemContext> {
        self.context.as_ref().and_then(|c| c.system.as_ref())
    }

    /// The caller's user id. The context copy is present on every request
    /// type; the session copy only on voice requests.
    pub fn user_id(&self) -> Option<&str> {
        self.system()
            .and_then(|s| s.user.as_ref())
            .or_else(|| self.session.as_ref().and_then(|s| s.user.as_ref()))
            .map(|u| u.user_id.as_str())
    }

    pub fn application_id(&self) -> Option<&str> {
        self.system()
            .and_then(|s| s.application.as_ref())
            .or_else(|| self.session.as_ref().and_then(|s| s.application.as_ref()))
            .map(|a| a.application_id.as_str())
    }

    pub fn supports_audio_player(&self) -> bool {
        self.system()
            .and_then(|s| s.device.as_ref())
            .map(|d| d.supported_interfaces.contains_key("AudioPlayer"))
            .unwrap_or(false)
    }

    pub fn to_event(&self) -> SkillEvent {
        let request = &self.request;
        let token = || request.token.clone().unwrap_or_default();

        match request.request_type.as_str() {
            "LaunchRequest" => SkillEvent::Launch,
            "SessionEndedRequest" => SkillEvent::SessionEnded,
            "IntentRequest" => match &request.intent {
                Some(intent) => SkillEvent::from_name(&intent.name),
                None => SkillEvent::Unhandled {
                    name: "IntentRequest".to_string(),
                    origin: EventOrigin::Intent,
                },
            },
            "AudioPlayer.PlaybackStarted" => {
                SkillEvent::Playback(LifecycleSignal::Started { token: token() })
            }
            "AudioPlayer.PlaybackFinished" => {
                SkillEvent::Playback(LifecycleSignal::Finished { token: token() })
            }
            "AudioPlayer.PlaybackStopped" => SkillEvent::Playback(LifecycleSignal::Stopped {
                token: token(),
                offset_in_milliseconds: request.offset_in_milliseconds.unwrap_or(0),
            }),
            "AudioPlayer.PlaybackNearlyFinished" => {
                SkillEvent::Playback(LifecycleSignal::NearlyFinished { token: token() })
            }
            "AudioPlayer.PlaybackFailed" => SkillEvent::Playback(LifecycleSignal::Failed {
                token: request.token.clone(),
                error: request.error.as_ref().and_then(PlaybackError::describe),
            }),
            other => SkillEvent::from_name(other),
        }
    }
}
