//! Response intents produced by a turn.
//!
//! These are platform-neutral; the server crate renders them to the wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Clear the queue and play immediately.
    ReplaceAll,
    /// Append after the currently playing item.
    Enqueue,
}

impl PlayBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReplaceAll => "REPLACE_ALL",
            Self::Enqueue => "ENQUEUE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStream {
    pub behavior: PlayBehavior,
    pub url: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,
    pub offset_in_milliseconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioDirective {
    Play(AudioStream),
    Stop,
}

impl AudioDirective {
    pub fn play(
        behavior: PlayBehavior,
        url: impl Into<String>,
        token: impl Into<String>,
        expected_previous_token: Option<String>,
        offset_in_milliseconds: u64,
    ) -> Self {
        Self::Play(AudioStream {
            behavior,
            url: url.into(),
            token: token.into(),
            expected_previous_token,
            offset_in_milliseconds,
        })
    }

    pub fn stream(&self) -> Option<&AudioStream> {
        match self {
            Self::Play(stream) => Some(stream),
            Self::Stop => None,
        }
    }
}

/// A simple title/content card shown in the companion app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub content: String,
}

/// What a handler decided to say and play.
///
/// An empty response is a bare acknowledgement: nothing is spoken and the
/// player is left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<AudioDirective>,
}

impl SkillResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Speak and end the turn.
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            speech: Some(text.into()),
            ..Self::default()
        }
    }

    /// Speak and keep listening, repeating `reprompt` if the user stays silent.
    pub fn ask(text: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech: Some(text.into()),
            reprompt: Some(reprompt.into()),
            ..Self::default()
        }
    }

    pub fn with_directive(mut self, directive: AudioDirective) -> Self {
        self.directive = Some(directive);
        self
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Drops everything the user would see or hear, keeping the directive.
    pub fn without_voice(mut self) -> Self {
        self.speech = None;
        self.reprompt = None;
        self.card = None;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.speech.is_none()
            && self.reprompt.is_none()
            && self.card.is_none()
            && self.directive.is_none()
    }

    pub fn keeps_session_open(&self) -> bool {
        self.reprompt.is_some()
    }

    /// The stream this response starts, if it carries a play directive.
    pub fn stream(&self) -> Option<&AudioStream> {
        self.directive.as_ref().and_then(AudioDirective::stream)
    }

    pub fn starts_playback(&self) -> bool {
        self.stream().is_some()
    }
}
