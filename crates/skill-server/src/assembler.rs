//! Renders a [`SkillResponse`] into the platform response document.

use serde::Serialize;

use pomodoro_state::{AudioDirective, AudioStream, Card, SkillResponse};

pub const RESPONSE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<WireCard>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: &'static str,
    pub ssml: String,
}

impl OutputSpeech {
    fn ssml(text: &str) -> Self {
        Self {
            speech_type: "SSML",
            ssml: format!("<speak> {} </speak>", escape_ssml(text)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireCard {
    #[serde(rename = "type")]
    pub card_type: &'static str,
    pub title: String,
    pub content: String,
}

impl From<&Card> for WireCard {
    fn from(card: &Card) -> Self {
        Self {
            card_type: "Simple",
            title: card.title.clone(),
            content: card.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "AudioPlayer.Play", rename_all = "camelCase")]
    Play {
        play_behavior: &'static str,
        audio_item: AudioItem,
    },
    #[serde(rename = "AudioPlayer.Stop")]
    Stop,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioItem {
    pub stream: WireStream,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStream {
    pub url: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,
    pub offset_in_milliseconds: u64,
}

impl From<&AudioStream> for WireStream {
    fn from(stream: &AudioStream) -> Self {
        Self {
            url: stream.url.clone(),
            token: stream.token.clone(),
            expected_previous_token: stream.expected_previous_token.clone(),
            offset_in_milliseconds: stream.offset_in_milliseconds,
        }
    }
}

impl From<&AudioDirective> for Directive {
    fn from(directive: &AudioDirective) -> Self {
        match directive {
            AudioDirective::Play(stream) => Directive::Play {
                play_behavior: stream.behavior.as_str(),
                audio_item: AudioItem {
                    stream: stream.into(),
                },
            },
            AudioDirective::Stop => Directive::Stop,
        }
    }
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Builds the wire response.
///
/// `shouldEndSession` is only sent alongside speech: `false` when a reprompt
/// keeps the microphone open, `true` otherwise. Directive-only replies (the
/// only kind allowed for audio player and remote control requests) omit it.
pub fn assemble(response: &SkillResponse) -> ResponseEnvelope {
    let speaks = response.speech.is_some() || response.reprompt.is_some();

    let body = ResponseBody {
        output_speech: response.speech.as_deref().map(OutputSpeech::ssml),
        reprompt: response.reprompt.as_deref().map(|text| Reprompt {
            output_speech: OutputSpeech::ssml(text),
        }),
        card: response.card.as_ref().map(WireCard::from),
        directives: response.directive.iter().map(Directive::from).collect(),
        should_end_session: speaks.then(|| !response.keeps_session_open()),
    };

    ResponseEnvelope {
        version: RESPONSE_VERSION,
        response: body,
    }
}

/// Speech-only reply for devices that cannot play audio.
pub fn device_not_supported() -> ResponseEnvelope {
    assemble(&SkillResponse::speak(pomodoro_state::speech::DEVICE_NOT_SUPPORTED))
}
