//! Audio player lifecycle signals.
//!
//! These arrive asynchronously from the platform and are handled the same way
//! whatever the coarse state is.

use serde::{Deserialize, Serialize};

use crate::assets::{Asset, AssetResolver};
use crate::record::{SessionRecord, RING_TOKEN};
use crate::response::{AudioDirective, PlayBehavior, SkillResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleSignal {
    Started {
        token: String,
    },
    Finished {
        token: String,
    },
    Stopped {
        token: String,
        offset_in_milliseconds: u64,
    },
    NearlyFinished {
        token: String,
    },
    Failed {
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        error: Option<String>,
    },
}

impl LifecycleSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "PlaybackStarted",
            Self::Finished { .. } => "PlaybackFinished",
            Self::Stopped { .. } => "PlaybackStopped",
            Self::NearlyFinished { .. } => "PlaybackNearlyFinished",
            Self::Failed { .. } => "PlaybackFailed",
        }
    }
}

pub struct LifecycleHandler<'a, R: AssetResolver + ?Sized> {
    assets: &'a R,
}

impl<'a, R: AssetResolver + ?Sized> LifecycleHandler<'a, R> {
    pub fn new(assets: &'a R) -> Self {
        Self { assets }
    }

    pub fn handle(&self, signal: &LifecycleSignal, record: &mut SessionRecord) -> SkillResponse {
        match signal {
            LifecycleSignal::Started { token } => {
                record.last_token = Some(token.clone());
                record.playback_finished = false;
                SkillResponse::empty()
            }
            LifecycleSignal::Finished { token } => {
                tracing::debug!(token = %token, "Playback finished");
                record.playback_finished = true;
                record.enqueued_token = None;
                SkillResponse::empty()
            }
            LifecycleSignal::Stopped {
                token,
                offset_in_milliseconds,
            } => {
                record.last_token = Some(token.clone());
                record.offset_milliseconds = *offset_in_milliseconds;
                tracing::debug!(token = %token, offset_ms = offset_in_milliseconds, "Playback stopped");
                SkillResponse::empty()
            }
            LifecycleSignal::NearlyFinished { token } => self.enqueue_ring(token, record),
            LifecycleSignal::Failed { token, error } => {
                tracing::warn!(token = ?token, error = ?error, "Playback failed");
                SkillResponse::empty()
            }
        }
    }

    /// Enqueues the chime behind the current item, at most once per segment.
    ///
    /// NearlyFinished may be delivered several times for the same item; only
    /// the first delivery enqueues.
    fn enqueue_ring(&self, token: &str, record: &mut SessionRecord) -> SkillResponse {
        record.ringing = true;

        if let Some(enqueued) = &record.enqueued_token {
            tracing::debug!(enqueued = %enqueued, "Ring already enqueued");
            return SkillResponse::empty();
        }

        let expected_previous = record
            .last_token
            .clone()
            .unwrap_or_else(|| token.to_string());
        record.enqueued_token = Some(RING_TOKEN.to_string());

        SkillResponse::empty().with_directive(AudioDirective::play(
            PlayBehavior::Enqueue,
            self.assets.url(Asset::Ring, false),
            RING_TOKEN,
            Some(expected_previous),
            0,
        ))
    }
}
