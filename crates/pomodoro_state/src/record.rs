//! Session record - the durable per-user attributes persisted between turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::machine::SkillState;

/// Length of a focus interval in minutes.
pub const FOCUS_MINUTES: u64 = 25;

/// Number of focus intervals in one set; a long break closes each set.
pub const SET_SIZE: u32 = 4;

pub const MILLIS_PER_MINUTE: u64 = 60_000;

pub const FOCUS_TOKEN: &str = "pomodoro";
pub const BREAK_TOKEN: &str = "break";
pub const RING_TOKEN: &str = "ring";

/// The segment that `play()` starts for a given record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn asset(&self) -> Asset {
        match self {
            Self::Focus => Asset::Tick25m,
            Self::ShortBreak => Asset::Tick5m,
            Self::LongBreak => Asset::Tick20m,
        }
    }

    /// Token echoed back by the platform on lifecycle signals for this segment.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Focus => FOCUS_TOKEN,
            Self::ShortBreak | Self::LongBreak => BREAK_TOKEN,
        }
    }

    pub fn minutes(&self) -> u64 {
        match self {
            Self::Focus => FOCUS_MINUTES,
            Self::ShortBreak => 5,
            Self::LongBreak => 20,
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Self::Focus)
    }
}

/// Per-user session attributes.
///
/// Every field falls back to its default when missing, so records written by
/// older builds (or by hand) still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    /// Coarse position in the flow.
    pub state: SkillState,

    /// True during a focus interval, false during a break.
    pub in_pomodoro: bool,

    /// Completed focus intervals.
    pub pomodoro_count: u32,

    /// Selects the muted tick variants.
    pub silent: bool,

    /// Set once the completion chime has been enqueued, cleared on acknowledgement.
    pub ringing: bool,

    /// Token of the chime enqueued behind the current item, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enqueued_token: Option<String>,

    /// Offset captured by the last stop.
    pub offset_milliseconds: u64,

    /// Token of the last item the platform reported on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_token: Option<String>,

    /// True once a segment has played to its end.
    pub playback_finished: bool,

    pub index: u32,

    /// Set by a reset; the next intent-driven playback response shows a card.
    pub playback_index_changed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            state: SkillState::Idle,
            in_pomodoro: true,
            pomodoro_count: 0,
            silent: false,
            ringing: false,
            enqueued_token: None,
            offset_milliseconds: 0,
            last_token: None,
            playback_finished: false,
            index: 0,
            playback_index_changed: false,
            updated_at: None,
        }
    }
}

impl SessionRecord {
    /// 1-based ordinal of the current or upcoming interval.
    pub fn ordinal(&self) -> u32 {
        self.pomodoro_count + 1
    }

    pub fn phase(&self) -> Phase {
        if self.in_pomodoro {
            Phase::Focus
        } else if self.ordinal() % SET_SIZE == 0 {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }

    /// Whole minutes covered by the stored offset.
    pub fn elapsed_minutes(&self) -> u64 {
        self.offset_milliseconds / MILLIS_PER_MINUTE
    }

    /// Minutes left in a focus interval at the stored offset.
    pub fn remaining_focus_minutes(&self) -> u64 {
        FOCUS_MINUTES.saturating_sub(self.elapsed_minutes())
    }

    /// Back to the first focus interval of a fresh cycle.
    pub fn reset_counters(&mut self) {
        self.in_pomodoro = true;
        self.pomodoro_count = 0;
    }

    /// Prepares a brand new cycle, discarding any position in the previous one.
    pub fn begin_cycle(&mut self, silent: bool) {
        self.reset_counters();
        self.silent = silent;
        self.ringing = false;
        self.offset_milliseconds = 0;
        self.playback_finished = false;
    }

    /// Acknowledges the ring and flips to the next phase.
    ///
    /// Only leaving a focus interval counts as a completed Pomodoro.
    pub fn stop_ringing(&mut self) {
        if self.in_pomodoro {
            self.pomodoro_count += 1;
        }
        self.in_pomodoro = !self.in_pomodoro;
        self.ringing = false;
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_starts_in_focus() {
        let record = SessionRecord::default();
        assert_eq!(record.state, SkillState::Idle);
        assert!(record.in_pomodoro);
        assert_eq!(record.pomodoro_count, 0);
        assert_eq!(record.phase(), Phase::Focus);
        assert!(record.enqueued_token.is_none());
    }

    #[test]
    fn test_stop_ringing_counts_only_focus_rings() {
        let mut record = SessionRecord::default();
        record.ringing = true;

        record.stop_ringing();
        assert!(!record.in_pomodoro);
        assert_eq!(record.pomodoro_count, 1);
        assert!(!record.ringing);

        record.stop_ringing();
        assert!(record.in_pomodoro);
        assert_eq!(record.pomodoro_count, 1);
    }

    #[test]
    fn test_break_length_follows_ordinal() {
        let mut record = SessionRecord::default();
        record.in_pomodoro = false;
        assert_eq!(record.phase(), Phase::ShortBreak);

        record.pomodoro_count = 3;
        assert_eq!(record.phase(), Phase::LongBreak);
        assert_eq!(record.phase().asset(), Asset::Tick20m);

        record.pomodoro_count = 4;
        assert_eq!(record.phase(), Phase::ShortBreak);
    }

    #[test]
    fn test_remaining_minutes_floor() {
        let mut record = SessionRecord::default();
        record.offset_milliseconds = 90_000;
        assert_eq!(record.elapsed_minutes(), 1);
        assert_eq!(record.remaining_focus_minutes(), 24);

        record.offset_milliseconds = 40 * MILLIS_PER_MINUTE;
        assert_eq!(record.remaining_focus_minutes(), 0);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let mut record = SessionRecord::default();
        record.enqueued_token = Some(RING_TOKEN.to_string());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["inPomodoro"], true);
        assert_eq!(value["pomodoroCount"], 0);
        assert_eq!(value["enqueuedToken"], "ring");
        assert_eq!(value["state"], "idle");
        assert!(value.get("lastToken").is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"state":"playing","pomodoroCount":2}"#).unwrap();
        assert_eq!(record.state, SkillState::Playing);
        assert_eq!(record.pomodoro_count, 2);
        assert!(record.in_pomodoro);
        assert_eq!(record.offset_milliseconds, 0);
    }
}
