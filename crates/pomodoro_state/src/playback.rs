//! Playback controller - turns a playback command into record updates and an
//! audio directive.

use crate::assets::AssetResolver;
use crate::machine::SkillState;
use crate::record::SessionRecord;
use crate::response::{AudioDirective, PlayBehavior, SkillResponse};
use crate::speech;

/// Operations the skill answers with a fixed apology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedOperation {
    PlayNext,
    PlayPrevious,
    LoopOn,
    LoopOff,
    ShuffleOn,
    ShuffleOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Start the current segment from the stored offset, or from zero if it
    /// had already finished.
    Play,
    /// Start the segment that follows an acknowledged ring, from zero.
    Advance,
    Stop,
    StartOver,
    Reset,
    Unsupported(UnsupportedOperation),
}

/// Stateless controller; all state lives in the record handed to `execute`.
pub struct PlaybackController<'a, R: AssetResolver + ?Sized> {
    assets: &'a R,
}

impl<'a, R: AssetResolver + ?Sized> PlaybackController<'a, R> {
    pub fn new(assets: &'a R) -> Self {
        Self { assets }
    }

    pub fn execute(&self, command: PlaybackCommand, record: &mut SessionRecord) -> SkillResponse {
        match command {
            PlaybackCommand::Play => self.play(record),
            PlaybackCommand::Advance => self.advance(record),
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::StartOver => self.start_over(record),
            PlaybackCommand::Reset => self.reset(record),
            PlaybackCommand::Unsupported(operation) => {
                tracing::debug!(?operation, "Unsupported playback operation requested");
                SkillResponse::speak(speech::OPERATION_NOT_SUPPORTED)
            }
        }
    }

    fn play(&self, record: &mut SessionRecord) -> SkillResponse {
        record.state = SkillState::Playing;
        if record.playback_finished {
            record.offset_milliseconds = 0;
            record.playback_finished = false;
        }
        let offset = record.offset_milliseconds;
        self.start_segment(record, offset)
    }

    fn advance(&self, record: &mut SessionRecord) -> SkillResponse {
        record.state = SkillState::Playing;
        record.playback_finished = false;
        self.start_segment(record, 0)
    }

    /// The offset is captured later, when the platform confirms the stop.
    fn stop(&self) -> SkillResponse {
        SkillResponse::empty().with_directive(AudioDirective::Stop)
    }

    fn start_over(&self, record: &mut SessionRecord) -> SkillResponse {
        record.offset_milliseconds = 0;
        self.play(record)
    }

    fn reset(&self, record: &mut SessionRecord) -> SkillResponse {
        record.index = 0;
        record.offset_milliseconds = 0;
        record.playback_index_changed = true;
        self.play(record)
    }

    fn start_segment(&self, record: &mut SessionRecord, offset: u64) -> SkillResponse {
        let phase = record.phase();
        record.offset_milliseconds = offset;
        record.enqueued_token = None;

        let url = self.assets.url(phase.asset(), record.silent);
        tracing::debug!(
            ?phase,
            ordinal = record.ordinal(),
            offset_ms = offset,
            url = %url,
            "Starting segment"
        );

        SkillResponse::speak(speech::segment_announcement(record, phase, offset)).with_directive(
            AudioDirective::play(PlayBehavior::ReplaceAll, url, phase.token(), None, offset),
        )
    }
}
