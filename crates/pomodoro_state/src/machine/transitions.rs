//! State transitions - the per-state handler table.

use super::events::{EventOrigin, SkillEvent};
use super::states::SkillState;
use crate::assets::AssetResolver;
use crate::lifecycle::LifecycleHandler;
use crate::playback::{PlaybackCommand, PlaybackController, UnsupportedOperation};
use crate::record::SessionRecord;
use crate::response::SkillResponse;
use crate::speech;

/// The outcome of dispatching one event.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: SkillState,
    /// The state after the transition.
    pub to: SkillState,
    /// The event that triggered the transition.
    pub event: SkillEvent,
    /// Whether the state actually changed.
    pub changed: bool,
    /// The record to persist.
    pub record: SessionRecord,
    /// What to say and play.
    pub response: SkillResponse,
}

/// Session state machine.
///
/// Holds no per-session data: the record is passed in with every event and
/// handed back, updated, in the [`StateTransition`].
#[derive(Debug, Clone)]
pub struct StateMachine<R: AssetResolver> {
    assets: R,
}

impl<R: AssetResolver> StateMachine<R> {
    pub fn new(assets: R) -> Self {
        Self { assets }
    }

    /// Handle one event against the given record.
    pub fn dispatch(&self, record: SessionRecord, event: SkillEvent) -> StateTransition {
        let mut record = record;
        let from = record.state;

        tracing::debug!(
            current_state = ?from,
            event = event.name(),
            "FSM: dispatch called"
        );

        let response = self.route(&mut record, &event);
        let response = self.finish(event.origin(), &mut record, response);
        let to = record.state;

        if from != to {
            tracing::info!(
                old_state = ?from,
                new_state = ?to,
                event = event.name(),
                "FSM: State transition"
            );
        } else {
            tracing::debug!(state = ?to, "FSM: State unchanged");
        }

        StateTransition {
            from,
            to,
            event,
            changed: from != to,
            record,
            response,
        }
    }

    fn route(&self, record: &mut SessionRecord, event: &SkillEvent) -> SkillResponse {
        use SkillEvent::*;
        use SkillState::*;

        let controller = PlaybackController::new(&self.assets);

        match (record.state, event) {
            // ========== Any State ==========
            (_, Playback(signal)) => LifecycleHandler::new(&self.assets).handle(signal, record),
            (_, SessionEnded) => SkillResponse::empty(),
            (_, StartFocus) => self.start_cycle(record, false),
            (_, StartSilentFocus) => self.start_cycle(record, true),

            // ========== Idle ==========
            (Idle, Launch) => self.welcome(record),
            (Idle, Help) => SkillResponse::ask(speech::HELP, speech::HELP_REPROMPT),

            // ========== Playing ==========
            (Playing, Launch) if record.playback_finished => self.welcome(record),
            (Playing, Launch) => {
                record.state = ResumeDecision;
                SkillResponse::ask(speech::resume_question(record), speech::RESUME_REPROMPT)
            }
            (Playing, Next | Continue | NextCommand) => {
                record.stop_ringing();
                controller.execute(PlaybackCommand::Advance, record)
            }
            (Playing, Pause | Stop | Cancel | PauseCommand) => {
                controller.execute(PlaybackCommand::Stop, record)
            }
            (Playing, Resume | PlayCommand) => controller.execute(PlaybackCommand::Play, record),
            (Playing, StartOver) => controller.execute(PlaybackCommand::StartOver, record),
            (Playing, Previous | PreviousCommand) => controller.execute(
                PlaybackCommand::Unsupported(UnsupportedOperation::PlayPrevious),
                record,
            ),
            (Playing, LoopOn) => controller.execute(
                PlaybackCommand::Unsupported(UnsupportedOperation::LoopOn),
                record,
            ),
            (Playing, LoopOff) => controller.execute(
                PlaybackCommand::Unsupported(UnsupportedOperation::LoopOff),
                record,
            ),
            (Playing, ShuffleOn) => controller.execute(
                PlaybackCommand::Unsupported(UnsupportedOperation::ShuffleOn),
                record,
            ),
            (Playing, ShuffleOff) => controller.execute(
                PlaybackCommand::Unsupported(UnsupportedOperation::ShuffleOff),
                record,
            ),

            // ========== Resume Decision ==========
            (ResumeDecision, Launch) => {
                SkillResponse::ask(speech::resume_question(record), speech::RESUME_REPROMPT)
            }
            (ResumeDecision, Yes) => controller.execute(PlaybackCommand::Play, record),
            (ResumeDecision, No) => controller.execute(PlaybackCommand::Reset, record),

            // ========== Shared by Playing and Resume Decision ==========
            (Playing | ResumeDecision, Progress) => SkillResponse::speak(speech::progress(record)),
            (Playing | ResumeDecision, Help) => {
                let help = speech::cycle_help(record);
                SkillResponse::ask(help.clone(), help)
            }

            // ========== Goodbye outside of playback ==========
            (Idle | ResumeDecision, Stop | Cancel) => SkillResponse::speak(speech::GOODBYE),

            // ========== Default: unhandled ==========
            (ResumeDecision, _) => {
                self.unhandled(event, speech::UNHANDLED_RESUME_DECISION)
            }
            (_, _) => self.unhandled(event, speech::UNHANDLED),
        }
    }

    /// Applies the platform's rules on what a reply may carry.
    fn finish(
        &self,
        origin: EventOrigin,
        record: &mut SessionRecord,
        response: SkillResponse,
    ) -> SkillResponse {
        match origin {
            EventOrigin::RemoteControl => response.without_voice(),
            EventOrigin::Intent if record.playback_index_changed && response.starts_playback() => {
                record.playback_index_changed = false;
                let card = speech::segment_card(record);
                response.with_card(card)
            }
            _ => response,
        }
    }

    fn welcome(&self, record: &mut SessionRecord) -> SkillResponse {
        record.state = SkillState::Idle;
        record.reset_counters();
        SkillResponse::ask(speech::WELCOME, speech::WELCOME_REPROMPT)
    }

    fn start_cycle(&self, record: &mut SessionRecord, silent: bool) -> SkillResponse {
        record.begin_cycle(silent);
        PlaybackController::new(&self.assets).execute(PlaybackCommand::Play, record)
    }

    /// Voice requests get a help prompt; anything else is acknowledged silently.
    fn unhandled(&self, event: &SkillEvent, message: &str) -> SkillResponse {
        let origin = event.origin();
        tracing::debug!(event = event.name(), ?origin, "FSM: Event not bound in current state");
        if origin.accepts_voice() {
            SkillResponse::ask(message, message)
        } else {
            SkillResponse::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AudioAssets;
    use crate::lifecycle::LifecycleSignal;
    use crate::record::{BREAK_TOKEN, FOCUS_TOKEN, RING_TOKEN};
    use crate::response::{AudioDirective, PlayBehavior};

    fn machine() -> StateMachine<AudioAssets> {
        StateMachine::new(AudioAssets::new("https://audio.test/"))
    }

    fn playing() -> SessionRecord {
        SessionRecord {
            state: SkillState::Playing,
            ..SessionRecord::default()
        }
    }

    #[test]
    fn test_launch_from_idle_welcomes() {
        let sm = machine();
        let mut record = SessionRecord::default();
        record.pomodoro_count = 2;
        record.in_pomodoro = false;

        let t = sm.dispatch(record, SkillEvent::Launch);
        assert!(!t.changed);
        assert_eq!(t.to, SkillState::Idle);
        assert_eq!(t.response.speech.as_deref(), Some(speech::WELCOME));
        assert!(t.response.keeps_session_open());
        assert_eq!(t.record.pomodoro_count, 0);
        assert!(t.record.in_pomodoro);
    }

    #[test]
    fn test_start_focus_begins_playing() {
        let sm = machine();
        let t = sm.dispatch(SessionRecord::default(), SkillEvent::StartFocus);

        assert!(t.changed);
        assert_eq!(t.to, SkillState::Playing);
        assert!(!t.record.silent);
        let stream = t.response.stream().unwrap();
        assert_eq!(stream.url, "https://audio.test/tick25m.mp3");
        assert_eq!(stream.token, FOCUS_TOKEN);
    }

    #[test]
    fn test_start_silent_focus_sets_silent() {
        let sm = machine();
        let t = sm.dispatch(SessionRecord::default(), SkillEvent::StartSilentFocus);
        assert!(t.record.silent);
        assert_eq!(t.response.stream().unwrap().url, "https://audio.test/tick25m-s.mp3");
    }

    #[test]
    fn test_start_focus_mid_cycle_starts_fresh() {
        let sm = machine();
        let mut record = playing();
        record.pomodoro_count = 3;
        record.in_pomodoro = false;
        record.offset_milliseconds = 120_000;

        let t = sm.dispatch(record, SkillEvent::StartFocus);
        assert_eq!(t.record.pomodoro_count, 0);
        assert!(t.record.in_pomodoro);
        assert_eq!(t.response.stream().unwrap().offset_in_milliseconds, 0);
    }

    #[test]
    fn test_idle_stop_says_goodbye() {
        let sm = machine();
        let t = sm.dispatch(SessionRecord::default(), SkillEvent::Stop);
        assert_eq!(t.response.speech.as_deref(), Some(speech::GOODBYE));
        assert!(t.response.directive.is_none());
    }

    #[test]
    fn test_idle_unbound_event_is_unhandled() {
        let sm = machine();
        let record = SessionRecord::default();
        let t = sm.dispatch(record.clone(), SkillEvent::Next);
        assert_eq!(t.response.speech.as_deref(), Some(speech::UNHANDLED));
        assert_eq!(t.record, record);
    }

    #[test]
    fn test_pomodoro_counting_over_four_nexts() {
        let sm = machine();
        let mut record = sm.dispatch(SessionRecord::default(), SkillEvent::StartFocus).record;

        let expected = [(false, 1), (true, 1), (false, 2), (true, 2)];
        for (in_pomodoro, count) in expected {
            let t = sm.dispatch(record, SkillEvent::Next);
            assert_eq!(t.record.in_pomodoro, in_pomodoro);
            assert_eq!(t.record.pomodoro_count, count);
            let token = if in_pomodoro { FOCUS_TOKEN } else { BREAK_TOKEN };
            assert_eq!(t.response.stream().unwrap().token, token);
            record = t.record;
        }
    }

    #[test]
    fn test_next_clears_ringing_and_starts_from_zero() {
        let sm = machine();
        let mut record = playing();
        record.ringing = true;
        record.offset_milliseconds = 1_000;
        record.enqueued_token = Some(RING_TOKEN.to_string());
        record.playback_finished = true;

        let t = sm.dispatch(record, SkillEvent::Next);
        assert!(!t.record.ringing);
        assert!(t.record.enqueued_token.is_none());
        assert!(!t.record.playback_finished);
        assert_eq!(t.response.stream().unwrap().offset_in_milliseconds, 0);
        assert_eq!(t.response.speech.as_deref(), Some(speech::SHORT_BREAK));
    }

    #[test]
    fn test_continue_acknowledges_like_next() {
        let sm = machine();
        let t = sm.dispatch(playing(), SkillEvent::Continue);
        assert_eq!(t.record.pomodoro_count, 1);
        assert!(!t.record.in_pomodoro);
    }

    #[test]
    fn test_remote_next_is_silent() {
        let sm = machine();
        let t = sm.dispatch(playing(), SkillEvent::NextCommand);
        assert!(t.response.speech.is_none());
        assert!(t.response.starts_playback());
        assert_eq!(t.record.pomodoro_count, 1);
    }

    #[test]
    fn test_pause_issues_stop_without_mutation() {
        let sm = machine();
        for event in [
            SkillEvent::Pause,
            SkillEvent::Stop,
            SkillEvent::Cancel,
            SkillEvent::PauseCommand,
        ] {
            let record = playing();
            let t = sm.dispatch(record.clone(), event);
            assert_eq!(t.response.directive, Some(AudioDirective::Stop));
            assert_eq!(t.record, record);
        }
    }

    #[test]
    fn test_resume_offset_round_trip() {
        let sm = machine();
        let stopped = sm.dispatch(
            playing(),
            SkillEvent::Playback(LifecycleSignal::Stopped {
                token: FOCUS_TOKEN.to_string(),
                offset_in_milliseconds: 90_000,
            }),
        );
        assert!(stopped.response.is_empty());

        let t = sm.dispatch(stopped.record, SkillEvent::Resume);
        let stream = t.response.stream().unwrap();
        assert_eq!(stream.offset_in_milliseconds, 90_000);
        assert_eq!(stream.behavior, PlayBehavior::ReplaceAll);
        assert!(t
            .response
            .speech
            .as_deref()
            .unwrap()
            .contains("24 minutes remaining"));
    }

    #[test]
    fn test_finished_forces_restart_from_zero() {
        let sm = machine();
        let mut record = playing();
        record.offset_milliseconds = 600_000;

        let finished = sm.dispatch(
            record,
            SkillEvent::Playback(LifecycleSignal::Finished {
                token: FOCUS_TOKEN.to_string(),
            }),
        );
        let t = sm.dispatch(finished.record, SkillEvent::PlayCommand);
        assert_eq!(t.response.stream().unwrap().offset_in_milliseconds, 0);
        assert_eq!(t.record.offset_milliseconds, 0);
    }

    #[test]
    fn test_duplicate_nearly_finished_enqueues_once() {
        let sm = machine();
        let signal = SkillEvent::Playback(LifecycleSignal::NearlyFinished {
            token: FOCUS_TOKEN.to_string(),
        });

        let first = sm.dispatch(playing(), signal.clone());
        let second = sm.dispatch(first.record.clone(), signal);

        let enqueues = [&first.response, &second.response]
            .iter()
            .filter(|r| {
                r.stream()
                    .map(|s| s.behavior == PlayBehavior::Enqueue)
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(enqueues, 1);
        assert!(second.record.ringing);
    }

    #[test]
    fn test_launch_mid_segment_asks_to_resume() {
        let sm = machine();
        let mut record = playing();
        record.pomodoro_count = 2;
        record.in_pomodoro = false;
        record.offset_milliseconds = 45_000;

        let t = sm.dispatch(record, SkillEvent::Launch);
        assert!(t.changed);
        assert_eq!(t.to, SkillState::ResumeDecision);
        assert_eq!(t.record.pomodoro_count, 2);
        assert!(!t.record.in_pomodoro);
        assert_eq!(t.record.offset_milliseconds, 45_000);
        assert!(t.response.speech.unwrap().contains("Pomodoro number 3"));
        assert_eq!(t.response.reprompt.as_deref(), Some(speech::RESUME_REPROMPT));
    }

    #[test]
    fn test_launch_after_finished_welcomes() {
        let sm = machine();
        let mut record = playing();
        record.playback_finished = true;
        record.pomodoro_count = 2;

        let t = sm.dispatch(record, SkillEvent::Launch);
        assert_eq!(t.to, SkillState::Idle);
        assert_eq!(t.record.pomodoro_count, 0);
    }

    #[test]
    fn test_resume_decision_yes_resumes() {
        let sm = machine();
        let mut record = playing();
        record.offset_milliseconds = 180_000;
        let decision = sm.dispatch(record, SkillEvent::Launch).record;

        let t = sm.dispatch(decision, SkillEvent::Yes);
        assert_eq!(t.to, SkillState::Playing);
        assert_eq!(t.response.stream().unwrap().offset_in_milliseconds, 180_000);
        assert!(t.response.card.is_none());
    }

    #[test]
    fn test_resume_decision_no_restarts_phase_with_card() {
        let sm = machine();
        let mut record = playing();
        record.offset_milliseconds = 180_000;
        record.pomodoro_count = 1;
        let decision = sm.dispatch(record, SkillEvent::Launch).record;

        let t = sm.dispatch(decision, SkillEvent::No);
        assert_eq!(t.to, SkillState::Playing);
        assert_eq!(t.record.pomodoro_count, 1);
        assert_eq!(t.response.stream().unwrap().offset_in_milliseconds, 0);
        assert!(t.response.card.is_some());
        assert!(!t.record.playback_index_changed);
    }

    #[test]
    fn test_resume_decision_unhandled_keeps_state() {
        let sm = machine();
        let record = SessionRecord {
            state: SkillState::ResumeDecision,
            ..SessionRecord::default()
        };
        let t = sm.dispatch(record.clone(), SkillEvent::Next);
        assert!(!t.changed);
        assert_eq!(
            t.response.speech.as_deref(),
            Some(speech::UNHANDLED_RESUME_DECISION)
        );
        assert_eq!(t.record, record);
    }

    #[test]
    fn test_unsupported_operations_while_playing() {
        let sm = machine();
        for event in [
            SkillEvent::Previous,
            SkillEvent::LoopOn,
            SkillEvent::LoopOff,
            SkillEvent::ShuffleOn,
            SkillEvent::ShuffleOff,
        ] {
            let t = sm.dispatch(playing(), event);
            assert_eq!(
                t.response.speech.as_deref(),
                Some(speech::OPERATION_NOT_SUPPORTED)
            );
            assert_eq!(t.record, playing());
        }
    }

    #[test]
    fn test_remote_previous_is_silent_no_op() {
        let sm = machine();
        let t = sm.dispatch(playing(), SkillEvent::PreviousCommand);
        assert!(t.response.is_empty());
    }

    #[test]
    fn test_session_ended_is_acknowledged() {
        let sm = machine();
        let t = sm.dispatch(playing(), SkillEvent::SessionEnded);
        assert!(t.response.is_empty());
        assert_eq!(t.record, playing());
    }

    #[test]
    fn test_progress_while_playing() {
        let sm = machine();
        let mut record = playing();
        record.offset_milliseconds = 10 * 60_000;
        let t = sm.dispatch(record, SkillEvent::Progress);
        let text = t.response.speech.unwrap();
        assert!(text.contains("at 10 minutes"));
        assert!(text.contains("15 minutes remaining"));
    }

    #[test]
    fn test_lifecycle_signals_handled_in_any_state() {
        let sm = machine();
        let t = sm.dispatch(
            SessionRecord::default(),
            SkillEvent::Playback(LifecycleSignal::Started {
                token: BREAK_TOKEN.to_string(),
            }),
        );
        assert_eq!(t.record.last_token.as_deref(), Some(BREAK_TOKEN));
        assert_eq!(t.to, SkillState::Idle);
    }

    fn resume_decision() -> SessionRecord {
        SessionRecord {
            state: SkillState::ResumeDecision,
            pomodoro_count: 2,
            offset_milliseconds: 60_000,
            ..SessionRecord::default()
        }
    }

    #[test]
    fn test_idle_help_explains_technique() {
        let sm = machine();
        let record = SessionRecord::default();
        let t = sm.dispatch(record.clone(), SkillEvent::Help);
        assert_eq!(t.response.speech.as_deref(), Some(speech::HELP));
        assert_eq!(t.response.reprompt.as_deref(), Some(speech::HELP_REPROMPT));
        assert!(t.response.directive.is_none());
        assert_eq!(t.record, record);
    }

    #[test]
    fn test_help_mid_cycle_names_current_pomodoro() {
        let sm = machine();
        for record in [playing(), resume_decision()] {
            let t = sm.dispatch(record.clone(), SkillEvent::Help);
            let expected = speech::cycle_help(&record);
            assert_eq!(t.response.speech.as_deref(), Some(expected.as_str()));
            assert!(t.response.keeps_session_open());
            assert!(t.response.directive.is_none());
            assert!(!t.changed);
            assert_eq!(t.record, record);
        }
        let t = sm.dispatch(resume_decision(), SkillEvent::Help);
        assert!(t.response.speech.unwrap().contains("Pomodoro number 3"));
    }

    #[test]
    fn test_resume_decision_stop_and_cancel_say_goodbye() {
        let sm = machine();
        for event in [SkillEvent::Stop, SkillEvent::Cancel] {
            let t = sm.dispatch(resume_decision(), event);
            assert_eq!(t.response.speech.as_deref(), Some(speech::GOODBYE));
            assert!(!t.response.keeps_session_open());
            assert!(t.response.directive.is_none());
            assert!(!t.changed);
            assert_eq!(t.record, resume_decision());
        }
    }

    #[test]
    fn test_unbound_non_voice_requests_are_acknowledged_silently() {
        let sm = machine();
        let names = [
            "System.ExceptionEncountered",
            "AudioPlayer.PlaybackQueueCleared",
            "PlaybackController.FastForwardCommandIssued",
        ];
        for record in [SessionRecord::default(), playing(), resume_decision()] {
            for name in names {
                let t = sm.dispatch(record.clone(), SkillEvent::from_name(name));
                assert!(t.response.is_empty(), "{name} in {:?}", record.state);
                assert_eq!(t.record, record);
            }
        }
    }
}
