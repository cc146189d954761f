//! Spoken prompts.

use crate::record::{Phase, SessionRecord, FOCUS_MINUTES};
use crate::response::Card;

pub const SKILL_NAME: &str = "Tomato Helper";

pub const WELCOME: &str = "Welcome to the tomato helper. If this is your first time using this skill, say, help. \
Remember, when the alarm rings, say, next, to stop it. \
Now, say, start timer, or, start silent timer.";
pub const WELCOME_REPROMPT: &str = "You can say, start, start silent timer, or, help.";

pub const HELP: &str = "Tomato helper is a skill to track pomodoro in order to boost productivity. \
Each pomodoro is 25 minutes long and each break is 5 minutes long. \
After 4 pomodoros, you have a 20 minute break. \
When the alarm rings, say, next. \
To check your progress during the timer, say, Alexa, ask tomato helper for progress. \
To begin using tomato helper, say, start timer, or, start silent timer. ";
pub const HELP_REPROMPT: &str =
    "To begin using tomato helper, say, start timer, or, start silent timer. ";

pub const GOODBYE: &str = "Good bye.";

pub const UNHANDLED: &str = "Sorry, I could not understand. You can say, ask tomato helper for help.";
pub const UNHANDLED_RESUME_DECISION: &str =
    "Sorry, this is not a valid command. Please say help to hear what you can say.";

pub const OPERATION_NOT_SUPPORTED: &str =
    "Operation not supported. To know what you can do, say, ask tomato helper for help.";

pub const RESUME_REPROMPT: &str = "You can say yes to resume or no to play from the beginning.";

pub const DEVICE_NOT_SUPPORTED: &str = "Sorry, this skill is not supported on this device.";

pub const SHORT_BREAK: &str = "Let's break for 5 minutes.";
pub const LONG_BREAK: &str =
    "Great! You've finished a set of 4 pomodoros. Let's break for 20 minutes.";

pub fn resume_question(record: &SessionRecord) -> String {
    format!(
        "You are in the Pomodoro number {}. Say, next, to stop a ringing alarm. Would you like to resume?",
        record.ordinal()
    )
}

/// Help while a cycle is underway.
pub fn cycle_help(record: &SessionRecord) -> String {
    format!(
        "You are in the Pomodoro number {}. Say, next, to stop a ringing alarm. \
Say, progress, to hear how far along you are. Say, start timer, to start a new cycle.",
        record.ordinal()
    )
}

pub fn progress(record: &SessionRecord) -> String {
    let minutes = record.elapsed_minutes();
    if record.in_pomodoro {
        format!(
            "You are in the Pomodoro number {} at {} minutes. {} minutes remaining. When the alarm rings, say, next. ",
            record.ordinal(),
            minutes,
            record.remaining_focus_minutes()
        )
    } else {
        format!(
            "You are taking a break after Pomodoro number {}, and the break has started for {} minutes. When the alarm rings, say, next. ",
            record.pomodoro_count, minutes
        )
    }
}

/// Announcement spoken when a segment starts.
pub fn segment_announcement(record: &SessionRecord, phase: Phase, offset_milliseconds: u64) -> String {
    match phase {
        Phase::Focus if offset_milliseconds > 0 => format!(
            "Resuming from Pomodoro number {} at {} minutes. {} minutes remaining. Starting now.",
            record.ordinal(),
            record.elapsed_minutes(),
            record.remaining_focus_minutes()
        ),
        Phase::Focus => format!(
            "Pomodoro number {}. {} minutes. Starting now.",
            record.ordinal(),
            FOCUS_MINUTES
        ),
        Phase::LongBreak => LONG_BREAK.to_string(),
        Phase::ShortBreak => SHORT_BREAK.to_string(),
    }
}

pub fn segment_card(record: &SessionRecord) -> Card {
    let phase = record.phase();
    let content = if phase.is_break() {
        format!(
            "Break after Pomodoro number {}: {} minutes.",
            record.pomodoro_count,
            phase.minutes()
        )
    } else {
        format!("Pomodoro number {}: {} minutes.", record.ordinal(), phase.minutes())
    };
    Card {
        title: SKILL_NAME.to_string(),
        content,
    }
}
