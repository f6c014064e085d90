//! Loading state machine for load removal.
//!
//! The game writes loading markers to its console log. Two of them name a
//! reason for the load and can overlap with each other:
//! - Draw transition: `NOW LOADING Draw Start` .. `NOW LOADING Draw End`
//! - Field init: `FieldMap::initField start` .. `FieldMap::initField end`
//!
//! A third, generic pair (`exitField` .. `exitField - end`) pauses without
//! naming a reason and may only resume when neither named reason is active.
//!
//! Classification is prefix based and case sensitive. Each branch is an
//! ordered cascade: the first matching rule wins and at most one reason flag
//! changes per line.

/// Pauses and sets the draw reason.
pub const DRAW_START: &str = "NOW LOADING Draw Start";
/// Resumes and clears the draw reason.
pub const DRAW_END: &str = "NOW LOADING Draw End";
/// Pauses and sets the field init reason.
pub const INIT_FIELD_START: &str = "FieldMap::initField start";
/// Resumes and clears the field init reason, unless a draw is active.
pub const INIT_FIELD_END: &str = "FieldMap::initField end";
/// Any field exit pauses, including the run start marker.
pub const EXIT_FIELD: &str = "exitField";
/// Resumes only when no named reason is active.
pub const EXIT_FIELD_END: &str = "exitField - end";

/// Pause state plus the two named reasons for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingState {
    pub paused: bool,
    pub draw_start_active: bool,
    pub init_field_active: bool,
}

/// A named reason for the timer to be paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadReason {
    DrawTransition,
    FieldInit,
}

impl LoadingState {
    /// Named reasons currently active, draw first.
    pub fn active_reasons(&self) -> impl Iterator<Item = LoadReason> {
        [
            (self.draw_start_active, LoadReason::DrawTransition),
            (self.init_field_active, LoadReason::FieldInit),
        ]
        .into_iter()
        .filter_map(|(active, reason)| active.then_some(reason))
    }
}

/// Pause or resume instruction for the game timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Pause,
    Resume,
}

/// The marker a line was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMarker {
    DrawStart,
    InitFieldStart,
    ExitField,
    ExitFieldEnd,
    InitFieldEnd,
    DrawEnd,
}

impl LoadMarker {
    pub fn command(self) -> TimerCommand {
        match self {
            LoadMarker::DrawStart | LoadMarker::InitFieldStart | LoadMarker::ExitField => {
                TimerCommand::Pause
            }
            LoadMarker::ExitFieldEnd | LoadMarker::InitFieldEnd | LoadMarker::DrawEnd => {
                TimerCommand::Resume
            }
        }
    }
}

/// Advance the loading state machine by one log line.
///
/// Returns the next state and the marker that fired, if any. `None` means the
/// state is unchanged and no timer command should be issued.
pub fn advance(state: LoadingState, line: &str) -> (LoadingState, Option<LoadMarker>) {
    if state.paused {
        advance_paused(state, line)
    } else {
        advance_running(state, line)
    }
}

fn advance_running(state: LoadingState, line: &str) -> (LoadingState, Option<LoadMarker>) {
    let mut next = state;

    let marker = if line.starts_with(DRAW_START) {
        next.draw_start_active = true;
        LoadMarker::DrawStart
    } else if line.starts_with(INIT_FIELD_START) {
        next.init_field_active = true;
        LoadMarker::InitFieldStart
    } else if line.starts_with(EXIT_FIELD) {
        LoadMarker::ExitField
    } else {
        return (state, None);
    };

    next.paused = true;
    (next, Some(marker))
}

fn advance_paused(state: LoadingState, line: &str) -> (LoadingState, Option<LoadMarker>) {
    let mut next = state;

    let marker = if !state.init_field_active
        && !state.draw_start_active
        && line.starts_with(EXIT_FIELD_END)
    {
        LoadMarker::ExitFieldEnd
    } else if !state.draw_start_active && line.starts_with(INIT_FIELD_END) {
        next.init_field_active = false;
        LoadMarker::InitFieldEnd
    } else if line.starts_with(DRAW_END) {
        next.draw_start_active = false;
        LoadMarker::DrawEnd
    } else {
        return (state, None);
    };

    next.paused = false;
    (next, Some(marker))
}
