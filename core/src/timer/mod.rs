pub mod game_timer;

pub use game_timer::{GameTimer, TimerPhase, TimerSnapshot};

/// Commands the autosplitter issues to the host timer.
///
/// Called from both the tick and the provider's delivery context, so
/// implementations synchronize internally.
pub trait TimerControl: Send + Sync {
    /// Start the run. Ignored if a run is already in progress.
    fn start(&self);

    /// Complete the current segment.
    fn split(&self);

    /// Pause or resume game time accrual.
    fn set_paused(&self, paused: bool);

    /// Whether a run has begun (split index is not -1).
    fn is_started(&self) -> bool;
}
