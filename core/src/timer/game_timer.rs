//! In-process game timer
//!
//! Accrues game time while running and not paused, and records the game time
//! of every split. Used by the CLI in place of a host timer.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use super::TimerControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    #[default]
    NotRunning,
    Running,
    Ended,
}

#[derive(Debug, Default)]
struct TimerState {
    phase: TimerPhase,
    split_index: Option<usize>,
    paused: bool,
    /// Game time banked before the current unpaused stretch
    accrued: Duration,
    /// Start of the current unpaused stretch while running
    resumed_at: Option<Instant>,
    splits: Vec<Duration>,
    started_at: Option<DateTime<Local>>,
}

impl TimerState {
    fn game_time(&self) -> Duration {
        self.accrued + self.resumed_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    fn bank(&mut self) {
        if let Some(resumed_at) = self.resumed_at.take() {
            self.accrued += resumed_at.elapsed();
        }
    }
}

/// Serializable view of the timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub split_index: Option<usize>,
    pub paused: bool,
    pub game_time_ms: u64,
    pub splits_ms: Vec<u64>,
    pub started_at: Option<DateTime<Local>>,
}

#[derive(Debug)]
pub struct GameTimer {
    segment_count: usize,
    state: Mutex<TimerState>,
}

impl GameTimer {
    /// A timer for a run of `segment_count` segments (at least one).
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_count: segment_count.max(1),
            state: Mutex::new(TimerState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> TimerPhase {
        self.state().phase
    }

    pub fn split_index(&self) -> Option<usize> {
        self.state().split_index
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    pub fn game_time(&self) -> Duration {
        self.state().game_time()
    }

    pub fn splits(&self) -> Vec<Duration> {
        self.state().splits.clone()
    }

    /// Discard the current run.
    pub fn reset(&self) {
        *self.state() = TimerState::default();
        info!("Timer reset");
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let state = self.state();
        TimerSnapshot {
            phase: state.phase,
            split_index: state.split_index,
            paused: state.paused,
            game_time_ms: state.game_time().as_millis() as u64,
            splits_ms: state.splits.iter().map(|d| d.as_millis() as u64).collect(),
            started_at: state.started_at,
        }
    }
}

impl TimerControl for GameTimer {
    fn start(&self) {
        let mut state = self.state();
        if state.phase != TimerPhase::NotRunning {
            return;
        }

        state.phase = TimerPhase::Running;
        state.split_index = Some(0);
        state.accrued = Duration::ZERO;
        state.splits.clear();
        state.started_at = Some(Local::now());
        state.resumed_at = (!state.paused).then(Instant::now);
        info!(segments = self.segment_count, "Timer started");
    }

    fn split(&self) {
        let mut state = self.state();
        if state.phase != TimerPhase::Running {
            return;
        }

        let time = state.game_time();
        state.splits.push(time);
        let next = state.split_index.map_or(1, |i| i + 1);
        state.split_index = Some(next);
        info!(segment = next, game_time_ms = time.as_millis() as u64, "Split");

        if next >= self.segment_count {
            state.bank();
            state.phase = TimerPhase::Ended;
            info!("Run finished");
        }
    }

    fn set_paused(&self, paused: bool) {
        let mut state = self.state();
        if state.paused == paused {
            return;
        }

        state.paused = paused;
        if paused {
            state.bank();
        } else if state.phase == TimerPhase::Running {
            state.resumed_at = Some(Instant::now());
        }
    }

    fn is_started(&self) -> bool {
        self.state().split_index.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_only_once() {
        let timer = GameTimer::new(3);
        assert!(!timer.is_started());

        timer.start();
        timer.split();
        timer.start();

        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.split_index(), Some(1));
    }

    #[test]
    fn test_split_before_start_is_ignored() {
        let timer = GameTimer::new(3);
        timer.split();
        assert_eq!(timer.split_index(), None);
        assert!(timer.splits().is_empty());
    }

    #[test]
    fn test_last_split_ends_run() {
        let timer = GameTimer::new(2);
        timer.start();
        timer.split();
        timer.split();
        timer.split();

        assert_eq!(timer.phase(), TimerPhase::Ended);
        assert_eq!(timer.split_index(), Some(2));
        assert_eq!(timer.splits().len(), 2);
        assert!(timer.is_started());
    }

    #[test]
    fn test_paused_time_does_not_accrue() {
        let timer = GameTimer::new(1);
        timer.set_paused(true);
        timer.start();

        let before = timer.game_time();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.game_time(), before);
        assert_eq!(before, Duration::ZERO);

        timer.set_paused(false);
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.game_time() > before);
    }

    #[test]
    fn test_reset_returns_to_not_running() {
        let timer = GameTimer::new(2);
        timer.start();
        timer.set_paused(true);
        timer.split();
        timer.reset();

        let snapshot = timer.snapshot();
        assert_eq!(snapshot.phase, TimerPhase::NotRunning);
        assert_eq!(snapshot.split_index, None);
        assert!(!snapshot.paused);
        assert!(snapshot.splits_ms.is_empty());
        assert!(snapshot.started_at.is_none());
    }
}
