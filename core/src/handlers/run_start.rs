use std::sync::Arc;

use tracing::info;

use crate::timer::TimerControl;

/// First line the game logs when a new game leaves the title screen.
pub const RUN_START_MARKER: &str = "exitField(\"title00\") - start: nextMap(\"f1000\")";

/// Starts the timer when a new game begins.
pub struct RunStartDetector {
    timer: Arc<dyn TimerControl>,
}

impl RunStartDetector {
    pub fn new(timer: Arc<dyn TimerControl>) -> Self {
        Self { timer }
    }

    /// Returns true if this line started the run.
    pub fn on_line(&self, line: &str) -> bool {
        if self.timer.is_started() || !line.starts_with(RUN_START_MARKER) {
            return false;
        }

        info!("Starting timer");
        // Leaving the title screen is itself a load
        self.timer.set_paused(true);
        self.timer.start();
        true
    }
}
