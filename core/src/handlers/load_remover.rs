use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace};

use crate::signal_processor::{LoadMarker, LoadingState, TimerCommand, advance};
use crate::timer::TimerControl;

/// Identifies one subscription of the line handler. Lines tagged with any
/// other connection are stale and ignored.
pub type ConnectionId = u64;

#[derive(Debug, Default)]
struct Inner {
    state: LoadingState,
    /// Connection currently allowed to drive the state, if any
    connection: Option<ConnectionId>,
    next_connection: ConnectionId,
}

/// Applies the loading state machine to the line stream and forwards the
/// resulting pause/resume commands to the timer.
pub struct LoadRemover {
    inner: Mutex<Inner>,
    timer: Arc<dyn TimerControl>,
}

impl LoadRemover {
    pub fn new(timer: Arc<dyn TimerControl>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            timer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new connection from a clean state. Lines must be delivered
    /// with the returned id.
    pub fn connect(&self) -> ConnectionId {
        let mut inner = self.lock();
        inner.next_connection += 1;
        let id = inner.next_connection;
        inner.connection = Some(id);
        inner.state = LoadingState::default();
        id
    }

    /// Classify one line delivered on `connection`. Returns the marker that
    /// fired, if any.
    pub fn on_line(&self, connection: ConnectionId, line: &str) -> Option<LoadMarker> {
        let mut inner = self.lock();
        if inner.connection != Some(connection) {
            debug!(connection, line = %line, "Ignoring line from a closed connection");
            return None;
        }

        let (next, marker) = advance(inner.state, line);
        inner.state = next;

        let Some(marker) = marker else {
            trace!(line = %line, "No loading marker");
            return None;
        };

        // Issued under the lock: commands reach the timer in line order
        match marker.command() {
            TimerCommand::Pause => {
                info!(line = %line, ?marker, "Pausing timer");
                self.timer.set_paused(true);
            }
            TimerCommand::Resume => {
                info!(line = %line, ?marker, "Unpausing timer");
                self.timer.set_paused(false);
            }
        }
        Some(marker)
    }

    pub fn state(&self) -> LoadingState {
        self.lock().state
    }

    /// Forget all loading reasons and close the current connection. Called
    /// when the provider detaches.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = LoadingState::default();
        inner.connection = None;
    }
}
