//! Test doubles shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cs3split_types::SkipKey;

use crate::error::InputError;
use crate::input::KeyPresser;
use crate::timer::TimerControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Start,
    Split,
    Pause,
    Resume,
}

/// Records every command; `is_started` follows `start()` like a split index.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    calls: Mutex<Vec<TimerCall>>,
    started: Mutex<bool>,
}

impl RecordingTimer {
    pub fn calls(&self) -> Vec<TimerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: TimerCall) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl TimerControl for RecordingTimer {
    fn start(&self) {
        *self.started.lock().unwrap() = true;
        self.calls.lock().unwrap().push(TimerCall::Start);
    }

    fn split(&self) {
        self.calls.lock().unwrap().push(TimerCall::Split);
    }

    fn set_paused(&self, paused: bool) {
        let call = if paused {
            TimerCall::Pause
        } else {
            TimerCall::Resume
        };
        self.calls.lock().unwrap().push(call);
    }

    fn is_started(&self) -> bool {
        *self.started.lock().unwrap()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(SkipKey),
    Up(SkipKey),
}

/// Records key events, optionally sleeping on key down to widen race windows.
#[derive(Debug, Default)]
pub struct RecordingPresser {
    pub events: Mutex<Vec<KeyEvent>>,
    pub down_delay: Option<Duration>,
    pub fail_down: bool,
    pub downs: AtomicUsize,
}

impl RecordingPresser {
    pub fn events(&self) -> Vec<KeyEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl KeyPresser for RecordingPresser {
    fn key_down(&self, key: SkipKey) -> Result<(), InputError> {
        self.downs.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.down_delay {
            std::thread::sleep(delay);
        }
        if self.fail_down {
            return Err(InputError::Injection {
                sent: 0,
                expected: 1,
            });
        }
        self.events.lock().unwrap().push(KeyEvent::Down(key));
        Ok(())
    }

    fn key_up(&self, key: SkipKey) -> Result<(), InputError> {
        self.events.lock().unwrap().push(KeyEvent::Up(key));
        Ok(())
    }
}
