use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use cs3split_types::SplitSettings;
use tracing::{debug, info, warn};

use crate::input::KeyPresser;

/// Presses the skip key when a battle animation starts.
///
/// The press blocks the delivering thread for the configured hold time. A
/// second animation event arriving during the hold is dropped.
pub struct AnimationSkipper {
    presser: Arc<dyn KeyPresser>,
    settings: Arc<RwLock<SplitSettings>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the press finishes, even on panic.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AnimationSkipper {
    pub fn new(presser: Arc<dyn KeyPresser>, settings: Arc<RwLock<SplitSettings>>) -> Self {
        Self {
            presser,
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns true if a key press was performed.
    pub fn on_animation_started(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Skip key already held, ignoring animation start");
            return false;
        }
        let _guard = InFlight(&self.in_flight);

        let (key, hold_ms) = {
            let settings = self.settings.read().unwrap_or_else(PoisonError::into_inner);
            (settings.skip_key, settings.key_hold_ms)
        };

        info!(?key, hold_ms, "Skipping battle animation");
        if let Err(e) = self.presser.key_down(key) {
            warn!(?key, error = %e, "Failed to press skip key");
        }
        thread::sleep(Duration::from_millis(hold_ms));
        // Always release, even after a failed press
        if let Err(e) = self.presser.key_up(key) {
            warn!(?key, error = %e, "Failed to release skip key");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{KeyEvent, RecordingPresser};
    use cs3split_types::SkipKey;
    use std::time::Instant;

    fn settings(key: SkipKey, hold_ms: u64) -> Arc<RwLock<SplitSettings>> {
        Arc::new(RwLock::new(SplitSettings {
            skip_battle_animations: true,
            skip_key: key,
            key_hold_ms: hold_ms,
            ..SplitSettings::default()
        }))
    }

    #[test]
    fn test_press_hold_release() {
        let presser = Arc::new(RecordingPresser::default());
        let skipper = AnimationSkipper::new(presser.clone(), settings(SkipKey::Enter, 10));

        let began = Instant::now();
        assert!(skipper.on_animation_started());
        assert!(began.elapsed() >= Duration::from_millis(10));

        assert_eq!(
            presser.events(),
            vec![KeyEvent::Down(SkipKey::Enter), KeyEvent::Up(SkipKey::Enter)]
        );
    }

    #[test]
    fn test_release_attempted_after_failed_press() {
        let presser = Arc::new(RecordingPresser {
            fail_down: true,
            ..RecordingPresser::default()
        });
        let skipper = AnimationSkipper::new(presser.clone(), settings(SkipKey::Space, 0));

        assert!(skipper.on_animation_started());
        assert_eq!(presser.events(), vec![KeyEvent::Up(SkipKey::Space)]);
        // Guard released
        assert!(skipper.on_animation_started());
    }

    #[test]
    fn test_concurrent_event_is_dropped() {
        let presser = Arc::new(RecordingPresser {
            down_delay: Some(Duration::from_millis(100)),
            ..RecordingPresser::default()
        });
        let skipper = Arc::new(AnimationSkipper::new(
            presser.clone(),
            settings(SkipKey::Space, 0),
        ));

        let first = {
            let skipper = Arc::clone(&skipper);
            thread::spawn(move || skipper.on_animation_started())
        };
        while presser.downs.load(Ordering::SeqCst) == 0 {
            thread::yield_now();
        }

        assert!(!skipper.on_animation_started());
        assert!(first.join().unwrap());
        assert_eq!(presser.downs.load(Ordering::SeqCst), 1);
        assert_eq!(presser.events().len(), 2);
    }
}
