//! Synthetic key input for skipping battle animations.

use std::sync::Arc;

use cs3split_types::SkipKey;
use tracing::info;

use crate::error::InputError;

#[cfg(target_os = "windows")]
mod send_input;

#[cfg(target_os = "windows")]
pub use send_input::SendInputPresser;

/// Presses and releases keys on behalf of the player.
pub trait KeyPresser: Send + Sync {
    fn key_down(&self, key: SkipKey) -> Result<(), InputError>;
    fn key_up(&self, key: SkipKey) -> Result<(), InputError>;
}

/// Logs the keys it would press. Used where no injection backend exists.
#[derive(Debug, Default)]
pub struct LogOnlyPresser;

impl KeyPresser for LogOnlyPresser {
    fn key_down(&self, key: SkipKey) -> Result<(), InputError> {
        info!(?key, "Key down (not injected)");
        Ok(())
    }

    fn key_up(&self, key: SkipKey) -> Result<(), InputError> {
        info!(?key, "Key up (not injected)");
        Ok(())
    }
}

/// The injection backend for the current platform.
pub fn platform_presser() -> Arc<dyn KeyPresser> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(SendInputPresser)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(LogOnlyPresser)
    }
}
