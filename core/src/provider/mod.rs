//! Stream and signal providers.
//!
//! A provider owns the connection to the game: it attaches, keeps its values
//! fresh, and delivers lines and battle signals on its [`Channels`] from its
//! own monitoring context.

pub mod log_file;
pub mod replay;

use std::sync::Arc;

use crate::events::Channels;

pub use log_file::LogFileProvider;
pub use replay::{ReplayEntry, ReplayProvider};

pub trait StreamProvider: Send {
    /// Try to attach. Called every tick; must be cheap when already attached.
    fn attach(&mut self) -> bool;

    fn is_attached(&self) -> bool;

    /// Best-effort refresh of the values the provider monitors.
    fn refresh_values(&mut self);

    /// Channels handlers subscribe to.
    fn channels(&self) -> Arc<Channels>;
}
