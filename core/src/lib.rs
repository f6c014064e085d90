pub mod autosplitter;
pub mod context;
pub mod error;
pub mod events;
pub mod handlers;
pub mod input;
pub mod provider;
pub mod signal_processor;
pub mod timer;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use autosplitter::{Autosplitter, TickOutcome};
pub use context::AppConfig;
pub use cs3split_types::{BattleTag, SkipKey, SplitSettings};
pub use input::{KeyPresser, LogOnlyPresser, platform_presser};
pub use provider::{LogFileProvider, ReplayProvider, StreamProvider};
pub use timer::{GameTimer, TimerControl};
