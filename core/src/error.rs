//! Error types for the collaborators around the autosplitter core.
//!
//! The reactive path itself (line classification, splits, subscriptions) has no
//! failure modes; everything here comes from config files, log files, replay
//! scripts or input injection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving the application config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read or parsed.
    #[error("failed to load config: {0}")]
    Load(#[source] confy::ConfyError),

    /// Config could not be written back to disk.
    #[error("failed to save config: {0}")]
    Store(#[source] confy::ConfyError),

    /// Platform config directory could not be determined.
    #[error("failed to resolve config path: {0}")]
    Path(#[source] confy::ConfyError),
}

/// Errors raised while constructing a stream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Encoding label not recognized by `encoding_rs`.
    #[error("unknown log encoding '{0}'")]
    UnknownEncoding(String),

    /// The log tailer needs a tokio runtime to spawn onto.
    #[error("log file provider must be created inside a tokio runtime")]
    NoRuntime,

    /// Replay script could not be read.
    #[error("failed to read replay script {path}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A replay script line is not a valid entry.
    #[error("invalid replay entry on line {line}: {source}")]
    ScriptParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from synthetic key input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The OS accepted fewer input events than were sent.
    #[error("input injection accepted {sent} of {expected} events")]
    Injection { sent: u32, expected: u32 },
}
