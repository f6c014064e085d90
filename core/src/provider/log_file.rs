//! Console log provider
//!
//! Tails the game's console log. The first attach starts at the end of the
//! file; after the file was truncated or removed the next attach reads the new
//! file from the start, so lines a restarted game writes before that tick are
//! kept. Each complete line is decoded with the configured encoding and
//! delivered on the line channel.
//! The log carries no battle signals, so the battle channels stay silent.

use std::borrow::Cow;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use encoding_rs::Encoding;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::StreamProvider;
use crate::error::ProviderError;
use crate::events::Channels;

/// Wait between reads once the tail reaches the end of the file.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct LogFileProvider {
    path: PathBuf,
    encoding: &'static Encoding,
    channels: Arc<Channels>,
    attached: Arc<AtomicBool>,
    /// Set when the file was truncated or removed; the next attach reads from 0
    rewind: Arc<AtomicBool>,
    tail_task: Option<JoinHandle<()>>,
    runtime: Handle,
}

impl LogFileProvider {
    /// Create a provider for `path`. Must be called inside a tokio runtime.
    pub fn new(path: impl Into<PathBuf>, encoding_label: &str) -> Result<Self, ProviderError> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
            .ok_or_else(|| ProviderError::UnknownEncoding(encoding_label.to_string()))?;
        let runtime = Handle::try_current().map_err(|_| ProviderError::NoRuntime)?;

        Ok(Self {
            path: path.into(),
            encoding,
            channels: Arc::new(Channels::new()),
            attached: Arc::new(AtomicBool::new(false)),
            rewind: Arc::new(AtomicBool::new(false)),
            tail_task: None,
            runtime,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn detach(&mut self, reason: &str) {
        self.attached.store(false, Ordering::Release);
        if let Some(task) = self.tail_task.take() {
            task.abort();
        }
        info!(path = %self.path.display(), reason, "Detached from log file");
    }
}

impl StreamProvider for LogFileProvider {
    fn attach(&mut self) -> bool {
        if self.attached.load(Ordering::Acquire) {
            return true;
        }

        // A finished tail leaves its handle behind
        if let Some(task) = self.tail_task.take() {
            task.abort();
        }

        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Log file not available");
                return false;
            }
        };
        let end_byte = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Failed to stat log file");
                return false;
            }
        };
        let start_byte = if self.rewind.swap(false, Ordering::AcqRel) {
            0
        } else {
            end_byte
        };

        self.attached.store(true, Ordering::Release);
        self.tail_task = Some(self.runtime.spawn(tail_log_file(
            File::from_std(file),
            start_byte,
            self.encoding,
            Arc::clone(&self.channels),
            Arc::clone(&self.attached),
            Arc::clone(&self.rewind),
        )));

        info!(path = %self.path.display(), start_byte, "Attached to log file");
        true
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn refresh_values(&mut self) {
        if self.is_attached() && !self.path.exists() {
            self.rewind.store(true, Ordering::Release);
            self.detach("log file removed");
        }
    }

    fn channels(&self) -> Arc<Channels> {
        Arc::clone(&self.channels)
    }
}

impl Drop for LogFileProvider {
    fn drop(&mut self) {
        if let Some(task) = self.tail_task.take() {
            task.abort();
        }
    }
}

async fn tail_log_file(
    file: File,
    start_byte: u64,
    encoding: &'static Encoding,
    channels: Arc<Channels>,
    attached: Arc<AtomicBool>,
    rewind: Arc<AtomicBool>,
) {
    let mut reader = BufReader::new(file);
    if let Err(e) = reader.seek(SeekFrom::Start(start_byte)).await {
        warn!(error = %e, "Failed to seek log file");
        attached.store(false, Ordering::Release);
        return;
    }

    let mut position = start_byte;
    let mut buf = Vec::new();

    loop {
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                match reader.get_ref().metadata().await {
                    Ok(metadata) if metadata.len() < position => {
                        info!(position, len = metadata.len(), "Log file truncated");
                        rewind.store(true, Ordering::Release);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Failed to stat log file");
                        break;
                    }
                }
                sleep(POLL_INTERVAL).await;
            }
            Ok(n) => {
                position += n as u64;
                // Partial line at EOF, keep it until the rest is written
                if buf.last() != Some(&b'\n') {
                    continue;
                }
                let line = decode_line(encoding, &buf);
                channels.lines.dispatch(&line);
                buf.clear();
            }
            Err(e) => {
                warn!(error = %e, "Error reading log file line");
                break;
            }
        }
    }

    attached.store(false, Ordering::Release);
}

fn decode_line<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    let line = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    encoding.decode_without_bom_handling(line).0
}
