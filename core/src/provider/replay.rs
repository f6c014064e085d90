//! Replay provider
//!
//! Plays back a recorded session from a JSON-lines script, one entry per
//! refresh. Entries:
//!
//! ```text
//! {"line": "NOW LOADING Draw Start"}
//! {"battle_ended": "chapter1_boss"}
//! "animation_started"
//! "detach"
//! ```
//!
//! `"detach"` makes the next attach attempt fail once, simulating the game
//! closing between two ticks. Blank lines and lines starting with `#` are
//! skipped.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use cs3split_types::BattleTag;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::StreamProvider;
use crate::error::ProviderError;
use crate::events::Channels;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayEntry {
    Line(String),
    BattleEnded(BattleTag),
    AnimationStarted,
    Detach,
}

#[derive(Debug)]
pub struct ReplayProvider {
    entries: VecDeque<ReplayEntry>,
    attached: bool,
    drop_next_attach: bool,
    channels: Arc<Channels>,
}

impl ReplayProvider {
    pub fn new(entries: impl IntoIterator<Item = ReplayEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            attached: false,
            drop_next_attach: false,
            channels: Arc::new(Channels::new()),
        }
    }

    pub fn parse(script: &str) -> Result<Self, ProviderError> {
        let entries = script
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| ProviderError::ScriptParse {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<ReplayEntry>, _>>()?;

        Ok(Self::new(entries))
    }

    pub fn from_path(path: &Path) -> Result<Self, ProviderError> {
        let script = std::fs::read_to_string(path).map_err(|source| ProviderError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&script)
    }

    /// Entries not yet delivered.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    pub fn is_finished(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StreamProvider for ReplayProvider {
    fn attach(&mut self) -> bool {
        self.attached = !std::mem::take(&mut self.drop_next_attach);
        self.attached
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn refresh_values(&mut self) {
        let Some(entry) = self.entries.pop_front() else {
            return;
        };

        debug!(?entry, remaining = self.entries.len(), "Replaying entry");
        match entry {
            ReplayEntry::Line(line) => {
                self.channels.lines.dispatch(&line);
            }
            ReplayEntry::BattleEnded(tag) => {
                self.channels.battle_ended.dispatch(&tag);
            }
            ReplayEntry::AnimationStarted => {
                self.channels.animation_started.dispatch(&());
            }
            ReplayEntry::Detach => {
                self.drop_next_attach = true;
            }
        }
    }

    fn channels(&self) -> Arc<Channels> {
        Arc::clone(&self.channels)
    }
}
