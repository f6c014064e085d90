use std::sync::{Arc, PoisonError, RwLock};

use cs3split_types::{BattleTag, SplitSettings};
use tracing::{debug, info};

use crate::timer::TimerControl;

/// Splits when a battle with splitting enabled ends.
///
/// Settings are read on every event, so toggles edited while attached apply
/// to the next battle.
pub struct BattleSplitter {
    settings: Arc<RwLock<SplitSettings>>,
    timer: Arc<dyn TimerControl>,
}

impl BattleSplitter {
    pub fn new(settings: Arc<RwLock<SplitSettings>>, timer: Arc<dyn TimerControl>) -> Self {
        Self { settings, timer }
    }

    /// Returns true if a split was issued.
    pub fn on_battle_ended(&self, tag: BattleTag) -> bool {
        let enabled = self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .split_enabled(tag);

        if !enabled {
            debug!(tag = %tag, "Battle ended, split disabled");
            return false;
        }

        info!(tag = %tag, "Running a split");
        self.timer.split();
        true
    }
}
