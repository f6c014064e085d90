//! User-editable split settings.
//!
//! Persisted as part of the application config. Battle toggles are stored as a
//! flat table keyed by [`BattleTag::as_str`]; keys that name no battle are
//! dropped on load and missing keys read as disabled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::BattleTag;

/// Default key hold for the animation skip, in milliseconds (one frame at 60 fps).
pub const DEFAULT_KEY_HOLD_MS: u64 = 17;

/// Key pressed to skip a battle animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKey {
    #[default]
    Space,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    /// Press [`SplitSettings::skip_key`] whenever a battle animation starts.
    pub skip_battle_animations: bool,
    pub skip_key: SkipKey,
    pub key_hold_ms: u64,
    #[serde(with = "battle_toggles")]
    pub battles: BTreeMap<BattleTag, bool>,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            skip_battle_animations: false,
            skip_key: SkipKey::default(),
            key_hold_ms: DEFAULT_KEY_HOLD_MS,
            battles: BattleTag::ALL.into_iter().map(|tag| (tag, false)).collect(),
        }
    }
}

impl SplitSettings {
    /// Whether the end of `tag` should split. Absent entries are disabled.
    pub fn split_enabled(&self, tag: BattleTag) -> bool {
        self.battles.get(&tag).copied().unwrap_or(false)
    }

    pub fn set_split(&mut self, tag: BattleTag, enabled: bool) {
        self.battles.insert(tag, enabled);
    }

    /// Tags with splitting enabled, in story order.
    pub fn enabled_battles(&self) -> impl Iterator<Item = BattleTag> + '_ {
        BattleTag::ALL
            .into_iter()
            .filter(|tag| self.split_enabled(*tag))
    }
}

mod battle_toggles {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::battle::BattleTag;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<BattleTag, bool>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        map.iter()
            .map(|(tag, enabled)| (tag.as_str(), *enabled))
            .collect::<BTreeMap<&str, bool>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<BattleTag, bool>, D::Error> {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, enabled)| key.parse::<BattleTag>().ok().map(|tag| (tag, enabled)))
            .collect())
    }
}
