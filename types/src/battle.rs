//! Battle identifiers.
//!
//! Every battle the autosplitter can split on is a variant of [`BattleTag`].
//! The set is closed: the memory reader only ever reports these, and the
//! settings file stores one toggle per variant under its snake_case key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A battle whose end may trigger a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleTag {
    PrologueBoss,
    Chapter1Midboss,
    Chapter1Boss,
    Chapter2Midboss,
    Chapter2Boss,
    Chapter3Midboss,
    Chapter3Boss,
    Chapter4Midboss,
    Chapter4Boss,
    FinaleMidboss,
    FinaleBoss,
    FinaleTrueBoss,
}

impl BattleTag {
    /// All tags in story order.
    pub const ALL: [BattleTag; 12] = [
        BattleTag::PrologueBoss,
        BattleTag::Chapter1Midboss,
        BattleTag::Chapter1Boss,
        BattleTag::Chapter2Midboss,
        BattleTag::Chapter2Boss,
        BattleTag::Chapter3Midboss,
        BattleTag::Chapter3Boss,
        BattleTag::Chapter4Midboss,
        BattleTag::Chapter4Boss,
        BattleTag::FinaleMidboss,
        BattleTag::FinaleBoss,
        BattleTag::FinaleTrueBoss,
    ];

    /// Settings key, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            BattleTag::PrologueBoss => "prologue_boss",
            BattleTag::Chapter1Midboss => "chapter1_midboss",
            BattleTag::Chapter1Boss => "chapter1_boss",
            BattleTag::Chapter2Midboss => "chapter2_midboss",
            BattleTag::Chapter2Boss => "chapter2_boss",
            BattleTag::Chapter3Midboss => "chapter3_midboss",
            BattleTag::Chapter3Boss => "chapter3_boss",
            BattleTag::Chapter4Midboss => "chapter4_midboss",
            BattleTag::Chapter4Boss => "chapter4_boss",
            BattleTag::FinaleMidboss => "finale_midboss",
            BattleTag::FinaleBoss => "finale_boss",
            BattleTag::FinaleTrueBoss => "finale_true_boss",
        }
    }
}

impl fmt::Display for BattleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBattle(pub String);

impl fmt::Display for UnknownBattle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown battle '{}'", self.0)
    }
}

impl std::error::Error for UnknownBattle {}

impl FromStr for BattleTag {
    type Err = UnknownBattle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BattleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownBattle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_parse_back_to_their_tag() {
        for tag in BattleTag::ALL {
            assert_eq!(tag.as_str().parse::<BattleTag>(), Ok(tag));
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "chapter9_boss".parse::<BattleTag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown battle 'chapter9_boss'");
    }

    #[test]
    fn test_serde_name_matches_settings_key() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            tag: BattleTag,
        }

        for tag in BattleTag::ALL {
            let encoded = toml::to_string(&Wrapper { tag }).unwrap();
            assert_eq!(encoded.trim(), format!("tag = \"{}\"", tag.as_str()));
        }
    }
}
