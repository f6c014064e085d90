pub mod battle;
pub mod settings;

pub use battle::{BattleTag, UnknownBattle};
pub use settings::{DEFAULT_KEY_HOLD_MS, SkipKey, SplitSettings};
