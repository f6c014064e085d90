pub mod animation_skip;
pub mod battle_split;
pub mod load_remover;
pub mod run_start;

pub use animation_skip::AnimationSkipper;
pub use battle_split::BattleSplitter;
pub use load_remover::{ConnectionId, LoadRemover};
pub use run_start::{RUN_START_MARKER, RunStartDetector};
