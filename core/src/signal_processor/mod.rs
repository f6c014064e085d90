pub mod loading;


pub use loading::{LoadMarker, LoadReason, LoadingState, TimerCommand, advance};
