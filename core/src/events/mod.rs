pub mod registry;

pub use registry::{Channels, Handler, HandlerId, Registry};
