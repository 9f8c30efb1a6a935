//! Command layer
//!
//! Helpers a command uses to record its results against the environment context and
//! report a terminal status once the remote operation is done.

pub mod context;
pub mod status;

pub use context::{ClosedOutputs, CommandContext, STATUS_KEY};
pub use status::Status;
