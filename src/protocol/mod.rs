//! Wire schema exchanged with the transport.

mod action;
mod update;

pub use action::{Action, ActionType};
pub use update::{ResponseType, Update};

/// Version stamped on every update unless configured otherwise.
pub const PROTOCOL_VERSION: u32 = 0;
