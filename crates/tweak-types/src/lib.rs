//! Shared types for the T-Tweak storage service.

mod command;
mod reply;
mod state;

pub use command::*;
pub use reply::*;
pub use state::*;
