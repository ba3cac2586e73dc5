//! Core storage engine for T-Tweak: backing store, state machine, command
//! interpreter and the shared session.

mod error;
mod interpreter;
mod machine;
mod persistence;
mod session;
mod store;

pub use error::TweakError;
pub use interpreter::{CommandArgs, parse_command, parse_index};
pub use machine::StateMachine;
pub use persistence::{NoopHook, PersistenceHook, SqliteHook};
pub use session::StorageSession;
pub use store::BackingStore;

/// Result type for T-Tweak operations.
pub type Result<T> = std::result::Result<T, TweakError>;
