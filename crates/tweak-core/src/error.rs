//! Error types for T-Tweak.
//!
//! These are request-level failures. Capacity overflow and bad query
//! indexes are not errors: they are replies that put the machine in `Error`.

use thiserror::Error;
use tweak_types::UnknownCommandToken;

#[derive(Error, Debug)]
pub enum TweakError {
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommandToken),

    #[error("Malformed index: '{0}' is not a non-negative integer")]
    MalformedIndex(String),

    #[error("Missing argument '{argument}' for command '{command}'")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Malformed query string: {0}")]
    MalformedQuery(String),

    #[error("Persistence hook failed: {0}")]
    Persistence(String),

    #[error("Storage session lock poisoned")]
    SessionPoisoned,

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TweakError {
    /// Whether the request itself was malformed, as opposed to a server-side failure.
    pub fn is_malformed_request(&self) -> bool {
        matches!(
            self,
            TweakError::UnknownCommand(_)
                | TweakError::MalformedIndex(_)
                | TweakError::MalformedQuery(_)
                | TweakError::MissingArgument { .. }
        )
    }
}
