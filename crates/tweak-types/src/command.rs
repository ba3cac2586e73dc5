//! Storage commands.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Command token did not name any storage command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown storage command: '{0}'")]
pub struct UnknownCommandToken(pub String);

/// Name of a storage command, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Add,
    Clear,
    Stop,
    Sorry,
    Query,
    State,
}

impl CommandKind {
    pub const ALL: [CommandKind; 6] = [
        CommandKind::Add,
        CommandKind::Clear,
        CommandKind::Stop,
        CommandKind::Sorry,
        CommandKind::Query,
        CommandKind::State,
    ];

    /// Token used in the `/storage/{command}` path.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Add => "add",
            CommandKind::Clear => "clear",
            CommandKind::Stop => "stop",
            CommandKind::Sorry => "sorry",
            CommandKind::Query => "query",
            CommandKind::State => "state",
        }
    }
}

impl FromStr for CommandKind {
    type Err = UnknownCommandToken;

    /// Tokens are matched exactly; `ADD` is not `add`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCommandToken(s.to_string()))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated storage command with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a string to the store.
    Add(String),
    /// Empty the store and start collecting again.
    Clear,
    /// Return to standby without touching the store.
    Stop,
    /// Acknowledge an error.
    Sorry,
    /// Read the value at a 1-based index.
    Query(usize),
    /// Report the current state. Read-only.
    State,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Add(_) => CommandKind::Add,
            Command::Clear => CommandKind::Clear,
            Command::Stop => CommandKind::Stop,
            Command::Sorry => CommandKind::Sorry,
            Command::Query(_) => CommandKind::Query,
            Command::State => CommandKind::State,
        }
    }
}
