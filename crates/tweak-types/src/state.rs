//! Storage machine states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of the storage machine in its lifecycle.
///
/// Exactly one state is active per server. The machine starts in
/// [`MachineState::Standby`] with an empty store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineState {
    /// Idle. Stored values are kept but nothing is being collected.
    #[default]
    #[serde(rename = "StandBy")]
    Standby,
    /// Collecting values through `add`.
    Input,
    /// Quarantine after a capacity overflow or a bad query index.
    Error,
    /// Error acknowledged; stored values can be read back by index.
    Query,
}

impl MachineState {
    /// External name, as reported by the `state` command.
    pub fn name(&self) -> &'static str {
        match self {
            MachineState::Standby => "StandBy",
            MachineState::Input => "Input",
            MachineState::Error => "Error",
            MachineState::Query => "Query",
        }
    }

    /// Description returned by the `state` command.
    pub fn describe(&self) -> String {
        format!("State: {}", self.name())
    }

    /// Whether `add` may still append in this state (store capacity aside).
    pub fn accepts_input(&self) -> bool {
        matches!(self, MachineState::Standby | MachineState::Input)
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
