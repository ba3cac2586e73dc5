//! Replies produced by the storage machine.

use crate::MachineState;
use serde::{Deserialize, Serialize};

/// Maximum number of values the store holds.
pub const CAPACITY: usize = 5;

/// Expected, recoverable condition that moves the machine into `Error`.
///
/// Domain faults are part of a successful reply. They never fail the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainFault {
    /// An `add` arrived while the store already held `capacity` values.
    CapacityExceeded { capacity: usize },
    /// A `query` index fell outside `1..=len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl DomainFault {
    /// Diagnostic text placed in the reply payload.
    pub fn message(&self) -> String {
        match self {
            DomainFault::CapacityExceeded { capacity } => format!(
                "Storage is full ({capacity} of {capacity} values); send 'sorry' to acknowledge or 'clear' to reset"
            ),
            DomainFault::IndexOutOfRange { index, len: 0 } => {
                format!("Index {index} is out of range: storage is empty")
            }
            DomainFault::IndexOutOfRange { index, len } => {
                format!("Index {index} is out of range: valid indexes are 1 to {len}")
            }
        }
    }
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReply {
    /// Operation result, or a diagnostic when `fault` is set.
    pub res: String,
    /// State after the command was applied.
    pub state: MachineState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<DomainFault>,
}

impl StorageReply {
    pub fn ok(res: impl Into<String>, state: MachineState) -> Self {
        Self {
            res: res.into(),
            state,
            fault: None,
        }
    }

    /// Reply for a command that moved the machine into `Error`.
    pub fn faulted(fault: DomainFault) -> Self {
        Self {
            res: fault.message(),
            state: MachineState::Error,
            fault: Some(fault),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}
