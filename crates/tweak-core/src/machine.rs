//! Storage state machine.
//!
//! Transition table:
//!
//! | Current        | Command  | Condition       | Next    |
//! |----------------|----------|-----------------|---------|
//! | Standby, Input | add      | store not full  | Input   |
//! | Standby, Input | add      | store full      | Error   |
//! | any            | clear    |                 | Input   |
//! | any            | stop     |                 | Standby |
//! | Error          | sorry    |                 | Query   |
//! | Query          | query(i) | `1 <= i <= len` | Query   |
//! | Query          | query(i) | out of range    | Error   |
//! | any            | state    |                 | same    |
//!
//! Every other pair is a no-op that keeps the current state. An overflowing
//! `add` is rejected: the value is not stored and the hook is not called.

use crate::Result;
use crate::store::BackingStore;
use tracing::{debug, info, warn};
use tweak_types::{CAPACITY, Command, CommandKind, DomainFault, MachineState, StorageReply};

/// Owns the current state and the backing store.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: MachineState,
    store: BackingStore,
}

impl StateMachine {
    /// Fresh machine in `Standby` over the given (usually empty) store.
    pub fn new(store: BackingStore) -> Self {
        Self {
            state: MachineState::Standby,
            store,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn store(&self) -> &BackingStore {
        &self.store
    }

    /// Apply one command.
    ///
    /// Domain faults come back as `Ok` replies in `Error` state. `Err` is
    /// only returned when the persistence hook fails on an accepted `add`.
    pub fn apply(&mut self, command: Command) -> Result<StorageReply> {
        let from = self.state;
        let kind = command.kind();

        let reply = match (from, command) {
            (_, Command::State) => StorageReply::ok(from.describe(), from),
            (state, Command::Add(value)) if state.accepts_input() => self.add(value)?,
            (_, Command::Clear) => {
                self.store.clear();
                self.transition(MachineState::Input);
                StorageReply::ok("Storage cleared", self.state)
            }
            (_, Command::Stop) => {
                self.transition(MachineState::Standby);
                StorageReply::ok("Storage stopped", self.state)
            }
            (MachineState::Error, Command::Sorry) => {
                self.transition(MachineState::Query);
                StorageReply::ok("Error acknowledged", self.state)
            }
            (MachineState::Query, Command::Query(index)) => self.query(index),
            (state, _) => {
                debug!(target: "tweak::storage", "Ignoring '{}' in {} state", kind, state);
                StorageReply::ok(format!("Command '{kind}' ignored in {state} state"), state)
            }
        };

        if from != reply.state {
            info!(target: "tweak::storage", "{} -> {} on '{}'", from, reply.state, kind);
        }

        Ok(reply)
    }

    fn add(&mut self, value: String) -> Result<StorageReply> {
        if self.store.is_full() {
            return Ok(self.fault(DomainFault::CapacityExceeded { capacity: CAPACITY }));
        }

        // Input is entered before the hook runs, so a failed hook still
        // leaves the stored value under Input.
        self.transition(MachineState::Input);
        self.store.append(value.clone())?;
        Ok(StorageReply::ok(value, self.state))
    }

    fn query(&mut self, index: usize) -> StorageReply {
        match self.store.read(index) {
            Some(value) => StorageReply::ok(value, self.state),
            None => self.fault(DomainFault::IndexOutOfRange {
                index,
                len: self.store.len(),
            }),
        }
    }

    fn fault(&mut self, fault: DomainFault) -> StorageReply {
        warn!(target: "tweak::storage", "Domain fault in {} state: {:?}", self.state, fault);
        self.transition(MachineState::Error);
        StorageReply::faulted(fault)
    }

    fn transition(&mut self, next: MachineState) {
        self.state = next;
    }

    /// Whether `command` could change state or store from the current state.
    pub fn is_effective(&self, command: &Command) -> bool {
        match (self.state, command.kind()) {
            (_, CommandKind::State) => false,
            (state, CommandKind::Add) => state.accepts_input(),
            (_, CommandKind::Clear | CommandKind::Stop) => true,
            (MachineState::Error, CommandKind::Sorry) => true,
            (MachineState::Query, CommandKind::Query) => true,
            _ => false,
        }
    }
}
