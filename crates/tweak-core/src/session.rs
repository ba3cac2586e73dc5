//! Process-wide storage session.

use crate::interpreter::{CommandArgs, parse_command};
use crate::machine::StateMachine;
use crate::persistence::PersistenceHook;
use crate::store::BackingStore;
use crate::{Result, TweakError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, trace};
use tweak_types::{Command, MachineState, StorageReply};

/// The single state machine shared by every request.
///
/// Each command runs entirely under one lock, hook call included, so two
/// concurrent `add`s can never both see room for one more value.
pub struct StorageSession {
    machine: Mutex<StateMachine>,
}

impl StorageSession {
    pub fn new(hook: Arc<dyn PersistenceHook>) -> Self {
        Self {
            machine: Mutex::new(StateMachine::new(BackingStore::new(hook))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StateMachine>> {
        self.machine.lock().map_err(|_| {
            error!(target: "tweak::storage", "Storage session lock poisoned");
            TweakError::SessionPoisoned
        })
    }

    /// Apply an already-validated command.
    pub fn apply(&self, command: Command) -> Result<StorageReply> {
        trace!(target: "tweak::storage", "Applying {:?}", command);
        self.lock()?.apply(command)
    }

    /// Interpret a raw token and arguments, then apply the result.
    ///
    /// Malformed requests are rejected before the lock is taken.
    pub fn execute(&self, token: &str, args: CommandArgs) -> Result<StorageReply> {
        let command = parse_command(token, args)?;
        self.apply(command)
    }

    pub fn state(&self) -> Result<MachineState> {
        Ok(self.lock()?.state())
    }

    /// Copy of the stored values, oldest first.
    pub fn snapshot(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.store().entries().to_vec())
    }
}

impl Default for StorageSession {
    fn default() -> Self {
        Self {
            machine: Mutex::new(StateMachine::default()),
        }
    }
}
