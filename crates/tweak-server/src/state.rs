//! Shared application state.

use crate::config::{Config, PersistenceMode};
use std::sync::Arc;
use tweak_core::{NoopHook, PersistenceHook, SqliteHook, StorageSession};

/// Shared application state, built once at startup and handed to every handler.
pub struct AppState {
    pub storage: StorageSession,
}

impl AppState {
    pub fn new(config: &Config) -> tweak_core::Result<Self> {
        let hook: Arc<dyn PersistenceHook> = match config.persistence {
            PersistenceMode::None => Arc::new(NoopHook),
            PersistenceMode::Sqlite => Arc::new(SqliteHook::open(&config.db_path)?),
        };
        Ok(Self::with_hook(hook))
    }

    /// Build state around a caller-supplied persistence hook.
    pub fn with_hook(hook: Arc<dyn PersistenceHook>) -> Self {
        Self {
            storage: StorageSession::new(hook),
        }
    }
}
