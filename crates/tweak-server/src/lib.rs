//! T-Tweak server library - HTTP routes, configuration and application state.
//!
//! Kept separate from main.rs so the router can be driven from integration tests.

pub mod config;
pub mod logging;
pub mod routes;
pub mod state;
