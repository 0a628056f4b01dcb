//! HTTP relay between LINE webhook deliveries and a Dify analysis workflow.
//!
//! Lifecycle:
//! 1. Resolve config from the environment
//! 2. Build the LINE and Dify clients + shared state
//! 3. Serve `/callback` and `/health` until stopped
//!
//! Each delivery is processed synchronously: signature check, event decode,
//! then per event reply, content fetch, analysis and push, and only then the
//! HTTP acknowledgement.

pub mod config;
pub mod server;
pub mod state;
pub mod webhook;

pub use {
    config::RelayConfig,
    server::{build_app, serve},
    state::AppState,
};
