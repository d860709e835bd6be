//! Asynchronous services and external integrations
//!
//! This module contains everything that talks to the outside world:
//! the analysis backend, the session file, the terminal and logging.

pub mod action_client;
pub mod async_bridge;
pub mod auth;
pub mod terminal_modes;
pub mod time_source;
pub mod tracing_setup;
