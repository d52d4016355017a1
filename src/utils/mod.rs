//! Shared utilities for the relay: error types and logging setup.

pub mod error;
pub mod logging;
