//! The `error` module defines the error types used within the relay.
//!
//! This module centralizes error handling, providing a consistent way to
//! represent and propagate errors throughout the system. All broker-side
//! failures end up as human-readable status text on the WebSocket, so the
//! variants here carry their source errors for display.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("tls setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("{0}")]
    Mqtt(#[from] rumqttc::ClientError),
}
