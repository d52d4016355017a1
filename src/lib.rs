//! # mqtt-bridge
//!
//! `mqtt-bridge` is a small WebSocket to MQTT relay. Each WebSocket client
//! gets its own session, and each session owns at most one outbound MQTT
//! broker connection. Control messages (configure, subscribe, publish) flow
//! from the client to the broker, and broker-delivered messages are forwarded
//! back to the client as JSON frames.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: The MQTT side of the relay: broker configuration, the
//!   connector/link seam, and the rumqttc-backed bridge.
//! - `session`: Per-connection state: one WebSocket client paired with at most
//!   one broker connection.
//! - `config`: Handles loading and managing server configuration.
//! - `transport`: Manages the WebSocket server and the wire protocol spoken
//!   with clients.
//! - `utils`: Shared utilities, such as error handling and logging setup.

pub mod broker;
pub mod config;
pub mod session;
pub mod transport;
pub mod utils;
