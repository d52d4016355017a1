//! The `broker` module covers the MQTT side of the relay.
//!
//! It defines the transient [`BrokerConfig`] carried by a client's `config`
//! frame, the [`BrokerConnector`]/[`BrokerLink`] seam the session layer talks
//! through, and the rumqttc-backed [`MqttConnector`]/[`MqttBridge`] pair that
//! implements it for real brokers.

pub mod bridge;
mod config;

pub use bridge::{MqttBridge, MqttConnector};
pub use config::BrokerConfig;

use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;

use crate::utils::error::RelayError;


/// Opens broker connections on behalf of a session.
///
/// `outbound` is the session's writer channel; the returned link reports
/// connection lifecycle events and delivered messages through it.
pub trait BrokerConnector {
    type Link: BrokerLink;

    fn connect(
        &self,
        config: BrokerConfig,
        outbound: UnboundedSender<WsMessage>,
    ) -> Result<Self::Link, RelayError>;
}

/// A live association with one broker, owned by exactly one session.
#[allow(async_fn_in_trait)]
pub trait BrokerLink {
    async fn subscribe(&self, topics: &[String]) -> Result<(), RelayError>;

    async fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError>;

    /// Tears the connection down without draining in-flight work.
    fn shutdown(self);
}
