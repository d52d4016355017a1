//! rumqttc-backed implementation of the broker seam.
//!
//! `MqttConnector::connect` builds the connection options from a
//! [`BrokerConfig`], starts the client, and spawns a driver task that polls
//! the rumqttc event loop. The driver translates broker events into `status`
//! and `message` frames on the owning session's writer channel and retries
//! failed connections on a fixed interval. Everything speaks MQTT 3.1.1 at
//! QoS 0.
//!
//! The TLS path deliberately accepts self-signed and otherwise untrusted
//! server certificates: this relay targets local developer tooling, where
//! brokers routinely run with ad-hoc certificates.

use std::time::Duration;

use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeFilter, TlsConfiguration,
    Transport,
};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{BrokerConfig, BrokerConnector, BrokerLink};
use crate::config::MqttSettings;
use crate::transport::message::ServerMessage;
use crate::utils::error::RelayError;

/// Opens real MQTT connections using the relay's MQTT settings.
#[derive(Debug, Clone)]
pub struct MqttConnector {
    settings: MqttSettings,
}

impl MqttConnector {
    pub fn new(settings: MqttSettings) -> Self {
        Self { settings }
    }
}

impl BrokerConnector for MqttConnector {
    type Link = MqttBridge;

    fn connect(
        &self,
        config: BrokerConfig,
        outbound: UnboundedSender<WsMessage>,
    ) -> Result<MqttBridge, RelayError> {
        let client_id = format!("relay-{}", uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, config.broker.clone(), config.port);
        // rumqttc rejects keep-alive intervals under 5 seconds
        options.set_keep_alive(Duration::from_secs(self.settings.keep_alive_secs.max(5)));
        options.set_transport(transport_for(&config)?);

        let (client, eventloop) = AsyncClient::new(options, 16);
        let reconnect = Duration::from_secs(self.settings.reconnect_secs);
        let driver = tokio::spawn(drive(eventloop, outbound, reconnect));

        Ok(MqttBridge { client, driver })
    }
}

/// One session's connection to one broker.
///
/// Holds the request handle and the driver task polling the event loop.
/// Dropping the bridge without calling [`BrokerLink::shutdown`] leaves the
/// driver running until the owning session's writer channel closes.
pub struct MqttBridge {
    client: AsyncClient,
    driver: JoinHandle<()>,
}

impl BrokerLink for MqttBridge {
    async fn subscribe(&self, topics: &[String]) -> Result<(), RelayError> {
        let filters = topics
            .iter()
            .map(|t| SubscribeFilter::new(t.clone(), QoS::AtMostOnce));
        self.client.subscribe_many(filters).await?;
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await?;
        Ok(())
    }

    fn shutdown(self) {
        // Best effort: the broker may already be gone.
        let _ = self.client.try_disconnect();
        self.driver.abort();
    }
}

/// Picks the stream transport for a broker connection.
///
/// Plaintext TCP unless the client asked for TLS. With TLS, any supplied CA
/// is added as a root and a cert/key pair becomes the client identity, but
/// server certificate validation stays off either way.
pub(crate) fn transport_for(config: &BrokerConfig) -> Result<Transport, RelayError> {
    if !config.use_ssl {
        return Ok(Transport::Tcp);
    }

    let mut builder = native_tls::TlsConnector::builder();
    builder.danger_accept_invalid_certs(true);

    if let Some(ca) = &config.ca {
        builder.add_root_certificate(native_tls::Certificate::from_pem(ca.as_bytes())?);
    }
    if let (Some(cert), Some(key)) = (&config.cert, &config.key) {
        builder.identity(native_tls::Identity::from_pkcs8(
            cert.as_bytes(),
            key.as_bytes(),
        )?);
    }

    Ok(Transport::Tls(TlsConfiguration::NativeConnector(
        builder.build()?,
    )))
}

/// Converts a delivered broker message into the client-facing frame. The
/// topic and payload pass through untouched apart from lossy UTF-8 decoding.
pub(crate) fn publish_frame(topic: String, payload: &[u8]) -> ServerMessage {
    ServerMessage::Message {
        topic,
        message: String::from_utf8_lossy(payload).into_owned(),
    }
}

/// Polls the event loop and forwards broker events to the session.
///
/// Runs until the session's writer channel closes or the driver task is
/// aborted by [`BrokerLink::shutdown`]. Connection failures are reported as
/// status frames and retried after `reconnect`.
async fn drive(mut eventloop: EventLoop, outbound: UnboundedSender<WsMessage>, reconnect: Duration) {
    let mut connected = false;

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                connected = true;
                if !ServerMessage::status("MQTT connected").send_to(&outbound) {
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let frame = publish_frame(publish.topic.clone(), &publish.payload);
                if !frame.send_to(&outbound) {
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                connected = false;
                if !ServerMessage::status("MQTT disconnected").send_to(&outbound) {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                debug!("MQTT event loop error: {err}");
                if !ServerMessage::status(format!("MQTT error: {err}")).send_to(&outbound) {
                    break;
                }
                if connected {
                    connected = false;
                    if !ServerMessage::status("MQTT disconnected").send_to(&outbound) {
                        break;
                    }
                }
                tokio::time::sleep(reconnect).await;
            }
        }
    }
}
