use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{BrokerConnector, BrokerLink};
use crate::transport::message::{ClientMessage, ServerMessage};

/// One relay session: a WebSocket client and its optional broker connection.
///
/// The session exclusively owns its broker link. Reconfiguring always tears
/// the old link down first, and closing the session closes the link exactly
/// once. All outbound frames go through `outbound`, the single writer channel
/// for the socket, which the broker driver task shares.
pub struct Session<C: BrokerConnector> {
    outbound: UnboundedSender<WsMessage>,
    connector: C,
    link: Option<C::Link>,
}

impl<C: BrokerConnector> Session<C> {
    pub fn new(outbound: UnboundedSender<WsMessage>, connector: C) -> Self {
        Self {
            outbound,
            connector,
            link: None,
        }
    }

    /// Handles one inbound text frame. Frames are processed one at a time in
    /// arrival order; nothing here blocks beyond queueing broker requests.
    pub async fn handle_frame(&mut self, text: &str) {
        let parsed = match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => msg,
            Err(err) => {
                warn!("Invalid client message: {err} | {}", truncate(text, 100));
                self.send_status("invalid JSON received");
                return;
            }
        };

        match parsed {
            ClientMessage::Config(config) => {
                // Destructive reconfigure: the old connection is never reused.
                if let Some(link) = self.link.take() {
                    link.shutdown();
                }

                info!("Configuring broker connection to {}:{}", config.broker, config.port);
                match self.connector.connect(config, self.outbound.clone()) {
                    Ok(link) => self.link = Some(link),
                    Err(err) => self.send_status(format!("MQTT error: {err}")),
                }
            }

            ClientMessage::Subscribe { topic } => {
                let Some(link) = &self.link else {
                    return;
                };
                let topics = topic.into_topics();
                if topics.is_empty() {
                    return;
                }

                match link.subscribe(&topics).await {
                    Ok(()) => self.send_status(format!("subscribed to {}", topics.join(", "))),
                    Err(err) => self.send_status(format!("subscribe error: {err}")),
                }
            }

            ClientMessage::Publish { topic, message } => {
                if topic.is_empty() || message.is_empty() {
                    return;
                }
                let Some(link) = &self.link else {
                    return;
                };

                match link.publish(&topic, &message).await {
                    Ok(()) => self.send_status(format!("published to {topic}")),
                    Err(err) => self.send_status(format!("publish error: {err}")),
                }
            }

            ClientMessage::Unknown => self.send_status("unknown message type"),
        }
    }

    /// Tears down the broker link, if any. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(link) = self.link.take() {
            link.shutdown();
        }
    }

    pub fn has_link(&self) -> bool {
        self.link.is_some()
    }

    fn send_status(&self, message: impl Into<String>) {
        ServerMessage::status(message).send_to(&self.outbound);
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
