use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::BrokerConfig;

/// A subscribe target: either one topic or a list of topics.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TopicSelector {
    One(String),
    Many(Vec<String>),
}

impl TopicSelector {
    pub fn into_topics(self) -> Vec<String> {
        match self {
            TopicSelector::One(topic) => vec![topic],
            TopicSelector::Many(topics) => topics,
        }
    }
}

/// Control messages received from a WebSocket client.
///
/// The `Unknown` catch-all keeps unrecognized `type` tags distinguishable
/// from frames that are not valid JSON at all.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "config")]
    Config(BrokerConfig),

    #[serde(rename = "subscribe")]
    Subscribe { topic: TopicSelector },

    #[serde(rename = "publish")]
    Publish { topic: String, message: String },

    #[serde(other)]
    Unknown,
}

/// Frames sent back to a WebSocket client.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "status")]
    Status { message: String },

    /// A message delivered by the broker on a subscribed topic, forwarded
    /// without transformation.
    #[serde(rename = "message")]
    Message { topic: String, message: String },
}

impl ServerMessage {
    pub fn status(message: impl Into<String>) -> Self {
        ServerMessage::Status {
            message: message.into(),
        }
    }

    /// Serializes the frame and queues it on the session's writer channel.
    /// Returns `false` once the session's writer is gone, so callers driven
    /// by broker events know to stop.
    pub fn send_to(&self, sender: &UnboundedSender<WsMessage>) -> bool {
        let text = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize frame: {e}");
                return true;
            }
        };
        sender.send(WsMessage::text(text)).is_ok()
    }
}
