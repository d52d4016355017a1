//! WebSocket transport
//!
//! This file implements the relay's WebSocket server. Responsibilities:
//! - Accept TCP/WebSocket connections on the configured address
//! - Run one task per connection that reads frames sequentially and applies
//!   them to that connection's `Session`
//! - Keep a single writer task per socket; control handlers and the MQTT
//!   driver both emit frames through the same channel, so outbound sends
//!   never interleave mid-frame
//! - Tear the session's broker connection down when the socket closes
//!
//! No per-connection failure is fatal to the server; handshake and send
//! errors are logged and only end that one session.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::MqttConnector;
use crate::config::Settings;
use crate::session::Session;
use crate::utils::error::RelayError;

/// The relay's listening surface, constructed explicitly so callers control
/// its lifecycle: `bind`, then `run` until dropped or the process exits.
pub struct RelayServer {
    listener: TcpListener,
    settings: Settings,
}

impl RelayServer {
    pub async fn bind(settings: Settings) -> Result<Self, RelayError> {
        let addr = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&addr).await?;
        Ok(Self { listener, settings })
    }

    /// The actually bound address. Useful when the configured port is 0.
    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept connection: {e}");
                    continue;
                }
            };

            let connector = MqttConnector::new(self.settings.mqtt.clone());
            tokio::spawn(handle_connection(stream, peer, connector));
        }
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, connector: MqttConnector) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error from {peer}: {e}");
            return;
        }
    };
    info!("{peer} connected");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Single writer for this socket. Session handlers and the MQTT driver
    // both send through tx; only this task touches the sink.
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(msg).await {
                debug!("Failed to send message to {peer}: {e}");
                break;
            }
        }
        debug!("Send loop closed for {peer}");
    });

    let mut session = Session::new(tx, connector);

    while let Some(Ok(msg)) = ws_receiver.next().await {
        if msg.is_text() {
            if let Ok(text) = msg.to_text() {
                session.handle_frame(text).await;
            }
        }
    }

    info!("{peer} disconnected");
    session.close();
}
