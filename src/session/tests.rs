use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{BrokerConfig, BrokerConnector, BrokerLink};
use crate::session::Session;
use crate::transport::message::ServerMessage;
use crate::utils::error::RelayError;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Connect { broker: String, port: u16 },
    Subscribe(Vec<String>),
    Publish { topic: String, payload: String },
    Shutdown { link: usize },
}

/// Records every broker-side call so tests can assert on exactly what the
/// session did (and did not) ask for.
#[derive(Clone, Default)]
struct MockConnector {
    calls: Arc<Mutex<Vec<Call>>>,
    links_opened: Arc<Mutex<usize>>,
    fail_connect: Arc<Mutex<bool>>,
}

impl MockConnector {
    fn recorded(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

struct MockLink {
    id: usize,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl BrokerConnector for MockConnector {
    type Link = MockLink;

    fn connect(
        &self,
        config: BrokerConfig,
        _outbound: UnboundedSender<WsMessage>,
    ) -> Result<MockLink, RelayError> {
        self.calls.lock().unwrap().push(Call::Connect {
            broker: config.broker,
            port: config.port,
        });
        if *self.fail_connect.lock().unwrap() {
            return Err(RelayError::Io(std::io::Error::other("connection refused")));
        }
        let mut opened = self.links_opened.lock().unwrap();
        *opened += 1;
        Ok(MockLink {
            id: *opened,
            calls: self.calls.clone(),
        })
    }
}

impl BrokerLink for MockLink {
    async fn subscribe(&self, topics: &[String]) -> Result<(), RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Subscribe(topics.to_vec()));
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: &str) -> Result<(), RelayError> {
        self.calls.lock().unwrap().push(Call::Publish {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }

    fn shutdown(self) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Shutdown { link: self.id });
    }
}

fn setup() -> (
    Session<MockConnector>,
    UnboundedReceiver<WsMessage>,
    MockConnector,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connector = MockConnector::default();
    (Session::new(tx, connector.clone()), rx, connector)
}

fn recv_status(rx: &mut UnboundedReceiver<WsMessage>) -> String {
    let frame = rx.try_recv().expect("expected a frame");
    let text = frame.to_text().expect("expected a text frame");
    match serde_json::from_str::<ServerMessage>(text).expect("frame should parse") {
        ServerMessage::Status { message } => message,
        other => panic!("expected a status frame, got {other:?}"),
    }
}

fn config_frame() -> String {
    r#"{"type":"config","broker":"localhost","port":1883,"useSSL":false}"#.to_string()
}

#[tokio::test]
async fn malformed_frame_emits_one_status_and_no_broker_action() {
    let (mut session, mut rx, mock) = setup();

    session.handle_frame("this is not json").await;

    assert_eq!(recv_status(&mut rx), "invalid JSON received");
    assert!(rx.try_recv().is_err(), "expected exactly one frame");
    assert!(mock.recorded().is_empty());
}

#[tokio::test]
async fn unknown_type_emits_one_status_and_nothing_else() {
    let (mut session, mut rx, mock) = setup();

    session
        .handle_frame(r#"{"type":"teleport","topic":"a/b"}"#)
        .await;

    assert_eq!(recv_status(&mut rx), "unknown message type");
    assert!(rx.try_recv().is_err());
    assert!(mock.recorded().is_empty());
    assert!(!session.has_link());
}

#[tokio::test]
async fn subscribe_before_config_is_a_silent_no_op() {
    let (mut session, mut rx, mock) = setup();

    session
        .handle_frame(r#"{"type":"subscribe","topic":"a/b"}"#)
        .await;

    assert!(rx.try_recv().is_err());
    assert!(mock.recorded().is_empty());
}

#[tokio::test]
async fn publish_before_config_is_a_silent_no_op() {
    let (mut session, mut rx, mock) = setup();

    session
        .handle_frame(r#"{"type":"publish","topic":"a/b","message":"hi"}"#)
        .await;

    assert!(rx.try_recv().is_err());
    assert!(mock.recorded().is_empty());
}

#[tokio::test]
async fn config_opens_a_link() {
    let (mut session, _rx, mock) = setup();

    session.handle_frame(&config_frame()).await;

    assert!(session.has_link());
    assert_eq!(
        mock.recorded(),
        vec![Call::Connect {
            broker: "localhost".to_string(),
            port: 1883
        }]
    );
}

#[tokio::test]
async fn reconfigure_closes_the_previous_link_first() {
    let (mut session, _rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    session
        .handle_frame(r#"{"type":"config","broker":"other","port":8883,"useSSL":false}"#)
        .await;

    assert_eq!(
        mock.recorded(),
        vec![
            Call::Connect {
                broker: "localhost".to_string(),
                port: 1883
            },
            Call::Shutdown { link: 1 },
            Call::Connect {
                broker: "other".to_string(),
                port: 8883
            },
        ]
    );
}

#[tokio::test]
async fn reconfigure_closes_the_previous_link_even_when_connect_fails() {
    let (mut session, mut rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    *mock.fail_connect.lock().unwrap() = true;
    session
        .handle_frame(r#"{"type":"config","broker":"down","port":1,"useSSL":false}"#)
        .await;

    assert_eq!(mock.recorded()[1], Call::Shutdown { link: 1 });
    assert!(!session.has_link());
    assert!(recv_status(&mut rx).starts_with("MQTT error"));
}

#[tokio::test]
async fn subscribe_accepts_a_single_topic_string() {
    let (mut session, mut rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    session
        .handle_frame(r#"{"type":"subscribe","topic":"a/b"}"#)
        .await;

    assert_eq!(recv_status(&mut rx), "subscribed to a/b");
    assert!(
        mock.recorded()
            .contains(&Call::Subscribe(vec!["a/b".to_string()]))
    );
}

#[tokio::test]
async fn subscribe_accepts_a_topic_list() {
    let (mut session, mut rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    session
        .handle_frame(r#"{"type":"subscribe","topic":["a/b","c/d"]}"#)
        .await;

    assert_eq!(recv_status(&mut rx), "subscribed to a/b, c/d");
    assert!(
        mock.recorded()
            .contains(&Call::Subscribe(vec!["a/b".to_string(), "c/d".to_string()]))
    );
}

#[tokio::test]
async fn publish_forwards_topic_and_payload() {
    let (mut session, mut rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    session
        .handle_frame(r#"{"type":"publish","topic":"a/b","message":"hello"}"#)
        .await;

    assert_eq!(recv_status(&mut rx), "published to a/b");
    assert!(mock.recorded().contains(&Call::Publish {
        topic: "a/b".to_string(),
        payload: "hello".to_string(),
    }));
}

#[tokio::test]
async fn publish_with_empty_payload_is_a_silent_no_op() {
    let (mut session, mut rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    session
        .handle_frame(r#"{"type":"publish","topic":"a/b","message":""}"#)
        .await;

    assert!(rx.try_recv().is_err());
    assert_eq!(mock.recorded().len(), 1, "only the connect call");
}

#[tokio::test]
async fn close_shuts_the_link_down_exactly_once() {
    let (mut session, _rx, mock) = setup();

    session.handle_frame(&config_frame()).await;
    session.close();
    session.close();

    let shutdowns = mock
        .recorded()
        .iter()
        .filter(|c| matches!(c, Call::Shutdown { .. }))
        .count();
    assert_eq!(shutdowns, 1);
}

#[tokio::test]
async fn close_without_a_link_does_nothing() {
    let (mut session, mut rx, mock) = setup();

    session.close();

    assert!(rx.try_recv().is_err());
    assert!(mock.recorded().is_empty());
}
