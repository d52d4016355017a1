use serde::Deserialize;

/// Connection parameters carried by a client's `config` frame.
///
/// This is a transient value object: it is consumed to build the MQTT
/// connection options and not kept around afterwards. The `ca`, `cert` and
/// `key` fields hold PEM text and are only consulted when `use_ssl` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    pub broker: String,
    pub port: u16,

    #[serde(rename = "useSSL", default)]
    pub use_ssl: bool,

    #[serde(default)]
    pub ca: Option<String>,
    #[serde(default)]
    pub cert: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}
