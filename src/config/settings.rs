use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for both the WebSocket server and the MQTT client side.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub mqtt: MqttSettings,
}

/// Configuration settings for the WebSocket server.
///
/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for outbound MQTT connections.
///
/// Controls the keep-alive interval and how long to wait before retrying a
/// failed broker connection.
#[derive(Debug, Deserialize, Clone)]
pub struct MqttSettings {
    pub keep_alive_secs: u64,
    pub reconnect_secs: u64,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub mqtt: Option<PartialMqttSettings>,
}

/// Partial server settings.
///
/// Used when loading server configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial MQTT settings.
///
/// Used for MQTT configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialMqttSettings {
    pub keep_alive_secs: Option<u64>,
    pub reconnect_secs: Option<u64>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            mqtt: MqttSettings {
                keep_alive_secs: 30,
                reconnect_secs: 1,
            },
        }
    }
}
