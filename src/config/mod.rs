mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{MqttSettings, ServerSettings, Settings};

#[cfg(test)]
mod tests;

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the server and MQTT configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    // Double underscore keeps section nesting distinct from key names like
    // keep_alive_secs, e.g. MQTT__KEEP_ALIVE_SECS and SERVER__PORT.
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("__"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        mqtt: MqttSettings {
            keep_alive_secs: partial
                .mqtt
                .as_ref()
                .and_then(|m| m.keep_alive_secs)
                .unwrap_or(default.mqtt.keep_alive_secs),
            reconnect_secs: partial
                .mqtt
                .as_ref()
                .and_then(|m| m.reconnect_secs)
                .unwrap_or(default.mqtt.reconnect_secs),
        },
    })
}
