use super::load_config;
use super::settings::Settings;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.mqtt.keep_alive_secs, 30);
    assert_eq!(settings.mqtt.reconnect_secs, 1);
}

#[test]
fn test_environment_overrides_reach_nested_keys() {
    temp_env::with_vars(
        [
            ("MQTT__KEEP_ALIVE_SECS", Some("60")),
            ("MQTT__RECONNECT_SECS", Some("5")),
            ("SERVER__PORT", Some("9090")),
        ],
        || {
            let settings = load_config().expect("Failed to load configuration");
            assert_eq!(settings.mqtt.keep_alive_secs, 60);
            assert_eq!(settings.mqtt.reconnect_secs, 5);
            assert_eq!(settings.server.port, 9090);
        },
    );
}
