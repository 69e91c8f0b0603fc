/*!
 * Tests for application configuration functionality
 */

use jimaku_sync::app_config::{Config, LogLevel, ToolConfig};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.tools.ffprobe.path, "ffprobe");
    assert_eq!(config.tools.ffprobe.timeout_secs, 30);
    assert_eq!(config.tools.mkvextract.path, "mkvextract");
    assert_eq!(config.tools.mkvextract.timeout_secs, 120);
    assert_eq!(config.tools.alass.path, "alass");
    assert_eq!(config.tools.alass.timeout_secs, 300);

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    // Start with a valid config
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Empty tool path
    config.tools.ffprobe.path = "".to_string();
    assert!(config.validate().is_err());
    config.tools.ffprobe.path = "ffprobe".to_string();

    // Whitespace-only tool path
    config.tools.alass.path = "   ".to_string();
    assert!(config.validate().is_err());
    config.tools.alass.path = "alass".to_string();

    // Zero timeout
    config.tools.mkvextract.timeout_secs = 0;
    assert!(config.validate().is_err());
    config.tools.mkvextract.timeout_secs = 120;

    assert!(config.validate().is_ok());
}

/// Test that a partial config file fills the gaps with defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldApplyDefaults() {
    let json = r#"{
        "tools": {
            "alass": { "path": "/opt/alass/bin/alass", "timeout_secs": 60 }
        },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).expect("Partial config should deserialize");

    assert_eq!(
        config.tools.alass,
        ToolConfig {
            path: "/opt/alass/bin/alass".to_string(),
            timeout_secs: 60
        }
    );
    assert_eq!(config.tools.ffprobe.path, "ffprobe");
    assert_eq!(config.tools.mkvextract.timeout_secs, 120);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test that an empty JSON object produces the default configuration
#[test]
fn test_config_deserialization_withEmptyJson_shouldMatchDefaults() {
    let config: Config = serde_json::from_str("{}").expect("Empty config should deserialize");

    assert_eq!(config.tools.ffprobe.path, "ffprobe");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test round trip through JSON
#[test]
fn test_config_serialization_withRoundTrip_shouldPreserveValues() {
    let mut config = Config::default();
    config.tools.ffprobe.timeout_secs = 45;
    config.log_level = LogLevel::Trace;

    let json = serde_json::to_string_pretty(&config).expect("Config should serialize");
    let restored: Config = serde_json::from_str(&json).expect("Config should deserialize");

    assert_eq!(restored.tools.ffprobe.timeout_secs, 45);
    assert_eq!(restored.log_level, LogLevel::Trace);
}
