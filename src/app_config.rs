use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// External tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// One external tool binding
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolConfig {
    // @field: Binary name or absolute path, resolved via PATH when bare
    pub path: String,

    // @field: Deadline for a single invocation, in seconds
    pub timeout_secs: u64,
}

/// Bindings for the three external tools the pipeline drives
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolsConfig {
    /// Stream probing tool
    #[serde(default = "default_ffprobe_config")]
    pub ffprobe: ToolConfig,

    /// Track extraction tool
    #[serde(default = "default_mkvextract_config")]
    pub mkvextract: ToolConfig,

    /// Subtitle alignment tool
    #[serde(default = "default_alass_config")]
    pub alass: ToolConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe: default_ffprobe_config(),
            mkvextract: default_mkvextract_config(),
            alass: default_alass_config(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_ffprobe_config() -> ToolConfig {
    ToolConfig {
        path: "ffprobe".to_string(),
        timeout_secs: default_probe_timeout_secs(),
    }
}

fn default_mkvextract_config() -> ToolConfig {
    ToolConfig {
        path: "mkvextract".to_string(),
        timeout_secs: default_extract_timeout_secs(),
    }
}

fn default_alass_config() -> ToolConfig {
    ToolConfig {
        path: "alass".to_string(),
        timeout_secs: default_sync_timeout_secs(),
    }
}

fn default_probe_timeout_secs() -> u64 {
    30
}

fn default_extract_timeout_secs() -> u64 {
    120
}

fn default_sync_timeout_secs() -> u64 {
    300
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, tool) in [
            ("ffprobe", &self.tools.ffprobe),
            ("mkvextract", &self.tools.mkvextract),
            ("alass", &self.tools.alass),
        ] {
            if tool.path.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "tools.{}.path must not be empty",
                    name
                )));
            }
            if tool.timeout_secs == 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "tools.{}.timeout_secs must be greater than zero",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            tools: ToolsConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
