use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::event::ChannelEvent;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub listeners: HashMap<String, ListenerConfig>,
    #[serde(default)]
    pub channels: HashMap<String, ChannelScript>,
}

/// How a named listener stack is layered
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    #[serde(default = "default_contain_panics")]
    pub contain_panics: bool,
    #[serde(default = "default_metrics")]
    pub metrics: bool,
    #[serde(default)]
    pub trace: Option<TraceConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            contain_panics: default_contain_panics(),
            metrics: default_metrics(),
            trace: None,
        }
    }
}

fn default_contain_panics() -> bool {
    true
}
fn default_metrics() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TraceConfig {
    #[serde(default)]
    pub level: TraceLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl From<TraceLevel> for tracing::Level {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Trace => tracing::Level::TRACE,
            TraceLevel::Debug => tracing::Level::DEBUG,
            TraceLevel::Info => tracing::Level::INFO,
            TraceLevel::Warn => tracing::Level::WARN,
            TraceLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Scripted lifecycle of one channel, replayed against a named listener
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelScript {
    pub listener: String,
    #[serde(default)]
    pub events: Vec<ChannelEvent>,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_string())
            } else {
                ConfigError::IoError(e.to_string())
            }
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string (useful for testing)
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for common errors
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Sorted so the first reported error does not depend on hash order
        let mut channels: Vec<(&String, &ChannelScript)> = self.channels.iter().collect();
        channels.sort_by(|a, b| a.0.cmp(b.0));

        for (channel_name, script) in channels {
            if !self.listeners.contains_key(&script.listener) {
                return Err(ConfigError::ValidationError(format!(
                    "Channel '{}' references unknown listener '{}'",
                    channel_name, script.listener
                )));
            }

            // Close is terminal: nothing may follow it
            if let Some(position) = script.events.iter().position(ChannelEvent::is_terminal) {
                if position + 1 < script.events.len() {
                    return Err(ConfigError::ValidationError(format!(
                        "Channel '{}' has events after close (event #{})",
                        channel_name,
                        position + 2
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
