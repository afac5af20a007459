use std::path::Path;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable with `EnvFilter` directives that override the
/// configured log level.
pub const LOG_ENV_VAR: &str = "JOOS_LOG";

static TRACING_INIT: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Add the built-in `java.lang`, `java.io` and `java.util` declarations.
    #[serde(default = "default_true")]
    pub include_stdlib: bool,

    /// Keep checking independent bodies after the first type or flow error.
    #[serde(default = "default_true")]
    pub collect_all: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include_stdlib: true,
            collect_all: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`warn`, `debug`, ...) or a full `EnvFilter` directive
    /// string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_owned()
    }

    fn normalize_level(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_new(Self::normalize_level(&self.level)).unwrap_or_else(
            |_| {
                tracing_subscriber::EnvFilter::default()
                    .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
            },
        )
    }

    /// The effective filter: the configured level, overridden by
    /// [`LOG_ENV_VAR`] when that is set to valid directives.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        std::env::var(LOG_ENV_VAR)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .and_then(|directives| tracing_subscriber::EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| self.config_env_filter())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Toml(value.message().to_owned())
    }
}

/// Install a stderr `fmt` subscriber. Only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false);
        // Fails only if another subscriber is already installed.
        let _ = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_normalized() {
        assert_eq!(LoggingConfig::normalize_level(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level(""), "warn");
        assert_eq!(
            LoggingConfig::normalize_level("joos_typeck=debug"),
            "joos_typeck=debug"
        );
    }
}
