//! Configuration management for the gateway.
//!
//! Settings come from an optional JSON file, then environment overrides
//! (`GATEWAY_LOG`, `GATEWAY_SERVER_NAME`, `GATEWAY_QUEUE_DEPTH`). Every field
//! has a default, so an empty object is a valid configuration.

#![warn(missing_docs, clippy::pedantic)]

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Server name reported when none is configured.
pub const DEFAULT_SERVER_NAME: &str = "MCPComputerUse";

/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "GATEWAY_LOG";
/// Environment variable overriding the server name.
pub const ENV_SERVER_NAME: &str = "GATEWAY_SERVER_NAME";
/// Environment variable overriding the bridge queue depth.
pub const ENV_QUEUE_DEPTH: &str = "GATEWAY_QUEUE_DEPTH";

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Source [`std::io::Error`].
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for this schema.
    #[error("invalid config file: {source}")]
    Parse {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },
    /// A value failed validation.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

/// Top-level gateway settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    server_name: String,
    version: String,
    log_filter: String,
    engine: EngineConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            log_filter: "info".to_owned(),
            engine: EngineConfig::default(),
        }
    }
}

/// Execution engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    queue_depth: usize,
    dry_run_step_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_depth: 1,
            dry_run_step_delay_ms: 0,
        }
    }
}

impl EngineConfig {
    /// Macros allowed to wait while one executes.
    #[must_use]
    pub fn queue_depth(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.queue_depth).unwrap_or(NonZeroUsize::MIN)
    }

    /// Pause the dry-run engine takes after each command.
    #[must_use]
    pub const fn dry_run_step_delay(&self) -> Duration {
        Duration::from_millis(self.dry_run_step_delay_ms)
    }
}

impl GatewayConfig {
    /// Loads the file at `path` (if any), then applies process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or when
    /// a value fails validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `GATEWAY_QUEUE_DEPTH` is not a
    /// positive integer.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        if let Some(name) = lookup(ENV_SERVER_NAME) {
            self.server_name = name;
        }
        if let Some(depth) = lookup(ENV_QUEUE_DEPTH) {
            self.engine.queue_depth = depth.trim().parse().map_err(|err| ConfigError::Invalid {
                field: "engine.queue_depth",
                reason: format!("{ENV_QUEUE_DEPTH}={depth}: {err}"),
            })?;
        }
        Ok(())
    }

    /// Checks invariants that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "server_name",
                reason: "cannot be empty".into(),
            });
        }
        if self.version.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "version",
                reason: "cannot be empty".into(),
            });
        }
        if self.engine.queue_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "engine.queue_depth",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Name reported by the capability tool.
    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Version reported by the capability tool.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `tracing` filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Engine settings.
    #[must_use]
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = GatewayConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.server_name(), DEFAULT_SERVER_NAME);
        assert_eq!(config.engine().queue_depth().get(), 1);
        assert_eq!(config.engine().dry_run_step_delay(), Duration::ZERO);
    }

    #[test]
    fn reads_nested_engine_settings() {
        let config = GatewayConfig::from_json_str(
            r#"{"server_name": "lab", "engine": {"queue_depth": 8, "dry_run_step_delay_ms": 25}}"#,
        )
        .unwrap();
        assert_eq!(config.server_name(), "lab");
        assert_eq!(config.engine().queue_depth().get(), 8);
        assert_eq!(
            config.engine().dry_run_step_delay(),
            Duration::from_millis(25)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = GatewayConfig::from_json_str(r#"{"sever_name": "typo"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_queue_depth_is_invalid() {
        let err =
            GatewayConfig::from_json_str(r#"{"engine": {"queue_depth": 0}}"#).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "engine.queue_depth")
        );
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = GatewayConfig::default();
        config
            .apply_env(|key| match key {
                ENV_LOG => Some("debug".into()),
                ENV_SERVER_NAME => Some("desk-7".into()),
                ENV_QUEUE_DEPTH => Some(" 3 ".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.log_filter(), "debug");
        assert_eq!(config.server_name(), "desk-7");
        assert_eq!(config.engine().queue_depth().get(), 3);
    }

    #[test]
    fn malformed_queue_depth_override_errors() {
        let mut config = GatewayConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_QUEUE_DEPTH).then(|| "many".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GatewayConfig::from_file(Path::new("/nonexistent/gateway.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gateway.json"));
    }
}
