//! Observability utilities for the gateway.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter {
        /// Directive that failed.
        filter: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber was already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Builds the filter, preferring `RUST_LOG` when it is set and valid.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `fallback` cannot be parsed and
/// `RUST_LOG` does not supply a usable filter.
pub fn build_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(fallback).map_err(|err| TelemetryError::InvalidFilter {
            filter: fallback.to_owned(),
            reason: err.to_string(),
        })
    })
}

/// Installs a `fmt` subscriber writing to stderr.
///
/// Stdout is left untouched because hosts read tool results from it.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(filter: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(filter)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directive_filters() {
        assert!(build_filter("info,gateway_engine=debug").is_ok());
    }

    #[test]
    fn second_install_is_reported() {
        let _ = init_tracing("warn");
        let second = init_tracing("warn");
        assert!(matches!(second, Err(TelemetryError::AlreadyInstalled(_))));
    }
}
