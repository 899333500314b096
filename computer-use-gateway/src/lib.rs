//! Computer-use tool gateway facade.
//!
//! Bundles the gateway crates behind feature flags. The
//! `computer-use-gateway` binary wires them together with a dry-run engine.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use gateway_primitives as primitives;

/// Tool registration and dispatch (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use gateway_tools as tools;

/// Execution engine boundary and bridge (enabled by `engine` feature).
#[cfg(feature = "engine")]
pub use gateway_engine as engine;

/// Macro, capability, and thinking tools (enabled by `server` feature).
#[cfg(feature = "server")]
pub use gateway_server as server;

/// Configuration loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use gateway_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use gateway_telemetry as telemetry;
