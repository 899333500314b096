//! Computer-use tools served over a blocking tool protocol.
//!
//! The [`Gateway`] owns an [`gateway_engine::ExecutionBridge`] and a frozen
//! tool registry. Tools translate loosely typed payloads into commands, run
//! them through the bridge, and answer with pretty-printed JSON envelopes.

#![warn(missing_docs, clippy::pedantic)]

pub mod capabilities;
pub mod envelope;
pub mod gateway;
pub mod host;
pub mod tools;
pub mod translate;

pub use capabilities::{
    CapabilityReport, EnvironmentError, HostFacts, HostProbe, ServerIdentity, SystemProbe,
};
pub use envelope::{Failure, MACRO_FAULT_PREFIX, Success};
pub use gateway::{Gateway, GatewayBuilder, GatewayError};
pub use gateway_config::DEFAULT_SERVER_NAME;
pub use host::{handle_line, serve};
pub use tools::MacroAndUtilityTools;
pub use translate::{TranslateError, translate_commands};
