//! Execution engine boundary and the bridge that calls it synchronously.
//!
//! The engine itself is an external collaborator described by [`MacroEngine`].
//! [`ExecutionBridge`] lets blocking tool functions run macros on it one at a
//! time, backed by a dedicated `tokio` worker.

#![warn(missing_docs, clippy::pedantic)]

mod bridge;
mod dry_run;
mod engine;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bridge::{BridgeConfig, ExecutionBridge};
pub use dry_run::DryRunEngine;
pub use engine::{EngineError, EngineResult, MacroEngine};
