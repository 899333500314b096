//! Boundary to the external macro execution engine.

use async_trait::async_trait;
use gateway_primitives::{MacroExecutionResult, MacroRequest};
use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Asynchronous, run-to-completion macro executor.
///
/// Implementations own ordering, timing, and retries inside a macro. A
/// partial failure is reported as an `Ok` result with `success == false`;
/// `Err` is reserved for faults that prevented a result from being produced.
#[async_trait]
pub trait MacroEngine: Send + Sync {
    /// Executes every command of the request in order.
    async fn execute(&self, request: MacroRequest) -> EngineResult<MacroExecutionResult>;
}

/// Faults raised while executing a macro.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The engine raised a fault instead of returning a result.
    #[error("{reason}")]
    Fault {
        /// Message reported by the engine.
        reason: String,
    },

    /// The engine panicked while executing.
    #[error("engine panicked: {reason}")]
    Panicked {
        /// Panic message.
        reason: String,
    },

    /// The bridge worker is gone and no longer accepts macros.
    #[error("execution bridge is closed")]
    Closed,

    /// The bridge worker could not be started.
    #[error("failed to start execution worker: {reason}")]
    Startup {
        /// Underlying I/O failure.
        reason: String,
    },
}

impl EngineError {
    /// Creates a fault from the supplied engine message.
    #[must_use]
    pub fn fault(reason: impl Into<String>) -> Self {
        Self::Fault {
            reason: reason.into(),
        }
    }
}
