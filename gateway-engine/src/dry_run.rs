//! Engine that acknowledges commands without touching the desktop.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use gateway_primitives::{MacroExecutionResult, MacroRequest};
use serde_json::json;
use tracing::debug;

use crate::engine::{EngineError, EngineResult, MacroEngine};

/// Walks a macro in order and reports one outcome per command.
///
/// A command with an empty action stops the macro with a partial failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunEngine {
    step_delay: Duration,
}

impl DryRunEngine {
    /// Creates an engine that pauses `step_delay` after each command.
    #[must_use]
    pub const fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

#[async_trait]
impl MacroEngine for DryRunEngine {
    async fn execute(&self, request: MacroRequest) -> EngineResult<MacroExecutionResult> {
        let started = Instant::now();
        let mut results = Vec::with_capacity(request.len());

        for (index, command) in request.commands().iter().enumerate() {
            if command.action().is_empty() {
                results.push(json!({
                    "index": index,
                    "action": "",
                    "success": false,
                    "error": "command has no action",
                }));
                return Ok(MacroExecutionResult::failed(
                    started.elapsed(),
                    results,
                    format!("Command {} has no action", index + 1),
                ));
            }

            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }

            let echoed = serde_json::to_value(command)
                .map_err(|err| EngineError::fault(format!("failed to record command: {err}")))?;
            debug!(index, action = command.action(), "dry-run command acknowledged");
            results.push(json!({
                "index": index,
                "action": command.action(),
                "success": true,
                "command": echoed,
            }));
        }

        Ok(MacroExecutionResult::completed(started.elapsed(), results))
    }
}
