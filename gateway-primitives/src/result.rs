//! Aggregate outcome reported by the execution engine for one macro.

use std::time::Duration;

use serde_json::Value;

/// Result of executing a macro.
///
/// Per-command outcomes are owned by the engine and carried as opaque JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroExecutionResult {
    success: bool,
    execution_time: Duration,
    results: Vec<Value>,
    error_message: Option<String>,
}

impl MacroExecutionResult {
    /// A macro that ran every command.
    #[must_use]
    pub fn completed(execution_time: Duration, results: Vec<Value>) -> Self {
        Self {
            success: true,
            execution_time,
            results,
            error_message: None,
        }
    }

    /// A macro that stopped early; `results` holds outcomes up to the failure.
    #[must_use]
    pub fn failed(
        execution_time: Duration,
        results: Vec<Value>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            execution_time,
            results,
            error_message: Some(error_message.into()),
        }
    }

    /// Whether the engine reported success.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Wall-clock time the engine spent on the macro.
    #[must_use]
    pub const fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Elapsed time in fractional milliseconds.
    #[must_use]
    pub fn execution_time_ms(&self) -> f64 {
        self.execution_time.as_secs_f64() * 1000.0
    }

    /// Per-command outcomes in execution order.
    #[must_use]
    pub fn results(&self) -> &[Value] {
        &self.results
    }

    /// Engine diagnostic, present on failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_result_keeps_partial_outcomes() {
        let result = MacroExecutionResult::failed(
            Duration::from_millis(12),
            vec![json!({"index": 0, "success": true})],
            "step 2 failed",
        );

        assert!(!result.success());
        assert_eq!(result.results().len(), 1);
        assert_eq!(result.error_message(), Some("step 2 failed"));
    }

    #[test]
    fn execution_time_in_milliseconds() {
        let result = MacroExecutionResult::completed(Duration::from_micros(1_500), Vec::new());
        assert!((result.execution_time_ms() - 1.5).abs() < 1e-9);
        assert!(result.error_message().is_none());
    }
}
