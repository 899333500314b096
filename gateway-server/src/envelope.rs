//! Canonical JSON envelopes returned by every tool.
//!
//! Tools never surface errors through the protocol layer. Success and failure
//! both come back as pretty-printed JSON text whose first field is `success`.

use std::fmt::Display;

use gateway_primitives::MacroExecutionResult;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::translate::TranslateError;

/// Prefix of the error text when the engine faults or is unreachable.
pub const MACRO_FAULT_PREFIX: &str = "Macro execution failed: ";

const ENCODING_FAILURE: &str = "{\n  \"success\": false,\n  \"error\": \"Failed to encode response\"\n}";

/// Pretty-prints any serializable envelope.
///
/// # Errors
///
/// Propagates [`serde_json::Error`] from a failing `Serialize` impl.
pub fn render<T: Serialize>(envelope: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(envelope)
}

/// `{"success": true, "message": ..., <body fields>}`.
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    success: bool,
    message: String,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> Success<T> {
    /// Wraps `body`, whose fields are inlined after `message`.
    pub fn new(message: impl Into<String>, body: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            body,
        }
    }

    /// Renders the envelope.
    ///
    /// # Errors
    ///
    /// Fails only if the body cannot be serialized as a JSON object.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        render(self)
    }
}

/// `{"success": false, "error": ..., <context fields>}`.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    success: bool,
    error: String,
    #[serde(flatten)]
    context: Map<String, Value>,
}

impl Failure {
    /// Failure with only an error message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            context: Map::new(),
        }
    }

    /// Echoes a request field back next to the error.
    #[must_use]
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_owned(), value.into());
        self
    }

    /// Error text.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Renders the envelope, falling back to a fixed failure text.
    #[must_use]
    pub fn render(&self) -> String {
        render(self).unwrap_or_else(|err| {
            error!(error = %err, "failed to encode failure envelope");
            ENCODING_FAILURE.to_owned()
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MacroReport<'a> {
    success: bool,
    message: String,
    execution_time: f64,
    command_count: usize,
    results: &'a [Value],
    error_message: Option<&'a str>,
}

/// Renders an engine outcome.
///
/// `command_count` is the number of commands submitted, which may exceed the
/// number of per-command results when the engine stopped early.
#[must_use]
pub fn macro_report(result: &MacroExecutionResult, command_count: usize, name: &str) -> String {
    let execution_time = result.execution_time_ms();
    let verdict = if result.success() {
        "completed"
    } else {
        "failed"
    };
    let report = MacroReport {
        success: result.success(),
        message: format!("Macro execution {verdict} in {execution_time:.0}ms"),
        execution_time,
        command_count,
        results: result.results(),
        error_message: result.error_message(),
    };
    render(&report).unwrap_or_else(|err| macro_fault(&err, name))
}

/// Renders a rejected payload. The macro name is echoed only for field errors.
#[must_use]
pub fn translation_failure(err: &TranslateError, name: &str) -> String {
    let failure = Failure::new(err.to_string());
    match err {
        TranslateError::InvalidFormat => failure,
        TranslateError::InvalidField { .. } => failure.with_context("name", name),
    }
    .render()
}

/// Renders a fault raised while executing a macro.
#[must_use]
pub fn macro_fault(fault: &dyn Display, name: &str) -> String {
    Failure::new(format!("{MACRO_FAULT_PREFIX}{fault}"))
        .with_context("name", name)
        .render()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn completed_report_carries_every_field() {
        let result = MacroExecutionResult::completed(
            Duration::from_millis(42),
            vec![json!({"ok": 1}), json!({"ok": 2})],
        );
        let text = macro_report(&result, 2, "login");
        let report = parse(&text);

        assert_eq!(report["success"], true);
        assert_eq!(report["message"], "Macro execution completed in 42ms");
        assert!((report["executionTime"].as_f64().unwrap() - 42.0).abs() < 1e-6);
        assert_eq!(report["commandCount"], 2);
        assert_eq!(report["results"], json!([{"ok": 1}, {"ok": 2}]));
        assert_eq!(report["errorMessage"], Value::Null);
    }

    #[test]
    fn command_count_is_the_submitted_length() {
        let result = MacroExecutionResult::failed(
            Duration::from_millis(7),
            vec![json!({"step": 1})],
            "element not found",
        );
        let report = parse(&macro_report(&result, 5, ""));

        assert_eq!(report["success"], false);
        assert_eq!(report["message"], "Macro execution failed in 7ms");
        assert_eq!(report["commandCount"], 5);
        assert_eq!(report["results"].as_array().unwrap().len(), 1);
        assert_eq!(report["errorMessage"], "element not found");
    }

    #[test]
    fn envelopes_are_pretty_with_success_first() {
        let result = MacroExecutionResult::completed(Duration::ZERO, Vec::new());
        let text = macro_report(&result, 0, "");
        assert!(text.starts_with("{\n  \"success\": true,\n"), "{text}");

        let text = Failure::new("boom").render();
        assert!(text.starts_with("{\n  \"success\": false,\n"), "{text}");
    }

    #[test]
    fn invalid_format_omits_the_name() {
        let failure = parse(&translation_failure(&TranslateError::InvalidFormat, "m1"));
        assert_eq!(
            failure,
            json!({"success": false, "error": "Invalid commands JSON format"})
        );
    }

    #[test]
    fn field_errors_echo_the_name() {
        let err = TranslateError::InvalidField {
            index: 0,
            field: "x",
            expected: "a 32-bit integer",
        };
        let failure = parse(&translation_failure(&err, "m1"));
        assert_eq!(failure["success"], false);
        assert_eq!(failure["name"], "m1");
        assert_eq!(failure["error"], err.to_string());
    }

    #[test]
    fn faults_are_prefixed() {
        let failure = parse(&macro_fault(&"engine offline", "nightly"));
        assert_eq!(
            failure,
            json!({
                "success": false,
                "error": "Macro execution failed: engine offline",
                "name": "nightly",
            })
        );
    }

    #[test]
    fn success_inlines_the_body() {
        #[derive(Serialize)]
        struct Body {
            answer: u8,
        }

        let text = Success::new("done", Body { answer: 42 }).render().unwrap();
        assert_eq!(
            parse(&text),
            json!({"success": true, "message": "done", "answer": 42})
        );
    }
}
