//! Macro and utility tools exposed by the gateway.

use chrono::{DateTime, Local};
use gateway_primitives::MacroRequest;
use gateway_tools::{ToolBinding, ToolProvider, tool};
use serde::Serialize;
use tracing::{info, warn};

use crate::capabilities::CapabilityReport;
use crate::envelope::{self, Failure, Success};
use crate::gateway::Gateway;
use crate::translate::translate_commands;

/// Provider for `run_macro`, `get_server_capabilities`, and `think`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroAndUtilityTools;

impl ToolProvider<Gateway> for MacroAndUtilityTools {
    fn bindings() -> Vec<ToolBinding<Gateway>> {
        vec![
            run_macro_binding(),
            get_server_capabilities_binding(),
            think_binding(),
        ]
    }
}

/// Translates a commands payload and runs it through the execution bridge.
#[tool(
    name = "computer-use:run_macro",
    description = "Execute a sequence of automation commands"
)]
pub fn run_macro(
    gateway: &Gateway,
    #[param(rename = "commandsJson", description = "JSON array of commands to execute")]
    commands_json: String,
    #[param(description = "Optional name for the macro", default = "")] name: String,
) -> String {
    let commands = match translate_commands(&commands_json) {
        Ok(commands) => commands,
        Err(err) => {
            warn!(macro_name = %name, error = %err, "rejected macro payload");
            return envelope::translation_failure(&err, &name);
        }
    };

    let command_count = commands.len();
    info!(macro_name = %name, command_count, "submitting macro");
    let request = MacroRequest::new(commands).with_name(name.as_str());
    match gateway.bridge().execute(request) {
        Ok(result) => envelope::macro_report(&result, command_count, &name),
        Err(err) => {
            warn!(macro_name = %name, error = %err, "macro execution fault");
            envelope::macro_fault(&err, &name)
        }
    }
}

#[derive(Serialize)]
struct CapabilitiesBody<'a> {
    capabilities: &'a CapabilityReport,
}

/// Reports identity, advertised tools, features, and host facts.
#[tool(
    name = "computer-use:get_server_capabilities",
    description = "Get server capabilities and status"
)]
pub fn get_server_capabilities(gateway: &Gateway) -> String {
    let failed = |reason: &dyn std::fmt::Display| {
        Failure::new(format!("Failed to get server capabilities: {reason}")).render()
    };

    let report = match CapabilityReport::gather(
        gateway.identity(),
        &gateway.registry().names(),
        gateway.probe(),
    ) {
        Ok(report) => report,
        Err(err) => {
            warn!(error = %err, "host probe failed");
            return failed(&err);
        }
    };

    Success::new(
        "Server capabilities retrieved",
        CapabilitiesBody {
            capabilities: &report,
        },
    )
    .render()
    .unwrap_or_else(|err| failed(&err))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThoughtBody<'a> {
    thought: &'a str,
    timestamp: DateTime<Local>,
    word_count: usize,
}

/// Acknowledges a free-form thought with a timestamp and word count.
#[tool(
    name = "computer-use:think",
    description = "Provides a space for structured thinking during complex operations"
)]
pub fn think(
    #[param(description = "The thought or reasoning to process")] thought: String,
) -> String {
    let body = ThoughtBody {
        thought: &thought,
        timestamp: Local::now(),
        word_count: word_count(&thought),
    };
    Success::new("Thought processed", body)
        .render()
        .unwrap_or_else(|err| {
            Failure::new(format!("Think operation failed: {err}"))
                .with_context("thought", thought.as_str())
                .render()
        })
}

/// Whitespace-delimited tokens in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
