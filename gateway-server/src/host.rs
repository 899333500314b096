//! Line-delimited JSON host loop.
//!
//! Each input line is `{"tool": "...", "arguments": {...}}`. Each output line
//! is the tool's envelope text encoded as a single JSON string.

use std::io::{self, BufRead, Write};

use gateway_tools::ToolArgs;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::envelope::Failure;
use crate::gateway::Gateway;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HostRequest {
    tool: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

/// Handles one request line and returns the envelope text.
#[must_use]
pub fn handle_line(gateway: &Gateway, line: &str) -> String {
    match serde_json::from_str::<HostRequest>(line) {
        Ok(request) => {
            debug!(tool = %request.tool, "host request");
            gateway.call(&request.tool, &ToolArgs::from_json_object(&request.arguments))
        }
        Err(err) => Failure::new(format!("Invalid request: {err}")).render(),
    }
}

/// Serves requests until `reader` is exhausted, returning how many were
/// answered. Blank lines are skipped and a line that is not valid UTF-8 is
/// answered with a failure envelope.
///
/// # Errors
///
/// Returns any I/O error from `reader` or `writer`.
pub fn serve<R: BufRead, W: Write>(
    gateway: &Gateway,
    mut reader: R,
    mut writer: W,
) -> io::Result<usize> {
    let mut handled = 0;
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buffer) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(gateway, line),
            Err(err) => {
                warn!(error = %err, "request line is not UTF-8");
                Failure::new(format!("Invalid request: {err}")).render()
            }
        };
        let encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
        writeln!(writer, "{encoded}")?;
        writer.flush()?;
        handled += 1;
    }
    info!(handled, "input closed");
    Ok(handled)
}
