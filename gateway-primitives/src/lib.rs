//! Core shared types for the computer-use tool gateway.

#![warn(missing_docs, clippy::pedantic)]

mod command;
mod error;
mod panic;
mod result;
mod tool_name;

/// Typed automation steps and macro requests.
pub use command::{Command, CommandBuilder, MacroRequest};
/// Error type and result alias shared by the primitives.
pub use error::{Error, Result};
/// Diagnostics for caught panics.
pub use panic::panic_message;
/// Aggregate macro outcome reported by the execution engine.
pub use result::MacroExecutionResult;
/// Validated `<namespace>:<verb>` tool names.
pub use tool_name::ToolName;
