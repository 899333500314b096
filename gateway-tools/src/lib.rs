//! Tool discovery and dispatch for the gateway.
//!
//! Functions become tools through the [`tool`] attribute, which emits a
//! [`ToolBinding`] next to the annotated function. Types that group tools
//! implement [`ToolProvider`], and the host assembles everything once into an
//! immutable [`ToolRegistry`].

#![warn(missing_docs, clippy::pedantic)]

pub mod args;
pub mod registry;

/// Attribute macro marking a function as an externally callable tool.
pub use gateway_tools_macros::tool;

pub use args::ToolArgs;
pub use registry::{
    ParamDescriptor, ToolBinding, ToolDescriptor, ToolError, ToolHandler, ToolProvider,
    ToolRegistry, ToolRegistryBuilder, ToolResult,
};
