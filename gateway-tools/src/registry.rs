//! Static tool registry: descriptors, bindings, and dispatch.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use gateway_primitives::{ToolName, panic_message};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::args::ToolArgs;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Function pointer produced by the `#[tool]` macro for a tool body.
pub type ToolHandler<C> = fn(&C, &ToolArgs) -> ToolResult<String>;

/// Human-readable description of a single tool parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    name: &'static str,
    description: &'static str,
    required: bool,
}

impl ParamDescriptor {
    /// Creates a parameter descriptor.
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, required: bool) -> Self {
        Self {
            name,
            description,
            required,
        }
    }

    /// External argument name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Whether the host must supply the argument.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }
}

/// Static metadata describing a tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    parameters: &'static [ParamDescriptor],
}

impl ToolDescriptor {
    /// Creates a descriptor. The name is validated when registered.
    #[must_use]
    pub const fn new(
        name: &'static str,
        description: &'static str,
        parameters: &'static [ParamDescriptor],
    ) -> Self {
        Self {
            name,
            description,
            parameters,
        }
    }

    /// Stable external name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Parameter descriptors in declaration order.
    #[must_use]
    pub const fn parameters(&self) -> &'static [ParamDescriptor] {
        self.parameters
    }
}

/// Declarative binding returned by the `#[tool]` macro.
pub struct ToolBinding<C> {
    descriptor: ToolDescriptor,
    handler: ToolHandler<C>,
}

impl<C> ToolBinding<C> {
    /// Creates a new binding from a descriptor and handler.
    #[must_use]
    pub const fn new(descriptor: ToolDescriptor, handler: ToolHandler<C>) -> Self {
        Self {
            descriptor,
            handler,
        }
    }

    /// Returns the descriptor associated with this binding.
    #[must_use]
    pub const fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Runs the handler, converting a panic into [`ToolError::Panicked`].
    ///
    /// # Errors
    ///
    /// Propagates handler errors such as [`ToolError::MissingArgument`].
    pub fn invoke(&self, ctx: &C, args: &ToolArgs) -> ToolResult<String> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(ctx, args))).unwrap_or_else(
            |payload| {
                let reason = panic_message(&*payload);
                warn!(tool = self.descriptor.name, %reason, "tool panicked");
                Err(ToolError::Panicked {
                    name: self.descriptor.name.to_owned(),
                    reason,
                })
            },
        )
    }
}

impl<C> Clone for ToolBinding<C> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            handler: self.handler,
        }
    }
}

impl<C> fmt::Debug for ToolBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBinding")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Marks a type whose functions are exposed as tools.
pub trait ToolProvider<C> {
    /// Bindings contributed by this provider, in catalog order.
    fn bindings() -> Vec<ToolBinding<C>>;
}

/// Immutable registry mapping tool names to bindings.
///
/// Built once through [`ToolRegistryBuilder`]; lookups and calls take `&self`
/// so a registry can be shared freely across threads.
pub struct ToolRegistry<C> {
    bindings: Vec<ToolBinding<C>>,
    index: HashMap<&'static str, usize>,
}

impl<C> fmt::Debug for ToolRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("registered", &self.names())
            .finish()
    }
}

impl<C> ToolRegistry<C> {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder<C> {
        ToolRegistryBuilder {
            bindings: Vec::new(),
        }
    }

    /// Returns the binding registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolBinding<C>> {
        self.index.get(name).map(|&slot| &self.bindings[slot])
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> + '_ {
        self.bindings.iter().map(ToolBinding::descriptor)
    }

    /// Tool names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors().map(ToolDescriptor::name).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Dispatches a call to the named tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] when the tool is not registered, and
    /// propagates argument errors or [`ToolError::Panicked`] from the tool.
    pub fn call(&self, ctx: &C, name: &str, args: &ToolArgs) -> ToolResult<String> {
        let binding = self.get(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_owned(),
        })?;
        debug!(tool = name, arguments = args.len(), "dispatching tool");
        binding.invoke(ctx, args)
    }
}

/// Builder for [`ToolRegistry`].
pub struct ToolRegistryBuilder<C> {
    bindings: Vec<ToolBinding<C>>,
}

impl<C> fmt::Debug for ToolRegistryBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistryBuilder")
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl<C> ToolRegistryBuilder<C> {
    /// Adds a binding.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidMetadata`] if the name is not a valid
    /// `<namespace>:<verb>` or a parameter name repeats, and
    /// [`ToolError::DuplicateTool`] if the name is already registered.
    pub fn register(mut self, binding: ToolBinding<C>) -> ToolResult<Self> {
        let descriptor = binding.descriptor();
        ToolName::new(descriptor.name()).map_err(|err| ToolError::InvalidMetadata {
            reason: err.to_string(),
        })?;

        let parameters = descriptor.parameters();
        for (position, param) in parameters.iter().enumerate() {
            if parameters[..position]
                .iter()
                .any(|earlier| earlier.name() == param.name())
            {
                return Err(ToolError::InvalidMetadata {
                    reason: format!(
                        "tool `{}` declares parameter `{}` twice",
                        descriptor.name(),
                        param.name()
                    ),
                });
            }
        }

        if self
            .bindings
            .iter()
            .any(|existing| existing.descriptor().name() == descriptor.name())
        {
            return Err(ToolError::DuplicateTool {
                name: descriptor.name().to_owned(),
            });
        }

        self.bindings.push(binding);
        Ok(self)
    }

    /// Adds every binding contributed by a [`ToolProvider`].
    ///
    /// # Errors
    ///
    /// Propagates the first registration error.
    pub fn register_provider<P: ToolProvider<C>>(self) -> ToolResult<Self> {
        P::bindings().into_iter().try_fold(self, Self::register)
    }

    /// Finalises the registry.
    #[must_use]
    pub fn build(self) -> ToolRegistry<C> {
        let index = self
            .bindings
            .iter()
            .enumerate()
            .map(|(slot, binding)| (binding.descriptor().name(), slot))
            .collect();
        ToolRegistry {
            bindings: self.bindings,
            index,
        }
    }
}

/// Errors produced by tool registration and invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    /// Tool metadata failed validation.
    #[error("invalid tool metadata: {reason}")]
    InvalidMetadata {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Tool name collided with an existing registration.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },

    /// Requested tool does not exist.
    #[error("tool `{name}` is not registered")]
    UnknownTool {
        /// Name of the missing tool.
        name: String,
    },

    /// A required argument was not supplied.
    #[error("missing required argument `{name}`")]
    MissingArgument {
        /// External name of the argument.
        name: String,
    },

    /// The tool body panicked.
    #[error("tool `{name}` panicked: {reason}")]
    Panicked {
        /// Name of the tool.
        name: String,
        /// Panic message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO_PARAMS: &[ParamDescriptor] =
        &[ParamDescriptor::new("value", "Value to echo back", true)];

    fn echo(prefix: &String, args: &ToolArgs) -> ToolResult<String> {
        Ok(format!("{prefix}{}", args.required("value")?))
    }

    fn explode(_: &String, _: &ToolArgs) -> ToolResult<String> {
        panic!("kaboom")
    }

    fn binding(name: &'static str, handler: ToolHandler<String>) -> ToolBinding<String> {
        ToolBinding::new(ToolDescriptor::new(name, "Echo", ECHO_PARAMS), handler)
    }

    struct EchoProvider;

    impl ToolProvider<String> for EchoProvider {
        fn bindings() -> Vec<ToolBinding<String>> {
            vec![
                binding("test:echo", echo),
                binding("test:explode", explode),
            ]
        }
    }

    #[test]
    fn register_and_call_tool() {
        let registry = ToolRegistry::builder()
            .register(binding("test:echo", echo))
            .unwrap()
            .build();

        let args = ToolArgs::new().with("value", "hello");
        let output = registry.call(&"> ".to_owned(), "test:echo", &args).unwrap();
        assert_eq!(output, "> hello");
    }

    #[test]
    fn provider_preserves_order() {
        let registry = ToolRegistry::builder()
            .register_provider::<EchoProvider>()
            .unwrap()
            .build();

        assert_eq!(registry.names(), ["test:echo", "test:explode"]);
        assert_eq!(registry.len(), 2);
        assert!(format!("{registry:?}").contains("test:explode"));
    }

    #[test]
    fn duplicate_registration_errors() {
        let err = ToolRegistry::builder()
            .register(binding("test:echo", echo))
            .unwrap()
            .register(binding("test:echo", explode))
            .expect_err("duplicate registration should fail");

        assert!(matches!(err, ToolError::DuplicateTool { name } if name == "test:echo"));
    }

    #[test]
    fn malformed_name_is_rejected() {
        let err = ToolRegistry::builder()
            .register(binding("echo", echo))
            .expect_err("name without namespace");
        assert!(matches!(err, ToolError::InvalidMetadata { .. }));
    }

    #[test]
    fn repeated_parameter_is_rejected() {
        const TWICE: &[ParamDescriptor] = &[
            ParamDescriptor::new("value", "first", true),
            ParamDescriptor::new("value", "second", false),
        ];
        let err = ToolRegistry::<String>::builder()
            .register(ToolBinding::new(
                ToolDescriptor::new("test:twice", "Twice", TWICE),
                echo,
            ))
            .expect_err("duplicate parameter");
        assert!(matches!(err, ToolError::InvalidMetadata { reason } if reason.contains("twice")));
    }

    #[test]
    fn unknown_tool_errors() {
        let registry = ToolRegistry::<String>::builder().build();
        let err = registry
            .call(&String::new(), "test:missing", &ToolArgs::new())
            .expect_err("unknown tool should error");
        assert!(matches!(err, ToolError::UnknownTool { name } if name == "test:missing"));
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_argument_propagates() {
        let registry = ToolRegistry::builder()
            .register(binding("test:echo", echo))
            .unwrap()
            .build();
        let err = registry
            .call(&String::new(), "test:echo", &ToolArgs::new())
            .expect_err("argument required");
        assert!(matches!(err, ToolError::MissingArgument { name } if name == "value"));
    }

    #[test]
    fn panicking_tool_is_contained() {
        let registry = ToolRegistry::builder()
            .register_provider::<EchoProvider>()
            .unwrap()
            .build();
        let err = registry
            .call(&String::new(), "test:explode", &ToolArgs::new())
            .expect_err("panic becomes error");
        assert_eq!(
            err,
            ToolError::Panicked {
                name: "test:explode".into(),
                reason: "kaboom".into(),
            }
        );
    }

    #[test]
    fn descriptors_serialize_for_catalogs() {
        let descriptor = ToolDescriptor::new("test:echo", "Echo", ECHO_PARAMS);
        let value = serde_json::to_value(descriptor).unwrap();
        assert_eq!(value["name"], "test:echo");
        assert_eq!(value["parameters"][0]["name"], "value");
        assert_eq!(value["parameters"][0]["required"], true);
    }
}
