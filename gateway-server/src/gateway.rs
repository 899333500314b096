//! The gateway context shared by every tool.

use std::fmt;
use std::sync::Arc;

use gateway_config::DEFAULT_SERVER_NAME;
use gateway_engine::{BridgeConfig, EngineError, ExecutionBridge, MacroEngine};
use gateway_tools::{ToolArgs, ToolBinding, ToolError, ToolRegistry};
use thiserror::Error;
use tracing::{info, warn};

use crate::capabilities::{HostProbe, ServerIdentity, SystemProbe};
use crate::envelope::{self, Failure};
use crate::tools::MacroAndUtilityTools;

/// Errors raised while assembling a [`Gateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The execution bridge failed to start.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// A tool definition was rejected by the registry.
    #[error(transparent)]
    Registry(#[from] ToolError),
}

/// Tool context owning the bridge, the host probe, and the frozen registry.
pub struct Gateway {
    identity: ServerIdentity,
    bridge: ExecutionBridge,
    probe: Arc<dyn HostProbe>,
    registry: ToolRegistry<Gateway>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("identity", &self.identity)
            .field("bridge", &self.bridge)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Starts building a gateway around `engine`.
    #[must_use]
    pub fn builder(engine: Arc<dyn MacroEngine>) -> GatewayBuilder {
        GatewayBuilder::new(engine)
    }

    /// Dispatches a tool call and always returns envelope text.
    ///
    /// Unknown tools and missing arguments become failure envelopes naming
    /// the tool.
    #[must_use]
    pub fn call(&self, tool: &str, args: &ToolArgs) -> String {
        self.registry.call(self, tool, args).unwrap_or_else(|err| {
            warn!(tool, error = %err, "tool call rejected");
            Failure::new(err.to_string())
                .with_context("tool", tool)
                .render()
        })
    }

    /// Pretty JSON array of every tool descriptor.
    #[must_use]
    pub fn catalog(&self) -> String {
        let descriptors: Vec<_> = self.registry.descriptors().collect();
        envelope::render(&descriptors)
            .unwrap_or_else(|err| Failure::new(format!("Failed to list tools: {err}")).render())
    }

    /// Reported identity.
    #[must_use]
    pub const fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Bridge to the execution engine.
    #[must_use]
    pub const fn bridge(&self) -> &ExecutionBridge {
        &self.bridge
    }

    /// Source of host facts.
    #[must_use]
    pub fn probe(&self) -> &dyn HostProbe {
        self.probe.as_ref()
    }

    /// Registered tools.
    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry<Gateway> {
        &self.registry
    }
}

/// Builder for [`Gateway`].
pub struct GatewayBuilder {
    engine: Arc<dyn MacroEngine>,
    identity: ServerIdentity,
    bridge_config: BridgeConfig,
    probe: Arc<dyn HostProbe>,
    extra_tools: Vec<ToolBinding<Gateway>>,
}

impl fmt::Debug for GatewayBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayBuilder")
            .field("identity", &self.identity)
            .field("bridge_config", &self.bridge_config)
            .field("extra_tools", &self.extra_tools)
            .finish_non_exhaustive()
    }
}

impl GatewayBuilder {
    fn new(engine: Arc<dyn MacroEngine>) -> Self {
        Self {
            engine,
            identity: ServerIdentity::new(DEFAULT_SERVER_NAME, env!("CARGO_PKG_VERSION")),
            bridge_config: BridgeConfig::default(),
            probe: Arc::new(SystemProbe),
            extra_tools: Vec::new(),
        }
    }

    /// Overrides the reported server name and version.
    #[must_use]
    pub fn identity(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.identity = ServerIdentity::new(name, version);
        self
    }

    /// Sets the bridge queue configuration.
    #[must_use]
    pub const fn bridge_config(mut self, config: BridgeConfig) -> Self {
        self.bridge_config = config;
        self
    }

    /// Replaces the host probe.
    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn HostProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Registers an additional tool next to the built-in ones.
    #[must_use]
    pub fn tool(mut self, binding: ToolBinding<Gateway>) -> Self {
        self.extra_tools.push(binding);
        self
    }

    /// Freezes the registry and starts the execution bridge.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Registry`] for an invalid or duplicate tool and
    /// [`GatewayError::Engine`] if the bridge worker cannot start.
    pub fn build(self) -> Result<Gateway, GatewayError> {
        let mut registry =
            ToolRegistry::<Gateway>::builder().register_provider::<MacroAndUtilityTools>()?;
        for binding in self.extra_tools {
            registry = registry.register(binding)?;
        }
        let registry = registry.build();

        let bridge = ExecutionBridge::start(self.engine, self.bridge_config)?;
        info!(
            server = self.identity.name(),
            tools = registry.len(),
            "gateway ready"
        );

        Ok(Gateway {
            identity: self.identity,
            bridge,
            probe: self.probe,
            registry,
        })
    }
}
