//! Self-description of the gateway: identity, tools, features, and host facts.

use std::collections::HashSet;

use serde::Serialize;
use sysinfo::{ProcessesToUpdate, System};
use thiserror::Error;

/// Capability tags every gateway advertises.
pub const CAPABILITY_TAGS: &[&str] = &[
    "screenshot_capture",
    "window_management",
    "mouse_automation",
    "keyboard_automation",
    "macro_execution",
    "multi_monitor_support",
];

/// Automation tools advertised ahead of the registry contents.
///
/// These name the sibling automation server's tools so clients can discover
/// the full desktop surface from one report. This gateway does not register
/// or dispatch them; calling one here yields an unknown-tool failure unless an
/// embedder supplies it through [`crate::GatewayBuilder::tool`].
pub const AUTOMATION_TOOLS: &[&str] = &[
    "computer-use:take_screenshot",
    "computer-use:list_windows",
    "computer-use:get_active_window",
    "computer-use:focus_window",
    "computer-use:mouse_click",
    "computer-use:mouse_move",
    "computer-use:type_text",
    "computer-use:press_key",
    "computer-use:scroll",
];

/// Name of the in-process tool framework reported as `sdkVersion`.
pub const SDK_VERSION: &str = concat!("gateway-tools ", env!("CARGO_PKG_VERSION"));

/// Raised when the host environment cannot be queried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct EnvironmentError {
    reason: String,
}

impl EnvironmentError {
    /// Creates an error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Runtime facts about the host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFacts {
    operating_system: String,
    processor_count: usize,
    working_set: u64,
    runtime_version: String,
}

impl HostFacts {
    /// Assembles facts gathered elsewhere.
    pub fn new(
        operating_system: impl Into<String>,
        processor_count: usize,
        working_set: u64,
        runtime_version: impl Into<String>,
    ) -> Self {
        Self {
            operating_system: operating_system.into(),
            processor_count,
            working_set,
            runtime_version: runtime_version.into(),
        }
    }

    /// Operating system description.
    #[must_use]
    pub fn operating_system(&self) -> &str {
        &self.operating_system
    }

    /// Logical processors available to the process.
    #[must_use]
    pub const fn processor_count(&self) -> usize {
        self.processor_count
    }

    /// Resident memory of the process in bytes.
    #[must_use]
    pub const fn working_set(&self) -> u64 {
        self.working_set
    }

    /// Toolchain the gateway targets.
    #[must_use]
    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }
}

/// Source of [`HostFacts`].
pub trait HostProbe: Send + Sync {
    /// Queries the host.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] when a fact is unavailable.
    fn facts(&self) -> Result<HostFacts, EnvironmentError>;
}

/// [`HostProbe`] backed by `sysinfo` and the standard library.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn facts(&self) -> Result<HostFacts, EnvironmentError> {
        let processor_count = std::thread::available_parallelism()
            .map_err(|err| EnvironmentError::new(format!("processor count unavailable: {err}")))?
            .get();

        let pid = sysinfo::get_current_pid()
            .map_err(|err| EnvironmentError::new(format!("process id unavailable: {err}")))?;
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let working_set = system
            .process(pid)
            .map(sysinfo::Process::memory)
            .ok_or_else(|| EnvironmentError::new("current process is not visible"))?;

        let operating_system = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| std::env::consts::OS.to_owned());

        Ok(HostFacts::new(
            operating_system,
            processor_count,
            working_set,
            runtime_version(),
        ))
    }
}

fn runtime_version() -> String {
    format!(
        "rust {} ({})",
        env!("CARGO_PKG_RUST_VERSION"),
        std::env::consts::ARCH
    )
}

/// Name and version the gateway reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    name: String,
    version: String,
}

impl ServerIdentity {
    /// Creates an identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Server name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Server version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
struct FeatureFlags {
    multi_monitor_support: bool,
    window_management: bool,
    macro_execution: bool,
    unicode_text_input: bool,
    native_windows_api: bool,
    self_contained_deployment: bool,
}

const FEATURES: FeatureFlags = FeatureFlags {
    multi_monitor_support: true,
    window_management: true,
    macro_execution: true,
    unicode_text_input: true,
    native_windows_api: true,
    self_contained_deployment: true,
};

/// Full capability report, serialized under the `capabilities` key.
///
/// `tools` lists what the wider computer-use deployment offers, not only what
/// [`crate::Gateway::call`] dispatches: [`AUTOMATION_TOOLS`] are advertised for
/// discovery and only the registered names are callable on this gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityReport {
    server_name: String,
    version: String,
    platform: &'static str,
    sdk_version: &'static str,
    capabilities: &'static [&'static str],
    tools: Vec<&'static str>,
    features: FeatureFlags,
    system_info: HostFacts,
}

impl CapabilityReport {
    /// Builds a report from the identity, registered tool names, and a probe.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvironmentError`] from the probe.
    pub fn gather(
        identity: &ServerIdentity,
        registered: &[&'static str],
        probe: &dyn HostProbe,
    ) -> Result<Self, EnvironmentError> {
        Ok(Self {
            server_name: identity.name().to_owned(),
            version: identity.version().to_owned(),
            platform: std::env::consts::OS,
            sdk_version: SDK_VERSION,
            capabilities: CAPABILITY_TAGS,
            tools: tool_names(registered),
            features: FEATURES,
            system_info: probe.facts()?,
        })
    }

    /// Advertised tool names.
    #[must_use]
    pub fn tools(&self) -> &[&'static str] {
        &self.tools
    }

    /// Host facts captured when the report was built.
    #[must_use]
    pub const fn system_info(&self) -> &HostFacts {
        &self.system_info
    }
}

/// Static automation tools followed by registered names, without repeats.
///
/// The static names are advertised only; see [`AUTOMATION_TOOLS`].
#[must_use]
pub fn tool_names(registered: &[&'static str]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    AUTOMATION_TOOLS
        .iter()
        .chain(registered)
        .copied()
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe;

    impl HostProbe for FixedProbe {
        fn facts(&self) -> Result<HostFacts, EnvironmentError> {
            Ok(HostFacts::new("TestOS 1.0", 8, 4096, "rust test"))
        }
    }

    struct BrokenProbe;

    impl HostProbe for BrokenProbe {
        fn facts(&self) -> Result<HostFacts, EnvironmentError> {
            Err(EnvironmentError::new("no access"))
        }
    }

    #[test]
    fn tool_names_keep_static_tools_first_without_duplicates() {
        let names = tool_names(&[
            "computer-use:run_macro",
            "computer-use:scroll",
            "computer-use:think",
        ]);

        assert_eq!(&names[..AUTOMATION_TOOLS.len()], AUTOMATION_TOOLS);
        assert_eq!(
            &names[AUTOMATION_TOOLS.len()..],
            ["computer-use:run_macro", "computer-use:think"]
        );
    }

    #[test]
    fn report_serializes_wire_names() {
        let identity = ServerIdentity::new("MCPComputerUse", "1.0.0");
        let report =
            CapabilityReport::gather(&identity, &["computer-use:think"], &FixedProbe).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["serverName"], "MCPComputerUse");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["sdkVersion"], SDK_VERSION);
        assert_eq!(value["capabilities"].as_array().unwrap().len(), 6);
        assert_eq!(value["features"]["nativeWindowsApi"], true);
        assert_eq!(value["features"]["selfContainedDeployment"], true);
        assert_eq!(value["systemInfo"]["operatingSystem"], "TestOS 1.0");
        assert_eq!(value["systemInfo"]["processorCount"], 8);
        assert_eq!(value["systemInfo"]["workingSet"], 4096);
        assert_eq!(value["systemInfo"]["runtimeVersion"], "rust test");
        assert!(report.tools().contains(&"computer-use:think"));
    }

    #[test]
    fn probe_errors_propagate() {
        let identity = ServerIdentity::new("a", "b");
        let err = CapabilityReport::gather(&identity, &[], &BrokenProbe).unwrap_err();
        assert_eq!(err.to_string(), "no access");
    }

    #[test]
    fn system_probe_reads_the_current_process() {
        let facts = SystemProbe.facts().unwrap();
        assert!(facts.processor_count() >= 1);
        assert!(facts.working_set() > 0);
        assert!(!facts.operating_system().is_empty());
        assert!(facts.runtime_version().starts_with("rust "));
    }
}
