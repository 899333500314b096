use std::sync::Arc;

use computer_use_gateway::config::GatewayConfig;
use computer_use_gateway::engine::{BridgeConfig, DryRunEngine};
use computer_use_gateway::server::Gateway;
use computer_use_gateway::tools::ToolArgs;
use serde_json::Value;

fn gateway_from(config: &GatewayConfig) -> Gateway {
    Gateway::builder(Arc::new(DryRunEngine::new(
        config.engine().dry_run_step_delay(),
    )))
    .identity(config.server_name(), config.version())
    .bridge_config(BridgeConfig::new(config.engine().queue_depth()))
    .build()
    .expect("gateway starts")
}

#[test]
fn configured_gateway_runs_a_macro() {
    let config =
        GatewayConfig::from_json_str(r#"{"server_name": "bench", "engine": {"queue_depth": 2}}"#)
            .unwrap();
    let gateway = gateway_from(&config);
    assert_eq!(gateway.bridge().config().queue_depth().get(), 2);

    let args = ToolArgs::new()
        .with("commandsJson", r#"[{"action":"press_key","key":"enter"}]"#)
        .with("name", "submit");
    let report: Value =
        serde_json::from_str(&gateway.call("computer-use:run_macro", &args)).unwrap();

    assert_eq!(report["success"], true);
    assert_eq!(report["commandCount"], 1);
    assert_eq!(report["results"][0]["command"]["key"], "enter");
}

#[test]
fn catalog_lists_the_three_tools() {
    let gateway = gateway_from(&GatewayConfig::default());

    let catalog: Value = serde_json::from_str(&gateway.catalog()).unwrap();
    let names: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "computer-use:run_macro",
            "computer-use:get_server_capabilities",
            "computer-use:think",
        ]
    );
    assert_eq!(catalog[0]["parameters"][0]["name"], "commandsJson");
}
