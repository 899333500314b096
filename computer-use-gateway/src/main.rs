//! Command-line host for the computer-use tool gateway.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use computer_use_gateway::config::GatewayConfig;
use computer_use_gateway::engine::{BridgeConfig, DryRunEngine};
use computer_use_gateway::server::{Gateway, serve};
use computer_use_gateway::telemetry::init_tracing;
use computer_use_gateway::tools::ToolArgs;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "computer-use-gateway", version, about)]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the registered tool descriptors.
    Tools,
    /// Invoke one tool and print its envelope.
    Call {
        /// Tool name, e.g. `computer-use:think`.
        tool: String,
        /// Argument as `name=value`; repeatable.
        #[arg(long = "arg", value_parser = parse_arg)]
        args: Vec<(String, String)>,
    },
    /// Answer line-delimited JSON requests from stdin.
    Serve,
}

fn parse_arg(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_owned(), value.to_owned()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected `name=value`, got `{raw}`"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GatewayConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(config.log_filter())?;

    let engine = DryRunEngine::new(config.engine().dry_run_step_delay());
    let gateway = Gateway::builder(Arc::new(engine))
        .identity(config.server_name(), config.version())
        .bridge_config(BridgeConfig::new(config.engine().queue_depth()))
        .build()
        .context("starting gateway")?;

    match cli.command {
        Command::Tools => println!("{}", gateway.catalog()),
        Command::Call { tool, args } => {
            let args: ToolArgs = args.into_iter().collect();
            println!("{}", gateway.call(&tool, &args));
        }
        Command::Serve => {
            info!(server = config.server_name(), "serving on stdio");
            serve(&gateway, io::stdin().lock(), io::stdout().lock())
                .context("host loop failed")?;
        }
    }

    Ok(())
}
