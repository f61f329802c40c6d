mod cli;
mod commands;
mod literal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use rlinda::{Node, NodeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rlinda=warn"));
  tracing_subscriber::fmt().with_env_filter(env_filter).init();

  let cli_args = Cli::parse();

  let config = NodeConfig {
    // The monitor wants every frame on the bus, not just reply traffic.
    subscribe_all: matches!(cli_args.command, Commands::Monitor),
    ..NodeConfig::default()
  };
  let node = Node::connect(&cli_args.ip, config).await?;

  // The node is terminated on every exit path, including command errors.
  let result = commands::linda::run(&node, cli_args.command).await;
  node.terminate().await;
  result
}
