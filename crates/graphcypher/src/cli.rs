use anyhow::Context;
use clap::CommandFactory;
use crate::commands;
use libgraphcypher::execution::EngineConfig;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "graphcypher", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        global=true,
        help="Path to a JSON file with engine settings (`max_limit`, `jwt`, \
             `subscriptions`, `event_buffer`).",
        long,
    )]
    pub config: Option<PathBuf>,

    #[arg(
        help="Enable verbose output.",
        long,
        short='v',
    )]
    pub verbose: bool,
}
impl Cli {
    pub(crate) async fn run_default(self) -> anyhow::Result<()> {
        Self::command().print_help()?;
        Ok(())
    }

    /// Settings from `--config`, or the defaults.
    pub(crate) fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let Some(path) = &self.config else {
            return Ok(EngineConfig::default());
        };
        log::debug!("Loading engine settings from {path:#?}.");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
