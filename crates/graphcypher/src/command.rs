use crate::Cli;
use crate::CommandResult;

/// A subcommand; `cli` carries the global options.
pub(crate) trait RunnableCommand: std::fmt::Debug {
    async fn run(self, cli: Cli) -> CommandResult;
}
