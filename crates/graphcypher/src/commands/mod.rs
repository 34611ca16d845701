mod constraints;
mod schema_args;
mod translate;
mod validate;

use crate::Cli;
use crate::CommandResult;
use constraints::ConstraintsCmd;
use translate::TranslateCmd;
use validate::ValidateCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "graphcypher")]
pub(crate) enum CommandEnum {
    /// Print the uniqueness constraints implied by `@unique` and `@id`.
    Constraints(Box<ConstraintsCmd>),
    /// Print the Cypher each root field of an operation translates to.
    Translate(Box<TranslateCmd>),
    /// Validate type definitions and summarize the compiled schema.
    Validate(Box<ValidateCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Constraints(cmd) => cmd.run(cli).await,
            Self::Translate(cmd) => cmd.run(cli).await,
            Self::Validate(cmd) => cmd.run(cli).await,
        }
    }
}
