use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::schema_args::SchemaArgs;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct ConstraintsCmd {
    #[command(flatten)]
    schema: SchemaArgs,

    #[arg(
        help="GraphQL files or directories holding the type definitions.",
        long="schema",
        required=true,
        value_delimiter=',',
    )]
    schema_paths: Vec<PathBuf>,
}
impl ConstraintsCmd {
    fn constraints(&self, cli: &Cli) -> anyhow::Result<String> {
        let (_, engine) = self.schema.engine(cli, &self.schema_paths)?;
        let statements = engine.model().constraint_statements();
        log::debug!("{} constraint statements.", statements.len());
        if statements.is_empty() {
            return Ok("// No uniqueness constraints.".to_string());
        }
        Ok(format!("{};", statements.join(";\n")))
    }
}

#[inherent::inherent]
impl RunnableCommand for ConstraintsCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        self.constraints(&cli).into()
    }
}
