use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::schema_args::SchemaArgs;
use crate::output_utils::GREEN_CHECK;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct ValidateCmd {
    #[command(flatten)]
    schema: SchemaArgs,

    #[arg(
        help="Paths to one or more GraphQL files or directories containing \
             GraphQL files which need to be validated.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}
impl ValidateCmd {
    fn validate(&self, cli: &Cli) -> anyhow::Result<String> {
        let (files, engine) = self.schema.engine(cli, &self.file_or_dir_paths)?;
        let model = engine.model();
        let num_relationships: usize = model.concrete_entities().values()
            .map(|entity| entity.relationships().len())
            .sum();

        Ok(format!(
            concat!(
                "{} All type definitions validated successfully:\n",
                "  * Analyzed {} files.\n",
                "  * Skipped {} non-graphql files.\n",
                "  * Compiled {} node types and {} abstract types.\n",
                "  * Compiled {} relationship fields.\n",
                "  * Generated {} GraphQL types.",
            ),
            GREEN_CHECK,
            files.file_paths.len(),
            files.num_skipped_files,
            model.concrete_entities().len(),
            model.composites().len(),
            num_relationships,
            engine.surface().types().len(),
        ))
    }
}

#[inherent::inherent]
impl RunnableCommand for ValidateCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        self.validate(&cli).into()
    }
}
