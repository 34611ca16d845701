use crate::Cli;
use crate::schema_files::SchemaFiles;
use libgraphcypher::GraphCypher;
use std::path::PathBuf;

/// Options shared by every command that compiles type definitions.
#[derive(Debug, clap::Args)]
pub(crate) struct SchemaArgs {
    #[arg(
        help="Names of `@populatedBy` callbacks the host provides.",
        long="callback",
        value_delimiter=',',
    )]
    pub callbacks: Vec<String>,

    #[arg(
        default_values_t=[
            "graphql".to_string(),
            "graphqls".to_string(),
        ],
        help="Set of file extensions to filter to when searching for files \
             within a directory.",
        long,
        value_delimiter=',',
    )]
    pub graphql_file_exts: Vec<String>,
}
impl SchemaArgs {
    pub fn engine(&self, cli: &Cli, paths: &[PathBuf]) -> anyhow::Result<(SchemaFiles, GraphCypher)> {
        let files = SchemaFiles::find(paths, &self.graphql_file_exts)?;
        let engine = files.engine(&self.callbacks, cli.engine_config()?)?;
        Ok((files, engine))
    }
}
