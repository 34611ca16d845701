use anyhow::Context;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::schema_args::SchemaArgs;
use libgraphcypher::execution::GraphQLRequest;
use libgraphcypher::execution::RequestContext;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct TranslateCmd {
    #[command(flatten)]
    schema: SchemaArgs,

    #[arg(
        help="JWT claims (a JSON object) the operation runs with.",
        long,
    )]
    jwt: Option<String>,

    #[arg(
        help="File holding the GraphQL operation document.",
        long,
    )]
    operation: PathBuf,

    #[arg(
        help="Operation to translate when the document holds several.",
        long,
    )]
    operation_name: Option<String>,

    #[arg(
        help="GraphQL files or directories holding the type definitions.",
        long="schema",
        required=true,
        value_delimiter=',',
    )]
    schema_paths: Vec<PathBuf>,

    #[arg(
        help="Variables (a JSON object) for the operation.",
        long,
    )]
    variables: Option<String>,
}
impl TranslateCmd {
    fn parse_json_arg(flag: &str, value: Option<&str>) -> anyhow::Result<Option<JsonValue>> {
        let Some(value) = value else {
            return Ok(None);
        };
        let parsed: JsonValue = serde_json::from_str(value)
            .with_context(|| format!("parsing `--{flag}`"))?;
        if !parsed.is_object() {
            anyhow::bail!("`--{flag}` must be a JSON object");
        }
        Ok(Some(parsed))
    }

    fn translate(&self, cli: &Cli) -> anyhow::Result<String> {
        let (_, engine) = self.schema.engine(cli, &self.schema_paths)?;
        let query = std::fs::read_to_string(&self.operation)
            .with_context(|| format!("reading operation file {}", self.operation.display()))?;

        let mut request = GraphQLRequest::new(query);
        if let Some(name) = &self.operation_name {
            request = request.with_operation_name(name.as_str());
        }
        if let Some(variables) = Self::parse_json_arg("variables", self.variables.as_deref())? {
            request = request.with_variables(variables);
        }
        let context = match Self::parse_json_arg("jwt", self.jwt.as_deref())? {
            Some(claims) => RequestContext::with_jwt(claims),
            None => RequestContext::anonymous(),
        };

        let statements = engine.translate(&request, &context).map_err(|err| match err.code() {
            Some(code) => anyhow::anyhow!("{} ({code})", err.message),
            None => anyhow::anyhow!("{}", err.message),
        })?;
        log::debug!("Translated {} root fields.", statements.len());

        let mut rendered = vec![];
        for statement in &statements {
            let params = serde_json::to_string_pretty(&statement.params_json())?;
            rendered.push(format!("{}\n\n// params\n{params}", statement.cypher));
        }
        Ok(rendered.join("\n\n---\n\n"))
    }
}

#[inherent::inherent]
impl RunnableCommand for TranslateCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        self.translate(&cli).into()
    }
}
