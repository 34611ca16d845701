use anyhow::Context;
use libgraphcypher::GraphCypher;
use libgraphcypher::GraphCypherBuilder;
use libgraphcypher::execution::EngineConfig;
use libgraphcypher::schema::CallbackError;
use libgraphcypher::schema::CallbackOutcome;
use libgraphcypher::schema::CallbackRegistry;
use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Type definition files found under the paths given on the command line.
#[derive(Debug, Default)]
pub(crate) struct SchemaFiles {
    pub file_paths: Vec<PathBuf>,
    pub num_skipped_files: usize,
}
impl SchemaFiles {
    /// Walks every path recursively, keeping files whose extension is one
    /// of `exts`. A single file argument is kept whatever its extension.
    pub fn find(paths: &[PathBuf], exts: &[String]) -> anyhow::Result<Self> {
        let exts: HashSet<String> = exts.iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        log::debug!("Scanning {} input paths...", paths.len());
        let mut found = Self::default();
        for path in paths {
            for entry in WalkDir::new(path.as_path()).follow_links(true) {
                let entry = entry.with_context(|| format!("scanning {}", path.display()))?;
                let entry_path = entry.path();
                if !entry.file_type().is_file() {
                    log::trace!("Skipping non-file: {entry_path:#?}.");
                    continue;
                }
                let matches = entry_path.extension()
                    .map(|ext| exts.contains(&*ext.to_string_lossy()))
                    .unwrap_or(false);
                if matches {
                    log::trace!("Found file at {entry_path:#?}.");
                    found.file_paths.push(std::fs::canonicalize(entry_path)?);
                } else {
                    found.num_skipped_files += 1;
                }
            }
        }

        if found.file_paths.is_empty()
            && let [single] = paths
            && single.is_file() {
            log::warn!(
                "Proceeding with {single:#?} even though it doesn't match any \
                of the expected extensions ({}).",
                exts.iter().map(|ext| format!("`.{ext}`")).collect::<Vec<_>>().join(", "),
            );
            found.file_paths.push(std::fs::canonicalize(single)?);
            found.num_skipped_files = 0;
        }

        if found.file_paths.is_empty() {
            anyhow::bail!("no GraphQL files found under the given paths");
        }
        log::debug!("Found {} GraphQL files.", found.file_paths.len());
        Ok(found)
    }

    /// Builds an engine over the found files. `@populatedBy` callbacks named
    /// in `callbacks` are registered as no-ops so their fields validate.
    pub fn engine(&self, callbacks: &[String], config: EngineConfig) -> anyhow::Result<GraphCypher> {
        let mut registry = CallbackRegistry::new();
        for name in callbacks {
            registry.register_fn(name.clone(), |_, _| async { Ok::<_, CallbackError>(CallbackOutcome::Unset) });
        }
        let builder: GraphCypherBuilder = GraphCypher::builder()
            .type_defs_files(&self.file_paths)?
            .callbacks(registry)
            .config(config);
        Ok(builder.build()?)
    }
}
