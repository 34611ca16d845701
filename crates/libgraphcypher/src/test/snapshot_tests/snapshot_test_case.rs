use crate::test::snapshot_tests::ExpectedErrorPattern;
use crate::test::snapshot_tests::utils;
use std::path::Path;
use std::path::PathBuf;

/// One operation fixture.
#[derive(Clone, Debug)]
pub struct OperationSnapshotTestCase {
    pub expected_errors: Vec<ExpectedErrorPattern>,
    pub path: PathBuf,
}
impl OperationSnapshotTestCase {
    fn discover(dir: &Path) -> Vec<Self> {
        utils::graphql_files(dir).into_iter()
            .map(|path| Self {
                expected_errors: ExpectedErrorPattern::parse_all(&path),
                path,
            })
            .collect()
    }

    pub fn name(&self) -> String {
        self.path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("<unnamed>")
            .to_string()
    }
}

/// A schema fixture (one or more files) and the operations written
/// against it.
#[derive(Clone, Debug)]
pub struct SnapshotTestCase {
    pub invalid_operations: Vec<OperationSnapshotTestCase>,
    pub name: String,
    pub schema_expected_errors: Vec<ExpectedErrorPattern>,
    pub schema_paths: Vec<PathBuf>,
    pub schema_valid: bool,
    pub valid_operations: Vec<OperationSnapshotTestCase>,
}
impl SnapshotTestCase {
    pub fn discover_all(fixtures_dir: &Path) -> Vec<Self> {
        let mut cases = Self::discover_valid_schemas(fixtures_dir);
        cases.extend(Self::discover_invalid_schemas(fixtures_dir));
        cases
    }

    /// Each directory of `valid_schemas/` is a suite: its `.graphql` files
    /// form the schema, `valid_operations/` and `invalid_operations/` hold
    /// the operations.
    fn discover_valid_schemas(fixtures_dir: &Path) -> Vec<Self> {
        let Ok(entries) = std::fs::read_dir(fixtures_dir.join("valid_schemas")) else {
            return vec![];
        };
        let mut suites = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                if !path.is_dir() {
                    eprintln!("ERROR: Unexpected file in valid_schemas/: {}", path.display());
                }
                path.is_dir()
            })
            .collect::<Vec<_>>();
        suites.sort();

        suites.into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let schema_paths = utils::graphql_files(&path);
                if schema_paths.is_empty() {
                    eprintln!("ERROR: No schema files in {}", path.display());
                    return None;
                }
                Some(Self {
                    invalid_operations: OperationSnapshotTestCase::discover(&path.join("invalid_operations")),
                    name,
                    schema_expected_errors: vec![],
                    schema_paths,
                    schema_valid: true,
                    valid_operations: OperationSnapshotTestCase::discover(&path.join("valid_operations")),
                })
            })
            .collect()
    }

    /// Each file of `invalid_schemas/` is a schema that must not build.
    fn discover_invalid_schemas(fixtures_dir: &Path) -> Vec<Self> {
        utils::graphql_files(&fixtures_dir.join("invalid_schemas")).into_iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_str()?.to_string();
                Some(Self {
                    invalid_operations: vec![],
                    name,
                    schema_expected_errors: ExpectedErrorPattern::parse_all(&path),
                    schema_paths: vec![path],
                    schema_valid: false,
                    valid_operations: vec![],
                })
            })
            .collect()
    }
}
