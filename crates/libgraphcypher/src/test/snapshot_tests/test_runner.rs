use crate::execution::GraphCypher;
use crate::execution::GraphQLRequest;
use crate::execution::RequestContext;
use crate::test::snapshot_tests::ExpectedErrorPattern;
use crate::test::snapshot_tests::snapshot_test_case::OperationSnapshotTestCase;
use crate::test::snapshot_tests::snapshot_test_case::SnapshotTestCase;
use rayon::prelude::IntoParallelRefIterator;
use rayon::prelude::ParallelIterator;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug)]
pub struct SnapshotTestResult {
    pub error_message: Option<String>,
    pub file_path: PathBuf,
    pub passed: bool,
    pub test_name: String,
}
impl SnapshotTestResult {
    fn pass(test_name: String, file_path: &Path) -> Self {
        Self {
            error_message: None,
            file_path: file_path.to_path_buf(),
            passed: true,
            test_name,
        }
    }

    fn fail(test_name: String, file_path: &Path, message: String) -> Self {
        Self {
            error_message: Some(message),
            file_path: file_path.to_path_buf(),
            passed: false,
            test_name,
        }
    }
}

#[derive(Debug, Default)]
pub struct SnapshotTestResults {
    pub results: Vec<SnapshotTestResult>,
}
impl SnapshotTestResults {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|result| result.passed)
    }

    pub fn failure_report(&self) -> String {
        let failures = self.results.iter().filter(|result| !result.passed).collect::<Vec<_>>();
        let details = failures.iter()
            .map(|result| format!(
                "❌ {}\n   File: {}\n   {}",
                result.test_name,
                result.file_path.display(),
                result.error_message.as_deref().unwrap_or("error"),
            ))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("{} of {} snapshot tests failed:\n\n{details}", failures.len(), self.results.len())
    }

    pub fn summary(&self) -> String {
        let total = self.results.len();
        let failed = self.results.iter().filter(|result| !result.passed).count();
        let emoji = if failed == 0 { "✅" } else { "❌" };
        let banner = format!("{emoji} ========================================");
        format!(
            "{banner}\n{emoji} SNAPSHOT TEST SUMMARY\n{banner}\nTotal tests: {total}\nPassed: {}\nFailed: {failed}\n{banner}",
            total - failed,
        )
    }
}

fn build_engine(test_case: &SnapshotTestCase) -> Result<GraphCypher, String> {
    GraphCypher::builder()
        .type_defs_files(&test_case.schema_paths)
        .and_then(|builder| builder.build())
        .map_err(|err| err.to_string())
}

pub fn run_schema_tests(fixtures_dir: &Path) -> SnapshotTestResults {
    let results = SnapshotTestCase::discover_all(fixtures_dir)
        .par_iter()
        .map(test_schema)
        .collect();
    SnapshotTestResults { results }
}

fn test_schema(test_case: &SnapshotTestCase) -> SnapshotTestResult {
    let test_name = format!("{}/schema", test_case.name);
    let file_path = test_case.schema_paths.first().cloned().unwrap_or_default();
    match (build_engine(test_case), test_case.schema_valid) {
        (Ok(_), true) => SnapshotTestResult::pass(test_name, &file_path),
        (Err(err), true) => SnapshotTestResult::fail(
            test_name,
            &file_path,
            format!("Expected: Valid schema\nGot: {err}"),
        ),
        (Ok(_), false) => SnapshotTestResult::fail(
            test_name,
            &file_path,
            "Expected: Should fail to build\nGot: Schema built successfully".to_string(),
        ),
        (Err(err), false) if ExpectedErrorPattern::all_match(&test_case.schema_expected_errors, &err) =>
            SnapshotTestResult::pass(test_name, &file_path),
        (Err(err), false) => SnapshotTestResult::fail(
            test_name,
            &file_path,
            format!(
                "Expected: {}\nGot: {err}",
                test_case.schema_expected_errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            ),
        ),
    }
}

pub fn run_operation_tests(fixtures_dir: &Path) -> SnapshotTestResults {
    let cases = SnapshotTestCase::discover_all(fixtures_dir)
        .into_iter()
        .filter(|test_case| test_case.schema_valid)
        .collect::<Vec<_>>();
    let results = cases.par_iter()
        .flat_map_iter(|test_case| {
            let engine = build_engine(test_case);
            let valid = test_case.valid_operations.iter().map(|op| (op, true));
            let invalid = test_case.invalid_operations.iter().map(|op| (op, false));
            valid.chain(invalid)
                .map(|(operation, expect_ok)| match &engine {
                    Ok(engine) => test_operation(engine, &test_case.name, operation, expect_ok),
                    Err(err) => SnapshotTestResult::fail(
                        format!("{}/{}", test_case.name, operation.name()),
                        &operation.path,
                        format!("Schema failed to build: {err}"),
                    ),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    SnapshotTestResults { results }
}

/// Translates a query or mutation, or starts a subscription.
fn run_operation(engine: &GraphCypher, source: &str) -> Result<(), String> {
    let request = GraphQLRequest::new(source);
    let context = RequestContext::anonymous();
    let is_subscription = source.lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .is_some_and(|line| line.starts_with("subscription"));
    if is_subscription {
        return engine.subscribe(&request, &context)
            .map(|_| ())
            .map_err(|response| response.error_messages().join("\n"));
    }
    engine.translate(&request, &context)
        .map(|_| ())
        .map_err(|error| error.message)
}

fn test_operation(
    engine: &GraphCypher,
    suite: &str,
    operation: &OperationSnapshotTestCase,
    expect_ok: bool,
) -> SnapshotTestResult {
    let test_name = format!("{suite}/{}", operation.name());
    let source = match std::fs::read_to_string(&operation.path) {
        Ok(source) => source,
        Err(err) => return SnapshotTestResult::fail(test_name, &operation.path, err.to_string()),
    };
    match (run_operation(engine, &source), expect_ok) {
        (Ok(()), true) => SnapshotTestResult::pass(test_name, &operation.path),
        (Err(err), true) => SnapshotTestResult::fail(
            test_name,
            &operation.path,
            format!("Expected: Valid operation\nGot: {err}"),
        ),
        (Ok(()), false) => SnapshotTestResult::fail(
            test_name,
            &operation.path,
            "Expected: Should fail\nGot: Operation translated successfully".to_string(),
        ),
        (Err(err), false) if ExpectedErrorPattern::all_match(&operation.expected_errors, &err) =>
            SnapshotTestResult::pass(test_name, &operation.path),
        (Err(err), false) => SnapshotTestResult::fail(
            test_name,
            &operation.path,
            format!(
                "Expected: {}\nGot: {err}",
                operation.expected_errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            ),
        ),
    }
}
