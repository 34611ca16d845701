//! File-based snapshot tests: every schema under `fixtures/valid_schemas/`
//! must build and every operation next to it must translate (or fail the
//! way its `# EXPECTED_ERROR_CONTAINS:` lines say); every schema under
//! `fixtures/invalid_schemas/` must fail to build.

mod expected_error_pattern;
mod snapshot_test_case;
mod test_runner;
mod utils;

pub use expected_error_pattern::ExpectedErrorPattern;

#[cfg(test)]
mod tests {
    use crate::test::snapshot_tests::test_runner;
    use crate::test::snapshot_tests::test_runner::SnapshotTestResults;
    use crate::test::snapshot_tests::utils;

    fn assert_all_passed(suite: &str, results: SnapshotTestResults) {
        eprintln!("{suite}: {}", results.summary());
        assert!(
            results.all_passed(),
            "{suite} snapshot tests failed:\n{}",
            results.failure_report(),
        );
    }

    #[test]
    fn schema_fixtures() {
        assert_all_passed("schema", test_runner::run_schema_tests(utils::get_fixtures_dir()));
    }

    #[test]
    fn operation_fixtures() {
        assert_all_passed("operation", test_runner::run_operation_tests(utils::get_fixtures_dir()));
    }
}
