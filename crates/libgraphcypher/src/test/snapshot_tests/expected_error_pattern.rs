use std::path::Path;

const CONTAINS_PREFIX: &str = "# EXPECTED_ERROR_CONTAINS:";

/// A substring the error of a failing fixture must contain, declared as
/// `# EXPECTED_ERROR_CONTAINS: <text>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedErrorPattern(pub String);
impl ExpectedErrorPattern {
    pub fn parse_all(path: &Path) -> Vec<Self> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return vec![];
        };
        content.lines()
            .filter_map(|line| line.trim_start().strip_prefix(CONTAINS_PREFIX))
            .map(|pattern| Self(pattern.trim().to_string()))
            .collect()
    }

    /// Every pattern matches `error`; with no patterns any error passes.
    pub fn all_match(patterns: &[Self], error: &str) -> bool {
        patterns.iter().all(|pattern| error.contains(pattern.0.as_str()))
    }
}
impl std::fmt::Display for ExpectedErrorPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR_CONTAINS: {}", self.0)
    }
}
