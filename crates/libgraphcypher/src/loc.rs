use std::path::Path;
use std::path::PathBuf;

/// A line/column in a type definitions source. Sources loaded from strings
/// are named `str://<n>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilePosition {
    pub col: usize,
    pub file: PathBuf,
    pub line: usize,
}
impl FilePosition {
    pub(crate) fn new(file: &Path, pos: graphql_parser::Pos) -> Self {
        Self {
            col: pos.column,
            file: file.to_path_buf(),
            line: pos.line,
        }
    }
}
impl std::fmt::Display for FilePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.col)
    }
}
