use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Reads a type definitions file as UTF-8 text.
pub fn read_type_defs(file_path: &Path) -> Result<String, TypeDefsReadError> {
    if !file_path.is_file() {
        return Err(TypeDefsReadError::NotAFile(file_path.to_path_buf()));
    }
    std::fs::read_to_string(file_path).map_err(|err| match err.kind() {
        ErrorKind::InvalidData => TypeDefsReadError::NotUtf8(file_path.to_path_buf()),
        kind => TypeDefsReadError::Io {
            file_path: file_path.to_path_buf(),
            kind,
            message: err.to_string(),
        },
    })
}

/// The I/O error is kept as kind plus message so the error compares by
/// value.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TypeDefsReadError {
    #[error("Unable to read {file_path:?}: {message}")]
    Io {
        file_path: PathBuf,
        kind: ErrorKind,
        message: String,
    },

    #[error("{0:?} is not a file")]
    NotAFile(PathBuf),

    #[error("{0:?} is not valid UTF-8")]
    NotUtf8(PathBuf),
}
