use crate::cypher::StatementKind;

/// The kind of transaction a statement needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}
impl AccessMode {
    pub fn for_statement(kind: StatementKind) -> Self {
        if kind.is_write() {
            Self::Write
        } else {
            Self::Read
        }
    }
}
