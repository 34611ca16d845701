use crate::value::DbValue;
use indexmap::IndexMap;

/// What a statement computes, which decides how the shaper reads its
/// columns and whether it runs in a write transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    /// One row per node, column `this`.
    Read,
    /// One row, column `this` holding `{ edges, totalCount }`.
    Connection,
    /// One row, column `this` holding the aggregate selection.
    Aggregate,
    /// One row with `data` (created nodes) and `__events`.
    Create,
    /// One row with `data` (updated nodes) and `__events`.
    Update,
    /// One row with `__events`; the response comes from counters.
    Delete,
}
impl StatementKind {
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// A parameterized Cypher statement for one root field.
#[derive(Clone, Debug, PartialEq)]
pub struct CypherStatement {
    pub cypher: String,
    pub kind: StatementKind,
    pub params: IndexMap<String, DbValue>,
}
impl CypherStatement {
    /// Parameters as JSON, for logging and the CLI.
    pub fn params_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.params.iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}
