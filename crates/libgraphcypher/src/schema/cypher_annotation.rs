/// `@cypher(statement: "...", columnName: "...")` on a computed field. The
/// statement refers to the owning node as `this`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CypherAnnotation {
    pub(crate) column_name: String,
    pub(crate) statement: String,
}
impl CypherAnnotation {
    pub fn column_name(&self) -> &str {
        self.column_name.as_str()
    }

    pub fn statement(&self) -> &str {
        self.statement.as_str()
    }
}
