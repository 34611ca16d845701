//! Cypher emission.
//!
//! One [`CypherStatement`] is produced per root field. Variable and
//! parameter names come from a single [`CypherEnv`] per statement so the
//! output is deterministic for a given operation.

mod aggregate;
mod connection;
mod create;
mod cypher_env;
mod cypher_statement;
mod delete;
mod emitter;
mod nested_mutation;
mod predicate_render;
mod projection;
mod read;
mod statement_builder;
mod update;

pub use cypher_env::CypherEnv;
pub use cypher_statement::CypherStatement;
pub use cypher_statement::StatementKind;
pub(crate) use predicate_render::render_predicate;
pub(crate) use predicate_render::RenderScope;
pub(crate) use projection::RESOLVE_TYPE_KEY;
pub use statement_builder::StatementBuilder;

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quotes a property or variable name with backticks when it is not a plain
/// identifier.
pub fn escape_identifier(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// Quotes a node label or relationship type with backticks when needed.
pub fn escape_label(label: &str) -> String {
    escape_identifier(label)
}

/// Renders a double-quoted string literal for values that are
/// known at schema build time, such as type names and error messages.
pub(crate) fn string_literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests;
