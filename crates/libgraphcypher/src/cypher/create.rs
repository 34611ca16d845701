use crate::authorization::AuthorizationOperation;
use crate::authorization::AuthorizationPhase;
use crate::authorization::PhaseTracker;
use crate::cypher::RenderScope;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::emitter::subquery;
use crate::cypher::string_literal;
use crate::operation::FieldSelection;
use crate::schema::ConcreteEntity;
use crate::schema::naming::EntityNames;
use crate::translate::TranslateError;
use crate::translate::mutation_input::MutationReader;
use serde_json::Value as JsonValue;

/// The `{ event, typename, ... }` map a write statement collects into its
/// `__events` column.
pub(crate) fn event_map(event: &str, entity: &ConcreteEntity, entries: &[(&str, String)]) -> String {
    let mut parts = vec![
        format!("event: {}", string_literal(event)),
        format!("typename: {}", string_literal(entity.name())),
    ];
    parts.extend(entries.iter().map(|(key, value)| format!("{key}: {value}")));
    parts.push("timestamp: timestamp()".to_string());
    format!("{{ {} }}", parts.join(", "))
}

impl Emitter<'_> {
    /// Projection of the written nodes selected on a mutation response
    /// (`<plural> { ... }`), behind the READ validation of those nodes.
    /// Returns the clauses to run first and the map expression.
    pub(crate) fn response_projection(
        &mut self,
        entity: &ConcreteEntity,
        field: &FieldSelection,
        response_type: &str,
        node: &str,
    ) -> Result<(Vec<String>, String)> {
        let nodes_field = EntityNames::new(entity.name(), entity.plural()).response_nodes_field();
        let mut fields: Vec<&FieldSelection> = vec![];
        for selection in self.fields_for(field, response_type) {
            if selection.name() != nodes_field {
                continue;
            }
            for child in self.fields_for(selection, entity.name()) {
                if !fields.iter().any(|existing| existing.response_key() == child.response_key()) {
                    fields.push(child);
                }
            }
        }

        let auth = self.read_auth(entity, &fields, AuthorizationOperation::Read)?;
        let mut clauses = vec![];
        clauses.extend(self.validate_clause(&auth.validate, RenderScope::node(node)));
        let projection = self.project_node(entity, node, &fields, false, vec![])?;
        clauses.extend(projection.calls);
        Ok((clauses, projection.map))
    }

    /// `create<Plural>(input: [...])`: one `CALL` per input item, then the
    /// created nodes are projected together.
    pub(crate) fn top_level_create(&mut self, entity: &ConcreteEntity, field: &FieldSelection) -> Result<Vec<String>> {
        let model = self.model;
        let names = EntityNames::new(entity.name(), entity.plural());
        let input = field.argument("input").ok_or_else(|| TranslateError::MissingRequiredField {
            field_name: "input".to_string(),
            field_type: format!("[{}CreateInput!]!", entity.name()),
            type_name: names.create_field(),
        })?;
        let items = match input {
            JsonValue::Array(items) => items.iter().collect::<Vec<_>>(),
            single => vec![single],
        };
        if items.is_empty() {
            return Ok(vec!["RETURN [] AS data, [] AS __events".to_string()]);
        }

        let mut phases = PhaseTracker::new();
        phases.advance(AuthorizationPhase::Write)?;
        let reader = MutationReader::new(model);
        let mut clauses = vec![];
        let mut created = vec![];
        for item in items {
            let create = reader.create_node(entity, item)?;
            let node = self.env.node_var();
            let mut body = self.create_node_clauses(&create, &node)?;
            body.push(format!("RETURN {node}"));
            clauses.push(subquery(&body));
            created.push(node);
        }

        phases.advance(AuthorizationPhase::PostValidate)?;
        clauses.push(format!("UNWIND [{}] AS this", created.join(", ")));
        let (response, map) = self.response_projection(entity, field, &names.create_response_type(), "this")?;
        clauses.extend(response);

        phases.advance(AuthorizationPhase::Response)?;
        clauses.push(format!(
            "RETURN collect({map}) AS data, collect({}) AS __events",
            event_map("create", entity, &[("new", "this { .* }".to_string())]),
        ));
        Ok(clauses)
    }
}
