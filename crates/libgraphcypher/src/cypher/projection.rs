use crate::authorization::AuthorizationOperation;
use crate::authorization::RuleEvaluator;
use crate::authorization::ValidationTiming;
use crate::cypher::RenderScope;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::escape_identifier;
use crate::cypher::string_literal;
use crate::operation::FieldSelection;
use crate::schema::ConcreteEntity;
use crate::schema::RelationshipProperties;
use crate::translate::Predicate;
use crate::translate::TranslateError;

/// Discriminator key carried by the projection of every abstract-typed
/// value.
pub(crate) const RESOLVE_TYPE_KEY: &str = "__resolveType";

/// The subqueries a node projection depends on and the map projection
/// itself.
#[derive(Debug, Default)]
pub(crate) struct Projection {
    pub(crate) calls: Vec<String>,
    pub(crate) map: String,
}

/// Authorization applied where a node is matched for reading.
pub(crate) struct ReadAuth {
    pub(crate) filter: Predicate,
    pub(crate) validate: Predicate,
}

impl Emitter<'_> {
    /// Authenticates and resolves the READ rules in force for `entity`
    /// given the fields selected on it.
    pub(crate) fn read_auth(
        &self,
        entity: &ConcreteEntity,
        fields: &[&FieldSelection],
        operation: AuthorizationOperation,
    ) -> Result<ReadAuth> {
        self.auth.authenticate(entity, operation)?;
        let annotations = RuleEvaluator::annotations(entity, fields.iter().map(|field| field.name()));
        Ok(ReadAuth {
            filter: self.auth.filter(entity, &annotations, operation)?,
            validate: self.auth.validate(entity, &annotations, operation, ValidationTiming::After)?,
        })
    }

    /// Projects the selected `fields` of the node bound to `node`.
    /// `discriminate` adds the `__resolveType` entry; `extra` entries are
    /// appended verbatim (sort keys).
    pub(crate) fn project_node(
        &mut self,
        entity: &ConcreteEntity,
        node: &str,
        fields: &[&FieldSelection],
        discriminate: bool,
        extra: Vec<String>,
    ) -> Result<Projection> {
        let mut calls = vec![];
        let mut entries = vec![];
        if discriminate {
            entries.push(format!("{RESOLVE_TYPE_KEY}: {}", string_literal(entity.name())));
        }

        for field in fields {
            let key = escape_identifier(field.response_key());
            let name = field.name();
            if name == "__typename" {
                continue;
            }
            if let Some(attr) = entity.attribute(name) {
                match attr.cypher() {
                    Some(annotation) => {
                        let var = self.env.var();
                        calls.push(self.cypher_field_call(annotation, node, attr.attr_type().is_list(), &var));
                        entries.push(format!("{key}: {var}"));
                    },
                    None if field.response_key() == attr.db_name() =>
                        entries.push(format!(".{}", escape_identifier(attr.db_name()))),
                    None => entries.push(format!("{key}: {node}.{}", escape_identifier(attr.db_name()))),
                }
                continue;
            }
            if let Some(rel) = entity.relationship(name) {
                let (call, var) = self.relationship_read(rel, node, field)?;
                calls.push(call);
                entries.push(format!("{key}: {var}"));
                continue;
            }
            if let Some(rel) = name.strip_suffix("Connection").and_then(|base| entity.relationship(base)) {
                let (call, var) = self.relationship_connection(rel, node, field)?;
                calls.push(call);
                entries.push(format!("{key}: {var}"));
                continue;
            }
            let aggregated = name.strip_suffix("Aggregate")
                .and_then(|base| entity.relationship(base))
                .filter(|rel| rel.aggregate());
            if let Some(rel) = aggregated {
                let (aggregate_calls, map) = self.relationship_aggregate(rel, node, field)?;
                calls.extend(aggregate_calls);
                entries.push(format!("{key}: {map}"));
                continue;
            }
            return Err(TranslateError::unknown_field(name, entity.name()));
        }

        entries.extend(extra);
        if entries.is_empty() {
            entries.push(format!("{RESOLVE_TYPE_KEY}: {}", string_literal(entity.name())));
        }
        Ok(Projection {
            calls,
            map: format!("{node} {{ {} }}", entries.join(", ")),
        })
    }

    /// Projects the selected fields of relationship properties bound to
    /// `edge`.
    pub(crate) fn project_properties(
        &self,
        props: &RelationshipProperties,
        edge: &str,
        fields: &[&FieldSelection],
    ) -> Result<String> {
        let mut entries = vec![];
        for field in fields {
            if field.name() == "__typename" {
                continue;
            }
            let attr = props.attribute(field.name())
                .ok_or_else(|| TranslateError::unknown_field(field.name(), props.name()))?;
            if field.response_key() == attr.db_name() {
                entries.push(format!(".{}", escape_identifier(attr.db_name())));
            } else {
                entries.push(format!(
                    "{}: {edge}.{}",
                    escape_identifier(field.response_key()),
                    escape_identifier(attr.db_name()),
                ));
            }
        }
        Ok(format!("{edge} {{ {} }}", entries.join(", ")))
    }

    /// Render scope helper for a node with an optional edge.
    pub(crate) fn scope<'s>(node: &'s str, edge: Option<&'s str>) -> RenderScope<'s> {
        match edge {
            Some(edge) => RenderScope::with_edge(node, edge),
            None => RenderScope::node(node),
        }
    }
}
