use crate::authorization::AuthorizationOperation;
use crate::authorization::RuleEvaluator;
use crate::authorization::ValidationTiming;
use crate::cypher::RenderScope;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::emitter::map_literal;
use crate::cypher::emitter::subquery;
use crate::cypher::escape_identifier;
use crate::cypher::escape_label;
use crate::cypher::predicate_render::labels_expr;
use crate::cypher::predicate_render::where_clause;
use crate::cypher::read::unknown_entity;
use crate::operation::FieldSelection;
use crate::schema::Attribute;
use crate::schema::EntityRef;
use crate::schema::Relationship;
use crate::schema::ScalarKind;
use crate::schema::naming;
use crate::translate::Predicate;
use crate::translate::TranslateError;
use crate::translate::where_translator::NodeScope;
use indexmap::IndexMap;

/// `RETURN` of one attribute aggregation over rows binding `var`.
fn attribute_aggregation(var: &str, attr: &Attribute, out: &str) -> Vec<String> {
    let property = format!("{var}.{}", escape_identifier(attr.db_name()));
    match attr.attr_type().kind() {
        ScalarKind::ID | ScalarKind::String => {
            let list = format!("{out}_list");
            vec![
                format!("WITH {var} ORDER BY size({property}) DESC"),
                format!("WITH collect({property}) AS {list}"),
                format!("RETURN {{ longest: head({list}), shortest: last({list}) }} AS {out}"),
            ]
        },
        ScalarKind::BigInt => vec![format!(
            "RETURN {{ min: min({property}), max: max({property}), average: {{ sum: sum({property}), count: count({property}) }}, sum: sum({property}) }} AS {out}",
        )],
        kind if kind.is_numeric() => vec![format!(
            "RETURN {{ min: min({property}), max: max({property}), average: avg({property}), sum: sum({property}) }} AS {out}",
        )],
        _ => vec![format!("RETURN {{ min: min({property}), max: max({property}) }} AS {out}")],
    }
}

/// Selected sub-fields of an aggregation selection, one per field name.
fn distinct_by_name<'f>(selections: impl Iterator<Item = &'f FieldSelection>) -> Vec<&'f FieldSelection> {
    let mut fields: Vec<&FieldSelection> = vec![];
    for selection in selections {
        if !fields.iter().any(|existing| existing.name() == selection.name()) {
            fields.push(selection);
        }
    }
    fields
}

impl Emitter<'_> {
    /// One `CALL` per selected aggregation, each repeating `base` (the
    /// match, filter and validation of the aggregated rows). Returns the
    /// calls and the entries of the resulting map.
    fn aggregation_calls(
        &mut self,
        base: &[String],
        var: &str,
        attributes: &IndexMap<String, Attribute>,
        selections: &[&FieldSelection],
        type_name: &str,
    ) -> Result<(Vec<String>, Vec<(String, String)>)> {
        let mut calls = vec![];
        let mut entries = vec![];
        for selection in selections {
            if selection.name() == "__typename" {
                continue;
            }
            let out = self.env.var();
            let mut clauses = base.to_vec();
            if selection.name() == "count" {
                clauses.push(format!("RETURN count({var}) AS {out}"));
            } else {
                let attr = attributes.get(selection.name())
                    .filter(|attr| !attr.attr_type().is_list() && !attr.is_computed())
                    .ok_or_else(|| TranslateError::unknown_field(selection.name(), type_name))?;
                clauses.extend(attribute_aggregation(var, attr, &out));
            }
            calls.push(subquery(&clauses));
            entries.push((selection.name().to_string(), out));
        }
        Ok((calls, entries))
    }

    /// The root `tsAggregate` field of a node or interface.
    pub(crate) fn top_level_aggregate(&mut self, target: &EntityRef, field: &FieldSelection) -> Result<Vec<String>> {
        let where_ = self.target_where(target, field.argument("where"))?;
        let model = self.model;
        let selections = distinct_by_name(field.all_fields());
        let node = "this";
        let scope = RenderScope::node(node);

        let (match_clause, labels, attributes, filter, validate) = match target {
            EntityRef::Concrete(name) => {
                let entity = model.concrete(name).ok_or_else(|| unknown_entity(name))?;
                self.auth.authenticate(entity, AuthorizationOperation::Aggregate)?;
                let annotations = RuleEvaluator::annotations(entity, selections.iter().map(|field| field.name()));
                (
                    format!("MATCH ({node}{})", entity.label_string()),
                    String::new(),
                    entity.attributes(),
                    self.auth.filter(entity, &annotations, AuthorizationOperation::Aggregate)?,
                    self.auth.validate(entity, &annotations, AuthorizationOperation::Aggregate, ValidationTiming::After)?,
                )
            },
            EntityRef::Interface(name) | EntityRef::Union(name) => {
                let composite = model.composite(name).ok_or_else(|| unknown_entity(name))?;
                let members = model.concrete_members(target);
                for member in &members {
                    self.auth.authenticate(member, AuthorizationOperation::Aggregate)?;
                }
                let member_scope = NodeScope::resolve(model, target)?;
                let labels = members.iter().map(|member| member.label_string()).collect::<Vec<_>>();
                (
                    format!("MATCH ({node})"),
                    labels_expr(node, &labels),
                    composite.attributes(),
                    self.auth.scope_filter(member_scope, AuthorizationOperation::Aggregate)?,
                    self.auth.scope_validate(member_scope, AuthorizationOperation::Aggregate, ValidationTiming::After)?,
                )
            },
        };
        let type_name = format!("{}AggregateSelection", target.name());

        let mut base = vec![match_clause];
        let rendered_where = self.render(&Predicate::and([where_, filter]), scope);
        let conditions = where_clause(&[&labels, &rendered_where]);
        if !conditions.is_empty() {
            base.push(conditions.trim_start().to_string());
        }
        if let Some(validate) = self.validate_clause(&validate, scope) {
            base.push(validate);
        }

        let (mut clauses, entries) = self.aggregation_calls(&base, node, attributes, &selections, &type_name)?;
        clauses.push(format!("RETURN {} AS this", map_literal(&entries)));
        Ok(clauses)
    }

    /// `<rel>Aggregate` on the node bound to `source`; returns the calls
    /// and the map expression holding the selection.
    pub(crate) fn relationship_aggregate(
        &mut self,
        rel: &Relationship,
        source: &str,
        field: &FieldSelection,
    ) -> Result<(Vec<String>, String)> {
        let model = self.model;
        let target = match rel.target() {
            EntityRef::Concrete(name) => model.concrete(name).ok_or_else(|| unknown_entity(name))?,
            other => return Err(unknown_entity(other.name())),
        };
        let props = rel.properties().and_then(|name| model.relationship_properties(name));
        let where_ = self.target_where(rel.target(), field.argument("where"))?;

        let node_selections = distinct_by_name(field.children("node").flat_map(|node| node.all_fields()));
        self.auth.authenticate(target, AuthorizationOperation::Aggregate)?;
        let annotations = RuleEvaluator::annotations(target, node_selections.iter().map(|field| field.name()));
        let filter = self.auth.filter(target, &annotations, AuthorizationOperation::Aggregate)?;
        let validate = self.auth.validate(target, &annotations, AuthorizationOperation::Aggregate, ValidationTiming::After)?;

        let node = self.env.node_var();
        let edge = self.env.var();
        let scope = RenderScope::with_edge(&node, &edge);
        let mut base = vec![
            format!("WITH {source}"),
            format!(
                "MATCH {}",
                rel.direction().pattern(
                    source,
                    &format!("{edge}:{}", escape_label(rel.rel_type())),
                    &format!("{node}{}", target.label_string()),
                ),
            ),
        ];
        let rendered_where = self.render(&Predicate::and([where_, filter]), scope);
        let conditions = where_clause(&[&rendered_where]);
        if !conditions.is_empty() {
            base.push(conditions.trim_start().to_string());
        }
        if let Some(validate) = self.validate_clause(&validate, scope) {
            base.push(validate);
        }

        let mut calls = vec![];
        let mut entries = vec![];
        let selection_prefix = format!("{}{}{}", rel.source(), target.name(), naming::upper_first(rel.field_name()));
        let type_name = format!("{selection_prefix}AggregationSelection");
        for selection in distinct_by_name(field.all_fields()) {
            match selection.name() {
                "count" => {
                    let (count_calls, count_entries) = self.aggregation_calls(&base, &node, target.attributes(), &[selection], &type_name)?;
                    calls.extend(count_calls);
                    entries.extend(count_entries);
                },
                "node" => {
                    let (node_calls, node_entries) = self.aggregation_calls(
                        &base,
                        &node,
                        target.attributes(),
                        &node_selections,
                        &format!("{selection_prefix}NodeAggregateSelection"),
                    )?;
                    calls.extend(node_calls);
                    entries.push(("node".to_string(), map_literal(&node_entries)));
                },
                "edge" => {
                    let Some(props) = props else {
                        return Err(TranslateError::unknown_field("edge", type_name));
                    };
                    let edge_selections = distinct_by_name(field.children("edge").flat_map(|edge| edge.all_fields()));
                    let (edge_calls, edge_entries) = self.aggregation_calls(
                        &base,
                        &edge,
                        props.attributes(),
                        &edge_selections,
                        &format!("{selection_prefix}EdgeAggregateSelection"),
                    )?;
                    calls.extend(edge_calls);
                    entries.push(("edge".to_string(), map_literal(&edge_entries)));
                },
                "__typename" => (),
                other => return Err(TranslateError::unknown_field(other, type_name)),
            }
        }
        Ok((calls, map_literal(&entries)))
    }
}
