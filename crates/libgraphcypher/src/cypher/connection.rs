use crate::authorization::AuthorizationOperation;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::emitter::map_literal;
use crate::cypher::emitter::subquery;
use crate::cypher::emitter::union_subquery;
use crate::cypher::predicate_render::where_clause;
use crate::cypher::read::Origin;
use crate::cypher::read::sort_key;
use crate::cypher::read::unknown_entity;
use crate::operation::FieldSelection;
use crate::schema::EntityRef;
use crate::schema::Relationship;
use crate::schema::RelationshipProperties;
use crate::schema::naming;
use crate::translate::Predicate;
use crate::translate::ReadOptions;
use crate::translate::Scope;
use crate::translate::SortField;
use crate::translate::TranslateError;
use crate::translate::connection_window;
use crate::translate::sort_fields;
use serde_json::Value as JsonValue;

/// One connection level: the root `tsConnection` field or a
/// `<rel>Connection` field.
struct ConnectionLevel<'c> {
    origin: Origin<'c>,
    props: Option<&'c RelationshipProperties>,
    target: &'c EntityRef,
    where_: Predicate,
}

impl Emitter<'_> {
    /// Selections under `edges { node { ... } }`, merged across every
    /// `edges` and `node` selection, for values of `type_name`.
    fn edge_children<'f>(&self, field: &'f FieldSelection, child: &str, type_name: &str) -> Vec<&'f FieldSelection> {
        let mut fields: Vec<&FieldSelection> = vec![];
        for edges in field.children("edges") {
            for selection in edges.children(child) {
                for nested in self.fields_for(selection, type_name) {
                    if !fields.iter().any(|existing| existing.response_key() == nested.response_key()) {
                        fields.push(nested);
                    }
                }
            }
        }
        fields
    }

    fn selects_edge_child(field: &FieldSelection, child: &str) -> bool {
        field.children("edges").any(|edges| edges.child(child).is_some())
    }

    /// `sort` of a relationship connection: `[{ node: <T>Sort, edge: <P>Sort }]`.
    fn relationship_sort(
        &self,
        rel: &Relationship,
        props: Option<&RelationshipProperties>,
        value: Option<&JsonValue>,
    ) -> Result<Vec<SortField>> {
        let Some(value) = value else {
            return Ok(vec![]);
        };
        let items = match value {
            JsonValue::Array(items) => items.iter().collect::<Vec<_>>(),
            single => vec![single],
        };
        let target = rel.target();
        let target_attributes = match target {
            EntityRef::Concrete(name) => self.model.concrete(name).map(|entity| entity.attributes()),
            EntityRef::Interface(name) => self.model.composite(name).map(|composite| composite.attributes()),
            EntityRef::Union(_) => None,
        };
        let type_name = format!("{}ConnectionSort", naming::relationship_prefix(rel.source(), rel.field_name()));

        let mut sort = vec![];
        for item in items {
            let entries = item.as_object().ok_or_else(|| TranslateError::shape(type_name.as_str(), item))?;
            for (key, value) in entries {
                match (key.as_str(), target_attributes, props) {
                    ("node", Some(attributes), _) =>
                        sort.extend(sort_fields(&format!("{}Sort", target.name()), attributes, Scope::Node, value)?),
                    ("edge", _, Some(props)) =>
                        sort.extend(sort_fields(&format!("{}Sort", props.name()), props.attributes(), Scope::Edge, value)?),
                    _ => return Err(TranslateError::unknown_field(key, type_name.as_str())),
                }
            }
        }
        Ok(sort)
    }

    /// The root `tsConnection` field of a node or interface.
    pub(crate) fn top_level_connection(&mut self, target: &EntityRef, field: &FieldSelection) -> Result<Vec<String>> {
        let where_ = self.target_where(target, field.argument("where"))?;
        let model = self.model;
        let (attributes, limit) = match target {
            EntityRef::Concrete(name) => {
                let entity = model.concrete(name).ok_or_else(|| unknown_entity(name))?;
                (entity.attributes(), entity.limit())
            },
            EntityRef::Interface(name) | EntityRef::Union(name) => {
                let composite = model.composite(name).ok_or_else(|| unknown_entity(name))?;
                (composite.attributes(), composite.limit())
            },
        };
        let mut window = connection_window(field.argument("first"), field.argument("after"), self.limit_policy(limit))?;
        if let Some(sort) = field.argument("sort") {
            window.sort = sort_fields(&format!("{}Sort", target.name()), attributes, Scope::Node, sort)?;
        }

        let level = ConnectionLevel {
            origin: Origin::Root,
            props: None,
            target,
            where_,
        };
        let (mut clauses, map) = self.connection_body(&level, field, &window)?;
        clauses.push(format!("RETURN {map} AS this"));
        Ok(clauses)
    }

    /// `CALL { ... }` computing `<rel>Connection` for the node bound to
    /// `source`; returns the call and the variable holding its value.
    pub(crate) fn relationship_connection(
        &mut self,
        rel: &Relationship,
        source: &str,
        field: &FieldSelection,
    ) -> Result<(String, String)> {
        let model = self.model;
        let props = rel.properties().and_then(|name| model.relationship_properties(name));
        let where_ = match field.argument("where") {
            Some(value) => self.where_translator().connection_where(rel, value)?,
            None => Predicate::True,
        };
        let limit = match rel.target() {
            EntityRef::Concrete(name) => model.concrete(name).and_then(|entity| entity.limit()),
            other => model.composite(other.name()).and_then(|composite| composite.limit()),
        };
        let mut window = connection_window(field.argument("first"), field.argument("after"), self.limit_policy(limit))?;
        window.sort = self.relationship_sort(rel, props, field.argument("sort"))?;

        let edge = self.env.var();
        let level = ConnectionLevel {
            origin: Origin::Hop { edge: &edge, rel, source },
            props,
            target: rel.target(),
            where_,
        };
        let (mut clauses, map) = self.connection_body(&level, field, &window)?;
        let var = self.env.var();
        clauses.insert(0, format!("WITH {source}"));
        clauses.push(format!("RETURN {map} AS {var}"));
        Ok((subquery(&clauses), var))
    }

    /// Matches every edge of the level, then counts and pages them. Returns
    /// the clauses and the `{ edges, totalCount }` map expression.
    fn connection_body(
        &mut self,
        level: &ConnectionLevel<'_>,
        field: &FieldSelection,
        window: &ReadOptions,
    ) -> Result<(Vec<String>, String)> {
        let model = self.model;
        let members = model.concrete_members(level.target);
        let edge_var = self.env.var();
        let discriminate = !level.target.is_concrete();
        let edge_scope = match level.origin {
            Origin::Hop { edge, .. } => Some(edge),
            Origin::Root => None,
        };

        let mut branches = vec![];
        for member in members {
            let node = self.env.node_var();
            let node_fields = self.edge_children(field, "node", member.name());
            let auth = self.read_auth(member, &node_fields, AuthorizationOperation::Read)?;
            let mut clauses = self.match_clauses(level.origin, member, &node);

            let scope = Self::scope(&node, edge_scope);
            let filter = self.render(&level.where_, scope);
            let auth_filter = self.render(&auth.filter, scope);
            let filter = where_clause(&[&filter, &auth_filter]);
            if !filter.is_empty() {
                clauses.push(filter.trim_start().to_string());
            }
            if let Some(validate) = self.validate_clause(&auth.validate, scope) {
                clauses.push(validate);
            }

            let mut entries = vec![];
            if Self::selects_edge_child(field, "node") {
                let projection = self.project_node(member, &node, &node_fields, discriminate, vec![])?;
                clauses.extend(projection.calls);
                entries.push(("node".to_string(), projection.map));
            }
            if let (Some(props), Some(edge)) = (level.props, edge_scope) {
                if Self::selects_edge_child(field, "properties") {
                    let mut property_fields: Vec<&FieldSelection> = vec![];
                    for edges in field.children("edges") {
                        for properties in edges.children("properties") {
                            for selection in properties.all_fields() {
                                if !property_fields.iter().any(|existing| existing.response_key() == selection.response_key()) {
                                    property_fields.push(selection);
                                }
                            }
                        }
                    }
                    entries.push(("properties".to_string(), self.project_properties(props, edge, &property_fields)?));
                }
            }
            for sort in &window.sort {
                let expr = self.sort_expr(member, &node, edge_scope, sort, &mut clauses)?;
                entries.push((sort_key(sort), expr));
            }
            clauses.push(format!("WITH {} AS {edge_var}", map_literal(&entries)));
            clauses.push(format!("RETURN {edge_var}"));
            branches.push(clauses);
        }
        if branches.is_empty() {
            return Err(unknown_entity(level.target.name()));
        }

        let edges_var = self.env.var();
        let total_var = self.env.var();
        let page_var = self.env.var();
        let mut page_clauses = vec![
            format!("WITH {edges_var}"),
            format!("UNWIND {edges_var} AS {edge_var}"),
        ];
        let order_by = window.sort.iter()
            .map(|sort| (format!("{edge_var}.{}", sort_key(sort)), sort.descending))
            .collect::<Vec<_>>();
        let page = self.page_clause(&order_by, window);
        page_clauses.push(if page.is_empty() {
            format!("WITH {edge_var}")
        } else {
            format!("WITH {edge_var} {page}")
        });
        page_clauses.push(format!("RETURN collect({edge_var}) AS {page_var}"));

        let clauses = vec![
            union_subquery(&branches),
            format!("WITH collect({edge_var}) AS {edges_var}"),
            format!("WITH {edges_var}, size({edges_var}) AS {total_var}"),
            subquery(&page_clauses),
        ];
        let map = map_literal(&[
            ("edges".to_string(), page_var),
            ("totalCount".to_string(), total_var),
        ]);
        Ok((clauses, map))
    }
}
