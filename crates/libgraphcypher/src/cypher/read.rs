use crate::authorization::AuthorizationOperation;
use crate::cypher::emitter::Emitter;
use crate::cypher::emitter::Result;
use crate::cypher::emitter::union_subquery;
use crate::cypher::emitter::subquery;
use crate::cypher::escape_label;
use crate::cypher::predicate_render::where_clause;
use crate::cypher::RenderScope;
use crate::operation::FieldSelection;
use crate::schema::Attribute;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::Relationship;
use crate::translate::Predicate;
use crate::translate::ReadOptions;
use crate::translate::Scope;
use crate::translate::SortField;
use crate::translate::TranslateError;
use crate::translate::read_options;
use crate::translate::where_translator::NodeScope;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Where the nodes of one read level come from.
#[derive(Clone, Copy)]
pub(crate) enum Origin<'r> {
    Root,
    Hop {
        edge: &'r str,
        rel: &'r Relationship,
        source: &'r str,
    },
}

/// Key under which an abstract branch carries a sort value up to the
/// ordering that follows the `UNION`.
pub(crate) fn sort_key(sort: &SortField) -> String {
    let scope = match sort.scope {
        Scope::Node => "node",
        Scope::Edge => "edge",
    };
    format!("__sort_{scope}_{}", sort.field_name)
}

/// How one member read orders its rows.
pub(crate) enum Ordering<'o> {
    /// Order and page in place; single-member reads.
    Inline(&'o ReadOptions),
    /// Carry sort values as `__sort_*` entries of the projection.
    Carried(&'o [SortField]),
}

impl Emitter<'_> {
    /// `[WITH src] MATCH <pattern>` for one member of a read.
    pub(crate) fn match_clauses(&self, origin: Origin<'_>, member: &ConcreteEntity, node: &str) -> Vec<String> {
        let target = format!("{node}{}", member.label_string());
        match origin {
            Origin::Root => vec![format!("MATCH ({target})")],
            Origin::Hop { edge, rel, source } => vec![
                format!("WITH {source}"),
                format!(
                    "MATCH {}",
                    rel.direction().pattern(source, &format!("{edge}:{}", escape_label(rel.rel_type())), &target),
                ),
            ],
        }
    }

    /// Reads options of a list of `target`: its own `<T>Options` for nodes
    /// and interfaces, `QueryOptions` for unions.
    pub(crate) fn target_options(&self, target: &EntityRef, value: Option<&JsonValue>) -> Result<ReadOptions> {
        let value = value.unwrap_or(&JsonValue::Null);
        let no_attributes = IndexMap::<String, Attribute>::new();
        match target {
            EntityRef::Concrete(name) => {
                let entity = self.model.concrete(name).ok_or_else(|| unknown_entity(name))?;
                read_options(name, entity.attributes(), value, self.limit_policy(entity.limit()))
            },
            EntityRef::Interface(name) => {
                let composite = self.model.composite(name).ok_or_else(|| unknown_entity(name))?;
                read_options(name, composite.attributes(), value, self.limit_policy(composite.limit()))
            },
            EntityRef::Union(name) => {
                let composite = self.model.composite(name).ok_or_else(|| unknown_entity(name))?;
                read_options("Query", &no_attributes, value, self.limit_policy(composite.limit()))
            },
        }
    }

    pub(crate) fn target_where(&self, target: &EntityRef, value: Option<&JsonValue>) -> Result<Predicate> {
        let scope = NodeScope::resolve(self.model, target)?;
        self.where_translator().node_where(scope, value.unwrap_or(&JsonValue::Null))
    }

    /// Clauses matching, filtering, authorizing and ordering one member,
    /// plus the projection of its node.
    pub(crate) fn read_member(
        &mut self,
        member: &ConcreteEntity,
        origin: Origin<'_>,
        node: &str,
        where_: &Predicate,
        fields: &[&FieldSelection],
        ordering: Ordering<'_>,
        discriminate: bool,
    ) -> Result<(Vec<String>, String)> {
        let auth = self.read_auth(member, fields, AuthorizationOperation::Read)?;
        let mut clauses = self.match_clauses(origin, member, node);

        let scope = RenderScope::node(node);
        let filter = self.render(where_, scope);
        let auth_filter = self.render(&auth.filter, scope);
        let filter = where_clause(&[&filter, &auth_filter]);
        if !filter.is_empty() {
            clauses.push(filter.trim_start().to_string());
        }
        if let Some(validate) = self.validate_clause(&auth.validate, scope) {
            clauses.push(validate);
        }

        let mut extra = vec![];
        match ordering {
            Ordering::Inline(options) => {
                let mut order_by = vec![];
                for sort in &options.sort {
                    let expr = self.sort_expr(member, node, None, sort, &mut clauses)?;
                    order_by.push((expr, sort.descending));
                }
                let page = self.page_clause(&order_by, options);
                if !page.is_empty() {
                    clauses.push(format!("WITH * {page}"));
                }
            },
            Ordering::Carried(sort) => for sort in sort {
                let expr = self.sort_expr(member, node, None, sort, &mut clauses)?;
                extra.push(format!("{}: {expr}", sort_key(sort)));
            },
        }

        let projection = self.project_node(member, node, fields, discriminate, extra)?;
        clauses.extend(projection.calls);
        Ok((clauses, projection.map))
    }

    /// `ts` and union/interface list reads at the root.
    pub(crate) fn top_level_read(&mut self, target: &EntityRef, field: &FieldSelection) -> Result<Vec<String>> {
        let where_ = self.target_where(target, field.argument("where"))?;
        let options = self.target_options(target, field.argument("options"))?;
        let model = self.model;
        let members = model.concrete_members(target);

        if let EntityRef::Concrete(_) = target {
            let [entity] = members.as_slice() else {
                return Err(unknown_entity(target.name()));
            };
            let fields = self.fields_for(field, entity.name());
            let (mut clauses, map) = self.read_member(
                entity,
                Origin::Root,
                "this",
                &where_,
                &fields,
                Ordering::Inline(&options),
                false,
            )?;
            clauses.push(format!("RETURN {map} AS this"));
            return Ok(clauses);
        }

        let mut branches = vec![];
        for member in members {
            let node = self.env.node_var();
            let fields = self.fields_for(field, member.name());
            let (mut clauses, map) = self.read_member(
                member,
                Origin::Root,
                &node,
                &where_,
                &fields,
                Ordering::Carried(&options.sort),
                true,
            )?;
            clauses.push(format!("WITH {map} AS this"));
            clauses.push("RETURN this".to_string());
            branches.push(clauses);
        }
        if branches.is_empty() {
            return Err(unknown_entity(target.name()));
        }

        let mut clauses = vec![union_subquery(&branches)];
        let page = self.carried_page("this", &options);
        if !page.is_empty() {
            clauses.push(format!("WITH this {page}"));
        }
        clauses.push("RETURN this".to_string());
        Ok(clauses)
    }

    /// Orders rows of `var` by the sort values carried out of a `UNION`.
    pub(crate) fn carried_page(&mut self, var: &str, options: &ReadOptions) -> String {
        let order_by = options.sort.iter()
            .map(|sort| (format!("{var}.{}", sort_key(sort)), sort.descending))
            .collect::<Vec<_>>();
        self.page_clause(&order_by, options)
    }

    /// `CALL { ... }` reading relationship field `rel` of the node bound to
    /// `source`; returns the call and the variable holding its value.
    pub(crate) fn relationship_read(
        &mut self,
        rel: &Relationship,
        source: &str,
        field: &FieldSelection,
    ) -> Result<(String, String)> {
        let var = self.env.var();
        let where_ = self.target_where(rel.target(), field.argument("where"))?;
        let options = if rel.is_list() {
            self.target_options(rel.target(), field.argument("options"))?
        } else {
            ReadOptions::default()
        };
        let collect = |value: &str| if rel.is_list() {
            format!("collect({value})")
        } else {
            format!("head(collect({value}))")
        };
        let model = self.model;
        let members = model.concrete_members(rel.target());
        let origin = Origin::Hop { edge: "", rel, source };

        if let (EntityRef::Concrete(_), [entity]) = (rel.target(), members.as_slice()) {
            let node = self.env.node_var();
            let fields = self.fields_for(field, entity.name());
            let (mut clauses, map) = self.read_member(
                entity,
                origin,
                &node,
                &where_,
                &fields,
                Ordering::Inline(&options),
                false,
            )?;
            clauses.push(format!("WITH {map} AS {node}"));
            clauses.push(format!("RETURN {} AS {var}", collect(&node)));
            return Ok((subquery(&clauses), var));
        }

        let value = self.env.var();
        let mut branches = vec![];
        for member in members {
            let node = self.env.node_var();
            let fields = self.fields_for(field, member.name());
            let (mut clauses, map) = self.read_member(
                member,
                origin,
                &node,
                &where_,
                &fields,
                Ordering::Carried(&options.sort),
                true,
            )?;
            clauses.push(format!("WITH {map} AS {value}"));
            clauses.push(format!("RETURN {value}"));
            branches.push(clauses);
        }
        if branches.is_empty() {
            return Err(unknown_entity(rel.target().name()));
        }

        let mut clauses = vec![format!("WITH {source}"), union_subquery(&branches)];
        let page = self.carried_page(&value, &options);
        clauses.push(if page.is_empty() {
            format!("WITH {value}")
        } else {
            format!("WITH {value} {page}")
        });
        clauses.push(format!("RETURN {} AS {var}", collect(&value)));
        Ok((subquery(&clauses), var))
    }
}

pub(crate) fn unknown_entity(name: &str) -> TranslateError {
    TranslateError::Internal {
        message: format!("unknown entity `{name}`"),
    }
}
