use crate::authorization::RuleEvaluator;
use crate::cypher::CypherEnv;
use crate::cypher::RenderScope;
use crate::cypher::escape_identifier;
use crate::cypher::predicate_render;
use crate::cypher::render_predicate;
use crate::cypher::string_literal;
use crate::operation::FieldSelection;
use crate::schema::ConcreteEntity;
use crate::schema::CypherAnnotation;
use crate::schema::LimitAnnotation;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedSchema;
use crate::translate::LimitPolicy;
use crate::translate::Predicate;
use crate::translate::ReadOptions;
use crate::translate::Scope;
use crate::translate::SortField;
use crate::translate::TranslateError;
use crate::translate::where_translator::JwtBinding;
use crate::translate::where_translator::WhereTranslator;
use crate::value::DbValue;

pub(crate) type Result<T> = std::result::Result<T, TranslateError>;

/// State shared by every part of one statement's emission.
pub(crate) struct Emitter<'a> {
    pub(crate) auth: RuleEvaluator<'a>,
    pub(crate) env: CypherEnv,
    pub(crate) max_limit: Option<u64>,
    pub(crate) model: &'a SchemaModel,
    pub(crate) surface: &'a GeneratedSchema,
}
impl<'a> Emitter<'a> {
    pub(crate) fn where_translator(&self) -> WhereTranslator<'a> {
        WhereTranslator::new(self.model, JwtBinding::Literal)
    }

    pub(crate) fn limit_policy(&self, annotation: Option<&LimitAnnotation>) -> LimitPolicy {
        LimitPolicy::new(annotation, self.max_limit)
    }

    pub(crate) fn render(&mut self, predicate: &Predicate, scope: RenderScope<'_>) -> String {
        render_predicate(predicate, scope, &mut self.env)
    }

    /// `WITH * CALL apoc.util.validate(...)` raising `Forbidden` unless the
    /// predicate holds; `None` when it trivially holds.
    pub(crate) fn validate_clause(&mut self, predicate: &Predicate, scope: RenderScope<'_>) -> Option<String> {
        self.validate_all(&[(predicate, scope)])
    }

    /// One validation over several predicates, each rendered against its
    /// own scope.
    pub(crate) fn validate_all(&mut self, checks: &[(&Predicate, RenderScope<'_>)]) -> Option<String> {
        let conditions = checks.iter()
            .filter(|(predicate, _)| !predicate.is_true())
            .map(|(predicate, scope)| self.render(predicate, *scope))
            .collect::<Vec<_>>();
        if conditions.is_empty() {
            return None;
        }
        Some(validate_call(&conditions.join(" AND "), "Forbidden"))
    }

    /// Sub-selections of `field` that apply to values of `type_name`, with
    /// repeated response keys dropped.
    pub(crate) fn fields_for<'f>(&self, field: &'f FieldSelection, type_name: &str) -> Vec<&'f FieldSelection> {
        let surface = self.surface;
        let mut fields: Vec<&FieldSelection> = vec![];
        for child in field.fields_for(type_name, |condition, concrete| surface.type_applies(condition, concrete)) {
            if !fields.iter().any(|existing| existing.response_key() == child.response_key()) {
                fields.push(child);
            }
        }
        fields
    }

    /// `CALL { WITH n CALL { ... } WITH <col> AS v RETURN head(collect(v)) AS <var> }`
    pub(crate) fn cypher_field_call(&mut self, annotation: &CypherAnnotation, node: &str, list: bool, var: &str) -> String {
        let value = self.env.var();
        let collected = if list {
            format!("collect({value})")
        } else {
            format!("head(collect({value}))")
        };
        subquery(&[
            format!("WITH {node}"),
            predicate_render::cypher_call(annotation, node),
            format!("WITH {} AS {value}", escape_identifier(annotation.column_name())),
            format!("RETURN {collected} AS {var}"),
        ])
    }

    /// Expression a sort field orders by; `@cypher` fields are materialised
    /// into `calls` first.
    pub(crate) fn sort_expr(
        &mut self,
        entity: &ConcreteEntity,
        node: &str,
        edge: Option<&str>,
        sort: &SortField,
        calls: &mut Vec<String>,
    ) -> Result<String> {
        let var = match (sort.scope, edge) {
            (Scope::Edge, Some(edge)) => edge,
            _ => node,
        };
        if let Some(db_name) = &sort.db_name {
            return Ok(format!("{var}.{}", escape_identifier(db_name)));
        }
        let annotation = entity.attribute(&sort.field_name)
            .and_then(|attr| attr.cypher())
            .ok_or_else(|| TranslateError::unknown_field(&sort.field_name, format!("{}Sort", entity.name())))?;
        let value = self.env.var();
        calls.push(self.cypher_field_call(annotation, node, false, &value));
        Ok(value)
    }

    /// `ORDER BY ... SKIP ... LIMIT ...` over already computed expressions.
    pub(crate) fn page_clause(&mut self, order_by: &[(String, bool)], options: &ReadOptions) -> String {
        let mut clause = String::new();
        if !order_by.is_empty() {
            let keys = order_by.iter()
                .map(|(expr, descending)| format!("{expr} {}", if *descending { "DESC" } else { "ASC" }))
                .collect::<Vec<_>>();
            clause.push_str(&format!("ORDER BY {}", keys.join(", ")));
        }
        if let Some(offset) = options.offset {
            let param = self.env.param(DbValue::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));
            clause.push_str(&format!("{}SKIP {param}", if clause.is_empty() { "" } else { " " }));
        }
        if let Some(limit) = options.limit {
            let param = self.env.param(DbValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            clause.push_str(&format!("{}LIMIT {param}", if clause.is_empty() { "" } else { " " }));
        }
        clause
    }
}

/// `WITH * CALL apoc.util.validate(NOT (<condition>), "<message>", [0])`.
pub(crate) fn validate_call(condition: &str, message: &str) -> String {
    format!(
        "WITH *\nCALL apoc.util.validate(NOT ({condition}), {}, [0])",
        string_literal(message),
    )
}

/// Renders `CALL { ... }` around the given clauses.
pub(crate) fn subquery(clauses: &[String]) -> String {
    let body = clauses.iter()
        .flat_map(|clause| clause.lines())
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("CALL {{\n{body}\n}}")
}

/// Renders `CALL { <a> UNION <b> ... }`.
pub(crate) fn union_subquery(branches: &[Vec<String>]) -> String {
    let mut clauses = vec![];
    for (idx, branch) in branches.iter().enumerate() {
        if idx > 0 {
            clauses.push("UNION".to_string());
        }
        clauses.extend(branch.iter().cloned());
    }
    subquery(&clauses)
}

/// A map literal `{ a: x, b: y }`.
pub(crate) fn map_literal(entries: &[(String, String)]) -> String {
    let entries = entries.iter()
        .map(|(key, value)| format!("{}: {value}", escape_identifier(key)))
        .collect::<Vec<_>>();
    format!("{{ {} }}", entries.join(", "))
}
