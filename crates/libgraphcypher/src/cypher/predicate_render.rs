use crate::cypher::CypherEnv;
use crate::cypher::escape_identifier;
use crate::cypher::escape_label;
use crate::schema::CypherAnnotation;
use crate::schema::ScalarKind;
use crate::translate::AggregateCondition;
use crate::translate::AggregateFn;
use crate::translate::CompareOp;
use crate::translate::Predicate;
use crate::translate::Quantifier;
use crate::translate::RelationshipPattern;
use crate::translate::Scope;

/// The variables a predicate is rendered against.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RenderScope<'a> {
    pub(crate) edge: Option<&'a str>,
    pub(crate) node: &'a str,
}
impl<'a> RenderScope<'a> {
    pub(crate) fn node(node: &'a str) -> Self {
        Self { edge: None, node }
    }

    pub(crate) fn with_edge(node: &'a str, edge: &'a str) -> Self {
        Self { edge: Some(edge), node }
    }

    fn var(&self, scope: Scope) -> &'a str {
        match scope {
            Scope::Node => self.node,
            // Edge comparisons outside a relationship context cannot hold.
            Scope::Edge => self.edge.unwrap_or(self.node),
        }
    }
}

/// Renders a predicate as a Cypher boolean expression, binding its values
/// as parameters in `env`.
pub(crate) fn render_predicate(predicate: &Predicate, scope: RenderScope<'_>, env: &mut CypherEnv) -> String {
    match predicate {
        Predicate::True => "true".to_string(),
        Predicate::False => "false".to_string(),
        Predicate::And(parts) => join(parts, " AND ", "true", scope, env),
        Predicate::Or(parts) => join(parts, " OR ", "false", scope, env),
        Predicate::Not(inner) => format!("NOT ({})", render_predicate(inner, scope, env)),
        Predicate::Labels(labels) => labels_expr(scope.node, labels),
        Predicate::IsNull { negated, property, scope: prop_scope } => format!(
            "{}.{} IS {}NULL",
            scope.var(*prop_scope),
            escape_identifier(property),
            if *negated { "NOT " } else { "" },
        ),
        Predicate::Compare(comparison) => {
            if comparison.scope == Scope::Edge && scope.edge.is_none() {
                return "false".to_string();
            }
            let lhs = format!("{}.{}", scope.var(comparison.scope), escape_identifier(&comparison.property));
            let param = env.param(comparison.value.clone());
            let expr = compare_expr(&lhs, comparison.op, &param, &comparison.kind, comparison.list);
            if comparison.negated { format!("NOT ({expr})") } else { expr }
        },
        Predicate::Cypher(comparison) => {
            let lhs = cypher_value_expr(&comparison.annotation, scope.node);
            let param = env.param(comparison.value.clone());
            let expr = compare_expr(&lhs, comparison.op, &param, &comparison.kind, comparison.list);
            if comparison.negated { format!("NOT ({expr})") } else { expr }
        },
        Predicate::Relationship(relationship) => {
            let target = env.node_var();
            let edge = env.var();
            let pattern = match_pattern(scope.node, &edge, &target, &relationship.pattern);
            let labels = target_condition(&target, &relationship.pattern);
            let inner = render_predicate(&relationship.inner, RenderScope::with_edge(&target, &edge), env);
            match relationship.quantifier {
                Quantifier::Some => format!("EXISTS {{ MATCH {pattern}{} }}", where_clause(&[&labels, &inner])),
                Quantifier::None => format!("NOT EXISTS {{ MATCH {pattern}{} }}", where_clause(&[&labels, &inner])),
                Quantifier::Single => format!("COUNT {{ MATCH {pattern}{} }} = 1", where_clause(&[&labels, &inner])),
                Quantifier::All => format!(
                    "(EXISTS {{ MATCH {pattern}{} }} AND NOT EXISTS {{ MATCH {pattern}{} }})",
                    where_clause(&[&labels]),
                    where_clause(&[&labels, &format!("NOT ({inner})")]),
                ),
            }
        },
        Predicate::Aggregate(aggregate) => {
            let target = env.node_var();
            let edge = env.var();
            let pattern = match_pattern(scope.node, &edge, &target, &aggregate.pattern);
            let labels = target_condition(&target, &aggregate.pattern);
            let condition = render_aggregate(&aggregate.condition, RenderScope::with_edge(&target, &edge), env);
            format!(
                "head(COLLECT {{ MATCH {pattern}{} RETURN ({condition}) }})",
                where_clause(&[&labels]),
            )
        },
    }
}

fn join(parts: &[Predicate], separator: &str, empty: &str, scope: RenderScope<'_>, env: &mut CypherEnv) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let rendered = parts.iter()
        .map(|part| render_predicate(part, scope, env))
        .collect::<Vec<_>>();
    format!("({})", rendered.join(separator))
}

/// `(a)-[e:TYPE]->(b)`, with the target label inlined when there is only
/// one candidate entity.
pub(crate) fn match_pattern(source: &str, edge: &str, target: &str, pattern: &RelationshipPattern) -> String {
    let target_node = match pattern.target_labels.as_slice() {
        [labels] => format!("{target}{labels}"),
        _ => target.to_string(),
    };
    pattern.direction.pattern(
        source,
        &format!("{edge}:{}", escape_label(&pattern.rel_type)),
        &target_node,
    )
}

/// Label condition on the target of a pattern; empty when the labels are
/// already part of the pattern.
pub(crate) fn target_condition(target: &str, pattern: &RelationshipPattern) -> String {
    match pattern.target_labels.as_slice() {
        [_] => String::new(),
        labels => labels_expr(target, labels),
    }
}

pub(crate) fn labels_expr(var: &str, labels: &[String]) -> String {
    match labels {
        [] => "false".to_string(),
        [single] => format!("{var}{single}"),
        many => format!(
            "({})",
            many.iter().map(|labels| format!("{var}{labels}")).collect::<Vec<_>>().join(" OR "),
        ),
    }
}

/// ` WHERE a AND b` over the non-empty, non-trivial conditions.
pub(crate) fn where_clause(conditions: &[&str]) -> String {
    let kept = conditions.iter()
        .filter(|condition| !condition.is_empty() && **condition != "true")
        .copied()
        .collect::<Vec<_>>();
    if kept.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", kept.join(" AND "))
    }
}

/// `CALL { WITH <node> WITH <node> AS this <statement> }`, the body shared by
/// every place a `@cypher` field is materialised.
pub(crate) fn cypher_call(annotation: &CypherAnnotation, node: &str) -> String {
    format!("CALL {{ WITH {node} WITH {node} AS this {} }}", annotation.statement().trim())
}

fn cypher_value_expr(annotation: &CypherAnnotation, node: &str) -> String {
    format!(
        "head(COLLECT {{ {} RETURN {} }})",
        cypher_call(annotation, node),
        escape_identifier(annotation.column_name()),
    )
}

fn compare_expr(lhs: &str, op: CompareOp, param: &str, kind: &ScalarKind, list: bool) -> String {
    let spatial = kind.is_spatial() && !list;
    match op {
        CompareOp::Equal => format!("{lhs} = {param}"),
        CompareOp::In => format!("{lhs} IN {param}"),
        CompareOp::Includes => format!("{param} IN {lhs}"),
        CompareOp::Contains => format!("{lhs} CONTAINS {param}"),
        CompareOp::StartsWith => format!("{lhs} STARTS WITH {param}"),
        CompareOp::EndsWith => format!("{lhs} ENDS WITH {param}"),
        CompareOp::Matches => format!("{lhs} =~ {param}"),
        CompareOp::Distance => format!("point.distance({lhs}, {param}.point) = {param}.distance"),
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            let symbol = ordering_symbol(op);
            if spatial {
                format!("point.distance({lhs}, {param}.point) {symbol} {param}.distance")
            } else if kind == &ScalarKind::Duration {
                // Durations only order once anchored to an instant.
                format!("datetime() + {lhs} {symbol} datetime() + {param}")
            } else {
                format!("{lhs} {symbol} {param}")
            }
        },
    }
}

fn ordering_symbol(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Lt => "<",
        CompareOp::Lte => "<=",
        CompareOp::Gt => ">",
        CompareOp::Gte => ">=",
        _ => "=",
    }
}

fn render_aggregate(condition: &AggregateCondition, scope: RenderScope<'_>, env: &mut CypherEnv) -> String {
    let join_conditions = |parts: &[AggregateCondition], separator: &str, empty: &str, env: &mut CypherEnv| {
        if parts.is_empty() {
            return empty.to_string();
        }
        let rendered = parts.iter()
            .map(|part| render_aggregate(part, scope, env))
            .collect::<Vec<_>>();
        format!("({})", rendered.join(separator))
    };
    match condition {
        AggregateCondition::And(parts) => join_conditions(parts, " AND ", "true", env),
        AggregateCondition::Or(parts) => join_conditions(parts, " OR ", "false", env),
        AggregateCondition::Not(inner) => format!("NOT ({})", render_aggregate(inner, scope, env)),
        AggregateCondition::Count { op, value } => {
            let param = env.param(value.clone());
            format!("count({}) {} {param}", scope.node, ordering_symbol(*op))
        },
        AggregateCondition::Function { function, op, property, scope: prop_scope, value } => {
            let property = format!("{}.{}", scope.var(*prop_scope), escape_identifier(property));
            let aggregated = match function {
                AggregateFn::Average => format!("avg({property})"),
                AggregateFn::AverageLength => format!("avg(size({property}))"),
                AggregateFn::LongestLength => format!("max(size({property}))"),
                AggregateFn::Max => format!("max({property})"),
                AggregateFn::Min => format!("min({property})"),
                AggregateFn::ShortestLength => format!("min(size({property}))"),
                AggregateFn::Sum => format!("sum({property})"),
            };
            let param = env.param(value.clone());
            format!("{aggregated} {} {param}", ordering_symbol(*op))
        },
    }
}
