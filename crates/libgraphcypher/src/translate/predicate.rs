//! Predicate tree produced from `where` inputs and authorization rules.

use crate::schema::CypherAnnotation;
use crate::schema::Direction;
use crate::schema::ScalarKind;
use crate::translate::AggregateFn;
use crate::translate::CompareOp;
use crate::translate::Quantifier;
use crate::value::DbValue;

/// Which pattern element of the current context a comparison reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Node,
    Edge,
}

/// `<scope>.<property> <op> <value>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub kind: ScalarKind,
    pub list: bool,
    pub negated: bool,
    pub op: CompareOp,
    pub property: String,
    pub scope: Scope,
    pub value: DbValue,
}

/// A comparison against the value of a `@cypher` field, computed for the
/// node in scope.
#[derive(Clone, Debug, PartialEq)]
pub struct CypherComparison {
    pub annotation: CypherAnnotation,
    pub kind: ScalarKind,
    pub list: bool,
    pub negated: bool,
    pub op: CompareOp,
    pub value: DbValue,
}

/// The relationship hop a nested predicate traverses, from the node in
/// scope.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipPattern {
    pub direction: Direction,
    pub rel_type: String,
    /// Label strings (`:A:B`) of the concrete entities the target may be;
    /// more than one for union and interface targets.
    pub target_labels: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipPredicate {
    /// Evaluated with the related node as `Node` scope and the relationship
    /// as `Edge` scope.
    pub inner: Predicate,
    pub pattern: RelationshipPattern,
    pub quantifier: Quantifier,
}

/// Boolean expression over aggregations of related nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum AggregateCondition {
    And(Vec<AggregateCondition>),
    Count { op: CompareOp, value: DbValue },
    Function {
        function: AggregateFn,
        op: CompareOp,
        property: String,
        scope: Scope,
        value: DbValue,
    },
    Not(Box<AggregateCondition>),
    Or(Vec<AggregateCondition>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregatePredicate {
    pub condition: AggregateCondition,
    pub pattern: RelationshipPattern,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    True,
    False,
    Aggregate(Box<AggregatePredicate>),
    And(Vec<Predicate>),
    Compare(Comparison),
    Cypher(CypherComparison),
    /// `<scope>.<property> IS [NOT] NULL`.
    IsNull { negated: bool, property: String, scope: Scope },
    /// The node in scope carries the labels of one of these entities.
    Labels(Vec<String>),
    Not(Box<Predicate>),
    Or(Vec<Predicate>),
    Relationship(Box<RelationshipPredicate>),
}
impl Predicate {
    /// Conjunction with `True` dropped and `False` absorbing.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut parts = vec![];
        for predicate in predicates {
            match predicate {
                Self::True => (),
                Self::False => return Self::False,
                Self::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Self::True,
            1 => parts.remove(0),
            _ => Self::And(parts),
        }
    }

    /// Disjunction with `False` dropped and `True` absorbing.
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut parts = vec![];
        for predicate in predicates {
            match predicate {
                Self::False => (),
                Self::True => return Self::True,
                Self::Or(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Self::False,
            1 => parts.remove(0),
            _ => Self::Or(parts),
        }
    }

    pub fn negate(predicate: Predicate) -> Self {
        match predicate {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Self::False)
    }
}
