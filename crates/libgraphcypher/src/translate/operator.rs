//! Suffix tables of the generated filter inputs.

use crate::schema::AttributeType;
use crate::schema::ScalarKind;

/// A comparison between a property and a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Contains,
    Distance,
    EndsWith,
    Equal,
    Gt,
    Gte,
    In,
    Includes,
    Lt,
    Lte,
    Matches,
    StartsWith,
}
impl CompareOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::Distance => "DISTANCE",
            Self::EndsWith => "ENDS_WITH",
            Self::Equal => "EQUAL",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::In => "IN",
            Self::Includes => "INCLUDES",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::Matches => "MATCHES",
            Self::StartsWith => "STARTS_WITH",
        }
    }
}

/// A parsed `<field><suffix>` filter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterOperator {
    /// Legacy `_NOT*` forms; still accepted, logged as deprecated.
    pub negated: bool,
    pub op: CompareOp,
}

const SUFFIXES: &[(&str, CompareOp, bool)] = &[
    ("_NOT_STARTS_WITH", CompareOp::StartsWith, true),
    ("_NOT_ENDS_WITH", CompareOp::EndsWith, true),
    ("_NOT_CONTAINS", CompareOp::Contains, true),
    ("_NOT_INCLUDES", CompareOp::Includes, true),
    ("_STARTS_WITH", CompareOp::StartsWith, false),
    ("_ENDS_WITH", CompareOp::EndsWith, false),
    ("_CONTAINS", CompareOp::Contains, false),
    ("_INCLUDES", CompareOp::Includes, false),
    ("_DISTANCE", CompareOp::Distance, false),
    ("_MATCHES", CompareOp::Matches, false),
    ("_NOT_IN", CompareOp::In, true),
    ("_EQUAL", CompareOp::Equal, false),
    ("_NOT", CompareOp::Equal, true),
    ("_GTE", CompareOp::Gte, false),
    ("_LTE", CompareOp::Lte, false),
    ("_IN", CompareOp::In, false),
    ("_GT", CompareOp::Gt, false),
    ("_LT", CompareOp::Lt, false),
];

/// Splits a filter key into its field name and operator. Returns every
/// candidate split; the caller picks the one whose field exists (field names
/// may themselves contain underscores).
pub(crate) fn split_filter_key(key: &str) -> Vec<(&str, FilterOperator)> {
    let mut candidates = vec![];
    for (suffix, op, negated) in SUFFIXES {
        if let Some(field) = key.strip_suffix(suffix) {
            if !field.is_empty() {
                candidates.push((field, FilterOperator { negated: *negated, op: *op }));
            }
        }
    }
    candidates.push((key, FilterOperator { negated: false, op: CompareOp::Equal }));
    candidates
}

/// Whether the generated `<T>Where` input offers `op` for attributes of this
/// type.
pub(crate) fn supports(attr_type: &AttributeType, filter: FilterOperator) -> bool {
    let kind = attr_type.kind();
    if attr_type.is_list() {
        return matches!(filter.op, CompareOp::Equal | CompareOp::Includes);
    }
    match filter.op {
        CompareOp::Equal => true,
        CompareOp::In => !kind.is_spatial() || !filter.negated,
        CompareOp::Includes => false,
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte =>
            !filter.negated && (kind.is_comparable() || kind.is_spatial()),
        CompareOp::Distance => !filter.negated && kind.is_spatial(),
        CompareOp::Contains | CompareOp::StartsWith | CompareOp::EndsWith =>
            kind.is_string_like(),
        CompareOp::Matches => !filter.negated && kind == &ScalarKind::String,
    }
}

/// Filter keys generated for an attribute, with the GraphQL input type of
/// each.
pub(crate) fn filter_fields(name: &str, attr_type: &AttributeType) -> Vec<(String, String)> {
    let kind = attr_type.kind();
    let input_name = kind.input_type_name();
    let scalar_input = attr_type.as_nullable().input_type_string();
    let item_input = input_name.to_string();
    let distance_input = match kind {
        ScalarKind::Point => "PointDistance",
        _ => "CartesianPointDistance",
    };

    let mut fields = vec![];
    for (suffix, op, negated) in SUFFIXES.iter().rev() {
        let filter = FilterOperator { negated: *negated, op: *op };
        if !supports(attr_type, filter) {
            continue;
        }
        let input_type = match op {
            CompareOp::Equal => scalar_input.clone(),
            CompareOp::In => format!("[{item_input}!]"),
            CompareOp::Includes => item_input.clone(),
            CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte | CompareOp::Distance
                if kind.is_spatial() => distance_input.to_string(),
            _ => item_input.clone(),
        };
        let key = match (op, negated) {
            (CompareOp::Equal, false) => name.to_string(),
            _ => format!("{name}{suffix}"),
        };
        if fields.iter().any(|(existing, _)| existing == &key) {
            continue;
        }
        fields.push((key, input_type));
    }
    fields.sort();
    fields
}

/// How related nodes must satisfy a relationship filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantifier {
    All,
    None,
    Single,
    Some,
}

pub(crate) const QUANTIFIER_SUFFIXES: &[(&str, Quantifier)] = &[
    ("_SINGLE", Quantifier::Single),
    ("_NONE", Quantifier::None),
    ("_SOME", Quantifier::Some),
    ("_ALL", Quantifier::All),
];

/// Aggregation function of an aggregate filter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFn {
    Average,
    AverageLength,
    LongestLength,
    Max,
    Min,
    ShortestLength,
    Sum,
}
impl AggregateFn {
    pub(crate) fn suffix(&self) -> &'static str {
        match self {
            Self::Average => "_AVERAGE",
            Self::AverageLength => "_AVERAGE_LENGTH",
            Self::LongestLength => "_LONGEST_LENGTH",
            Self::Max => "_MAX",
            Self::Min => "_MIN",
            Self::ShortestLength => "_SHORTEST_LENGTH",
            Self::Sum => "_SUM",
        }
    }

    /// Functions offered for an attribute kind.
    pub(crate) fn for_kind(kind: &ScalarKind) -> &'static [AggregateFn] {
        if kind.is_numeric() {
            &[Self::Average, Self::Sum, Self::Min, Self::Max]
        } else if kind.is_string_like() {
            &[Self::ShortestLength, Self::LongestLength, Self::AverageLength]
        } else if kind.is_temporal() {
            &[Self::Min, Self::Max]
        } else {
            &[]
        }
    }

    /// GraphQL type of the comparison value.
    pub(crate) fn input_type(&self, kind: &ScalarKind) -> String {
        match self {
            Self::Average | Self::AverageLength => "Float".to_string(),
            Self::LongestLength | Self::ShortestLength => "Int".to_string(),
            Self::Max | Self::Min | Self::Sum => kind.graphql_name().to_string(),
        }
    }
}

pub(crate) const AGGREGATE_COMPARATORS: &[(&str, CompareOp)] = &[
    ("_EQUAL", CompareOp::Equal),
    ("_GTE", CompareOp::Gte),
    ("_LTE", CompareOp::Lte),
    ("_GT", CompareOp::Gt),
    ("_LT", CompareOp::Lt),
];

/// Aggregate filter keys of one attribute, with the input type of each.
pub(crate) fn aggregate_filter_fields(name: &str, kind: &ScalarKind) -> Vec<(String, String)> {
    let mut fields = vec![];
    for function in AggregateFn::for_kind(kind) {
        for (comparator, _) in AGGREGATE_COMPARATORS {
            fields.push((
                format!("{name}{}{comparator}", function.suffix()),
                function.input_type(kind),
            ));
        }
    }
    fields
}

/// Splits `<field>_<FN>_<COMPARATOR>` into its parts.
pub(crate) fn split_aggregate_key(key: &str) -> Option<(&str, AggregateFn, CompareOp)> {
    let (rest, comparator) = AGGREGATE_COMPARATORS.iter()
        .find_map(|(suffix, op)| key.strip_suffix(suffix).map(|rest| (rest, *op)))?;
    let functions = [
        AggregateFn::ShortestLength,
        AggregateFn::LongestLength,
        AggregateFn::AverageLength,
        AggregateFn::Average,
        AggregateFn::Sum,
        AggregateFn::Min,
        AggregateFn::Max,
    ];
    functions.iter().find_map(|function| {
        rest.strip_suffix(function.suffix())
            .filter(|field| !field.is_empty())
            .map(|field| (field, *function, comparator))
    })
}
