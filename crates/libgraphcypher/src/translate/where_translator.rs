use crate::schema::Attribute;
use crate::schema::AttributeType;
use crate::schema::CompositeEntity;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::JwtShape;
use crate::schema::Relationship;
use crate::schema::RelationshipProperties;
use crate::schema::ScalarKind;
use crate::schema::SchemaModel;
use crate::schema::lookup_claim;
use crate::schema::naming;
use crate::translate::AggregateCondition;
use crate::translate::AggregateFn;
use crate::translate::AggregatePredicate;
use crate::translate::CompareOp;
use crate::translate::Comparison;
use crate::translate::CypherComparison;
use crate::translate::FilterOperator;
use crate::translate::Predicate;
use crate::translate::Quantifier;
use crate::translate::RelationshipPattern;
use crate::translate::RelationshipPredicate;
use crate::translate::Scope;
use crate::translate::TranslateError;
use crate::translate::operator;
use crate::value;
use crate::value::DbValue;
use indexmap::IndexMap;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, TranslateError>;

const JWT_PREFIX: &str = "$jwt.";

/// How `"$jwt.<path>"` string values inside a `where` input are treated.
#[derive(Clone, Copy, Debug)]
pub(crate) enum JwtBinding<'a> {
    /// Client input; such strings are plain literals.
    Literal,
    /// An authorization rule evaluated for a request. `None` when the
    /// request carries no JWT.
    Claims(Option<&'a JsonValue>),
    /// An authorization rule checked while building the schema. References
    /// must name a declared claim when a `@jwt` type exists.
    Check(Option<&'a JwtShape>),
}

/// What a `where` input targets.
#[derive(Clone, Copy, Debug)]
pub(crate) enum NodeScope<'m> {
    Concrete(&'m ConcreteEntity),
    Interface(&'m CompositeEntity),
    Union(&'m CompositeEntity),
}
impl<'m> NodeScope<'m> {
    pub(crate) fn resolve(model: &'m SchemaModel, entity_ref: &EntityRef) -> Result<Self> {
        let missing = || TranslateError::Internal {
            message: format!("unknown entity `{}`", entity_ref.name()),
        };
        Ok(match entity_ref {
            EntityRef::Concrete(name) => Self::Concrete(model.concrete(name).ok_or_else(missing)?),
            EntityRef::Interface(name) => Self::Interface(model.composite(name).ok_or_else(missing)?),
            EntityRef::Union(name) => Self::Union(model.composite(name).ok_or_else(missing)?),
        })
    }
}

/// Label strings of every concrete entity `entity_ref` may resolve to.
pub(crate) fn target_labels(model: &SchemaModel, entity_ref: &EntityRef) -> Vec<String> {
    model.concrete_members(entity_ref).iter()
        .map(|entity| entity.label_string())
        .collect()
}

pub(crate) fn relationship_pattern(model: &SchemaModel, rel: &Relationship) -> RelationshipPattern {
    RelationshipPattern {
        direction: rel.direction(),
        rel_type: rel.rel_type().to_string(),
        target_labels: target_labels(model, rel.target()),
    }
}

fn as_object<'v>(type_name: &str, value: &'v JsonValue) -> Result<&'v JsonMap<String, JsonValue>> {
    value.as_object().ok_or_else(|| TranslateError::shape(type_name, value))
}

fn as_list<'v>(value: &'v JsonValue) -> Vec<&'v JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Null => vec![],
        single => vec![single],
    }
}

/// Translates generated filter inputs (`<T>Where`, `<T><R>ConnectionWhere`,
/// `<T><R>AggregateInput`, ...) into [`Predicate`] trees.
pub(crate) struct WhereTranslator<'a> {
    jwt: JwtBinding<'a>,
    model: &'a SchemaModel,
}
impl<'a> WhereTranslator<'a> {
    pub(crate) fn new(model: &'a SchemaModel, jwt: JwtBinding<'a>) -> Self {
        Self { jwt, model }
    }

    /// Translates a `where` input for the node in scope.
    pub(crate) fn node_where(&self, scope: NodeScope<'_>, value: &JsonValue) -> Result<Predicate> {
        if value.is_null() {
            return Ok(Predicate::True);
        }
        match scope {
            NodeScope::Concrete(entity) => self.concrete_where(entity, value),
            NodeScope::Interface(composite) => self.interface_where(composite, value),
            NodeScope::Union(composite) => self.union_where(composite, value),
        }
    }

    fn logical<F>(&self, key: &str, value: &JsonValue, translate: F) -> Result<Predicate>
    where
        F: Fn(&JsonValue) -> Result<Predicate>,
    {
        match key {
            "AND" => Ok(Predicate::and(
                as_list(value).into_iter().map(translate).collect::<Result<Vec<_>>>()?,
            )),
            "OR" => {
                let branches = as_list(value);
                if branches.is_empty() {
                    return Ok(Predicate::True);
                }
                Ok(Predicate::or(branches.into_iter().map(translate).collect::<Result<Vec<_>>>()?))
            },
            _ => Ok(Predicate::negate(translate(value)?)),
        }
    }

    fn concrete_where(&self, entity: &ConcreteEntity, value: &JsonValue) -> Result<Predicate> {
        let type_name = format!("{}Where", entity.name());
        let entries = as_object(&type_name, value)?;

        let mut parts = vec![];
        for (key, value) in entries {
            if matches!(key.as_str(), "AND" | "OR" | "NOT") {
                parts.push(self.logical(key, value, |inner| self.concrete_where(entity, inner))?);
                continue;
            }
            if let Some(predicate) = self.relationship_key(entity, key, value)? {
                parts.push(predicate);
                continue;
            }
            parts.push(self.attribute_key(entity.attributes(), &type_name, key, value, Scope::Node)?);
        }
        Ok(Predicate::and(parts))
    }

    fn interface_where(&self, composite: &CompositeEntity, value: &JsonValue) -> Result<Predicate> {
        let type_name = format!("{}Where", composite.name());
        let entries = as_object(&type_name, value)?;
        let members = self.model.concrete_members(&EntityRef::Interface(composite.name().to_string()));

        let mut parts = vec![];
        for (key, value) in entries {
            if matches!(key.as_str(), "AND" | "OR" | "NOT") {
                parts.push(self.logical(key, value, |inner| self.interface_where(composite, inner))?);
                continue;
            }
            if key == "typename_IN" {
                let names = as_list(value).into_iter()
                    .map(|name| name.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| TranslateError::shape(format!("{}Implementation", composite.name()), name)))
                    .collect::<Result<Vec<_>>>()?;
                let labels = members.iter()
                    .filter(|member| names.iter().any(|name| name == member.name()))
                    .map(|member| member.label_string())
                    .collect::<Vec<_>>();
                parts.push(if labels.is_empty() { Predicate::False } else { Predicate::Labels(labels) });
                continue;
            }

            let declared = composite.declared_relationships().keys()
                .find(|field_name| Self::relationship_key_split(field_name, key).is_some());
            if let Some(field_name) = declared {
                // Each implementer carries its own relationship; the node
                // matches exactly one branch.
                let mut branches = vec![];
                for member in &members {
                    let member_predicate = match member.relationship(field_name) {
                        Some(_) => self.relationship_key(member, key, value)?.unwrap_or(Predicate::True),
                        None => Predicate::False,
                    };
                    branches.push(Predicate::and([
                        Predicate::Labels(vec![member.label_string()]),
                        member_predicate,
                    ]));
                }
                parts.push(Predicate::or(branches));
                continue;
            }

            parts.push(self.attribute_key(composite.attributes(), &type_name, key, value, Scope::Node)?);
        }
        Ok(Predicate::and(parts))
    }

    /// Member-keyed union filters: the node must be one of the listed
    /// members and satisfy that member's filter.
    fn union_where(&self, composite: &CompositeEntity, value: &JsonValue) -> Result<Predicate> {
        let type_name = format!("{}Where", composite.name());
        let entries = as_object(&type_name, value)?;
        if entries.is_empty() {
            return Ok(Predicate::True);
        }
        let mut branches = vec![];
        for (member_name, member_where) in entries {
            let member = composite.members().iter()
                .find(|member| *member == member_name)
                .and_then(|member| self.model.concrete(member))
                .ok_or_else(|| TranslateError::unknown_field(member_name, type_name.as_str()))?;
            branches.push(Predicate::and([
                Predicate::Labels(vec![member.label_string()]),
                self.concrete_where(member, member_where)?,
            ]));
        }
        Ok(Predicate::or(branches))
    }

    /// Filters over relationship properties, read from the `Edge` scope.
    pub(crate) fn properties_where(&self, props: &RelationshipProperties, value: &JsonValue) -> Result<Predicate> {
        if value.is_null() {
            return Ok(Predicate::True);
        }
        let type_name = format!("{}Where", props.name());
        let entries = as_object(&type_name, value)?;
        let mut parts = vec![];
        for (key, value) in entries {
            if matches!(key.as_str(), "AND" | "OR" | "NOT") {
                parts.push(self.logical(key, value, |inner| self.properties_where(props, inner))?);
                continue;
            }
            parts.push(self.attribute_key(props.attributes(), &type_name, key, value, Scope::Edge)?);
        }
        Ok(Predicate::and(parts))
    }

    /// Matches `key` against the filter keys generated for relationship
    /// field `field_name`; returns whether it is a connection filter and the
    /// quantifier it selects.
    fn relationship_key_split(field_name: &str, key: &str) -> Option<(bool, Quantifier, bool)> {
        let (connection, rest) = match key.strip_prefix(field_name) {
            Some(rest) => match rest.strip_prefix("Connection") {
                Some(rest) => (true, rest),
                None => (false, rest),
            },
            None => return None,
        };
        match rest {
            "" => Some((connection, Quantifier::Some, true)),
            "_NOT" => Some((connection, Quantifier::None, true)),
            _ => operator::QUANTIFIER_SUFFIXES.iter()
                .find(|(suffix, _)| *suffix == rest)
                .map(|(_, quantifier)| (connection, *quantifier, false)),
        }
    }

    fn relationship_key(
        &self,
        entity: &ConcreteEntity,
        key: &str,
        value: &JsonValue,
    ) -> Result<Option<Predicate>> {
        for rel in entity.relationships().values() {
            if key == format!("{}Aggregate", rel.field_name()) && rel.aggregate() {
                return self.aggregate_input(rel, value).map(Some);
            }
            let Some((connection, quantifier, legacy)) = Self::relationship_key_split(rel.field_name(), key) else {
                continue;
            };
            if !rel.is_list() && !legacy {
                return Err(TranslateError::unknown_field(key, format!("{}Where", entity.name())));
            }
            if legacy && rel.is_list() {
                tracing::warn!(
                    "`{}.{key}` is a deprecated relationship filter; use the quantified forms instead",
                    entity.name(),
                );
            }

            // `rel: null` asks for no related node, `rel_NOT: null` for any.
            if value.is_null() {
                let quantifier = match quantifier {
                    Quantifier::None => Quantifier::Some,
                    _ => Quantifier::None,
                };
                return Ok(Some(Predicate::Relationship(Box::new(RelationshipPredicate {
                    inner: Predicate::True,
                    pattern: relationship_pattern(self.model, rel),
                    quantifier,
                }))));
            }

            let inner = if connection {
                self.connection_where(rel, value)?
            } else {
                self.node_where(NodeScope::resolve(self.model, rel.target())?, value)?
            };
            return Ok(Some(Predicate::Relationship(Box::new(RelationshipPredicate {
                inner,
                pattern: relationship_pattern(self.model, rel),
                quantifier,
            }))));
        }
        Ok(None)
    }

    /// Translates `<T><R>ConnectionWhere`: `node` reads the related node and
    /// `edge` the relationship.
    pub(crate) fn connection_where(&self, rel: &Relationship, value: &JsonValue) -> Result<Predicate> {
        if value.is_null() {
            return Ok(Predicate::True);
        }
        let prefix = naming::relationship_prefix(rel.source(), rel.field_name());
        let props = rel.properties().and_then(|name| self.model.relationship_properties(name));

        if let EntityRef::Union(_) = rel.target() {
            let type_name = format!("{prefix}ConnectionWhere");
            let entries = as_object(&type_name, value)?;
            if entries.is_empty() {
                return Ok(Predicate::True);
            }
            let members = self.model.concrete_members(rel.target());
            let mut branches = vec![];
            for (member_name, member_where) in entries {
                let member = members.iter()
                    .find(|member| member.name() == member_name)
                    .ok_or_else(|| TranslateError::unknown_field(member_name, type_name.as_str()))?;
                branches.push(Predicate::and([
                    Predicate::Labels(vec![member.label_string()]),
                    self.connection_arm_where(
                        &format!("{prefix}{}ConnectionWhere", member.name()),
                        NodeScope::Concrete(member),
                        props,
                        member_where,
                    )?,
                ]));
            }
            return Ok(Predicate::or(branches));
        }

        self.connection_arm_where(
            &format!("{prefix}ConnectionWhere"),
            NodeScope::resolve(self.model, rel.target())?,
            props,
            value,
        )
    }

    pub(crate) fn connection_arm_where(
        &self,
        type_name: &str,
        target: NodeScope<'_>,
        props: Option<&RelationshipProperties>,
        value: &JsonValue,
    ) -> Result<Predicate> {
        if value.is_null() {
            return Ok(Predicate::True);
        }
        let entries = as_object(type_name, value)?;
        let mut parts = vec![];
        for (key, value) in entries {
            match key.as_str() {
                "AND" | "OR" | "NOT" => parts.push(self.logical(key, value, |inner| {
                    self.connection_arm_where(type_name, target, props, inner)
                })?),
                "node" => parts.push(self.node_where(target, value)?),
                "edge" => match props {
                    Some(props) => parts.push(self.properties_where(props, value)?),
                    None => return Err(TranslateError::unknown_field(key, type_name)),
                },
                _ => return Err(TranslateError::unknown_field(key, type_name)),
            }
        }
        Ok(Predicate::and(parts))
    }

    fn aggregate_input(&self, rel: &Relationship, value: &JsonValue) -> Result<Predicate> {
        if value.is_null() {
            return Ok(Predicate::True);
        }
        let target = match rel.target() {
            EntityRef::Concrete(name) => self.model.concrete(name),
            _ => None,
        };
        let Some(target) = target else {
            return Err(TranslateError::Internal {
                message: format!("aggregate filter on non-concrete relationship `{}`", rel.field_name()),
            });
        };
        let props = rel.properties().and_then(|name| self.model.relationship_properties(name));
        let prefix = naming::relationship_prefix(rel.source(), rel.field_name());
        let condition = self.aggregate_condition(&prefix, target, props, value)?;
        Ok(Predicate::Aggregate(Box::new(AggregatePredicate {
            condition,
            pattern: relationship_pattern(self.model, rel),
        })))
    }

    fn aggregate_condition(
        &self,
        prefix: &str,
        target: &ConcreteEntity,
        props: Option<&RelationshipProperties>,
        value: &JsonValue,
    ) -> Result<AggregateCondition> {
        let type_name = format!("{prefix}AggregateInput");
        let entries = as_object(&type_name, value)?;
        let mut parts = vec![];
        for (key, value) in entries {
            match key.as_str() {
                "AND" | "OR" => {
                    let inner = as_list(value).into_iter()
                        .map(|inner| self.aggregate_condition(prefix, target, props, inner))
                        .collect::<Result<Vec<_>>>()?;
                    parts.push(if key == "AND" {
                        AggregateCondition::And(inner)
                    } else {
                        AggregateCondition::Or(inner)
                    });
                },
                "NOT" => parts.push(AggregateCondition::Not(Box::new(
                    self.aggregate_condition(prefix, target, props, value)?,
                ))),
                "node" => parts.push(self.aggregation_where(
                    &format!("{prefix}NodeAggregationWhereInput"),
                    target.attributes(),
                    Scope::Node,
                    value,
                )?),
                "edge" => match props {
                    Some(props) => parts.push(self.aggregation_where(
                        &format!("{prefix}EdgeAggregationWhereInput"),
                        props.attributes(),
                        Scope::Edge,
                        value,
                    )?),
                    None => return Err(TranslateError::unknown_field(key, type_name)),
                },
                count_key => {
                    let op = match count_key {
                        "count" => CompareOp::Equal,
                        "count_LT" => CompareOp::Lt,
                        "count_LTE" => CompareOp::Lte,
                        "count_GT" => CompareOp::Gt,
                        "count_GTE" => CompareOp::Gte,
                        _ => return Err(TranslateError::unknown_field(key, type_name)),
                    };
                    let count = value::coerce_scalar_input(&ScalarKind::Int, value, self.model.enums())?;
                    parts.push(AggregateCondition::Count { op, value: count });
                },
            }
        }
        Ok(AggregateCondition::And(parts))
    }

    fn aggregation_where(
        &self,
        type_name: &str,
        attributes: &IndexMap<String, Attribute>,
        scope: Scope,
        value: &JsonValue,
    ) -> Result<AggregateCondition> {
        let entries = as_object(type_name, value)?;
        let mut parts = vec![];
        for (key, value) in entries {
            match key.as_str() {
                "AND" | "OR" => {
                    let inner = as_list(value).into_iter()
                        .map(|inner| self.aggregation_where(type_name, attributes, scope, inner))
                        .collect::<Result<Vec<_>>>()?;
                    parts.push(if key == "AND" {
                        AggregateCondition::And(inner)
                    } else {
                        AggregateCondition::Or(inner)
                    });
                    continue;
                },
                "NOT" => {
                    parts.push(AggregateCondition::Not(Box::new(
                        self.aggregation_where(type_name, attributes, scope, value)?,
                    )));
                    continue;
                },
                _ => (),
            }

            let (field_name, function, op) = operator::split_aggregate_key(key)
                .ok_or_else(|| TranslateError::unknown_field(key, type_name))?;
            let attr = attributes.get(field_name)
                .filter(|attr| !attr.attr_type().is_list() && !attr.is_computed())
                .filter(|attr| AggregateFn::for_kind(attr.attr_type().kind()).contains(&function))
                .ok_or_else(|| TranslateError::unknown_field(key, type_name))?;
            let kind = match function {
                AggregateFn::Average | AggregateFn::AverageLength => ScalarKind::Float,
                AggregateFn::LongestLength | AggregateFn::ShortestLength => ScalarKind::Int,
                AggregateFn::Max | AggregateFn::Min | AggregateFn::Sum => attr.attr_type().kind().clone(),
            };
            let value = match self.substitute(value)? {
                Some(value) => value,
                None => return Ok(AggregateCondition::Or(vec![])),
            };
            parts.push(AggregateCondition::Function {
                function,
                op,
                property: attr.db_name().to_string(),
                scope,
                value: value::coerce_scalar_input(&kind, &value, self.model.enums())?,
            });
        }
        Ok(AggregateCondition::And(parts))
    }

    /// Resolves `$jwt.` references. `Ok(None)` means the value cannot be
    /// known (a missing claim); the comparison then denies.
    fn substitute(&self, value: &JsonValue) -> Result<Option<JsonValue>> {
        match value {
            JsonValue::String(s) if s.starts_with(JWT_PREFIX) => {
                let path = &s[JWT_PREFIX.len()..];
                match self.jwt {
                    JwtBinding::Literal => Ok(Some(value.clone())),
                    JwtBinding::Claims(None) => Ok(None),
                    JwtBinding::Claims(Some(claims)) => Ok(self.lookup_jwt_path(claims, path)),
                    JwtBinding::Check(shape) => {
                        if let Some(shape) = shape {
                            let declared = shape.claims().keys().any(|name| name == path);
                            if !declared {
                                return Err(TranslateError::InvalidArgument {
                                    argument: "where".to_string(),
                                    detail: format!(
                                        "claim `{path}` is not declared by the `@jwt` type `{}`",
                                        shape.name(),
                                    ),
                                    value: value.to_string(),
                                });
                            }
                        }
                        Ok(None)
                    },
                }
            },
            JsonValue::Array(items) => {
                let mut substituted = Vec::with_capacity(items.len());
                for item in items {
                    match self.substitute(item)? {
                        Some(item) => substituted.push(item),
                        None => return Ok(None),
                    }
                }
                Ok(Some(JsonValue::Array(substituted)))
            },
            other => Ok(Some(other.clone())),
        }
    }

    fn lookup_jwt_path(&self, claims: &JsonValue, path: &str) -> Option<JsonValue> {
        if let Some(claim) = self.model.jwt().and_then(|shape| shape.claim(path)) {
            return lookup_claim(claims, claim.path()).cloned();
        }
        let segments = path.split('.').collect::<Vec<_>>();
        lookup_claim(claims, &segments).cloned()
    }

    /// The predicate used in place of a comparison whose value could not be
    /// resolved.
    fn unresolved(&self) -> Predicate {
        match self.jwt {
            JwtBinding::Check(_) => Predicate::True,
            _ => Predicate::False,
        }
    }

    fn attribute_key(
        &self,
        attributes: &IndexMap<String, Attribute>,
        type_name: &str,
        key: &str,
        value: &JsonValue,
        scope: Scope,
    ) -> Result<Predicate> {
        let candidate = operator::split_filter_key(key).into_iter()
            .find_map(|(field_name, filter)| attributes.get(field_name)
                .filter(|attr| operator::supports(attr.attr_type(), filter))
                .map(|attr| (attr, filter)));
        let Some((attr, filter)) = candidate else {
            return Err(TranslateError::unknown_field(key, type_name));
        };
        if filter.negated {
            tracing::warn!("`{type_name}.{key}` is a deprecated negated filter; use NOT instead");
        }
        self.attribute_comparison(attr, filter, value, scope)
    }

    pub(crate) fn attribute_comparison(
        &self,
        attr: &Attribute,
        filter: FilterOperator,
        value: &JsonValue,
        scope: Scope,
    ) -> Result<Predicate> {
        let attr_type = attr.attr_type();
        if value.is_null() {
            return Ok(match (filter.op, attr.is_computed()) {
                (CompareOp::Equal, false) => Predicate::IsNull {
                    negated: filter.negated,
                    property: attr.db_name().to_string(),
                    scope,
                },
                _ => Predicate::True,
            });
        }

        let Some(value) = self.substitute(value)? else {
            return Ok(self.unresolved());
        };
        let coerced = self.coerce_filter_value(attr_type, filter.op, &value)?;

        let predicate = match attr.cypher() {
            Some(annotation) => Predicate::Cypher(CypherComparison {
                annotation: annotation.clone(),
                kind: attr_type.kind().clone(),
                list: attr_type.is_list(),
                negated: false,
                op: filter.op,
                value: coerced,
            }),
            None => Predicate::Compare(Comparison {
                kind: attr_type.kind().clone(),
                list: attr_type.is_list(),
                negated: false,
                op: filter.op,
                property: attr.db_name().to_string(),
                scope,
                value: coerced,
            }),
        };
        Ok(if filter.negated { Predicate::negate(predicate) } else { predicate })
    }

    fn coerce_filter_value(
        &self,
        attr_type: &AttributeType,
        op: CompareOp,
        value: &JsonValue,
    ) -> Result<DbValue> {
        let enums = self.model.enums();
        let kind = attr_type.kind();
        let item_type = AttributeType::scalar(kind.clone(), false);
        Ok(match op {
            CompareOp::Equal if attr_type.is_list() => value::coerce_input(
                &AttributeType::list_of(kind.clone(), true, attr_type.items_nullable()),
                value,
                enums,
            )?,
            CompareOp::In => value::coerce_input(
                &AttributeType::list_of(kind.clone(), false, false),
                value,
                enums,
            )?,
            CompareOp::Distance | CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte
                if kind.is_spatial() =>
            {
                let type_name = match kind {
                    ScalarKind::Point => "PointDistance",
                    _ => "CartesianPointDistance",
                };
                let entries = as_object(type_name, value)?;
                let point = entries.get("point").ok_or_else(|| TranslateError::shape(type_name, value))?;
                let distance = entries.get("distance").ok_or_else(|| TranslateError::shape(type_name, value))?;
                DbValue::Map(IndexMap::from([
                    ("point".to_string(), value::coerce_scalar_input(kind, point, enums)?),
                    ("distance".to_string(), value::coerce_scalar_input(&ScalarKind::Float, distance, enums)?),
                ]))
            },
            _ => value::coerce_input(&item_type, value, enums)?,
        })
    }
}
