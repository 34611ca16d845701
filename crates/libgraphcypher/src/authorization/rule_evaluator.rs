use crate::authorization::AuthorizationAnnotation;
use crate::authorization::AuthorizationOperation;
use crate::authorization::AuthorizationRule;
use crate::authorization::RuleKind;
use crate::authorization::ValidationTiming;
use crate::schema::ConcreteEntity;
use crate::schema::SchemaModel;
use crate::schema::lookup_claim;
use crate::translate::Predicate;
use crate::translate::TranslateError;
use crate::translate::memory_filter::FieldSource;
use crate::translate::memory_filter::MemoryFilter;
use crate::translate::where_translator::JwtBinding;
use crate::translate::where_translator::NodeScope;
use crate::translate::where_translator::WhereTranslator;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, TranslateError>;

const JWT_PREFIX: &str = "$jwt.";

/// Applies `@authentication` and `@authorization` rules for one request.
///
/// Filter rules of one annotation are alternatives (OR); every annotation
/// in scope must be satisfied (AND). Validate rules combine the same way,
/// per operation and timing.
#[derive(Clone, Copy)]
pub struct RuleEvaluator<'a> {
    jwt: Option<&'a JsonValue>,
    model: &'a SchemaModel,
}
impl<'a> RuleEvaluator<'a> {
    pub fn new(model: &'a SchemaModel, jwt: Option<&'a JsonValue>) -> Self {
        Self { jwt, model }
    }

    pub fn is_authenticated(&self) -> bool {
        self.jwt.is_some()
    }

    /// Fails with `Unauthenticated` when `@authentication` on `entity`
    /// covers `operation` and the request carries no JWT.
    pub fn authenticate(&self, entity: &ConcreteEntity, operation: AuthorizationOperation) -> Result<()> {
        let required = entity.authentication()
            .is_some_and(|annotation| annotation.requires_authentication(operation));
        if required && self.jwt.is_none() {
            tracing::debug!("`{}` requires authentication for {operation}", entity.name());
            return Err(TranslateError::Unauthenticated);
        }
        Ok(())
    }

    /// The `@authorization` annotations in scope: the entity's own plus
    /// those of the named fields (selected or written).
    pub fn annotations<'m, 'f>(
        entity: &'m ConcreteEntity,
        fields: impl IntoIterator<Item = &'f str>,
    ) -> Vec<&'m AuthorizationAnnotation> {
        let mut annotations = entity.authorization().into_iter().collect::<Vec<_>>();
        for field_name in fields {
            let annotation = entity.attribute(field_name)
                .and_then(|attr| attr.authorization())
                .or_else(|| entity.relationship(field_name).and_then(|rel| rel.authorization()));
            if let Some(annotation) = annotation {
                if !annotations.iter().any(|existing| std::ptr::eq(*existing, annotation)) {
                    annotations.push(annotation);
                }
            }
        }
        annotations
    }

    /// Predicate ANDed into reads of `entity`.
    pub fn filter(
        &self,
        entity: &ConcreteEntity,
        annotations: &[&AuthorizationAnnotation],
        operation: AuthorizationOperation,
    ) -> Result<Predicate> {
        let mut parts = vec![];
        for annotation in annotations {
            let rules = annotation.filters_for(operation).collect::<Vec<_>>();
            if rules.is_empty() {
                continue;
            }
            parts.push(self.any_rule(entity, &rules)?);
        }
        Ok(Predicate::and(parts))
    }

    /// Predicate that must hold at `timing`, checked with
    /// `apoc.util.validate`. A predicate that cannot hold because the
    /// request is anonymous fails with `Unauthenticated`.
    pub fn validate(
        &self,
        entity: &ConcreteEntity,
        annotations: &[&AuthorizationAnnotation],
        operation: AuthorizationOperation,
        timing: ValidationTiming,
    ) -> Result<Predicate> {
        let mut parts = vec![];
        let mut needs_jwt = false;
        for annotation in annotations {
            let rules = annotation.validations_for(operation, timing).collect::<Vec<_>>();
            if rules.is_empty() {
                continue;
            }
            needs_jwt |= rules.iter().all(|rule| rule.require_authentication());
            parts.push(self.any_rule(entity, &rules)?);
        }
        let predicate = Predicate::and(parts);
        if predicate.is_false() && needs_jwt && self.jwt.is_none() {
            return Err(TranslateError::Unauthenticated);
        }
        Ok(predicate)
    }

    /// [`Self::filter`] over every member of a union or interface; a node
    /// passes when its own member's rules hold.
    pub(crate) fn scope_filter(&self, scope: NodeScope<'_>, operation: AuthorizationOperation) -> Result<Predicate> {
        self.per_member(scope, |member| {
            let annotations = Self::annotations(member, []);
            self.filter(member, &annotations, operation)
        })
    }

    pub(crate) fn scope_validate(
        &self,
        scope: NodeScope<'_>,
        operation: AuthorizationOperation,
        timing: ValidationTiming,
    ) -> Result<Predicate> {
        self.per_member(scope, |member| {
            let annotations = Self::annotations(member, []);
            self.validate(member, &annotations, operation, timing)
        })
    }

    fn per_member<F>(&self, scope: NodeScope<'_>, member_predicate: F) -> Result<Predicate>
    where
        F: Fn(&ConcreteEntity) -> Result<Predicate>,
    {
        let members = match scope {
            NodeScope::Concrete(entity) => return member_predicate(entity),
            NodeScope::Interface(composite) | NodeScope::Union(composite) => composite.members().iter()
                .filter_map(|member| self.model.concrete(member))
                .collect::<Vec<_>>(),
        };
        let mut branches = vec![];
        let mut unrestricted = true;
        for member in members {
            let predicate = member_predicate(member)?;
            unrestricted &= predicate.is_true();
            branches.push(Predicate::and([Predicate::Labels(vec![member.label_string()]), predicate]));
        }
        if unrestricted {
            return Ok(Predicate::True);
        }
        Ok(Predicate::or(branches))
    }

    fn any_rule(&self, entity: &ConcreteEntity, rules: &[&AuthorizationRule]) -> Result<Predicate> {
        let mut branches = vec![];
        for rule in rules {
            if rule.require_authentication() && self.jwt.is_none() {
                branches.push(Predicate::False);
                continue;
            }
            branches.push(self.rule_where(entity, rule.where_clause())?);
        }
        Ok(Predicate::or(branches))
    }

    /// Translates `{ node, jwt, AND, OR, NOT }`. `jwt` clauses only read the
    /// token and fold to `True`/`False` here.
    fn rule_where(&self, entity: &ConcreteEntity, where_: &JsonValue) -> Result<Predicate> {
        let Some(entries) = where_.as_object() else {
            return Ok(Predicate::True);
        };
        let mut parts = vec![];
        for (key, value) in entries {
            match key.as_str() {
                "node" => {
                    let translator = WhereTranslator::new(self.model, JwtBinding::Claims(self.jwt));
                    parts.push(translator.node_where(NodeScope::Concrete(entity), value)?);
                },
                "jwt" => {
                    let filter = MemoryFilter::new(FieldSource::Claims(self.model.jwt()), "JWT");
                    let claims = self.jwt.unwrap_or(&JsonValue::Null);
                    parts.push(if filter.evaluate(value, claims)? { Predicate::True } else { Predicate::False });
                },
                "AND" => parts.push(Predicate::and(
                    list(value).into_iter()
                        .map(|inner| self.rule_where(entity, inner))
                        .collect::<Result<Vec<_>>>()?,
                )),
                "OR" => parts.push(Predicate::or(
                    list(value).into_iter()
                        .map(|inner| self.rule_where(entity, inner))
                        .collect::<Result<Vec<_>>>()?,
                )),
                "NOT" => parts.push(Predicate::negate(self.rule_where(entity, value)?)),
                _ => return Err(TranslateError::unknown_field(key, format!("{}AuthorizationWhere", entity.name()))),
            }
        }
        Ok(Predicate::and(parts))
    }

    /// Evaluates the SUBSCRIBE rules of `entity` against an event payload
    /// without touching the database. Rules that reach beyond the node's
    /// own attributes deny.
    pub fn allows_event(&self, entity: &ConcreteEntity, payload: &JsonValue) -> bool {
        let Some(annotation) = entity.authorization() else {
            return true;
        };
        let rules = annotation.filters_for(AuthorizationOperation::Subscribe)
            .chain(annotation.validations_for(AuthorizationOperation::Subscribe, ValidationTiming::After))
            .collect::<Vec<_>>();
        let by_kind = |kind: RuleKind| rules.iter().filter(move |rule| rule.kind() == kind).collect::<Vec<_>>();

        [RuleKind::Filter, RuleKind::Validate].into_iter().all(|kind| {
            let rules = by_kind(kind);
            rules.is_empty() || rules.iter().any(|rule| {
                if rule.require_authentication() && self.jwt.is_none() {
                    return false;
                }
                self.rule_matches(entity, rule.where_clause(), payload).unwrap_or_else(|err| {
                    tracing::debug!("subscription rule on `{}` denied: {err}", entity.name());
                    false
                })
            })
        })
    }

    fn rule_matches(&self, entity: &ConcreteEntity, where_: &JsonValue, payload: &JsonValue) -> Result<bool> {
        let Some(entries) = where_.as_object() else {
            return Ok(true);
        };
        for (key, value) in entries {
            let matched = match key.as_str() {
                "node" => match self.resolve_jwt_refs(value) {
                    Some(value) => MemoryFilter::new(FieldSource::Attributes(entity.attributes()), entity.name())
                        .evaluate(&value, payload)?,
                    None => false,
                },
                "jwt" => MemoryFilter::new(FieldSource::Claims(self.model.jwt()), "JWT")
                    .evaluate(value, self.jwt.unwrap_or(&JsonValue::Null))?,
                "AND" => {
                    let mut all = true;
                    for inner in list(value) {
                        all &= self.rule_matches(entity, inner, payload)?;
                    }
                    all
                },
                "OR" => {
                    let mut any = false;
                    for inner in list(value) {
                        any |= self.rule_matches(entity, inner, payload)?;
                    }
                    any
                },
                "NOT" => !self.rule_matches(entity, value, payload)?,
                _ => return Err(TranslateError::unknown_field(key, format!("{}AuthorizationWhere", entity.name()))),
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Substitutes `$jwt.<path>` strings; `None` when a claim is missing.
    fn resolve_jwt_refs(&self, value: &JsonValue) -> Option<JsonValue> {
        match value {
            JsonValue::String(s) if s.starts_with(JWT_PREFIX) => {
                let path = &s[JWT_PREFIX.len()..];
                let claims = self.jwt?;
                let found = match self.model.jwt().and_then(|shape| shape.claim(path)) {
                    Some(claim) => lookup_claim(claims, claim.path()),
                    None => lookup_claim(claims, path.split('.').collect::<Vec<_>>().as_slice()),
                };
                found.cloned()
            },
            JsonValue::Array(items) => items.iter()
                .map(|item| self.resolve_jwt_refs(item))
                .collect::<Option<Vec<_>>>()
                .map(JsonValue::Array),
            JsonValue::Object(entries) => entries.iter()
                .map(|(key, item)| self.resolve_jwt_refs(item).map(|item| (key.clone(), item)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(JsonValue::Object),
            other => Some(other.clone()),
        }
    }
}

fn list(value: &JsonValue) -> Vec<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Null => vec![],
        single => vec![single],
    }
}

/// Checks every rule of `annotation` against the entity it is attached to:
/// `node` clauses must translate, `$jwt` references must name declared
/// claims and `jwt` clauses must only use known claims.
pub(crate) fn validate_annotation(
    model: &SchemaModel,
    entity: &ConcreteEntity,
    annotation: &AuthorizationAnnotation,
) -> Vec<String> {
    let mut details = vec![];
    for rule in annotation.rules() {
        if let Err(err) = check_rule_where(model, entity, rule.where_clause()) {
            details.push(err.to_string());
        }
    }
    details
}

fn check_rule_where(model: &SchemaModel, entity: &ConcreteEntity, where_: &JsonValue) -> Result<()> {
    let Some(entries) = where_.as_object() else {
        return Ok(());
    };
    for (key, value) in entries {
        match key.as_str() {
            "node" => {
                WhereTranslator::new(model, JwtBinding::Check(model.jwt()))
                    .node_where(NodeScope::Concrete(entity), value)?;
            },
            "jwt" => MemoryFilter::new(FieldSource::Claims(model.jwt()), "JWT").check(value)?,
            "AND" | "OR" => for inner in list(value) {
                check_rule_where(model, entity, inner)?;
            },
            "NOT" => check_rule_where(model, entity, value)?,
            _ => return Err(TranslateError::unknown_field(key, format!("{}AuthorizationWhere", entity.name()))),
        }
    }
    Ok(())
}
