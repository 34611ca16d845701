//! Intermediate form of create/update/delete inputs.

use crate::schema::Attribute;
use crate::schema::AttributeType;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::Relationship;
use crate::schema::RelationshipProperties;
use crate::schema::ScalarKind;
use crate::schema::SchemaModel;
use crate::schema::WriteOperation;
use crate::schema::naming;
use crate::translate::Predicate;
use crate::translate::TranslateError;
use crate::translate::where_translator::JwtBinding;
use crate::translate::where_translator::NodeScope;
use crate::translate::where_translator::WhereTranslator;
use crate::value;
use crate::value::DbValue;
use indexmap::IndexMap;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, TranslateError>;

/// Right-hand side of a property assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteValue {
    Param(DbValue),
    /// `randomUUID()`, for `@id` fields.
    RandomUuid,
    /// The current instant in the attribute's temporal kind, for
    /// `@timestamp` fields.
    Now(ScalarKind),
}

#[derive(Clone, Debug, PartialEq)]
pub enum WriteOp {
    Set(WriteValue),
    Push(DbValue),
    Pop(DbValue),
    Increment(DbValue),
    Decrement(DbValue),
    Add(DbValue),
    Subtract(DbValue),
    Multiply(DbValue),
    Divide(DbValue),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyWrite {
    pub db_name: String,
    pub field_name: String,
    pub op: WriteOp,
}

/// The concrete entities a nested operation may touch: one for concrete
/// and union arms, every implementer for interface targets.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTarget<'m> {
    pub members: Vec<&'m ConcreteEntity>,
    pub name: String,
}
impl<'m> NodeTarget<'m> {
    pub fn concrete(entity: &'m ConcreteEntity) -> Self {
        Self {
            members: vec![entity],
            name: entity.name().to_string(),
        }
    }

    pub fn label_strings(&self) -> Vec<String> {
        self.members.iter().map(|member| member.label_string()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateNode<'m> {
    pub entity: &'m ConcreteEntity,
    pub properties: Vec<PropertyWrite>,
    pub relationships: Vec<RelationshipWrite<'m>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateNode<'m> {
    pub properties: Vec<PropertyWrite>,
    pub relationships: Vec<RelationshipWrite<'m>>,
    pub target: NodeTarget<'m>,
}
impl UpdateNode<'_> {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.relationships.is_empty()
    }
}

/// Nested writes through one relationship field.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipWrite<'m> {
    pub ops: Vec<NestedWrite<'m>>,
    pub relationship: &'m Relationship,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NestedWrite<'m> {
    Create {
        edge: Vec<PropertyWrite>,
        node: CreateNode<'m>,
    },
    Connect {
        connect: Vec<RelationshipWrite<'m>>,
        edge: Vec<PropertyWrite>,
        target: NodeTarget<'m>,
        where_: Predicate,
    },
    ConnectOrCreate {
        edge: Vec<PropertyWrite>,
        on_create: Vec<PropertyWrite>,
        target: &'m ConcreteEntity,
        unique: Vec<(String, DbValue)>,
    },
    Update {
        edge: Vec<PropertyWrite>,
        node: Option<UpdateNode<'m>>,
        target: NodeTarget<'m>,
        where_: Predicate,
    },
    Disconnect {
        disconnect: Vec<RelationshipWrite<'m>>,
        target: NodeTarget<'m>,
        where_: Predicate,
    },
    Delete {
        delete: Vec<RelationshipWrite<'m>>,
        target: NodeTarget<'m>,
        where_: Predicate,
    },
}

fn object<'v>(type_name: &str, value: &'v JsonValue) -> Result<&'v JsonMap<String, JsonValue>> {
    value.as_object().ok_or_else(|| TranslateError::shape(type_name, value))
}

fn items(value: &JsonValue) -> Vec<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Null => vec![],
        single => vec![single],
    }
}

/// A relationship arm: the concrete target of a concrete relationship, one
/// member of a union relationship, or an interface target.
struct Arm<'m> {
    prefix: String,
    props: Option<&'m RelationshipProperties>,
    target: NodeTarget<'m>,
    target_scope: NodeScope<'m>,
}

/// Reads generated mutation inputs into [`CreateNode`], [`UpdateNode`] and
/// nested write lists.
pub(crate) struct MutationReader<'m> {
    model: &'m SchemaModel,
    where_translator: WhereTranslator<'m>,
}
impl<'m> MutationReader<'m> {
    pub(crate) fn new(model: &'m SchemaModel) -> Self {
        Self {
            model,
            where_translator: WhereTranslator::new(model, JwtBinding::Literal),
        }
    }

    fn enums(&self) -> &'m IndexMap<String, Vec<String>> {
        self.model.enums()
    }

    fn props_of(&self, rel: &Relationship) -> Option<&'m RelationshipProperties> {
        rel.properties().and_then(|name| self.model.relationship_properties(name))
    }

    fn arms(&self, rel: &'m Relationship) -> Result<Vec<Arm<'m>>> {
        let prefix = naming::relationship_prefix(rel.source(), rel.field_name());
        let props = self.props_of(rel);
        Ok(match rel.target() {
            EntityRef::Concrete(_) | EntityRef::Interface(_) => vec![Arm {
                prefix,
                props,
                target: NodeTarget {
                    members: self.model.concrete_members(rel.target()),
                    name: rel.target().name().to_string(),
                },
                target_scope: NodeScope::resolve(self.model, rel.target())?,
            }],
            EntityRef::Union(_) => self.model.concrete_members(rel.target()).into_iter()
                .map(|member| Arm {
                    prefix: format!("{prefix}{}", member.name()),
                    props,
                    target: NodeTarget::concrete(member),
                    target_scope: NodeScope::Concrete(member),
                })
                .collect(),
        })
    }

    /// Resolves the arm(s) an input value applies to: union inputs are
    /// member-keyed, the others apply to the single arm.
    fn arm_inputs<'v>(
        &self,
        rel: &'m Relationship,
        container_type: &str,
        value: &'v JsonValue,
    ) -> Result<Vec<(Arm<'m>, &'v JsonValue)>> {
        let arms = self.arms(rel)?;
        if !matches!(rel.target(), EntityRef::Union(_)) {
            return Ok(arms.into_iter().map(|arm| (arm, value)).collect());
        }
        let entries = object(container_type, value)?;
        let mut resolved = vec![];
        let mut arms = arms;
        for (member_name, member_value) in entries {
            let index = arms.iter()
                .position(|arm| arm.target.name == *member_name)
                .ok_or_else(|| TranslateError::unknown_field(member_name, container_type))?;
            resolved.push((arms.remove(index), member_value));
        }
        Ok(resolved)
    }

    fn property_write(attr: &Attribute, op: WriteOp) -> PropertyWrite {
        PropertyWrite {
            db_name: attr.db_name().to_string(),
            field_name: attr.name().to_string(),
            op,
        }
    }

    /// Attributes written on create, from input values, defaults, `@id`
    /// and `@timestamp`.
    pub(crate) fn create_properties(
        &self,
        type_name: &str,
        attributes: &IndexMap<String, Attribute>,
        entries: &JsonMap<String, JsonValue>,
    ) -> Result<Vec<PropertyWrite>> {
        let mut writes = vec![];
        for attr in attributes.values() {
            if attr.is_computed() {
                continue;
            }
            if attr.is_autogenerated() {
                writes.push(Self::property_write(attr, WriteOp::Set(WriteValue::RandomUuid)));
                continue;
            }
            if attr.timestamp_operations().contains(&WriteOperation::Create) {
                writes.push(Self::property_write(attr, WriteOp::Set(WriteValue::Now(attr.attr_type().kind().clone()))));
                continue;
            }

            let accepts_input = attr.is_client_writable()
                || attr.populated_by().is_some_and(|populated| populated.runs_on(WriteOperation::Create));
            let provided = entries.get(attr.name()).filter(|_| accepts_input);
            let value = match (provided, attr.default_value()) {
                (Some(value), _) => value,
                (None, Some(default)) => default,
                (None, None) => {
                    if !attr.attr_type().nullable() && attr.is_client_writable() {
                        return Err(TranslateError::MissingRequiredField {
                            field_name: attr.name().to_string(),
                            field_type: attr.attr_type().to_string(),
                            type_name: type_name.to_string(),
                        });
                    }
                    continue;
                },
            };
            let coerced = value::coerce_input(attr.attr_type(), value, self.enums())?;
            writes.push(Self::property_write(attr, WriteOp::Set(WriteValue::Param(coerced))));
        }

        for key in entries.keys() {
            let known = key == "_emptyInput" || attributes.get(key).is_some_and(|attr| {
                attr.is_client_writable()
                    || attr.populated_by().is_some_and(|populated| populated.runs_on(WriteOperation::Create))
            });
            if !known {
                return Err(TranslateError::unknown_field(key, type_name));
            }
        }
        Ok(writes)
    }

    pub(crate) fn create_node(&self, entity: &'m ConcreteEntity, value: &JsonValue) -> Result<CreateNode<'m>> {
        let type_name = format!("{}CreateInput", entity.name());
        let entries = object(&type_name, value)?;

        let attribute_entries = entries.iter()
            .filter(|(key, _)| entity.relationship(key).is_none())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<JsonMap<_, _>>();
        let properties = self.create_properties(&type_name, entity.attributes(), &attribute_entries)?;

        let mut relationships = vec![];
        for rel in entity.relationships().values() {
            let ops = match entries.get(rel.field_name()) {
                Some(value) if !value.is_null() => self.field_input(rel, value)?,
                _ => vec![],
            };
            if rel.is_required() {
                Self::check_required(entity, rel, &ops)?;
            }
            if !ops.is_empty() {
                relationships.push(RelationshipWrite { ops, relationship: rel });
            }
        }

        Ok(CreateNode {
            entity,
            properties,
            relationships,
        })
    }

    /// A required singular relationship must be satisfied by the create
    /// input itself; connects that match nothing are caught by the emitted
    /// statement.
    fn check_required(entity: &ConcreteEntity, rel: &Relationship, ops: &[NestedWrite<'_>]) -> Result<()> {
        let creating = ops.iter()
            .filter(|op| matches!(op, NestedWrite::Create { .. } | NestedWrite::ConnectOrCreate { .. }))
            .count();
        let connecting = ops.iter()
            .filter(|op| matches!(op, NestedWrite::Connect { .. }))
            .count();
        if creating + connecting == 0 || creating > 1 {
            return Err(TranslateError::RequiredRelationship {
                field_name: rel.field_name().to_string(),
                type_name: entity.name().to_string(),
            });
        }
        Ok(())
    }

    /// `<T><R>FieldInput`: `create`, `connect` and `connectOrCreate` used
    /// inside a create input.
    fn field_input(&self, rel: &'m Relationship, value: &JsonValue) -> Result<Vec<NestedWrite<'m>>> {
        let prefix = naming::relationship_prefix(rel.source(), rel.field_name());
        let mut ops = vec![];
        for (arm, value) in self.arm_inputs(rel, &format!("{prefix}CreateInput"), value)? {
            let type_name = format!("{}FieldInput", arm.prefix);
            for (key, value) in object(&type_name, value)? {
                match key.as_str() {
                    "create" => for item in items(value) {
                        ops.push(self.nested_create(&arm, item)?);
                    },
                    "connect" => for item in items(value) {
                        ops.push(self.nested_connect(&arm, item)?);
                    },
                    "connectOrCreate" => for item in items(value) {
                        ops.push(self.nested_connect_or_create(&arm, item)?);
                    },
                    _ => return Err(TranslateError::unknown_field(key, type_name)),
                }
            }
        }
        Ok(ops)
    }

    fn edge_create(&self, arm: &Arm<'m>, value: Option<&JsonValue>) -> Result<Vec<PropertyWrite>> {
        let Some(props) = arm.props else {
            return match value {
                Some(value) if !value.is_null() =>
                    Err(TranslateError::unknown_field("edge", format!("{}CreateFieldInput", arm.prefix))),
                _ => Ok(vec![]),
            };
        };
        let empty = JsonValue::Object(JsonMap::new());
        let value = value.filter(|value| !value.is_null()).unwrap_or(&empty);
        let type_name = format!("{}CreateInput", props.name());
        self.create_properties(&type_name, props.attributes(), object(&type_name, value)?)
    }

    fn nested_create(&self, arm: &Arm<'m>, value: &JsonValue) -> Result<NestedWrite<'m>> {
        let type_name = format!("{}CreateFieldInput", arm.prefix);
        let entries = object(&type_name, value)?;
        for key in entries.keys() {
            if !matches!(key.as_str(), "node" | "edge") {
                return Err(TranslateError::unknown_field(key, type_name));
            }
        }
        let node_input = entries.get("node").ok_or_else(|| TranslateError::MissingRequiredField {
            field_name: "node".to_string(),
            field_type: format!("{}CreateInput!", arm.target.name),
            type_name: type_name.clone(),
        })?;

        // Interface targets take a member-keyed create input naming exactly
        // one implementer.
        let (entity, node_input) = match arm.target_scope {
            NodeScope::Interface(composite) => {
                let members = object(&format!("{}CreateInput", composite.name()), node_input)?;
                let mut chosen = members.iter();
                let (Some((member_name, member_input)), None) = (chosen.next(), chosen.next()) else {
                    return Err(TranslateError::AmbiguousInput {
                        expected: composite.members().join(", "),
                        type_name: format!("{}CreateInput", composite.name()),
                    });
                };
                let member = arm.target.members.iter()
                    .find(|member| member.name() == member_name)
                    .ok_or_else(|| TranslateError::unknown_field(member_name, format!("{}CreateInput", composite.name())))?;
                (*member, member_input)
            },
            _ => match arm.target.members.first() {
                Some(member) => (*member, node_input),
                None => return Err(TranslateError::Internal {
                    message: format!("relationship target `{}` has no concrete entity", arm.target.name),
                }),
            },
        };

        Ok(NestedWrite::Create {
            edge: self.edge_create(arm, entries.get("edge"))?,
            node: self.create_node(entity, node_input)?,
        })
    }

    fn nested_connect(&self, arm: &Arm<'m>, value: &JsonValue) -> Result<NestedWrite<'m>> {
        let type_name = format!("{}ConnectFieldInput", arm.prefix);
        let entries = object(&type_name, value)?;
        let mut where_ = Predicate::True;
        let mut connect = vec![];
        for (key, value) in entries {
            match key.as_str() {
                "where" => {
                    let where_type = format!("{}ConnectWhere", arm.target.name);
                    for (key, value) in object(&where_type, value)? {
                        if key != "node" {
                            return Err(TranslateError::unknown_field(key, where_type));
                        }
                        where_ = self.where_translator.node_where(arm.target_scope, value)?;
                    }
                },
                "edge" => (),
                "connect" => match arm.target_scope {
                    NodeScope::Concrete(entity) => for item in items(value) {
                        connect.extend(self.connect_input(entity, item)?);
                    },
                    _ => return Err(TranslateError::unknown_field(key, type_name)),
                },
                _ => return Err(TranslateError::unknown_field(key, type_name)),
            }
        }
        Ok(NestedWrite::Connect {
            connect,
            edge: self.edge_create(arm, entries.get("edge"))?,
            target: arm.target.clone(),
            where_,
        })
    }

    fn nested_connect_or_create(&self, arm: &Arm<'m>, value: &JsonValue) -> Result<NestedWrite<'m>> {
        let type_name = format!("{}ConnectOrCreateFieldInput", arm.prefix);
        let NodeScope::Concrete(target) = arm.target_scope else {
            return Err(TranslateError::unknown_field("connectOrCreate", format!("{}FieldInput", arm.prefix)));
        };
        let entries = object(&type_name, value)?;
        for key in entries.keys() {
            if !matches!(key.as_str(), "where" | "onCreate") {
                return Err(TranslateError::unknown_field(key, type_name));
            }
        }

        let where_type = format!("{}ConnectOrCreateWhere", target.name());
        let where_node = entries.get("where")
            .map(|where_| object(&where_type, where_))
            .transpose()?
            .and_then(|where_| where_.get("node"))
            .ok_or_else(|| TranslateError::MissingRequiredField {
                field_name: "where".to_string(),
                field_type: format!("{where_type}!"),
                type_name: type_name.clone(),
            })?;
        let unique_type = format!("{}UniqueWhere", target.name());
        let mut unique = vec![];
        for (key, value) in object(&unique_type, where_node)? {
            let attr = target.attribute(key)
                .filter(|attr| attr.is_unique())
                .ok_or_else(|| TranslateError::unknown_field(key, unique_type.as_str()))?;
            let coerced = value::coerce_input(&attr.attr_type().as_nullable(), value, self.enums())?;
            unique.push((attr.db_name().to_string(), coerced));
        }
        if unique.len() != 1 {
            return Err(TranslateError::AmbiguousInput {
                expected: target.unique_attributes().map(|attr| attr.name().to_string()).collect::<Vec<_>>().join(", "),
                type_name: unique_type,
            });
        }

        let on_create_type = format!("{}ConnectOrCreateFieldInputOnCreate", arm.prefix);
        let empty = JsonValue::Object(JsonMap::new());
        let on_create = entries.get("onCreate").unwrap_or(&empty);
        let on_create = object(&on_create_type, on_create)?;
        let node_type = format!("{}OnCreateInput", target.name());
        let node_input = on_create.get("node").unwrap_or(&empty);
        let mut node_writes = self.create_properties(&node_type, target.attributes(), object(&node_type, node_input)?)?;
        node_writes.retain(|write| !unique.iter().any(|(db_name, _)| *db_name == write.db_name));

        Ok(NestedWrite::ConnectOrCreate {
            edge: self.edge_create(arm, on_create.get("edge"))?,
            on_create: node_writes,
            target,
            unique,
        })
    }

    /// `<T>ConnectInput`, used by nested connects and the `connect`
    /// argument of update mutations.
    pub(crate) fn connect_input(&self, entity: &'m ConcreteEntity, value: &JsonValue) -> Result<Vec<RelationshipWrite<'m>>> {
        self.relationship_input(entity, "ConnectInput", "ConnectInput", value, |arm, item| self.nested_connect(arm, item))
    }

    pub(crate) fn disconnect_input(&self, entity: &'m ConcreteEntity, value: &JsonValue) -> Result<Vec<RelationshipWrite<'m>>> {
        self.relationship_input(entity, "DisconnectInput", "DisconnectInput", value, |arm, item| self.nested_disconnect(arm, item))
    }

    pub(crate) fn delete_input(&self, entity: &'m ConcreteEntity, value: &JsonValue) -> Result<Vec<RelationshipWrite<'m>>> {
        self.relationship_input(entity, "DeleteInput", "DeleteInput", value, |arm, item| self.nested_delete(arm, item))
    }

    /// The `create` argument of update mutations (`<T>RelationInput`).
    pub(crate) fn relation_input(&self, entity: &'m ConcreteEntity, value: &JsonValue) -> Result<Vec<RelationshipWrite<'m>>> {
        self.relationship_input(entity, "RelationInput", "CreateFieldInput", value, |arm, item| self.nested_create(arm, item))
    }

    fn relationship_input<F>(
        &self,
        entity: &'m ConcreteEntity,
        input_suffix: &str,
        union_suffix: &str,
        value: &JsonValue,
        read: F,
    ) -> Result<Vec<RelationshipWrite<'m>>>
    where
        F: Fn(&Arm<'m>, &JsonValue) -> Result<NestedWrite<'m>>,
    {
        if value.is_null() {
            return Ok(vec![]);
        }
        let type_name = format!("{}{input_suffix}", entity.name());
        let mut writes = vec![];
        for (key, value) in object(&type_name, value)? {
            let rel = entity.relationship(key)
                .ok_or_else(|| TranslateError::unknown_field(key, type_name.as_str()))?;
            let prefix = naming::relationship_prefix(rel.source(), rel.field_name());
            let mut ops = vec![];
            for (arm, value) in self.arm_inputs(rel, &format!("{prefix}{union_suffix}"), value)? {
                for item in items(value) {
                    ops.push(read(&arm, item)?);
                }
            }
            writes.push(RelationshipWrite { ops, relationship: rel });
        }
        Ok(writes)
    }

    fn arm_where(&self, arm: &Arm<'m>, value: Option<&JsonValue>) -> Result<Predicate> {
        match value {
            Some(value) => self.where_translator.connection_arm_where(
                &format!("{}ConnectionWhere", arm.prefix),
                arm.target_scope,
                arm.props,
                value,
            ),
            None => Ok(Predicate::True),
        }
    }

    fn nested_disconnect(&self, arm: &Arm<'m>, value: &JsonValue) -> Result<NestedWrite<'m>> {
        let type_name = format!("{}DisconnectFieldInput", arm.prefix);
        let entries = object(&type_name, value)?;
        let mut disconnect = vec![];
        for (key, value) in entries {
            match (key.as_str(), arm.target_scope) {
                ("where", _) => (),
                ("disconnect", NodeScope::Concrete(entity)) => disconnect = self.disconnect_input(entity, value)?,
                _ => return Err(TranslateError::unknown_field(key, type_name)),
            }
        }
        Ok(NestedWrite::Disconnect {
            disconnect,
            target: arm.target.clone(),
            where_: self.arm_where(arm, entries.get("where"))?,
        })
    }

    fn nested_delete(&self, arm: &Arm<'m>, value: &JsonValue) -> Result<NestedWrite<'m>> {
        let type_name = format!("{}DeleteFieldInput", arm.prefix);
        let entries = object(&type_name, value)?;
        let mut delete = vec![];
        for (key, value) in entries {
            match (key.as_str(), arm.target_scope) {
                ("where", _) => (),
                ("delete", NodeScope::Concrete(entity)) => delete = self.delete_input(entity, value)?,
                _ => return Err(TranslateError::unknown_field(key, type_name)),
            }
        }
        Ok(NestedWrite::Delete {
            delete,
            target: arm.target.clone(),
            where_: self.arm_where(arm, entries.get("where"))?,
        })
    }

    /// Property updates of an update input, including the list and numeric
    /// operator suffixes.
    pub(crate) fn update_properties(
        &self,
        type_name: &str,
        attributes: &IndexMap<String, Attribute>,
        entries: &JsonMap<String, JsonValue>,
    ) -> Result<Vec<PropertyWrite>> {
        let mut writes = vec![];
        for (key, value) in entries {
            if key == "_emptyInput" {
                continue;
            }
            let (attr, suffix) = match attributes.get(key.as_str()) {
                Some(attr) => (attr, ""),
                None => {
                    let split = key.rsplit_once('_')
                        .and_then(|(field, suffix)| attributes.get(field).map(|attr| (attr, suffix)));
                    match split {
                        Some((attr, suffix)) => (attr, suffix),
                        None => return Err(TranslateError::unknown_field(key, type_name)),
                    }
                },
            };
            let accepts_input = attr.is_client_writable()
                || (suffix.is_empty()
                    && attr.populated_by().is_some_and(|populated| populated.runs_on(WriteOperation::Update)));
            if !accepts_input {
                return Err(TranslateError::unknown_field(key, type_name));
            }

            let attr_type = attr.attr_type();
            let kind = attr_type.kind();
            let enums = self.enums();
            let op = match (suffix, attr_type.is_list(), kind) {
                ("", _, _) => WriteOp::Set(WriteValue::Param(value::coerce_input(attr_type, value, enums)?)),
                ("PUSH", true, _) => WriteOp::Push(value::coerce_input(
                    &AttributeType::list_of(kind.clone(), false, attr_type.items_nullable()),
                    value,
                    enums,
                )?),
                ("POP", true, _) => WriteOp::Pop(value::coerce_scalar_input(&ScalarKind::Int, value, enums)?),
                ("INCREMENT", false, ScalarKind::Int | ScalarKind::BigInt) =>
                    WriteOp::Increment(value::coerce_scalar_input(kind, value, enums)?),
                ("DECREMENT", false, ScalarKind::Int | ScalarKind::BigInt) =>
                    WriteOp::Decrement(value::coerce_scalar_input(kind, value, enums)?),
                ("ADD", false, ScalarKind::Float) => WriteOp::Add(value::coerce_scalar_input(kind, value, enums)?),
                ("SUBTRACT", false, ScalarKind::Float) =>
                    WriteOp::Subtract(value::coerce_scalar_input(kind, value, enums)?),
                ("MULTIPLY", false, ScalarKind::Float) =>
                    WriteOp::Multiply(value::coerce_scalar_input(kind, value, enums)?),
                ("DIVIDE", false, ScalarKind::Float) =>
                    WriteOp::Divide(value::coerce_scalar_input(kind, value, enums)?),
                _ => return Err(TranslateError::unknown_field(key, type_name)),
            };
            writes.push(Self::property_write(attr, op));
        }

        for attr in attributes.values() {
            if attr.timestamp_operations().contains(&WriteOperation::Update) {
                writes.push(Self::property_write(attr, WriteOp::Set(WriteValue::Now(attr.attr_type().kind().clone()))));
            }
        }
        Ok(writes)
    }

    pub(crate) fn update_node(&self, target: NodeTarget<'m>, scope: NodeScope<'m>, value: &JsonValue) -> Result<UpdateNode<'m>> {
        let type_name = format!("{}UpdateInput", target.name);
        let entries = object(&type_name, value)?;

        let (attributes, entity) = match scope {
            NodeScope::Concrete(entity) => (entity.attributes(), Some(entity)),
            NodeScope::Interface(composite) => (composite.attributes(), None),
            NodeScope::Union(_) => return Err(TranslateError::Internal {
                message: format!("update input for union `{}`", target.name),
            }),
        };

        let attribute_entries = entries.iter()
            .filter(|(key, _)| entity.and_then(|entity| entity.relationship(key)).is_none())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<JsonMap<_, _>>();
        let properties = self.update_properties(&type_name, attributes, &attribute_entries)?;

        let mut relationships = vec![];
        if let Some(entity) = entity {
            for rel in entity.relationships().values() {
                if let Some(value) = entries.get(rel.field_name()).filter(|value| !value.is_null()) {
                    relationships.push(RelationshipWrite {
                        ops: self.relationship_update(rel, value)?,
                        relationship: rel,
                    });
                }
            }
        }

        Ok(UpdateNode {
            properties,
            relationships,
            target,
        })
    }

    /// `[<T><R>UpdateFieldInput!]` (member-keyed for unions).
    fn relationship_update(&self, rel: &'m Relationship, value: &JsonValue) -> Result<Vec<NestedWrite<'m>>> {
        let prefix = naming::relationship_prefix(rel.source(), rel.field_name());
        let mut ops = vec![];
        for (arm, value) in self.arm_inputs(rel, &format!("{prefix}UpdateInput"), value)? {
            for item in items(value) {
                let type_name = format!("{}UpdateFieldInput", arm.prefix);
                let entries = object(&type_name, item)?;
                for key in entries.keys() {
                    if !matches!(
                        key.as_str(),
                        "where" | "update" | "connect" | "connectOrCreate" | "create" | "disconnect" | "delete",
                    ) {
                        return Err(TranslateError::unknown_field(key, type_name));
                    }
                }

                if let Some(update) = entries.get("update").filter(|update| !update.is_null()) {
                    let update_type = format!("{}UpdateConnectionInput", arm.prefix);
                    let update_entries = object(&update_type, update)?;
                    let mut node = None;
                    let mut edge = vec![];
                    for (key, value) in update_entries {
                        match key.as_str() {
                            "node" => node = Some(self.update_node(arm.target.clone(), arm.target_scope, value)?),
                            "edge" => match arm.props {
                                Some(props) => edge = self.update_properties(
                                    &format!("{}UpdateInput", props.name()),
                                    props.attributes(),
                                    object(&format!("{}UpdateInput", props.name()), value)?,
                                )?,
                                None => return Err(TranslateError::unknown_field(key, update_type)),
                            },
                            _ => return Err(TranslateError::unknown_field(key, update_type)),
                        }
                    }
                    ops.push(NestedWrite::Update {
                        edge,
                        node,
                        target: arm.target.clone(),
                        where_: self.arm_where(&arm, entries.get("where"))?,
                    });
                }
                if let Some(connect) = entries.get("connect") {
                    for item in items(connect) {
                        ops.push(self.nested_connect(&arm, item)?);
                    }
                }
                if let Some(connect_or_create) = entries.get("connectOrCreate") {
                    for item in items(connect_or_create) {
                        ops.push(self.nested_connect_or_create(&arm, item)?);
                    }
                }
                if let Some(create) = entries.get("create") {
                    for item in items(create) {
                        ops.push(self.nested_create(&arm, item)?);
                    }
                }
                if let Some(disconnect) = entries.get("disconnect") {
                    for item in items(disconnect) {
                        ops.push(self.nested_disconnect(&arm, item)?);
                    }
                }
                if let Some(delete) = entries.get("delete") {
                    for item in items(delete) {
                        ops.push(self.nested_delete(&arm, item)?);
                    }
                }
            }
        }
        Ok(ops)
    }
}
