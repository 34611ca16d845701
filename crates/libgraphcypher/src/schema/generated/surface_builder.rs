use crate::schema::Attribute;
use crate::schema::CompositeEntity;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::RelationshipProperties;
use crate::schema::ScalarKind;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedField;
use crate::schema::generated::GeneratedSchema;
use crate::schema::generated::GeneratedType;
use crate::schema::generated::GeneratedTypeKind;
use crate::schema::generated::TypeRef;
use crate::schema::naming;
use crate::schema::naming::EntityNames;
use crate::translate::operator;
use indexmap::IndexMap;
use std::collections::BTreeMap;

fn type_ref(notation: &str) -> TypeRef {
    TypeRef::parse(notation).unwrap_or_else(|| TypeRef::Named(notation.to_string()))
}

fn field(name: impl Into<String>, field_type: &str) -> GeneratedField {
    GeneratedField {
        args: IndexMap::new(),
        deprecation: None,
        field_type: type_ref(field_type),
        name: name.into(),
    }
}

impl GeneratedField {
    fn arg(mut self, name: &str, arg_type: &str) -> Self {
        self.args.insert(name.to_string(), type_ref(arg_type));
        self
    }

    fn deprecated(mut self, reason: &str) -> Self {
        self.deprecation = Some(reason.to_string());
        self
    }
}

/// Target of a generated relationship input arm: a concrete entity or an
/// interface (union relationships fan out into one arm per member).
struct Arm<'m> {
    prefix: String,
    props: Option<&'m RelationshipProperties>,
    list: bool,
    target: ArmTarget<'m>,
}

enum ArmTarget<'m> {
    Concrete(&'m ConcreteEntity),
    Interface(&'m CompositeEntity),
}
impl ArmTarget<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Concrete(entity) => entity.name(),
            Self::Interface(composite) => composite.name(),
        }
    }
}

/// Derives the generated GraphQL surface from a schema model.
pub(crate) struct SurfaceBuilder<'m> {
    model: &'m SchemaModel,
    mutation: Vec<GeneratedField>,
    query: Vec<GeneratedField>,
    subscription: Vec<GeneratedField>,
    types: BTreeMap<String, GeneratedType>,
}
impl<'m> SurfaceBuilder<'m> {
    pub(crate) fn build(model: &'m SchemaModel) -> GeneratedSchema {
        let mut builder = Self {
            model,
            mutation: vec![],
            query: vec![],
            subscription: vec![],
            types: BTreeMap::new(),
        };

        builder.shared_types();
        for (name, values) in model.enums() {
            builder.add(name, GeneratedTypeKind::Enum { values: values.clone() }, vec![]);
        }
        for entity in model.concrete_entities().values() {
            builder.concrete(entity);
        }
        for composite in model.composites().values() {
            builder.composite(composite);
        }
        for props in model.all_relationship_properties().values() {
            builder.relationship_properties(props);
        }

        let query = std::mem::take(&mut builder.query);
        builder.object("Query", query);
        let mutation = std::mem::take(&mut builder.mutation);
        if !mutation.is_empty() {
            builder.object("Mutation", mutation);
        }
        let subscription = std::mem::take(&mut builder.subscription);
        if !subscription.is_empty() {
            builder.object("Subscription", subscription);
        }

        GeneratedSchema { types: builder.types }
    }

    fn add(&mut self, name: &str, kind: GeneratedTypeKind, fields: Vec<GeneratedField>) {
        let mut generated = GeneratedType {
            fields: IndexMap::new(),
            kind,
            name: name.to_string(),
        };
        if generated.is_composite_output() {
            generated.fields.insert("__typename".to_string(), field("__typename", "String!"));
        }
        for f in fields {
            generated.fields.insert(f.name.clone(), f);
        }
        self.types.insert(name.to_string(), generated);
    }

    fn object(&mut self, name: &str, fields: Vec<GeneratedField>) {
        self.add(name, GeneratedTypeKind::Object { interfaces: vec![] }, fields);
    }

    /// Adds an input object unless it would have no fields, in which case
    /// `false` is returned so referencing fields can be skipped.
    fn input(&mut self, name: &str, fields: Vec<GeneratedField>) -> bool {
        if fields.is_empty() {
            return false;
        }
        self.add(name, GeneratedTypeKind::InputObject, fields);
        true
    }

    fn shared_types(&mut self) {
        for name in ScalarKind::builtin_names() {
            if !matches!(*name, "Point" | "CartesianPoint") {
                self.add(name, GeneratedTypeKind::Scalar, vec![]);
            }
        }

        self.add("SortDirection", GeneratedTypeKind::Enum {
            values: vec!["ASC".to_string(), "DESC".to_string()],
        }, vec![]);
        self.add("EventType", GeneratedTypeKind::Enum {
            values: vec!["CREATE".to_string(), "UPDATE".to_string(), "DELETE".to_string()],
        }, vec![]);

        self.object("PageInfo", vec![
            field("hasNextPage", "Boolean!"),
            field("hasPreviousPage", "Boolean!"),
            field("startCursor", "String"),
            field("endCursor", "String"),
        ]);
        self.object("CreateInfo", vec![
            field("nodesCreated", "Int!"),
            field("relationshipsCreated", "Int!"),
        ]);
        self.object("UpdateInfo", vec![
            field("nodesCreated", "Int!"),
            field("nodesDeleted", "Int!"),
            field("relationshipsCreated", "Int!"),
            field("relationshipsDeleted", "Int!"),
        ]);
        self.object("DeleteInfo", vec![
            field("nodesDeleted", "Int!"),
            field("relationshipsDeleted", "Int!"),
        ]);
        self.object("Point", vec![
            field("longitude", "Float!"),
            field("latitude", "Float!"),
            field("height", "Float"),
            field("crs", "String!"),
            field("srid", "Int!"),
        ]);
        self.object("CartesianPoint", vec![
            field("x", "Float!"),
            field("y", "Float!"),
            field("z", "Float"),
            field("crs", "String!"),
            field("srid", "Int!"),
        ]);
        self.input("PointInput", vec![
            field("longitude", "Float!"),
            field("latitude", "Float!"),
            field("height", "Float"),
        ]);
        self.input("CartesianPointInput", vec![
            field("x", "Float!"),
            field("y", "Float!"),
            field("z", "Float"),
        ]);
        self.input("PointDistance", vec![
            field("point", "PointInput!"),
            field("distance", "Float!"),
        ]);
        self.input("CartesianPointDistance", vec![
            field("point", "CartesianPointInput!"),
            field("distance", "Float!"),
        ]);
        self.input("QueryOptions", vec![
            field("limit", "Int"),
            field("offset", "Int"),
        ]);

        for kind in [ScalarKind::Int, ScalarKind::Float, ScalarKind::BigInt] {
            let name = kind.graphql_name().to_string();
            let average = if kind == ScalarKind::Int { "Float" } else { name.as_str() };
            self.object(&format!("{name}AggregateSelection"), vec![
                field("max", &name),
                field("min", &name),
                field("average", average),
                field("sum", &name),
            ]);
        }
        for kind in [ScalarKind::String, ScalarKind::ID] {
            let name = kind.graphql_name().to_string();
            self.object(&format!("{name}AggregateSelection"), vec![
                field("shortest", &name),
                field("longest", &name),
            ]);
        }
        for kind in [
            ScalarKind::Date,
            ScalarKind::DateTime,
            ScalarKind::Duration,
            ScalarKind::LocalDateTime,
            ScalarKind::LocalTime,
            ScalarKind::Time,
        ] {
            let name = kind.graphql_name().to_string();
            self.object(&format!("{name}AggregateSelection"), vec![
                field("min", &name),
                field("max", &name),
            ]);
        }
    }

    fn where_type(target: &EntityRef) -> String {
        format!("{}Where", target.name())
    }

    fn options_type(&self, target: &EntityRef) -> String {
        match target {
            EntityRef::Union(_) => "QueryOptions".to_string(),
            other => format!("{}Options", other.name()),
        }
    }

    fn attribute_where_fields(attributes: &IndexMap<String, Attribute>) -> Vec<GeneratedField> {
        let mut fields = vec![];
        for attr in attributes.values() {
            for (key, input_type) in operator::filter_fields(attr.name(), attr.attr_type()) {
                let mut f = field(key.as_str(), &input_type);
                if key.contains("_NOT") {
                    f = f.deprecated("Negated filters are deprecated; use NOT instead");
                }
                fields.push(f);
            }
        }
        fields
    }

    fn logical_fields(fields: &mut Vec<GeneratedField>, input_name: &str) {
        fields.push(field("AND", &format!("[{input_name}!]")));
        fields.push(field("OR", &format!("[{input_name}!]")));
        fields.push(field("NOT", input_name));
    }

    fn sort_fields(attributes: &IndexMap<String, Attribute>) -> Vec<GeneratedField> {
        attributes.values()
            .filter(|attr| !attr.attr_type().is_list() && !attr.attr_type().kind().is_spatial())
            .map(|attr| field(attr.name(), "SortDirection"))
            .collect()
    }

    fn aggregate_selection_fields(attributes: &IndexMap<String, Attribute>) -> Vec<GeneratedField> {
        attributes.values()
            .filter(|attr| !attr.attr_type().is_list() && !attr.is_computed())
            .filter_map(|attr| attr.attr_type().kind().aggregate_selection_name()
                .map(|selection| field(attr.name(), &format!("{selection}!"))))
            .collect()
    }

    /// Fields of a create input: client-writable attributes, required when
    /// declared non-null without a default.
    fn create_attribute_fields(attributes: &IndexMap<String, Attribute>) -> Vec<GeneratedField> {
        attributes.values()
            .filter(|attr| attr.is_client_writable())
            .map(|attr| {
                let attr_type = if attr.default_value().is_some() {
                    attr.attr_type().as_nullable()
                } else {
                    attr.attr_type().clone()
                };
                field(attr.name(), &attr_type.input_type_string())
            })
            .collect()
    }

    fn update_attribute_fields(attributes: &IndexMap<String, Attribute>) -> Vec<GeneratedField> {
        let mut fields = vec![];
        for attr in attributes.values().filter(|attr| attr.is_client_writable()) {
            let attr_type = attr.attr_type().as_nullable();
            fields.push(field(attr.name(), &attr_type.input_type_string()));
            let kind = attr_type.kind();
            if attr_type.is_list() {
                fields.push(field(
                    format!("{}_PUSH", attr.name()),
                    &attr_type.input_type_string(),
                ));
                fields.push(field(format!("{}_POP", attr.name()), "Int"));
                continue;
            }
            match kind {
                ScalarKind::Int | ScalarKind::BigInt => {
                    for op in ["_INCREMENT", "_DECREMENT"] {
                        fields.push(field(format!("{}{op}", attr.name()), kind.graphql_name()));
                    }
                },
                ScalarKind::Float => {
                    for op in ["_ADD", "_SUBTRACT", "_MULTIPLY", "_DIVIDE"] {
                        fields.push(field(format!("{}{op}", attr.name()), "Float"));
                    }
                },
                _ => (),
            }
        }
        fields
    }

    fn non_empty(mut fields: Vec<GeneratedField>) -> Vec<GeneratedField> {
        if fields.is_empty() {
            fields.push(field("_emptyInput", "Boolean"));
        }
        fields
    }

    fn concrete(&mut self, entity: &'m ConcreteEntity) {
        let names = EntityNames::new(entity.name(), entity.plural());
        let name = entity.name();
        let where_name = names.where_type();

        // Object type
        let mut object_fields = vec![];
        for attr in entity.attributes().values() {
            object_fields.push(field(attr.name(), &attr.attr_type().to_string()));
        }
        for rel in entity.relationships().values() {
            object_fields.extend(self.relationship_output_fields(name, rel.field_name(), rel.target(), rel.is_list(), rel.is_nullable(), rel.aggregate()));
        }
        self.add(
            name,
            GeneratedTypeKind::Object { interfaces: entity.interfaces().to_vec() },
            object_fields,
        );

        // Relationship types
        let model = self.model;
        for rel in entity.relationships().values() {
            let props = rel.properties()
                .and_then(|props| model.relationship_properties(props));
            self.relationship_types(name, rel.field_name(), rel.target(), rel.is_list(), props, rel.aggregate());
        }

        // Where
        let mut where_fields = Self::attribute_where_fields(entity.attributes());
        for rel in entity.relationships().values() {
            where_fields.extend(Self::relationship_where_fields(name, rel.field_name(), rel.target(), rel.is_list(), rel.aggregate()));
        }
        Self::logical_fields(&mut where_fields, &where_name);
        self.input(&where_name, where_fields);

        // Sort and options
        let sort_name = format!("{name}Sort");
        let has_sort = self.input(&sort_name, Self::sort_fields(entity.attributes()));
        let mut option_fields = vec![field("limit", "Int"), field("offset", "Int")];
        if has_sort {
            option_fields.push(field("sort", &format!("[{sort_name}!]")));
        }
        self.input(&format!("{name}Options"), option_fields);

        // Create / update
        let mut create_fields = Self::create_attribute_fields(entity.attributes());
        let mut update_fields = Self::update_attribute_fields(entity.attributes());
        let mut connect_fields = vec![];
        let mut disconnect_fields = vec![];
        let mut delete_fields = vec![];
        let mut relation_fields = vec![];
        for rel in entity.relationships().values() {
            let prefix = naming::relationship_prefix(name, rel.field_name());
            let wrap = |type_name: String| if rel.is_list() {
                format!("[{type_name}!]")
            } else {
                type_name
            };
            match rel.target() {
                EntityRef::Union(_) => {
                    create_fields.push(field(rel.field_name(), &format!("{prefix}CreateInput")));
                    update_fields.push(field(rel.field_name(), &format!("{prefix}UpdateInput")));
                    connect_fields.push(field(rel.field_name(), &format!("{prefix}ConnectInput")));
                    disconnect_fields.push(field(rel.field_name(), &format!("{prefix}DisconnectInput")));
                    delete_fields.push(field(rel.field_name(), &format!("{prefix}DeleteInput")));
                    relation_fields.push(field(rel.field_name(), &format!("{prefix}CreateFieldInput")));
                },
                _ => {
                    create_fields.push(field(rel.field_name(), &format!("{prefix}FieldInput")));
                    update_fields.push(field(rel.field_name(), &wrap(format!("{prefix}UpdateFieldInput"))));
                    connect_fields.push(field(rel.field_name(), &wrap(format!("{prefix}ConnectFieldInput"))));
                    disconnect_fields.push(field(rel.field_name(), &wrap(format!("{prefix}DisconnectFieldInput"))));
                    delete_fields.push(field(rel.field_name(), &wrap(format!("{prefix}DeleteFieldInput"))));
                    relation_fields.push(field(rel.field_name(), &wrap(format!("{prefix}CreateFieldInput"))));
                },
            }
        }
        self.input(&format!("{name}CreateInput"), Self::non_empty(create_fields));
        self.input(&format!("{name}UpdateInput"), Self::non_empty(update_fields));
        let has_connect = self.input(&format!("{name}ConnectInput"), connect_fields);
        let has_disconnect = self.input(&format!("{name}DisconnectInput"), disconnect_fields);
        let has_delete = self.input(&format!("{name}DeleteInput"), delete_fields);
        let has_relation = self.input(&format!("{name}RelationInput"), relation_fields);
        self.input(&format!("{name}ConnectWhere"), vec![field("node", &format!("{where_name}!"))]);

        let unique_fields = entity.unique_attributes()
            .map(|attr| field(attr.name(), &attr.attr_type().as_nullable().input_type_string()))
            .collect::<Vec<_>>();
        if self.input(&format!("{name}UniqueWhere"), unique_fields) {
            self.input(
                &format!("{name}ConnectOrCreateWhere"),
                vec![field("node", &format!("{name}UniqueWhere!"))],
            );
            self.input(
                &format!("{name}OnCreateInput"),
                Self::non_empty(Self::create_attribute_fields(entity.attributes())),
            );
        }

        // Outputs
        let mut aggregate_fields = vec![field("count", "Int!")];
        aggregate_fields.extend(Self::aggregate_selection_fields(entity.attributes()));
        self.object(&names.aggregate_selection_type(), aggregate_fields);
        self.object(&names.connection_type(), vec![
            field("edges", &format!("[{}!]!", names.edge_type())),
            field("totalCount", "Int!"),
            field("pageInfo", "PageInfo!"),
        ]);
        self.object(&names.edge_type(), vec![
            field("cursor", "String!"),
            field("node", &format!("{name}!")),
        ]);
        self.object(&names.create_response_type(), vec![
            field("info", "CreateInfo!"),
            field(names.response_nodes_field(), &format!("[{name}!]!")),
        ]);
        self.object(&names.update_response_type(), vec![
            field("info", "UpdateInfo!"),
            field(names.response_nodes_field(), &format!("[{name}!]!")),
        ]);

        // Subscriptions
        let payload_fields = entity.attributes().values()
            .filter(|attr| !attr.is_computed())
            .map(|attr| field(attr.name(), &attr.attr_type().to_string()))
            .collect::<Vec<_>>();
        self.object(&names.event_payload_type(), payload_fields);
        let payload = format!("{}!", names.event_payload_type());
        self.object(&names.created_event_type(), vec![
            field("event", "EventType!"),
            field("timestamp", "Float!"),
            field(names.created_event_field(), &payload),
        ]);
        self.object(&names.updated_event_type(), vec![
            field("event", "EventType!"),
            field("timestamp", "Float!"),
            field("previousState", &payload),
            field(names.updated_event_field(), &payload),
        ]);
        self.object(&names.deleted_event_type(), vec![
            field("event", "EventType!"),
            field("timestamp", "Float!"),
            field(names.deleted_event_field(), &payload),
        ]);
        let subscription_where = format!("{name}SubscriptionWhere");
        let mut subscription_where_fields = Self::attribute_where_fields(
            &entity.attributes().iter()
                .filter(|(_, attr)| !attr.is_computed())
                .map(|(key, attr)| (key.clone(), attr.clone()))
                .collect(),
        );
        Self::logical_fields(&mut subscription_where_fields, &subscription_where);
        self.input(&subscription_where, subscription_where_fields);

        // Root fields
        self.query.push(
            field(names.read_field(), &format!("[{name}!]!"))
                .arg("where", &where_name)
                .arg("options", &format!("{name}Options")),
        );
        let mut connection = field(names.connection_field(), &format!("{}!", names.connection_type()))
            .arg("where", &where_name)
            .arg("first", "Int")
            .arg("after", "String");
        if has_sort {
            connection = connection.arg("sort", &format!("[{sort_name}!]"));
        }
        self.query.push(connection);
        self.query.push(
            field(names.aggregate_field(), &format!("{}!", names.aggregate_selection_type()))
                .arg("where", &where_name),
        );

        self.mutation.push(
            field(names.create_field(), &format!("{}!", names.create_response_type()))
                .arg("input", &format!("[{name}CreateInput!]!")),
        );
        let mut update = field(names.update_field(), &format!("{}!", names.update_response_type()))
            .arg("where", &where_name)
            .arg("update", &format!("{name}UpdateInput"));
        if has_connect {
            update = update.arg("connect", &format!("{name}ConnectInput"));
        }
        if has_disconnect {
            update = update.arg("disconnect", &format!("{name}DisconnectInput"));
        }
        if has_relation {
            update = update.arg("create", &format!("{name}RelationInput"));
        }
        if has_delete {
            update = update.arg("delete", &format!("{name}DeleteInput"));
        }
        self.mutation.push(update);
        let mut delete = field(names.delete_field(), "DeleteInfo!").arg("where", &where_name);
        if has_delete {
            delete = delete.arg("delete", &format!("{name}DeleteInput"));
        }
        self.mutation.push(delete);

        for (field_name, event_type) in [
            (names.created_field(), names.created_event_type()),
            (names.updated_field(), names.updated_event_type()),
            (names.deleted_field(), names.deleted_event_type()),
        ] {
            self.subscription.push(
                field(field_name, &format!("{event_type}!")).arg("where", &subscription_where),
            );
        }
    }

    fn relationship_output_fields(
        &self,
        source: &str,
        field_name: &str,
        target: &EntityRef,
        list: bool,
        nullable: bool,
        aggregate: bool,
    ) -> Vec<GeneratedField> {
        let prefix = naming::relationship_prefix(source, field_name);
        let target_name = target.name();
        let field_type = match (list, nullable) {
            (true, _) => format!("[{target_name}!]!"),
            (false, true) => target_name.to_string(),
            (false, false) => format!("{target_name}!"),
        };

        let mut rel_field = field(field_name, &field_type)
            .arg("where", &Self::where_type(target));
        if list {
            rel_field = rel_field.arg("options", &self.options_type(target));
        }
        let mut fields = vec![rel_field];

        if aggregate {
            fields.push(
                field(
                    format!("{field_name}Aggregate"),
                    &Self::aggregation_selection_name(source, target_name, field_name),
                )
                .arg("where", &Self::where_type(target)),
            );
        }

        let mut connection = field(format!("{field_name}Connection"), &format!("{prefix}Connection!"))
            .arg("where", &format!("{prefix}ConnectionWhere"))
            .arg("first", "Int")
            .arg("after", "String");
        if !matches!(target, EntityRef::Union(_)) {
            connection = connection.arg("sort", &format!("[{prefix}ConnectionSort!]"));
        }
        fields.push(connection);
        fields
    }

    fn aggregation_selection_name(source: &str, target: &str, field_name: &str) -> String {
        format!("{source}{target}{}AggregationSelection", naming::upper_first(field_name))
    }

    fn relationship_where_fields(
        source: &str,
        field_name: &str,
        target: &EntityRef,
        list: bool,
        aggregate: bool,
    ) -> Vec<GeneratedField> {
        let prefix = naming::relationship_prefix(source, field_name);
        let target_where = Self::where_type(target);
        let connection_where = format!("{prefix}ConnectionWhere");
        let legacy = "Use the _SOME/_NONE/_ALL/_SINGLE filters instead";

        let mut fields = vec![];
        if list {
            fields.push(field(field_name, &target_where).deprecated(legacy));
            fields.push(field(format!("{field_name}_NOT"), &target_where).deprecated(legacy));
            for (suffix, _) in operator::QUANTIFIER_SUFFIXES {
                fields.push(field(format!("{field_name}{suffix}"), &target_where));
            }
            fields.push(field(format!("{field_name}Connection"), &connection_where).deprecated(legacy));
            fields.push(field(format!("{field_name}Connection_NOT"), &connection_where).deprecated(legacy));
            for (suffix, _) in operator::QUANTIFIER_SUFFIXES {
                fields.push(field(format!("{field_name}Connection{suffix}"), &connection_where));
            }
        } else {
            fields.push(field(field_name, &target_where));
            fields.push(field(format!("{field_name}_NOT"), &target_where));
            fields.push(field(format!("{field_name}Connection"), &connection_where));
            fields.push(field(format!("{field_name}Connection_NOT"), &connection_where));
        }
        if aggregate {
            fields.push(field(format!("{field_name}Aggregate"), &format!("{prefix}AggregateInput")));
        }
        fields
    }

    fn relationship_types(
        &mut self,
        source: &str,
        field_name: &str,
        target: &EntityRef,
        list: bool,
        props: Option<&'m RelationshipProperties>,
        aggregate: bool,
    ) {
        let prefix = naming::relationship_prefix(source, field_name);
        let target_name = target.name();

        let mut relationship_fields = vec![
            field("cursor", "String!"),
            field("node", &format!("{target_name}!")),
        ];
        if let Some(props) = props {
            relationship_fields.push(field("properties", &format!("{}!", props.name())));
        }
        self.object(&format!("{prefix}Relationship"), relationship_fields);
        self.object(&format!("{prefix}Connection"), vec![
            field("edges", &format!("[{prefix}Relationship!]!")),
            field("totalCount", "Int!"),
            field("pageInfo", "PageInfo!"),
        ]);

        let arms = self.arms(&prefix, target, list, props);
        for arm in &arms {
            self.arm_types(arm);
        }

        match target {
            EntityRef::Union(_) => {
                let member_fields = |suffix: &str, list_wrap: bool| arms.iter()
                    .map(|arm| {
                        let arm_type = format!("{}{suffix}", arm.prefix);
                        let arm_type = if list_wrap && list { format!("[{arm_type}!]") } else { arm_type };
                        field(arm.target.name(), &arm_type)
                    })
                    .collect::<Vec<_>>();
                let connection_where = member_fields("ConnectionWhere", false);
                self.input(&format!("{prefix}ConnectionWhere"), connection_where);
                let create = member_fields("FieldInput", false);
                self.input(&format!("{prefix}CreateInput"), create);
                let update = member_fields("UpdateFieldInput", true);
                self.input(&format!("{prefix}UpdateInput"), update);
                let connect = member_fields("ConnectFieldInput", true);
                self.input(&format!("{prefix}ConnectInput"), connect);
                let disconnect = member_fields("DisconnectFieldInput", true);
                self.input(&format!("{prefix}DisconnectInput"), disconnect);
                let delete = member_fields("DeleteFieldInput", true);
                self.input(&format!("{prefix}DeleteInput"), delete);
                let relation = member_fields("CreateFieldInput", true);
                self.input(&format!("{prefix}CreateFieldInput"), relation);
            },
            EntityRef::Concrete(_) | EntityRef::Interface(_) => {
                let target_attributes = match target {
                    EntityRef::Concrete(name) => self.model.concrete(name).map(|e| e.attributes()),
                    _ => self.model.composite(target_name).map(|c| c.attributes()),
                };
                let mut sort_fields = vec![];
                if target_attributes.is_some_and(|attrs| !Self::sort_fields(attrs).is_empty()) {
                    sort_fields.push(field("node", &format!("{target_name}Sort")));
                }
                if let Some(props) = props {
                    if !Self::sort_fields(props.attributes()).is_empty() {
                        sort_fields.push(field("edge", &format!("{}Sort", props.name())));
                    }
                }
                self.input(&format!("{prefix}ConnectionSort"), sort_fields);
            },
        }

        let model = self.model;
        if aggregate {
            if let Some(entity) = model.concrete(target_name) {
                self.aggregate_types(source, field_name, entity, props);
            }
        }
    }

    fn arms(
        &self,
        prefix: &str,
        target: &EntityRef,
        list: bool,
        props: Option<&'m RelationshipProperties>,
    ) -> Vec<Arm<'m>> {
        let model = self.model;
        match target {
            EntityRef::Concrete(name) => model.concrete(name)
                .map(|entity| Arm {
                    prefix: prefix.to_string(),
                    props,
                    list,
                    target: ArmTarget::Concrete(entity),
                })
                .into_iter()
                .collect(),
            EntityRef::Interface(name) => model.composite(name)
                .map(|composite| Arm {
                    prefix: prefix.to_string(),
                    props,
                    list,
                    target: ArmTarget::Interface(composite),
                })
                .into_iter()
                .collect(),
            EntityRef::Union(_) => model.concrete_members(target).into_iter()
                .map(|member| Arm {
                    prefix: format!("{prefix}{}", member.name()),
                    props,
                    list,
                    target: ArmTarget::Concrete(member),
                })
                .collect(),
        }
    }

    /// Nested mutation inputs for one relationship arm.
    fn arm_types(&mut self, arm: &Arm<'m>) {
        let prefix = arm.prefix.as_str();
        let target = arm.target.name();
        let wrap = |type_name: String| if arm.list { format!("[{type_name}!]") } else { type_name };
        let edge_create = arm.props.map(|props| format!("{}CreateInput", props.name()));
        let edge_update = arm.props.map(|props| format!("{}UpdateInput", props.name()));
        let edge_where = arm.props.map(|props| format!("{}Where", props.name()));

        let connection_where = format!("{prefix}ConnectionWhere");
        let mut where_fields = vec![field("node", &format!("{target}Where"))];
        if let Some(edge_where) = &edge_where {
            where_fields.push(field("edge", edge_where));
        }
        Self::logical_fields(&mut where_fields, &connection_where);
        self.input(&connection_where, where_fields);

        let mut create_fields = vec![field("node", &format!("{target}CreateInput!"))];
        if let Some(edge_create) = &edge_create {
            create_fields.push(field("edge", edge_create));
        }
        self.input(&format!("{prefix}CreateFieldInput"), create_fields);

        let (has_nested_connect, has_nested_disconnect, has_nested_delete, has_unique) = match &arm.target {
            ArmTarget::Concrete(entity) => (
                !entity.relationships().is_empty(),
                !entity.relationships().is_empty(),
                !entity.relationships().is_empty(),
                entity.unique_attributes().next().is_some(),
            ),
            ArmTarget::Interface(_) => (false, false, false, false),
        };

        let mut connect_fields = vec![field("where", &format!("{target}ConnectWhere"))];
        if let Some(edge_create) = &edge_create {
            connect_fields.push(field("edge", edge_create));
        }
        if has_nested_connect {
            connect_fields.push(field("connect", &format!("[{target}ConnectInput!]")));
        }
        self.input(&format!("{prefix}ConnectFieldInput"), connect_fields);

        let mut field_input = vec![
            field("create", &wrap(format!("{prefix}CreateFieldInput"))),
            field("connect", &wrap(format!("{prefix}ConnectFieldInput"))),
        ];
        if has_unique {
            let mut on_create = vec![field("node", &format!("{target}OnCreateInput!"))];
            if let Some(edge_create) = &edge_create {
                on_create.push(field("edge", edge_create));
            }
            self.input(&format!("{prefix}ConnectOrCreateFieldInputOnCreate"), on_create);
            self.input(&format!("{prefix}ConnectOrCreateFieldInput"), vec![
                field("where", &format!("{target}ConnectOrCreateWhere!")),
                field("onCreate", &format!("{prefix}ConnectOrCreateFieldInputOnCreate!")),
            ]);
            field_input.push(field("connectOrCreate", &wrap(format!("{prefix}ConnectOrCreateFieldInput"))));
        }
        self.input(&format!("{prefix}FieldInput"), field_input.clone());

        let mut update_connection = vec![field("node", &format!("{target}UpdateInput"))];
        if let Some(edge_update) = &edge_update {
            update_connection.push(field("edge", edge_update));
        }
        self.input(&format!("{prefix}UpdateConnectionInput"), update_connection);

        let mut disconnect_fields = vec![field("where", &connection_where)];
        if has_nested_disconnect {
            disconnect_fields.push(field("disconnect", &format!("{target}DisconnectInput")));
        }
        self.input(&format!("{prefix}DisconnectFieldInput"), disconnect_fields);

        let mut delete_fields = vec![field("where", &connection_where)];
        if has_nested_delete {
            delete_fields.push(field("delete", &format!("{target}DeleteInput")));
        }
        self.input(&format!("{prefix}DeleteFieldInput"), delete_fields);

        let mut update_fields = vec![
            field("where", &connection_where),
            field("update", &format!("{prefix}UpdateConnectionInput")),
        ];
        update_fields.extend(field_input);
        update_fields.push(field("disconnect", &wrap(format!("{prefix}DisconnectFieldInput"))));
        update_fields.push(field("delete", &wrap(format!("{prefix}DeleteFieldInput"))));
        self.input(&format!("{prefix}UpdateFieldInput"), update_fields);
    }

    fn aggregate_types(
        &mut self,
        source: &str,
        field_name: &str,
        target: &ConcreteEntity,
        props: Option<&RelationshipProperties>,
    ) {
        let prefix = naming::relationship_prefix(source, field_name);
        let selection_prefix = format!("{source}{}{}", target.name(), naming::upper_first(field_name));

        let mut selection_fields = vec![field("count", "Int!")];
        let node_fields = Self::aggregate_selection_fields(target.attributes());
        if !node_fields.is_empty() {
            let node_selection = format!("{selection_prefix}NodeAggregateSelection");
            self.object(&node_selection, node_fields);
            selection_fields.push(field("node", &node_selection));
        }
        if let Some(props) = props {
            let edge_fields = Self::aggregate_selection_fields(props.attributes());
            if !edge_fields.is_empty() {
                let edge_selection = format!("{selection_prefix}EdgeAggregateSelection");
                self.object(&edge_selection, edge_fields);
                selection_fields.push(field("edge", &edge_selection));
            }
        }
        self.object(
            &Self::aggregation_selection_name(source, target.name(), field_name),
            selection_fields,
        );

        let aggregate_input = format!("{prefix}AggregateInput");
        let mut input_fields = vec![field("count", "Int")];
        for (suffix, _) in operator::AGGREGATE_COMPARATORS.iter().filter(|(s, _)| *s != "_EQUAL") {
            input_fields.push(field(format!("count{suffix}"), "Int"));
        }

        let aggregation_where = |attributes: &IndexMap<String, Attribute>| attributes.values()
            .filter(|attr| !attr.attr_type().is_list() && !attr.is_computed())
            .flat_map(|attr| operator::aggregate_filter_fields(attr.name(), attr.attr_type().kind()))
            .map(|(key, input_type)| field(key, &input_type))
            .collect::<Vec<_>>();

        let node_where = format!("{prefix}NodeAggregationWhereInput");
        let mut node_where_fields = aggregation_where(target.attributes());
        if !node_where_fields.is_empty() {
            Self::logical_fields(&mut node_where_fields, &node_where);
            self.input(&node_where, node_where_fields);
            input_fields.push(field("node", &node_where));
        }
        if let Some(props) = props {
            let edge_where = format!("{prefix}EdgeAggregationWhereInput");
            let mut edge_where_fields = aggregation_where(props.attributes());
            if !edge_where_fields.is_empty() {
                Self::logical_fields(&mut edge_where_fields, &edge_where);
                self.input(&edge_where, edge_where_fields);
                input_fields.push(field("edge", &edge_where));
            }
        }
        Self::logical_fields(&mut input_fields, &aggregate_input);
        self.input(&aggregate_input, input_fields);
    }

    fn composite(&mut self, composite: &'m CompositeEntity) {
        let name = composite.name();
        let names = EntityNames::new(name, composite.plural());
        let where_name = names.where_type();

        if !composite.is_interface() {
            self.add(
                name,
                GeneratedTypeKind::Union { members: composite.members().to_vec() },
                vec![],
            );
            let where_fields = composite.members().iter()
                .map(|member| field(member.as_str(), &format!("{member}Where")))
                .collect();
            self.input(&where_name, where_fields);
            self.query.push(
                field(names.read_field(), &format!("[{name}!]!"))
                    .arg("where", &where_name)
                    .arg("options", "QueryOptions"),
            );
            return;
        }

        let mut fields = vec![];
        for attr in composite.attributes().values() {
            fields.push(field(attr.name(), &attr.attr_type().to_string()));
        }
        for declared in composite.declared_relationships().values() {
            fields.extend(self.relationship_output_fields(
                name,
                declared.field_name(),
                declared.target(),
                declared.is_list(),
                declared.is_nullable(),
                false,
            ));
        }
        self.add(
            name,
            GeneratedTypeKind::Interface { members: composite.members().to_vec() },
            fields,
        );
        for declared in composite.declared_relationships().values() {
            self.relationship_types(
                name,
                declared.field_name(),
                declared.target(),
                declared.is_list(),
                None,
                false,
            );
        }

        let implementation = format!("{name}Implementation");
        self.add(&implementation, GeneratedTypeKind::Enum {
            values: composite.members().to_vec(),
        }, vec![]);

        let mut where_fields = Self::attribute_where_fields(composite.attributes());
        where_fields.push(field("typename_IN", &format!("[{implementation}!]")));
        for declared in composite.declared_relationships().values() {
            where_fields.extend(Self::relationship_where_fields(
                name,
                declared.field_name(),
                declared.target(),
                declared.is_list(),
                false,
            ));
        }
        Self::logical_fields(&mut where_fields, &where_name);
        self.input(&where_name, where_fields);

        let sort_name = format!("{name}Sort");
        let has_sort = self.input(&sort_name, Self::sort_fields(composite.attributes()));
        let mut option_fields = vec![field("limit", "Int"), field("offset", "Int")];
        if has_sort {
            option_fields.push(field("sort", &format!("[{sort_name}!]")));
        }
        self.input(&format!("{name}Options"), option_fields);

        let create_fields = composite.members().iter()
            .map(|member| field(member.as_str(), &format!("{member}CreateInput")))
            .collect();
        self.input(&format!("{name}CreateInput"), create_fields);
        self.input(
            &format!("{name}UpdateInput"),
            Self::non_empty(Self::update_attribute_fields(composite.attributes())),
        );
        self.input(&format!("{name}ConnectWhere"), vec![field("node", &format!("{where_name}!"))]);

        let mut aggregate_fields = vec![field("count", "Int!")];
        aggregate_fields.extend(Self::aggregate_selection_fields(composite.attributes()));
        self.object(&names.aggregate_selection_type(), aggregate_fields);
        self.object(&names.connection_type(), vec![
            field("edges", &format!("[{}!]!", names.edge_type())),
            field("totalCount", "Int!"),
            field("pageInfo", "PageInfo!"),
        ]);
        self.object(&names.edge_type(), vec![
            field("cursor", "String!"),
            field("node", &format!("{name}!")),
        ]);

        self.query.push(
            field(names.read_field(), &format!("[{name}!]!"))
                .arg("where", &where_name)
                .arg("options", &format!("{name}Options")),
        );
        let mut connection = field(names.connection_field(), &format!("{}!", names.connection_type()))
            .arg("where", &where_name)
            .arg("first", "Int")
            .arg("after", "String");
        if has_sort {
            connection = connection.arg("sort", &format!("[{sort_name}!]"));
        }
        self.query.push(connection);
        self.query.push(
            field(names.aggregate_field(), &format!("{}!", names.aggregate_selection_type()))
                .arg("where", &where_name),
        );
    }

    fn relationship_properties(&mut self, props: &RelationshipProperties) {
        let name = props.name();
        let mut fields = vec![];
        for attr in props.attributes().values() {
            fields.push(field(attr.name(), &attr.attr_type().to_string()));
        }
        self.object(name, fields);

        let where_name = format!("{name}Where");
        let mut where_fields = Self::attribute_where_fields(props.attributes());
        Self::logical_fields(&mut where_fields, &where_name);
        self.input(&where_name, where_fields);
        self.input(
            &format!("{name}CreateInput"),
            Self::non_empty(Self::create_attribute_fields(props.attributes())),
        );
        self.input(
            &format!("{name}UpdateInput"),
            Self::non_empty(Self::update_attribute_fields(props.attributes())),
        );
        self.input(&format!("{name}Sort"), Self::sort_fields(props.attributes()));
    }
}
