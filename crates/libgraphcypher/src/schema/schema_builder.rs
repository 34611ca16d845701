use crate::ast;
use crate::authorization;
use crate::authorization::AuthenticationAnnotation;
use crate::authorization::AuthorizationAnnotation;
use crate::file_reader;
use crate::loc;
use crate::schema::Attribute;
use crate::schema::AttributeType;
use crate::schema::CallbackRegistry;
use crate::schema::CompositeEntity;
use crate::schema::CompositeKind;
use crate::schema::ConcreteEntity;
use crate::schema::CypherAnnotation;
use crate::schema::DeclaredRelationship;
use crate::schema::Direction;
use crate::schema::EntityRef;
use crate::schema::JwtClaim;
use crate::schema::JwtShape;
use crate::schema::LimitAnnotation;
use crate::schema::PopulatedBy;
use crate::schema::Relationship;
use crate::schema::RelationshipProperties;
use crate::schema::ScalarKind;
use crate::schema::SchemaModel;
use crate::schema::SchemaValidationError;
use crate::schema::WriteOperation;
use crate::schema::directive_args;
use crate::schema::naming;
use crate::value;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, SchemaBuildError>;

const RESERVED_TYPE_NAMES: &[&str] = &["Mutation", "Query", "Subscription"];

/// Loads type definitions from files or strings and compiles them into a
/// [`SchemaModel`].
#[derive(Debug)]
pub struct SchemaBuilder {
    callback_names: HashSet<String>,
    documents: Vec<(PathBuf, ast::schema::Document)>,
    str_load_counter: u16,
}
impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            callback_names: HashSet::new(),
            documents: vec![],
            str_load_counter: 0,
        }
    }

    /// Makes the registered callback names known to `@populatedBy`
    /// validation.
    pub fn with_callbacks(mut self, callbacks: &CallbackRegistry) -> Self {
        self.callback_names.extend(callbacks.names().map(str::to_string));
        self
    }

    pub fn load_file(self, file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let content = file_reader::read_type_defs(file_path)?;
        self.load_str(Some(file_path.to_path_buf()), content.as_str())
    }

    pub fn load_files<P: AsRef<Path>>(
        mut self,
        file_paths: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        for file_path in file_paths {
            self = self.load_file(file_path)?;
        }
        Ok(self)
    }

    pub fn load_str(
        mut self,
        file_path: Option<PathBuf>,
        content: &str,
    ) -> Result<Self> {
        let file_path = file_path.unwrap_or_else(|| {
            let ctr = self.str_load_counter;
            self.str_load_counter += 1;
            PathBuf::from(format!("str://{ctr}"))
        });

        let document = graphql_parser::schema::parse_schema::<String>(content)
            .map_err(|err| SchemaBuildError::ParseError {
                file: file_path.to_path_buf(),
                err: err.to_string(),
            })?
            .into_static();

        self.documents.push((file_path, document));
        Ok(self)
    }

    pub fn build(self) -> Result<SchemaModel> {
        let definitions = Definitions::collect(&self.documents)?;
        let mut compiler = ModelCompiler {
            callback_names: &self.callback_names,
            defs: &definitions,
            errors: vec![],
            model: SchemaModel::default(),
        };
        compiler.compile();

        let ModelCompiler { mut errors, model, .. } = compiler;
        if errors.is_empty() {
            errors.extend(validate_authorization(&model));
        }
        if !errors.is_empty() {
            return Err(SchemaBuildError::ValidationErrors { errors });
        }

        tracing::debug!(
            concrete = model.concrete.len(),
            composites = model.composites.len(),
            "built schema model",
        );
        Ok(model)
    }
}
impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaBuildError {
    #[error(
        "Multiple definitions of the type `{type_name}`:\n\
        1) {def1}\n\
        2) {def2}"
    )]
    DuplicateTypeDefinition {
        type_name: String,
        def1: loc::FilePosition,
        def2: loc::FilePosition,
    },

    #[error("Error parsing schema string (file: {}): {err}", file.display())]
    ParseError {
        file: PathBuf,
        err: String,
    },

    #[error("Failure while trying to read a schema file from disk")]
    SchemaFileReadError(#[from] Box<file_reader::TypeDefsReadError>),

    #[error(
        "Found {} error{} in the type definitions:\n{}",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" },
        errors.iter()
            .map(|err| format!("  * {err}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )]
    ValidationErrors {
        errors: Vec<SchemaValidationError>,
    },
}
impl SchemaBuildError {
    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[SchemaValidationError] {
        match self {
            Self::ValidationErrors { errors } => errors.as_slice(),
            _ => &[],
        }
    }
}
impl From<file_reader::TypeDefsReadError> for SchemaBuildError {
    fn from(err: file_reader::TypeDefsReadError) -> Self {
        Self::SchemaFileReadError(Box::new(err))
    }
}

/// An object, interface or extension field together with where it came from.
struct SourcedField<'a> {
    field: &'a ast::schema::Field,
    file: &'a Path,
}

struct ObjectDef<'a> {
    directives: Vec<&'a ast::schema::Directive>,
    fields: Vec<SourcedField<'a>>,
    interfaces: Vec<String>,
    loc: loc::FilePosition,
    name: String,
}

/// Every type definition of the loaded documents, keyed by name and
/// collected in declaration order.
struct Definitions<'a> {
    enums: IndexMap<String, Vec<String>>,
    interfaces: IndexMap<String, ObjectDef<'a>>,
    objects: IndexMap<String, ObjectDef<'a>>,
    unions: IndexMap<String, (Vec<String>, Vec<&'a ast::schema::Directive>, loc::FilePosition)>,
    unsupported: Vec<SchemaValidationError>,
}
impl<'a> Definitions<'a> {
    fn collect(documents: &'a [(PathBuf, ast::schema::Document)]) -> Result<Self> {
        use graphql_parser::schema::Definition;
        use graphql_parser::schema::TypeDefinition;
        use graphql_parser::schema::TypeExtension;

        let mut defs = Definitions {
            enums: IndexMap::new(),
            interfaces: IndexMap::new(),
            objects: IndexMap::new(),
            unions: IndexMap::new(),
            unsupported: vec![],
        };
        let mut seen: IndexMap<String, loc::FilePosition> = IndexMap::new();
        let mut extensions = vec![];

        for (file, document) in documents {
            for definition in &document.definitions {
                let type_def = match definition {
                    Definition::TypeDefinition(type_def) => type_def,
                    Definition::TypeExtension(TypeExtension::Object(ext)) => {
                        extensions.push((file.as_path(), ext));
                        continue;
                    },
                    Definition::TypeExtension(other) => {
                        let (name, pos) = type_extension_name(other);
                        defs.unsupported.push(SchemaValidationError::UnsupportedDefinition {
                            kind: "Non-object type extension",
                            loc: loc::FilePosition::new(file, pos),
                            name,
                        });
                        continue;
                    },
                    Definition::SchemaDefinition(schema_def) => {
                        defs.unsupported.push(SchemaValidationError::UnsupportedDefinition {
                            kind: "Schema",
                            loc: loc::FilePosition::new(file, schema_def.position),
                            name: "schema".to_string(),
                        });
                        continue;
                    },
                    // Directive definitions are accepted and ignored so that
                    // documents declaring the library directives still load.
                    Definition::DirectiveDefinition(_) => continue,
                };

                let (name, pos) = type_definition_name(type_def);
                let def_loc = loc::FilePosition::new(file, pos);
                if let Some(prev_loc) = seen.get(&name) {
                    return Err(SchemaBuildError::DuplicateTypeDefinition {
                        type_name: name,
                        def1: prev_loc.clone(),
                        def2: def_loc,
                    });
                }
                seen.insert(name.clone(), def_loc.clone());

                match type_def {
                    TypeDefinition::Object(obj) => {
                        defs.objects.insert(name.clone(), ObjectDef {
                            directives: obj.directives.iter().collect(),
                            fields: obj.fields.iter()
                                .map(|field| SourcedField { field, file })
                                .collect(),
                            interfaces: obj.implements_interfaces.clone(),
                            loc: def_loc,
                            name,
                        });
                    },
                    TypeDefinition::Interface(iface) => {
                        defs.interfaces.insert(name.clone(), ObjectDef {
                            directives: iface.directives.iter().collect(),
                            fields: iface.fields.iter()
                                .map(|field| SourcedField { field, file })
                                .collect(),
                            interfaces: iface.implements_interfaces.clone(),
                            loc: def_loc,
                            name,
                        });
                    },
                    TypeDefinition::Union(union_def) => {
                        defs.unions.insert(name, (
                            union_def.types.clone(),
                            union_def.directives.iter().collect(),
                            def_loc,
                        ));
                    },
                    TypeDefinition::Enum(enum_def) => {
                        defs.enums.insert(
                            name,
                            enum_def.values.iter().map(|value| value.name.clone()).collect(),
                        );
                    },
                    TypeDefinition::Scalar(_) => {
                        if !ScalarKind::builtin_names().contains(&name.as_str()) {
                            defs.unsupported.push(SchemaValidationError::UnsupportedDefinition {
                                kind: "Custom scalar",
                                loc: def_loc,
                                name,
                            });
                        }
                    },
                    TypeDefinition::InputObject(_) => {
                        defs.unsupported.push(SchemaValidationError::UnsupportedDefinition {
                            kind: "Input object",
                            loc: def_loc,
                            name,
                        });
                    },
                }
            }
        }

        for (file, ext) in extensions {
            let ext_loc = loc::FilePosition::new(file, ext.position);
            let Some(obj) = defs.objects.get_mut(&ext.name) else {
                defs.unsupported.push(SchemaValidationError::UndefinedExtensionTarget {
                    loc: ext_loc,
                    type_name: ext.name.clone(),
                });
                continue;
            };
            obj.directives.extend(ext.directives.iter());
            obj.fields.extend(ext.fields.iter().map(|field| SourcedField { field, file }));
            obj.interfaces.extend(ext.implements_interfaces.iter().cloned());
        }

        Ok(defs)
    }

    fn is_entity_name(&self, name: &str) -> bool {
        let is_node = self.objects.get(name).is_some_and(|obj| {
            !directive_args::has_any(&obj.directives, "relationshipProperties")
                && !directive_args::has_any(&obj.directives, "jwt")
        });
        is_node || self.interfaces.contains_key(name) || self.unions.contains_key(name)
    }
}

fn type_definition_name(type_def: &ast::schema::TypeDefinition) -> (String, ast::AstPos) {
    use graphql_parser::schema::TypeDefinition;
    match type_def {
        TypeDefinition::Enum(t) => (t.name.clone(), t.position),
        TypeDefinition::InputObject(t) => (t.name.clone(), t.position),
        TypeDefinition::Interface(t) => (t.name.clone(), t.position),
        TypeDefinition::Object(t) => (t.name.clone(), t.position),
        TypeDefinition::Scalar(t) => (t.name.clone(), t.position),
        TypeDefinition::Union(t) => (t.name.clone(), t.position),
    }
}

fn type_extension_name(ext: &ast::schema::TypeExtension) -> (String, ast::AstPos) {
    use graphql_parser::schema::TypeExtension;
    match ext {
        TypeExtension::Enum(t) => (t.name.clone(), t.position),
        TypeExtension::InputObject(t) => (t.name.clone(), t.position),
        TypeExtension::Interface(t) => (t.name.clone(), t.position),
        TypeExtension::Object(t) => (t.name.clone(), t.position),
        TypeExtension::Scalar(t) => (t.name.clone(), t.position),
        TypeExtension::Union(t) => (t.name.clone(), t.position),
    }
}

fn innermost_type_name(field_type: &ast::schema::Type) -> &str {
    use graphql_parser::schema::Type;
    match field_type {
        Type::NamedType(name) => name.as_str(),
        Type::ListType(inner) | Type::NonNullType(inner) => innermost_type_name(inner),
    }
}

/// Where a field being compiled lives; decides which directives apply.
#[derive(Clone, Copy, PartialEq)]
enum FieldOwner {
    Interface,
    Jwt,
    Node,
    RelationshipProperties,
}

enum CompiledField {
    Attribute(Attribute),
    Declared(DeclaredRelationship),
    Relationship(Relationship),
}

struct ModelCompiler<'a> {
    callback_names: &'a HashSet<String>,
    defs: &'a Definitions<'a>,
    errors: Vec<SchemaValidationError>,
    model: SchemaModel,
}
impl<'a> ModelCompiler<'a> {
    fn compile(&mut self) {
        let defs = self.defs;
        self.errors.extend(defs.unsupported.iter().cloned());
        self.model.enums = defs.enums.clone();

        for obj in defs.objects.values() {
            if RESERVED_TYPE_NAMES.contains(&obj.name.as_str()) {
                self.errors.push(SchemaValidationError::ReservedTypeName {
                    loc: obj.loc.clone(),
                    type_name: obj.name.clone(),
                });
                continue;
            }
            if directive_args::has_any(&obj.directives, "relationshipProperties") {
                self.compile_relationship_properties(obj);
            } else if directive_args::has_any(&obj.directives, "jwt") {
                self.compile_jwt(obj);
            } else {
                self.compile_concrete(obj);
            }
        }

        for iface in defs.interfaces.values() {
            self.compile_interface(iface);
        }
        for (name, (members, directives, def_loc)) in &defs.unions {
            self.compile_union(name, members, directives, def_loc);
        }

        self.check_interface_implementations();
    }

    fn compile_concrete(&mut self, obj: &ObjectDef<'_>) {
        let labels = match self.directive_name_list(&obj.directives, "node", "labels", &obj.name, &obj.loc) {
            Some(labels) if !labels.is_empty() => labels,
            _ => vec![obj.name.clone()],
        };
        let plural = self.plural(&obj.directives, &obj.name, &obj.loc);
        let limit = self.limit(&obj.directives, &obj.name, &obj.loc);
        let authorization = self.authorization(&obj.directives, &obj.name, &obj.loc);
        let authentication = directive_args::find_any(&obj.directives, "authentication")
            .and_then(|directive| {
                let parsed = directive_args::arguments(directive)
                    .and_then(|args| AuthenticationAnnotation::from_directive_args(&args));
                match parsed {
                    Ok(annotation) => Some(annotation),
                    Err(detail) => {
                        self.errors.push(SchemaValidationError::InvalidDirective {
                            detail,
                            directive: "authentication".to_string(),
                            loc: obj.loc.clone(),
                            location: obj.name.clone(),
                        });
                        None
                    },
                }
            });

        let mut attributes = IndexMap::new();
        let mut relationships = IndexMap::new();
        for sourced in &obj.fields {
            match self.compile_field(&obj.name, sourced, FieldOwner::Node) {
                Some(CompiledField::Attribute(attr)) => {
                    attributes.insert(attr.name.clone(), attr);
                },
                Some(CompiledField::Relationship(rel)) => {
                    relationships.insert(rel.field_name.clone(), rel);
                },
                Some(CompiledField::Declared(_)) | None => (),
            }
        }

        self.model.concrete.insert(obj.name.clone(), ConcreteEntity {
            attributes,
            authentication,
            authorization,
            def_location: obj.loc.clone(),
            interfaces: obj.interfaces.clone(),
            labels,
            limit,
            name: obj.name.clone(),
            plural,
            relationships,
        });
    }

    fn compile_interface(&mut self, iface: &ObjectDef<'_>) {
        let plural = self.plural(&iface.directives, &iface.name, &iface.loc);
        let limit = self.limit(&iface.directives, &iface.name, &iface.loc);
        let mut attributes = IndexMap::new();
        let mut declared_relationships = IndexMap::new();
        for sourced in &iface.fields {
            match self.compile_field(&iface.name, sourced, FieldOwner::Interface) {
                Some(CompiledField::Attribute(attr)) => {
                    attributes.insert(attr.name.clone(), attr);
                },
                Some(CompiledField::Declared(declared)) => {
                    declared_relationships.insert(declared.field_name.clone(), declared);
                },
                Some(CompiledField::Relationship(_)) | None => (),
            }
        }

        let members = self.defs.objects.values()
            .filter(|obj| obj.interfaces.contains(&iface.name))
            .filter(|obj| self.model.concrete.contains_key(&obj.name))
            .map(|obj| obj.name.clone())
            .collect();

        self.model.composites.insert(iface.name.clone(), CompositeEntity {
            attributes,
            declared_relationships,
            def_location: iface.loc.clone(),
            kind: CompositeKind::Interface,
            limit,
            members,
            name: iface.name.clone(),
            plural,
        });
    }

    fn compile_union(
        &mut self,
        name: &str,
        members: &[String],
        directives: &[&ast::schema::Directive],
        def_loc: &loc::FilePosition,
    ) {
        for member in members {
            if !self.model.concrete.contains_key(member) {
                self.errors.push(SchemaValidationError::InvalidUnionMember {
                    loc: def_loc.clone(),
                    member: member.clone(),
                    union_name: name.to_string(),
                });
            }
        }
        let plural = self.plural(directives, name, def_loc);
        self.model.composites.insert(name.to_string(), CompositeEntity {
            attributes: IndexMap::new(),
            declared_relationships: IndexMap::new(),
            def_location: def_loc.clone(),
            kind: CompositeKind::Union,
            limit: None,
            members: members.to_vec(),
            name: name.to_string(),
            plural,
        });
    }

    fn compile_relationship_properties(&mut self, obj: &ObjectDef<'_>) {
        let mut attributes = IndexMap::new();
        for sourced in &obj.fields {
            if let Some(CompiledField::Attribute(attr)) =
                self.compile_field(&obj.name, sourced, FieldOwner::RelationshipProperties) {
                attributes.insert(attr.name.clone(), attr);
            }
        }
        self.model.relationship_properties.insert(obj.name.clone(), RelationshipProperties {
            attributes,
            def_location: obj.loc.clone(),
            name: obj.name.clone(),
        });
    }

    fn compile_jwt(&mut self, obj: &ObjectDef<'_>) {
        if let Some(existing) = &self.model.jwt {
            self.errors.push(SchemaValidationError::MultipleJwtTypes {
                first: existing.name.clone(),
                loc: obj.loc.clone(),
                second: obj.name.clone(),
            });
            return;
        }

        let mut claims = IndexMap::new();
        for sourced in &obj.fields {
            let Some(CompiledField::Attribute(attr)) =
                self.compile_field(&obj.name, sourced, FieldOwner::Jwt) else {
                continue;
            };
            let field = sourced.field;
            let path = match directive_args::find(&field.directives, "jwtClaim")
                .map(|directive| directive_args::string_arg(directive, "path")) {
                Some(Ok(Some(path))) => path.split('.').map(str::to_string).collect(),
                Some(Ok(None)) => {
                    self.invalid_directive("jwtClaim", "`path` is required", &obj.name, sourced);
                    continue;
                },
                Some(Err(detail)) => {
                    self.invalid_directive("jwtClaim", &detail, &obj.name, sourced);
                    continue;
                },
                None => vec![field.name.clone()],
            };
            claims.insert(attr.name.clone(), JwtClaim {
                attr_type: attr.attr_type,
                path,
            });
        }

        self.model.jwt = Some(JwtShape {
            claims,
            name: obj.name.clone(),
        });
    }

    fn compile_field(
        &mut self,
        type_name: &str,
        sourced: &SourcedField<'_>,
        owner: FieldOwner,
    ) -> Option<CompiledField> {
        let field = sourced.field;
        let field_loc = loc::FilePosition::new(sourced.file, field.position);
        let target_name = innermost_type_name(&field.field_type);

        let relationship_directive = directive_args::find(&field.directives, "relationship");
        let declare_directive = directive_args::find(&field.directives, "declareRelationship");

        if let Some(directive) = declare_directive {
            if owner != FieldOwner::Interface {
                self.invalid_directive(
                    "declareRelationship",
                    "only interface fields can declare relationships",
                    type_name,
                    sourced,
                );
                return None;
            }
            if relationship_directive.is_some() {
                self.errors.push(SchemaValidationError::DirectiveConflict {
                    directive: directive.name.clone(),
                    field_name: field.name.clone(),
                    loc: field_loc,
                    other_directive: "relationship".to_string(),
                    type_name: type_name.to_string(),
                });
                return None;
            }
            let target = self.relationship_target(type_name, &field.name, target_name, &field_loc)?;
            let (list, nullable) = self.relationship_cardinality(type_name, sourced)?;
            return Some(CompiledField::Declared(DeclaredRelationship {
                field_name: field.name.clone(),
                list,
                nullable,
                target,
            }));
        }

        if let Some(directive) = relationship_directive {
            match owner {
                FieldOwner::Node => (),
                FieldOwner::Interface => {
                    self.invalid_directive(
                        "relationship",
                        "interface fields must use @declareRelationship; implementing types declare the @relationship",
                        type_name,
                        sourced,
                    );
                    return None;
                },
                FieldOwner::Jwt | FieldOwner::RelationshipProperties => {
                    self.invalid_directive(
                        "relationship",
                        "relationships can only be declared on node types",
                        type_name,
                        sourced,
                    );
                    return None;
                },
            }
            if directive_args::has(&field.directives, "cypher") {
                self.errors.push(SchemaValidationError::DirectiveConflict {
                    directive: "cypher".to_string(),
                    field_name: field.name.clone(),
                    loc: field_loc,
                    other_directive: "relationship".to_string(),
                    type_name: type_name.to_string(),
                });
                return None;
            }
            return self.compile_relationship(type_name, sourced, directive, target_name, field_loc)
                .map(CompiledField::Relationship);
        }

        let Some(kind) = ScalarKind::from_name(target_name, self.defs.enums.keys()) else {
            if self.defs.is_entity_name(target_name) {
                self.errors.push(SchemaValidationError::MissingRelationshipDirective {
                    field_name: field.name.clone(),
                    loc: field_loc,
                    target: target_name.to_string(),
                    type_name: type_name.to_string(),
                });
            } else if self.defs.objects.contains_key(target_name) {
                self.errors.push(SchemaValidationError::UnsupportedFieldType {
                    detail: format!("`{target_name}` cannot be used as a field type"),
                    field_name: field.name.clone(),
                    loc: field_loc,
                    type_name: type_name.to_string(),
                });
            } else {
                self.errors.push(SchemaValidationError::UndefinedFieldType {
                    field_name: field.name.clone(),
                    loc: field_loc,
                    type_name: type_name.to_string(),
                    undefined_type: target_name.to_string(),
                });
            }
            return None;
        };

        let Some(attr_type) = AttributeType::from_ast(&field.field_type, kind) else {
            self.errors.push(SchemaValidationError::UnsupportedFieldType {
                detail: "nested lists cannot be stored as properties".to_string(),
                field_name: field.name.clone(),
                loc: field_loc,
                type_name: type_name.to_string(),
            });
            return None;
        };

        self.compile_attribute(type_name, sourced, attr_type, owner, field_loc)
            .map(CompiledField::Attribute)
    }

    fn compile_attribute(
        &mut self,
        type_name: &str,
        sourced: &SourcedField<'_>,
        attr_type: AttributeType,
        owner: FieldOwner,
        field_loc: loc::FilePosition,
    ) -> Option<Attribute> {
        let field = sourced.field;
        let directives = &field.directives;
        let location = format!("{type_name}.{}", field.name);
        let error_count = self.errors.len();

        let cypher = match directive_args::find(directives, "cypher") {
            Some(directive) => {
                let statement = directive_args::string_arg(directive, "statement");
                let column_name = directive_args::string_arg(directive, "columnName");
                match (statement, column_name) {
                    (Ok(Some(statement)), Ok(Some(column_name))) => Some(CypherAnnotation {
                        column_name,
                        statement,
                    }),
                    (Err(detail), _) | (_, Err(detail)) => {
                        self.invalid_directive("cypher", &detail, type_name, sourced);
                        None
                    },
                    (Ok(None), _) => {
                        self.invalid_directive("cypher", "`statement` is required", type_name, sourced);
                        None
                    },
                    (_, Ok(None)) => {
                        self.invalid_directive("cypher", "`columnName` is required", type_name, sourced);
                        None
                    },
                }
            },
            None => None,
        };

        let id_autogenerate = match directive_args::find(directives, "id") {
            Some(directive) => {
                if !matches!(attr_type.kind(), ScalarKind::ID | ScalarKind::String) || attr_type.is_list() {
                    self.invalid_directive(
                        "id",
                        &format!("@id can only be used on fields of type ID or String, found `{attr_type}`"),
                        type_name,
                        sourced,
                    );
                }
                match directive_args::bool_arg(directive, "autogenerate") {
                    Ok(autogenerate) => Some(autogenerate.unwrap_or(true)),
                    Err(detail) => {
                        self.invalid_directive("id", &detail, type_name, sourced);
                        None
                    },
                }
            },
            None => None,
        };

        let unique = match directive_args::find(directives, "unique") {
            Some(directive) => match directive_args::string_arg(directive, "constraintName") {
                Ok(name) => Some(name),
                Err(detail) => {
                    self.invalid_directive("unique", &detail, type_name, sourced);
                    None
                },
            },
            None => None,
        };

        let default = match directive_args::find(directives, "default") {
            Some(directive) => match directive_args::arguments(directive) {
                Ok(args) => match args.get("value") {
                    Some(value) => {
                        if let Err(err) = value::coerce_input(&attr_type, value, &self.defs.enums) {
                            self.invalid_directive("default", &err.to_string(), type_name, sourced);
                        }
                        Some(value.clone())
                    },
                    None => {
                        self.invalid_directive("default", "`value` is required", type_name, sourced);
                        None
                    },
                },
                Err(detail) => {
                    self.invalid_directive("default", &detail, type_name, sourced);
                    None
                },
            },
            None => None,
        };

        let db_name = match directive_args::find(directives, "alias") {
            Some(directive) => match directive_args::string_arg(directive, "property") {
                Ok(Some(property)) => property,
                Ok(None) => {
                    self.invalid_directive("alias", "`property` is required", type_name, sourced);
                    field.name.clone()
                },
                Err(detail) => {
                    self.invalid_directive("alias", &detail, type_name, sourced);
                    field.name.clone()
                },
            },
            None => field.name.clone(),
        };

        let timestamp = match directive_args::find(directives, "timestamp") {
            Some(directive) => {
                if attr_type.kind() != &ScalarKind::DateTime || attr_type.is_list() {
                    self.invalid_directive(
                        "timestamp",
                        &format!("@timestamp can only be used on fields of type DateTime, found `{attr_type}`"),
                        type_name,
                        sourced,
                    );
                }
                self.write_operations(directive, type_name, sourced)
            },
            None => vec![],
        };

        let populated_by = match directive_args::find(directives, "populatedBy") {
            Some(directive) => {
                for other in ["default", "id"] {
                    if directive_args::has(directives, other) {
                        self.errors.push(SchemaValidationError::PopulatedByConflict {
                            field_name: field.name.clone(),
                            loc: field_loc.clone(),
                            other_directive: other.to_string(),
                            type_name: type_name.to_string(),
                        });
                    }
                }
                match directive_args::string_arg(directive, "callback") {
                    Ok(Some(callback)) => {
                        if !self.callback_names.contains(&callback) {
                            self.errors.push(SchemaValidationError::UnknownCallback {
                                callback: callback.clone(),
                                loc: field_loc.clone(),
                            });
                        }
                        let operations = self.write_operations(directive, type_name, sourced);
                        Some(PopulatedBy { callback, operations })
                    },
                    Ok(None) => {
                        self.invalid_directive("populatedBy", "`callback` is required", type_name, sourced);
                        None
                    },
                    Err(detail) => {
                        self.invalid_directive("populatedBy", &detail, type_name, sourced);
                        None
                    },
                }
            },
            None => None,
        };

        let authorization = self.authorization(
            &directives.iter().collect::<Vec<_>>(),
            &location,
            &field_loc,
        );

        if cypher.is_some() {
            for other in ["id", "unique", "default", "alias", "timestamp", "populatedBy"] {
                if directive_args::has(directives, other) {
                    self.errors.push(SchemaValidationError::DirectiveConflict {
                        directive: "cypher".to_string(),
                        field_name: field.name.clone(),
                        loc: field_loc.clone(),
                        other_directive: other.to_string(),
                        type_name: type_name.to_string(),
                    });
                }
            }
        }

        match owner {
            FieldOwner::Node | FieldOwner::Interface => (),
            FieldOwner::Jwt => {
                if cypher.is_some() || id_autogenerate.is_some() || populated_by.is_some() {
                    self.invalid_directive(
                        "jwt",
                        "claims fields only accept @jwtClaim",
                        type_name,
                        sourced,
                    );
                }
            },
            FieldOwner::RelationshipProperties => {
                if cypher.is_some() || unique.is_some() || authorization.is_some() {
                    self.invalid_directive(
                        "relationshipProperties",
                        "relationship properties cannot be computed, unique or authorized",
                        type_name,
                        sourced,
                    );
                }
            },
        }

        if self.errors.len() > error_count {
            return None;
        }

        Some(Attribute {
            attr_type,
            authorization,
            cypher,
            db_name,
            def_location: field_loc,
            default,
            id_autogenerate,
            name: field.name.clone(),
            populated_by,
            timestamp,
            unique,
        })
    }

    fn compile_relationship(
        &mut self,
        type_name: &str,
        sourced: &SourcedField<'_>,
        directive: &ast::schema::Directive,
        target_name: &str,
        field_loc: loc::FilePosition,
    ) -> Option<Relationship> {
        let field = sourced.field;
        let target = self.relationship_target(type_name, &field.name, target_name, &field_loc)?;
        let (list, nullable) = self.relationship_cardinality(type_name, sourced)?;

        let rel_type = match directive_args::string_arg(directive, "type") {
            Ok(Some(rel_type)) if !rel_type.is_empty() => rel_type,
            Ok(_) => {
                self.invalid_directive("relationship", "`type` is required", type_name, sourced);
                return None;
            },
            Err(detail) => {
                self.invalid_directive("relationship", &detail, type_name, sourced);
                return None;
            },
        };

        let direction = match directive_args::arguments(directive)
            .map(|args| args.get("direction").and_then(|d| d.as_str()).and_then(Direction::from_name)) {
            Ok(Some(direction)) => direction,
            Ok(None) => {
                self.invalid_directive(
                    "relationship",
                    "`direction` is required and must be IN or OUT",
                    type_name,
                    sourced,
                );
                return None;
            },
            Err(detail) => {
                self.invalid_directive("relationship", &detail, type_name, sourced);
                return None;
            },
        };

        let properties = match directive_args::string_arg(directive, "properties") {
            Ok(Some(properties)) => {
                let annotated = self.defs.objects.get(&properties).is_some_and(|obj| {
                    directive_args::has_any(&obj.directives, "relationshipProperties")
                });
                if !annotated {
                    self.errors.push(SchemaValidationError::InvalidRelationshipProperties {
                        field_name: field.name.clone(),
                        loc: field_loc,
                        properties,
                        type_name: type_name.to_string(),
                    });
                    return None;
                }
                Some(properties)
            },
            Ok(None) => None,
            Err(detail) => {
                self.invalid_directive("relationship", &detail, type_name, sourced);
                return None;
            },
        };

        let aggregate = match directive_args::bool_arg(directive, "aggregate") {
            Ok(aggregate) => aggregate.unwrap_or(true),
            Err(detail) => {
                self.invalid_directive("relationship", &detail, type_name, sourced);
                return None;
            },
        };

        let authorization = self.authorization(
            &field.directives.iter().collect::<Vec<_>>(),
            &format!("{type_name}.{}", field.name),
            &field_loc,
        );

        Some(Relationship {
            aggregate,
            authorization,
            def_location: field_loc,
            direction,
            field_name: field.name.clone(),
            list,
            nullable,
            properties,
            rel_type,
            source: type_name.to_string(),
            target,
        })
    }

    fn relationship_target(
        &mut self,
        type_name: &str,
        field_name: &str,
        target_name: &str,
        field_loc: &loc::FilePosition,
    ) -> Option<EntityRef> {
        if self.defs.unions.contains_key(target_name) {
            return Some(EntityRef::Union(target_name.to_string()));
        }
        if self.defs.interfaces.contains_key(target_name) {
            return Some(EntityRef::Interface(target_name.to_string()));
        }
        if self.defs.is_entity_name(target_name) {
            return Some(EntityRef::Concrete(target_name.to_string()));
        }
        self.errors.push(SchemaValidationError::InvalidRelationshipTarget {
            field_name: field_name.to_string(),
            loc: field_loc.clone(),
            target: target_name.to_string(),
            type_name: type_name.to_string(),
        });
        None
    }

    /// Reads `T`, `T!`, `[T!]` and `[T!]!` relationship annotations. List
    /// items must be non-null.
    fn relationship_cardinality(
        &mut self,
        type_name: &str,
        sourced: &SourcedField<'_>,
    ) -> Option<(bool, bool)> {
        use graphql_parser::schema::Type;

        let (nullable, inner) = match &sourced.field.field_type {
            Type::NonNullType(inner) => (false, inner.as_ref()),
            other => (true, other),
        };
        match inner {
            Type::NamedType(_) => Some((false, nullable)),
            Type::ListType(item) if matches!(item.as_ref(), Type::NonNullType(named)
                if matches!(named.as_ref(), Type::NamedType(_))) => Some((true, nullable)),
            _ => {
                self.invalid_directive(
                    "relationship",
                    "relationship fields must be `T`, `T!`, `[T!]` or `[T!]!`",
                    type_name,
                    sourced,
                );
                None
            },
        }
    }

    fn write_operations(
        &mut self,
        directive: &ast::schema::Directive,
        type_name: &str,
        sourced: &SourcedField<'_>,
    ) -> Vec<WriteOperation> {
        match directive_args::name_list_arg(directive, "operations") {
            Ok(Some(names)) => {
                let mut operations = vec![];
                for name in names {
                    match WriteOperation::from_name(&name) {
                        Some(operation) => operations.push(operation),
                        None => self.invalid_directive(
                            &directive.name,
                            &format!("unknown operation `{name}`, expected CREATE or UPDATE"),
                            type_name,
                            sourced,
                        ),
                    }
                }
                operations
            },
            Ok(None) => vec![WriteOperation::Create, WriteOperation::Update],
            Err(detail) => {
                self.invalid_directive(&directive.name, &detail, type_name, sourced);
                vec![]
            },
        }
    }

    fn plural(
        &mut self,
        directives: &[&ast::schema::Directive],
        type_name: &str,
        def_loc: &loc::FilePosition,
    ) -> String {
        let value = directive_args::find_any(directives, "plural")
            .map(|directive| directive_args::string_arg(directive, "value"));
        match value {
            Some(Ok(Some(value))) if !value.is_empty() =>
                naming::plural_for(type_name, Some(&value)),
            Some(Ok(_)) => {
                self.errors.push(SchemaValidationError::InvalidDirective {
                    detail: "`value` is required".to_string(),
                    directive: "plural".to_string(),
                    loc: def_loc.clone(),
                    location: type_name.to_string(),
                });
                naming::plural_for(type_name, None)
            },
            Some(Err(detail)) => {
                self.errors.push(SchemaValidationError::InvalidDirective {
                    detail,
                    directive: "plural".to_string(),
                    loc: def_loc.clone(),
                    location: type_name.to_string(),
                });
                naming::plural_for(type_name, None)
            },
            None => naming::plural_for(type_name, None),
        }
    }

    fn limit(
        &mut self,
        directives: &[&ast::schema::Directive],
        type_name: &str,
        def_loc: &loc::FilePosition,
    ) -> Option<LimitAnnotation> {
        let directive = directive_args::find_any(directives, "limit")?;
        let parsed = directive_args::uint_arg(directive, "default")
            .and_then(|default| Ok((default, directive_args::uint_arg(directive, "max")?)));
        let detail = match parsed {
            Ok((Some(default), Some(max))) if default > max =>
                format!("`default` ({default}) must not be greater than `max` ({max})"),
            Ok((default, max)) => return Some(LimitAnnotation { default, max }),
            Err(detail) => detail,
        };
        self.errors.push(SchemaValidationError::InvalidDirective {
            detail,
            directive: "limit".to_string(),
            loc: def_loc.clone(),
            location: type_name.to_string(),
        });
        None
    }

    fn authorization(
        &mut self,
        directives: &[&ast::schema::Directive],
        location: &str,
        def_loc: &loc::FilePosition,
    ) -> Option<AuthorizationAnnotation> {
        let directive = directive_args::find_any(directives, "authorization")?;
        let parsed = directive_args::arguments(directive)
            .and_then(|args| AuthorizationAnnotation::from_directive_args(&args));
        match parsed {
            Ok(annotation) => Some(annotation),
            Err(detail) => {
                self.errors.push(SchemaValidationError::InvalidAuthorization {
                    detail,
                    loc: def_loc.clone(),
                    location: location.to_string(),
                });
                None
            },
        }
    }

    fn directive_name_list(
        &mut self,
        directives: &[&ast::schema::Directive],
        directive_name: &str,
        arg_name: &str,
        type_name: &str,
        def_loc: &loc::FilePosition,
    ) -> Option<Vec<String>> {
        let directive = directive_args::find_any(directives, directive_name)?;
        match directive_args::name_list_arg(directive, arg_name) {
            Ok(names) => names,
            Err(detail) => {
                self.errors.push(SchemaValidationError::InvalidDirective {
                    detail,
                    directive: directive_name.to_string(),
                    loc: def_loc.clone(),
                    location: type_name.to_string(),
                });
                None
            },
        }
    }

    fn invalid_directive(
        &mut self,
        directive: &str,
        detail: &str,
        type_name: &str,
        sourced: &SourcedField<'_>,
    ) {
        self.errors.push(SchemaValidationError::InvalidDirective {
            detail: detail.to_string(),
            directive: directive.to_string(),
            loc: loc::FilePosition::new(sourced.file, sourced.field.position),
            location: format!("{type_name}.{}", sourced.field.name),
        });
    }

    /// Every implementer must provide the interface's attributes and a
    /// `@relationship` for each declared relationship.
    fn check_interface_implementations(&mut self) {
        for composite in self.model.composites.values() {
            if !composite.is_interface() {
                continue;
            }
            for member_name in composite.members() {
                let Some(member) = self.model.concrete.get(member_name) else {
                    continue;
                };
                for attr_name in composite.attributes.keys() {
                    if member.attribute(attr_name).is_none() {
                        self.errors.push(SchemaValidationError::MissingInterfaceField {
                            field_name: attr_name.clone(),
                            implementer: member_name.clone(),
                            interface_name: composite.name.clone(),
                            kind: "attribute",
                            loc: member.def_location.clone(),
                        });
                    }
                }
                for rel_name in composite.declared_relationships.keys() {
                    if member.relationship(rel_name).is_none() {
                        self.errors.push(SchemaValidationError::MissingInterfaceField {
                            field_name: rel_name.clone(),
                            implementer: member_name.clone(),
                            interface_name: composite.name.clone(),
                            kind: "@relationship",
                            loc: member.def_location.clone(),
                        });
                    }
                }
            }
        }
    }
}

/// Runs every `where` clause of every `@authorization` annotation through
/// the filter translator against the entity it is attached to.
fn validate_authorization(model: &SchemaModel) -> Vec<SchemaValidationError> {
    let mut errors = vec![];
    for entity in model.concrete.values() {
        let mut annotations = vec![];
        if let Some(annotation) = entity.authorization() {
            annotations.push((entity.name().to_string(), entity.def_location(), annotation));
        }
        for attr in entity.attributes.values() {
            if let Some(annotation) = attr.authorization() {
                annotations.push((
                    format!("{}.{}", entity.name(), attr.name()),
                    attr.def_location(),
                    annotation,
                ));
            }
        }
        for rel in entity.relationships.values() {
            if let Some(annotation) = rel.authorization() {
                annotations.push((
                    format!("{}.{}", entity.name(), rel.field_name()),
                    rel.def_location(),
                    annotation,
                ));
            }
        }

        for (location, def_loc, annotation) in annotations {
            for detail in authorization::validate_annotation(model, entity, annotation) {
                errors.push(SchemaValidationError::InvalidAuthorization {
                    detail,
                    loc: def_loc.clone(),
                    location: location.clone(),
                });
            }
        }
    }
    errors
}
