use crate::schema::generated::TypeRef;
use indexmap::IndexMap;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum GeneratedTypeKind {
    Enum { values: Vec<String> },
    InputObject,
    Interface { members: Vec<String> },
    Object { interfaces: Vec<String> },
    Scalar,
    Union { members: Vec<String> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedField {
    pub(crate) args: IndexMap<String, TypeRef>,
    pub(crate) deprecation: Option<String>,
    pub(crate) field_type: TypeRef,
    pub(crate) name: String,
}
impl GeneratedField {
    pub fn args(&self) -> &IndexMap<String, TypeRef> {
        &self.args
    }

    pub fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }

    pub fn field_type(&self) -> &TypeRef {
        &self.field_type
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedType {
    pub(crate) fields: IndexMap<String, GeneratedField>,
    pub(crate) kind: GeneratedTypeKind,
    pub(crate) name: String,
}
impl GeneratedType {
    pub fn field(&self, name: &str) -> Option<&GeneratedField> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, GeneratedField> {
        &self.fields
    }

    pub fn kind(&self) -> &GeneratedTypeKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Object, interface and union types need a selection set.
    pub fn is_composite_output(&self) -> bool {
        matches!(
            self.kind,
            GeneratedTypeKind::Interface { .. }
                | GeneratedTypeKind::Object { .. }
                | GeneratedTypeKind::Union { .. },
        )
    }

    /// Object types that a value of this type may be at runtime.
    pub fn possible_types(&self) -> Vec<String> {
        match &self.kind {
            GeneratedTypeKind::Interface { members } | GeneratedTypeKind::Union { members } =>
                members.clone(),
            _ => vec![self.name.clone()],
        }
    }
}

/// The GraphQL surface generated from a
/// [`SchemaModel`](crate::schema::SchemaModel). Types are kept sorted by
/// name so the surface is identical for identical inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedSchema {
    pub(crate) types: BTreeMap<String, GeneratedType>,
}
impl GeneratedSchema {
    pub fn get(&self, type_name: &str) -> Option<&GeneratedType> {
        self.types.get(type_name)
    }

    pub fn types(&self) -> &BTreeMap<String, GeneratedType> {
        &self.types
    }

    pub fn query_type(&self) -> Option<&GeneratedType> {
        self.get("Query")
    }

    pub fn mutation_type(&self) -> Option<&GeneratedType> {
        self.get("Mutation")
    }

    pub fn subscription_type(&self) -> Option<&GeneratedType> {
        self.get("Subscription")
    }

    /// Whether a value of `type_name` can satisfy a fragment on
    /// `condition` (the same type, or a union/interface containing it).
    pub fn type_applies(&self, condition: &str, type_name: &str) -> bool {
        condition == type_name
            || self.get(condition)
                .is_some_and(|cond| cond.possible_types().iter().any(|t| t == type_name))
    }

    /// Compact SDL-like listing, one line per field. Used by the CLI and by
    /// tests asserting on the generated surface.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for generated in self.types.values() {
            let keyword = match &generated.kind {
                GeneratedTypeKind::Enum { .. } => "enum",
                GeneratedTypeKind::InputObject => "input",
                GeneratedTypeKind::Interface { .. } => "interface",
                GeneratedTypeKind::Object { .. } => "type",
                GeneratedTypeKind::Scalar => "scalar",
                GeneratedTypeKind::Union { .. } => "union",
            };
            out.push_str(&format!("{keyword} {}", generated.name));
            match &generated.kind {
                GeneratedTypeKind::Enum { values } => {
                    out.push_str(&format!(" {{ {} }}\n", values.join(" ")));
                    continue;
                },
                GeneratedTypeKind::Union { members } => {
                    out.push_str(&format!(" = {}\n", members.join(" | ")));
                    continue;
                },
                GeneratedTypeKind::Scalar => {
                    out.push('\n');
                    continue;
                },
                _ => (),
            }
            out.push_str(" {\n");
            for field in generated.fields.values() {
                out.push_str(&format!("  {}", field.name));
                if !field.args.is_empty() {
                    let args = field.args.iter()
                        .map(|(name, arg_type)| format!("{name}: {arg_type}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    out.push_str(&format!("({args})"));
                }
                out.push_str(&format!(": {}\n", field.field_type));
            }
            out.push_str("}\n");
        }
        out
    }
}
