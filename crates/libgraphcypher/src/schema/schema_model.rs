use crate::cypher::escape_identifier;
use crate::cypher::escape_label;
use crate::schema::CompositeEntity;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::JwtShape;
use crate::schema::RelationshipProperties;
use indexmap::IndexMap;

/// The graph entity model compiled from type definitions. Immutable once
/// built and shared by every request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaModel {
    pub(crate) composites: IndexMap<String, CompositeEntity>,
    pub(crate) concrete: IndexMap<String, ConcreteEntity>,
    pub(crate) enums: IndexMap<String, Vec<String>>,
    pub(crate) jwt: Option<JwtShape>,
    pub(crate) relationship_properties: IndexMap<String, RelationshipProperties>,
}
impl SchemaModel {
    pub fn composite(&self, name: &str) -> Option<&CompositeEntity> {
        self.composites.get(name)
    }

    pub fn composites(&self) -> &IndexMap<String, CompositeEntity> {
        &self.composites
    }

    pub fn concrete(&self, name: &str) -> Option<&ConcreteEntity> {
        self.concrete.get(name)
    }

    pub fn concrete_entities(&self) -> &IndexMap<String, ConcreteEntity> {
        &self.concrete
    }

    /// Concrete entities an [`EntityRef`] can resolve to, in declaration
    /// order of the union/interface.
    pub fn concrete_members(&self, entity_ref: &EntityRef) -> Vec<&ConcreteEntity> {
        match entity_ref {
            EntityRef::Concrete(name) => self.concrete(name).into_iter().collect(),
            EntityRef::Interface(name) | EntityRef::Union(name) => self.composite(name)
                .map(|composite| composite.members().iter()
                    .filter_map(|member| self.concrete(member))
                    .collect())
                .unwrap_or_default(),
        }
    }

    pub fn entity_ref(&self, name: &str) -> Option<EntityRef> {
        if self.concrete.contains_key(name) {
            return Some(EntityRef::Concrete(name.to_string()));
        }
        self.composite(name).map(|composite| {
            if composite.is_interface() {
                EntityRef::Interface(name.to_string())
            } else {
                EntityRef::Union(name.to_string())
            }
        })
    }

    pub fn enums(&self) -> &IndexMap<String, Vec<String>> {
        &self.enums
    }

    pub fn jwt(&self) -> Option<&JwtShape> {
        self.jwt.as_ref()
    }

    pub fn relationship_properties(&self, name: &str) -> Option<&RelationshipProperties> {
        self.relationship_properties.get(name)
    }

    pub fn all_relationship_properties(&self) -> &IndexMap<String, RelationshipProperties> {
        &self.relationship_properties
    }

    /// Uniqueness constraints backing every `@unique` and `@id` attribute,
    /// one `CREATE CONSTRAINT` statement each.
    pub fn constraint_statements(&self) -> Vec<String> {
        let mut statements = vec![];
        for entity in self.concrete.values() {
            for attr in entity.unique_attributes() {
                let name = attr.unique_constraint_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}_{}", entity.name(), attr.name()));
                statements.push(format!(
                    "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
                    escape_identifier(&name),
                    escape_label(entity.primary_label()),
                    escape_identifier(attr.db_name()),
                ));
            }
        }
        statements
    }
}
