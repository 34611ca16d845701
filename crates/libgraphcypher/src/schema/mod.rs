mod attribute;
mod attribute_type;
mod callback_registry;
mod composite_entity;
mod concrete_entity;
mod cypher_annotation;
pub(crate) mod directive_args;
mod entity_ref;
pub mod generated;
mod jwt_shape;
mod limit_annotation;
pub(crate) mod naming;
mod populated_by;
mod relationship;
mod relationship_properties;
mod scalar_kind;
mod schema_builder;
mod schema_model;
mod schema_validation_error;

pub use attribute::Attribute;
pub use attribute_type::AttributeType;
pub use callback_registry::CallbackContext;
pub use callback_registry::CallbackError;
pub use callback_registry::CallbackOutcome;
pub use callback_registry::CallbackRegistry;
pub use callback_registry::PopulatedByCallback;
pub use composite_entity::CompositeEntity;
pub use composite_entity::CompositeKind;
pub use concrete_entity::ConcreteEntity;
pub use cypher_annotation::CypherAnnotation;
pub use entity_ref::EntityRef;
pub use jwt_shape::JwtClaim;
pub use jwt_shape::JwtShape;
pub(crate) use jwt_shape::lookup_claim;
pub use limit_annotation::LimitAnnotation;
pub use populated_by::PopulatedBy;
pub use populated_by::WriteOperation;
pub use relationship::DeclaredRelationship;
pub use relationship::Direction;
pub use relationship::Relationship;
pub use relationship_properties::RelationshipProperties;
pub use scalar_kind::ScalarKind;
pub use schema_builder::SchemaBuildError;
pub use schema_builder::SchemaBuilder;
pub use schema_model::SchemaModel;
pub use schema_validation_error::SchemaValidationError;

#[cfg(test)]
mod tests;
