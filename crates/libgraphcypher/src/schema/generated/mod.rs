//! The GraphQL surface derived from a [`SchemaModel`](crate::schema::SchemaModel):
//! root fields, filter inputs, mutation inputs, connections, aggregates and
//! subscription events.

mod generated_schema;
mod surface_builder;
mod type_ref;

pub use generated_schema::GeneratedField;
pub use generated_schema::GeneratedSchema;
pub use generated_schema::GeneratedType;
pub use generated_schema::GeneratedTypeKind;
pub use type_ref::TypeRef;

impl GeneratedSchema {
    pub fn from_model(model: &crate::schema::SchemaModel) -> Self {
        surface_builder::SurfaceBuilder::build(model)
    }
}

#[cfg(test)]
mod tests;
