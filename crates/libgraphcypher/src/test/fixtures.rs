use crate::cypher::CypherStatement;
use crate::cypher::StatementBuilder;
use crate::execution::Record;
use crate::operation::OperationResolver;
use crate::operation::ResolvedOperation;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedSchema;
use crate::translate::TranslateError;
use crate::value::DbValue;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// Movies, actors and the `ACTED_IN` relationship between them.
pub(crate) const MOVIE_TYPE_DEFS: &str = r#"
    type Movie {
        id: ID! @id
        title: String!
        released: Int
        actors: [Actor!]! @relationship(type: "ACTED_IN", direction: IN, properties: "ActedIn")
    }

    type Actor {
        name: String!
        movies: [Movie!]! @relationship(type: "ACTED_IN", direction: OUT, properties: "ActedIn")
    }

    type ActedIn @relationshipProperties {
        roles: [String!]
    }
"#;

pub(crate) fn build_model(type_defs: &str) -> SchemaModel {
    SchemaBuilder::new()
        .load_str(None, type_defs)
        .expect("type defs parse")
        .build()
        .expect("type defs build")
}

pub(crate) fn build(type_defs: &str) -> (SchemaModel, GeneratedSchema) {
    let model = build_model(type_defs);
    let surface = GeneratedSchema::from_model(&model);
    (model, surface)
}

pub(crate) fn resolve(surface: &GeneratedSchema, query: &str) -> ResolvedOperation {
    resolve_with(surface, query, JsonValue::Object(JsonMap::new()))
}

pub(crate) fn resolve_with(surface: &GeneratedSchema, query: &str, variables: JsonValue) -> ResolvedOperation {
    let variables = match variables {
        JsonValue::Object(variables) => variables,
        _ => JsonMap::new(),
    };
    OperationResolver::new(surface)
        .resolve(query, None, &variables)
        .expect("operation resolves")
}

/// Translates the first root field of `query`.
pub(crate) fn try_translate(
    model: &SchemaModel,
    surface: &GeneratedSchema,
    query: &str,
    jwt: Option<&JsonValue>,
) -> Result<CypherStatement, TranslateError> {
    let operation = resolve(surface, query);
    let field = operation.root_fields().first().expect("one root field");
    StatementBuilder::new(model, surface, jwt).build(field, operation.kind())
}

pub(crate) fn translate(model: &SchemaModel, surface: &GeneratedSchema, query: &str) -> CypherStatement {
    try_translate(model, surface, query, None).expect("field translates")
}

/// A result row from a JSON object of columns.
pub(crate) fn record(value: JsonValue) -> Record {
    DbValue::from_json(&value)
        .as_map()
        .cloned()
        .expect("records are JSON objects")
}
