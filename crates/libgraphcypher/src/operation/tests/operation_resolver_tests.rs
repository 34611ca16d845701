use crate::operation::OperationError;
use crate::operation::OperationKind;
use crate::operation::OperationResolver;
use crate::operation::ResolvedOperation;
use crate::schema::generated::GeneratedSchema;
use crate::test::fixtures;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use serde_json::json;

type Result<T> = std::result::Result<T, OperationError>;

fn surface() -> GeneratedSchema {
    fixtures::build(fixtures::MOVIE_TYPE_DEFS).1
}

fn resolve(surface: &GeneratedSchema, source: &str, variables: JsonValue) -> Result<ResolvedOperation> {
    let variables = match variables {
        JsonValue::Object(variables) => variables,
        _ => JsonMap::new(),
    };
    OperationResolver::new(surface).resolve(source, None, &variables)
}

fn child_names(operation: &ResolvedOperation, type_name: &str) -> Vec<String> {
    operation.root_fields()[0]
        .fields_by_type()
        .get(type_name)
        .map(|fields| fields.iter().map(|field| field.response_key().to_string()).collect())
        .unwrap_or_default()
}

mod basics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn anonymous_query() -> Result<()> {
        let surface = surface();
        let operation = resolve(&surface, "{ movies { title released } }", json!({}))?;

        assert_eq!(operation.kind(), OperationKind::Query);
        assert_eq!(operation.name(), None);
        assert_eq!(operation.root_fields().len(), 1);
        assert_eq!(operation.root_fields()[0].name(), "movies");
        assert_eq!(child_names(&operation, "Movie"), vec!["title", "released"]);

        Ok(())
    }

    #[test]
    fn selects_the_named_operation() -> Result<()> {
        let surface = surface();
        let source = r#"
            query Movies { movies { title } }
            query Actors { actors { name } }
        "#;
        let operation = OperationResolver::new(&surface).resolve(source, Some("Actors"), &JsonMap::new())?;
        assert_eq!(operation.name(), Some("Actors"));
        assert_eq!(operation.root_fields()[0].name(), "actors");

        assert_eq!(
            resolve(&surface, source, json!({})),
            Err(OperationError::AmbiguousOperation),
        );
        assert_eq!(
            OperationResolver::new(&surface).resolve(source, Some("Directors"), &JsonMap::new()),
            Err(OperationError::UnknownOperation("Directors".to_string())),
        );

        Ok(())
    }

    #[test]
    fn variables_are_substituted() -> Result<()> {
        let surface = surface();
        let operation = resolve(
            &surface,
            r#"
                query Movies($title: String, $limit: Int = 5) {
                    movies(where: { title: $title }, options: { limit: $limit }) { title }
                }
            "#,
            json!({ "title": "The Matrix" }),
        )?;

        let movies = &operation.root_fields()[0];
        assert_eq!(movies.argument("where"), Some(&json!({ "title": "The Matrix" })));
        assert_eq!(movies.argument("options"), Some(&json!({ "limit": 5 })));

        Ok(())
    }

    #[test]
    fn omitted_optional_variables_drop_the_entry() -> Result<()> {
        let surface = surface();
        let operation = resolve(
            &surface,
            "query Movies($title: String) { movies(where: { title: $title }) { title } }",
            json!({}),
        )?;
        assert_eq!(operation.root_fields()[0].argument("where"), Some(&json!({})));

        Ok(())
    }
}

mod fragments {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_and_inline_fragments_merge() -> Result<()> {
        let surface = surface();
        let operation = resolve(
            &surface,
            r#"
                query {
                    movies {
                        ...MovieFields
                        ... on Movie { released }
                        title
                    }
                }

                fragment MovieFields on Movie {
                    title
                    actors { name }
                }
            "#,
            json!({}),
        )?;

        assert_eq!(child_names(&operation, "Movie"), vec!["title", "actors", "released"]);

        Ok(())
    }

    #[test]
    fn skip_and_include() -> Result<()> {
        let surface = surface();
        let operation = resolve(
            &surface,
            r#"
                query ($withActors: Boolean!) {
                    movies {
                        title @skip(if: true)
                        released @include(if: true)
                        actors @include(if: $withActors) { name }
                    }
                }
            "#,
            json!({ "withActors": false }),
        )?;

        assert_eq!(child_names(&operation, "Movie"), vec!["released"]);

        Ok(())
    }

    #[test]
    fn fragment_cycles_are_rejected() {
        let surface = surface();
        let result = resolve(
            &surface,
            r#"
                { movies { ...A } }
                fragment A on Movie { title ...B }
                fragment B on Movie { released ...A }
            "#,
            json!({}),
        );
        assert_eq!(result, Err(OperationError::FragmentCycle("A".to_string())));
    }

    #[test]
    fn impossible_fragments_are_rejected() {
        let surface = surface();
        let result = resolve(&surface, "{ movies { ... on Actor { name } } }", json!({}));
        assert_eq!(result, Err(OperationError::ImpossibleFragment {
            condition: "Actor".to_string(),
            parent_type: "Movie".to_string(),
        }));
    }
}

mod validation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_field() {
        let surface = surface();
        let err = resolve(&surface, "{ movies { rating } }", json!({})).expect_err("rating is not a field");
        assert_eq!(err.to_string(), "Cannot query field \"rating\" on type \"Movie\".");
    }

    #[test]
    fn unknown_argument() {
        let surface = surface();
        let err = resolve(&surface, "{ movies(first: 1) { title } }", json!({})).expect_err("movies has no `first`");
        assert_eq!(err, OperationError::UnknownArgument {
            argument: "first".to_string(),
            field_name: "movies".to_string(),
            type_name: "Query".to_string(),
        });
    }

    #[test]
    fn missing_required_argument() {
        let surface = surface();
        let err = resolve(&surface, "mutation { createMovies { info { nodesCreated } } }", json!({}))
            .expect_err("input is required");
        assert_eq!(
            err.to_string(),
            "Field \"Mutation.createMovies\" argument \"input\" of type \"[MovieCreateInput!]!\" is required, but it was not provided.",
        );
    }

    #[test]
    fn selection_rules() {
        let surface = surface();
        assert!(matches!(
            resolve(&surface, "{ movies }", json!({})),
            Err(OperationError::MissingSelection { field_name, .. }) if field_name == "movies",
        ));
        assert!(matches!(
            resolve(&surface, "{ movies { title { length } } }", json!({})),
            Err(OperationError::UnexpectedSelection { field_name, .. }) if field_name == "title",
        ));
    }

    #[test]
    fn conflicting_aliases() {
        let surface = surface();
        let result = resolve(&surface, "{ movies { name: title name: released } }", json!({}));
        assert_eq!(result, Err(OperationError::ConflictingFields { response_key: "name".to_string() }));
    }

    #[test]
    fn variables() {
        let surface = surface();
        assert_eq!(
            resolve(&surface, "query ($id: ID!) { movies(where: { id: $id }) { title } }", json!({})),
            Err(OperationError::MissingVariable { name: "id".to_string(), var_type: "ID!".to_string() }),
        );
        assert_eq!(
            resolve(&surface, "query { movies(where: { id: $id }) { title } }", json!({})),
            Err(OperationError::UndefinedVariable { name: "id".to_string() }),
        );
    }

    #[test]
    fn subscriptions_select_one_field() {
        let surface = surface();
        let result = resolve(
            &surface,
            "subscription { movieCreated { event } movieDeleted { event } }",
            json!({}),
        );
        assert_eq!(result, Err(OperationError::SubscriptionFieldCount));

        let operation = resolve(&surface, "subscription { movieCreated { createdMovie { title } } }", json!({}))
            .expect("one field resolves");
        assert_eq!(operation.kind(), OperationKind::Subscription);
    }

    #[test]
    fn syntax_errors() {
        let surface = surface();
        assert!(matches!(
            resolve(&surface, "{ movies { title }", json!({})),
            Err(OperationError::ParseError(_)),
        ));
    }
}
