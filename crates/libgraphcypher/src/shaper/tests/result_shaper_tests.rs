use crate::cypher::StatementKind;
use crate::execution::QueryCounters;
use crate::execution::QueryResult;
use crate::shaper::PathSegment;
use crate::shaper::ResultShaper;
use crate::test::fixtures;
use crate::test::fixtures::record;
use crate::translate::offset_to_cursor;
use serde_json::Value as JsonValue;
use serde_json::json;

/// Shapes the first root field of `query` from `result`.
fn shape_query(
    type_defs: &str,
    root_type: &str,
    query: &str,
    kind: StatementKind,
    result: &QueryResult,
) -> crate::shaper::ShapedField {
    let (model, surface) = fixtures::build(type_defs);
    let operation = fixtures::resolve(&surface, query);
    let field = &operation.root_fields()[0];
    let shaper = ResultShaper::new(&model, &surface);
    let value = shaper.statement_value(root_type, field, kind, result);
    shaper.shape(root_type, field, &value)
}

mod reads {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_become_a_list() {
        let result = QueryResult::new(vec![
            record(json!({ "this": { "title": "The Matrix", "released": 1999 } })),
            record(json!({ "this": { "title": "Speed", "released": null } })),
        ]);
        let shaped = shape_query(
            fixtures::MOVIE_TYPE_DEFS,
            "Query",
            "{ movies { title released } }",
            StatementKind::Read,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert!(!shaped.nulls_parent);
        assert_eq!(shaped.value, json!([
            { "title": "The Matrix", "released": 1999 },
            { "title": "Speed", "released": null },
        ]));
    }

    #[test]
    fn aliases_and_typename() {
        let result = QueryResult::new(vec![
            record(json!({ "this": { "name": "The Matrix" } })),
        ]);
        let shaped = shape_query(
            fixtures::MOVIE_TYPE_DEFS,
            "Query",
            "{ movies { __typename name: title } }",
            StatementKind::Read,
            &result,
        );

        assert_eq!(shaped.value, json!([{ "__typename": "Movie", "name": "The Matrix" }]));
    }

    #[test]
    fn null_in_non_null_position_bubbles_up() {
        let result = QueryResult::new(vec![
            record(json!({ "this": { "title": null } })),
        ]);
        let shaped = shape_query(
            fixtures::MOVIE_TYPE_DEFS,
            "Query",
            "{ movies { title } }",
            StatementKind::Read,
            &result,
        );

        assert!(shaped.nulls_parent);
        assert_eq!(shaped.value, JsonValue::Null);
        assert_eq!(shaped.errors.len(), 1);
        assert_eq!(shaped.errors[0].message, "Cannot return null for non-nullable field Movie.title.");
        assert_eq!(shaped.errors[0].path, vec![
            PathSegment::Field("movies".to_string()),
            PathSegment::Index(0),
            PathSegment::Field("title".to_string()),
        ]);
    }

    #[test]
    fn abstract_values_resolve_their_type() {
        let type_defs = r#"
            type Book {
                title: String!
            }

            type Magazine {
                issue: Int
            }

            union Work = Book | Magazine

            type Author {
                name: String!
                works: [Work!]! @relationship(type: "WROTE", direction: OUT)
            }
        "#;
        let result = QueryResult::new(vec![
            record(json!({ "this": { "works": [
                { "__resolveType": "Book", "title": "Dune" },
                { "__resolveType": "Magazine", "issue": 12 },
            ] } })),
        ]);
        let shaped = shape_query(
            type_defs,
            "Query",
            "{ authors { works { __typename ... on Book { title } ... on Magazine { issue } } } }",
            StatementKind::Read,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert_eq!(shaped.value, json!([{ "works": [
            { "__typename": "Book", "title": "Dune" },
            { "__typename": "Magazine", "issue": 12 },
        ] }]));
    }

    #[test]
    fn unmatched_fragments_leave_empty_objects() {
        let type_defs = r#"
            type Genre {
                name: String!
            }

            union Search = Genre | Movie

            type Movie {
                title: String!
                search: [Search!]! @relationship(type: "SEARCH", direction: OUT)
            }
        "#;
        let result = QueryResult::new(vec![
            record(json!({ "this": { "search": [
                { "__resolveType": "Genre", "name": "Action" },
                { "__resolveType": "Movie" },
            ] } })),
        ]);
        let shaped = shape_query(
            type_defs,
            "Query",
            "{ movies { search { ... on Genre { name } } } }",
            StatementKind::Read,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert_eq!(shaped.value, json!([{ "search": [{ "name": "Action" }, {}] }]));
    }

    #[test]
    fn missing_points_are_null() {
        let type_defs = r#"
            type Place {
                name: String!
                location: Point
                grid: CartesianPoint
            }
        "#;
        let result = QueryResult::new(vec![
            record(json!({ "this": { "name": "Home", "location": null, "grid": null } })),
        ]);
        let shaped = shape_query(
            type_defs,
            "Query",
            "{ places { name location { longitude latitude } grid { x y } } }",
            StatementKind::Read,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert_eq!(shaped.value, json!([{ "name": "Home", "location": null, "grid": null }]));
    }
}

mod connections {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursors_and_page_info_are_computed() {
        let result = QueryResult::new(vec![
            record(json!({ "this": {
                "edges": [{ "node": { "title": "The Matrix" } }],
                "totalCount": 2,
            } })),
        ]);
        let shaped = shape_query(
            fixtures::MOVIE_TYPE_DEFS,
            "Query",
            "{ moviesConnection(first: 1) { totalCount edges { cursor node { title } } pageInfo { hasNextPage hasPreviousPage endCursor } } }",
            StatementKind::Connection,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert_eq!(shaped.value, json!({
            "totalCount": 2,
            "edges": [{ "cursor": offset_to_cursor(0), "node": { "title": "The Matrix" } }],
            "pageInfo": {
                "hasNextPage": true,
                "hasPreviousPage": false,
                "endCursor": offset_to_cursor(0),
            },
        }));
    }

    #[test]
    fn cursors_continue_after_the_given_cursor() {
        let after = offset_to_cursor(4);
        let result = QueryResult::new(vec![
            record(json!({ "this": {
                "edges": [{ "node": { "title": "Speed" } }],
                "totalCount": 6,
            } })),
        ]);
        let query = format!(
            "{{ moviesConnection(first: 1, after: \"{after}\") {{ edges {{ cursor }} pageInfo {{ hasNextPage hasPreviousPage }} }} }}",
        );
        let shaped = shape_query(fixtures::MOVIE_TYPE_DEFS, "Query", &query, StatementKind::Connection, &result);

        assert_eq!(shaped.value, json!({
            "edges": [{ "cursor": offset_to_cursor(5) }],
            "pageInfo": { "hasNextPage": false, "hasPreviousPage": true },
        }));
    }
}

mod mutations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_response_reads_counters() {
        let result = QueryResult::new(vec![
            record(json!({ "data": [{ "title": "The Matrix" }] })),
        ]).with_counters(QueryCounters {
            nodes_created: 1,
            properties_set: 2,
            ..QueryCounters::default()
        });
        let shaped = shape_query(
            fixtures::MOVIE_TYPE_DEFS,
            "Mutation",
            r#"mutation { createMovies(input: [{ title: "The Matrix" }]) { info { nodesCreated relationshipsCreated } movies { title } } }"#,
            StatementKind::Create,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert_eq!(shaped.value, json!({
            "info": { "nodesCreated": 1, "relationshipsCreated": 0 },
            "movies": [{ "title": "The Matrix" }],
        }));
    }

    #[test]
    fn delete_info() {
        let result = QueryResult::new(vec![]).with_counters(QueryCounters {
            nodes_deleted: 3,
            relationships_deleted: 5,
            ..QueryCounters::default()
        });
        let shaped = shape_query(
            fixtures::MOVIE_TYPE_DEFS,
            "Mutation",
            "mutation { deleteMovies { nodesDeleted relationshipsDeleted } }",
            StatementKind::Delete,
            &result,
        );

        assert_eq!(shaped.value, json!({ "nodesDeleted": 3, "relationshipsDeleted": 5 }));
    }
}

mod aggregates {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn big_int_average_is_exact() {
        let type_defs = r#"
            type Movie {
                title: String!
                budget: BigInt
            }
        "#;
        let result = QueryResult::new(vec![
            record(json!({ "this": {
                "count": 2,
                "budget": { "average": { "sum": 5, "count": 2 }, "max": 3 },
            } })),
        ]);
        let shaped = shape_query(
            type_defs,
            "Query",
            "{ moviesAggregate { count budget { average max } } }",
            StatementKind::Aggregate,
            &result,
        );

        assert!(shaped.errors.is_empty());
        assert_eq!(shaped.value, json!({
            "count": 2,
            "budget": { "average": "2.5", "max": "3" },
        }));
    }
}
