use crate::schema::generated::GeneratedField;
use crate::schema::generated::GeneratedSchema;
use crate::schema::generated::GeneratedTypeKind;
use crate::test::fixtures;

fn field<'s>(surface: &'s GeneratedSchema, type_name: &str, field_name: &str) -> &'s GeneratedField {
    surface.get(type_name)
        .and_then(|generated| generated.field(field_name))
        .unwrap_or_else(|| panic!("{type_name}.{field_name} is generated"))
}

fn arg_type(field: &GeneratedField, arg: &str) -> String {
    field.args()
        .get(arg)
        .map(|arg_type| arg_type.to_string())
        .unwrap_or_else(|| panic!("{}({arg}:) is generated", field.name()))
}

mod root_fields {
    use super::*;

    #[test]
    fn query_fields() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);

        let movies = field(&surface, "Query", "movies");
        assert_eq!(movies.field_type().to_string(), "[Movie!]!");
        assert_eq!(arg_type(movies, "where"), "MovieWhere");
        assert_eq!(arg_type(movies, "options"), "MovieOptions");

        let connection = field(&surface, "Query", "moviesConnection");
        assert_eq!(connection.field_type().to_string(), "MoviesConnection!");
        assert_eq!(arg_type(connection, "first"), "Int");
        assert_eq!(arg_type(connection, "after"), "String");
        assert_eq!(arg_type(connection, "sort"), "[MovieSort!]");

        let aggregate = field(&surface, "Query", "moviesAggregate");
        assert_eq!(aggregate.field_type().to_string(), "MovieAggregateSelection!");

        assert!(surface.get("Query").is_some_and(|query| query.field("actors").is_some()));
    }

    #[test]
    fn mutation_fields() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);

        let create = field(&surface, "Mutation", "createMovies");
        assert_eq!(create.field_type().to_string(), "CreateMoviesMutationResponse!");
        assert_eq!(arg_type(create, "input"), "[MovieCreateInput!]!");

        let update = field(&surface, "Mutation", "updateMovies");
        assert_eq!(update.field_type().to_string(), "UpdateMoviesMutationResponse!");
        for (arg, expected) in [
            ("where", "MovieWhere"),
            ("update", "MovieUpdateInput"),
            ("connect", "MovieConnectInput"),
            ("disconnect", "MovieDisconnectInput"),
            ("create", "MovieRelationInput"),
            ("delete", "MovieDeleteInput"),
        ] {
            assert_eq!(arg_type(update, arg), expected);
        }

        let delete = field(&surface, "Mutation", "deleteMovies");
        assert_eq!(delete.field_type().to_string(), "DeleteInfo!");
        assert_eq!(arg_type(delete, "delete"), "MovieDeleteInput");

        assert!(field(&surface, "CreateMoviesMutationResponse", "movies").field_type().is_list());
        assert!(field(&surface, "CreateMoviesMutationResponse", "info").field_type().named() == "CreateInfo");
    }

    #[test]
    fn subscription_fields() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);

        let created = field(&surface, "Subscription", "movieCreated");
        assert_eq!(created.field_type().to_string(), "MovieCreatedEvent!");
        assert_eq!(arg_type(created, "where"), "MovieSubscriptionWhere");

        let event = surface.get("MovieUpdatedEvent").expect("update event type");
        let names = event.fields().keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["__typename", "event", "timestamp", "previousState", "updatedMovie"]);
        assert!(surface.get("MovieDeletedEvent").is_some_and(|event| event.field("deletedMovie").is_some()));
    }

    #[test]
    fn identical_models_give_identical_surfaces() {
        let (_, first) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let (_, second) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        assert_eq!(first.describe(), second.describe());
    }
}

mod filters {
    use super::*;

    #[test]
    fn string_filters() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let movie_where = surface.get("MovieWhere").expect("MovieWhere is generated");

        for key in ["title", "title_CONTAINS", "title_STARTS_WITH", "title_ENDS_WITH", "title_IN", "title_MATCHES"] {
            assert!(movie_where.field(key).is_some(), "{key} is offered");
        }
        assert_eq!(field(&surface, "MovieWhere", "title_IN").field_type().to_string(), "[String!]");
        assert!(field(&surface, "MovieWhere", "title_NOT").deprecation().is_some());
        assert!(field(&surface, "MovieWhere", "title").deprecation().is_none());
        assert!(movie_where.field("title_INCLUDES").is_none());
    }

    #[test]
    fn numeric_and_list_filters() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let movie_where = surface.get("MovieWhere").expect("MovieWhere is generated");
        for key in ["released_GT", "released_GTE", "released_LT", "released_LTE"] {
            assert!(movie_where.field(key).is_some(), "{key} is offered");
        }
        assert!(movie_where.field("released_CONTAINS").is_none());

        let acted_in_where = surface.get("ActedInWhere").expect("ActedInWhere is generated");
        assert!(acted_in_where.field("roles_INCLUDES").is_some());
        assert!(acted_in_where.field("roles_GT").is_none());
    }

    #[test]
    fn relationship_filters() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let movie_where = surface.get("MovieWhere").expect("MovieWhere is generated");

        for quantifier in ["_SOME", "_NONE", "_ALL", "_SINGLE"] {
            let key = format!("actors{quantifier}");
            assert_eq!(field(&surface, "MovieWhere", &key).field_type().to_string(), "ActorWhere");
            let key = format!("actorsConnection{quantifier}");
            assert_eq!(
                field(&surface, "MovieWhere", &key).field_type().to_string(),
                "MovieActorsConnectionWhere",
            );
        }
        assert!(field(&surface, "MovieWhere", "actors").deprecation().is_some());
        assert_eq!(
            field(&surface, "MovieWhere", "actorsAggregate").field_type().to_string(),
            "MovieActorsAggregateInput",
        );
        for key in ["AND", "OR", "NOT"] {
            assert!(movie_where.field(key).is_some(), "{key} is offered");
        }
    }
}

mod mutation_inputs {
    use super::*;

    #[test]
    fn create_input_skips_generated_fields() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let create = surface.get("MovieCreateInput").expect("MovieCreateInput is generated");

        assert!(create.field("id").is_none());
        assert_eq!(field(&surface, "MovieCreateInput", "title").field_type().to_string(), "String!");
        assert_eq!(field(&surface, "MovieCreateInput", "released").field_type().to_string(), "Int");
        assert_eq!(
            field(&surface, "MovieCreateInput", "actors").field_type().to_string(),
            "MovieActorsFieldInput",
        );
        assert_eq!(
            field(&surface, "MovieActorsCreateFieldInput", "edge").field_type().to_string(),
            "ActedInCreateInput",
        );
    }

    #[test]
    fn update_operators() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let update = surface.get("MovieUpdateInput").expect("MovieUpdateInput is generated");
        assert!(update.field("released_INCREMENT").is_some());
        assert!(update.field("released_DECREMENT").is_some());
        assert!(update.field("title_INCREMENT").is_none());
        assert_eq!(field(&surface, "MovieUpdateInput", "title").field_type().to_string(), "String");

        let edge_update = surface.get("ActedInUpdateInput").expect("ActedInUpdateInput is generated");
        assert!(edge_update.field("roles_PUSH").is_some());
        assert!(edge_update.field("roles_POP").is_some());
    }

    #[test]
    fn connect_or_create_needs_a_unique_target() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        // Actor has no unique attribute; Movie has its @id.
        assert!(field(&surface, "MovieActorsFieldInput", "create").field_type().is_list());
        assert!(surface.get("MovieActorsFieldInput").is_some_and(|input| input.field("connectOrCreate").is_none()));
        assert!(surface.get("ActorMoviesFieldInput").is_some_and(|input| input.field("connectOrCreate").is_some()));
        assert!(surface.get("MovieUniqueWhere").is_some());
        assert!(surface.get("ActorUniqueWhere").is_none());
    }

    #[test]
    fn union_relationships_are_keyed_by_member() {
        let (_, surface) = fixtures::build(r#"
            type Book {
                title: String!
            }

            type Magazine {
                title: String!
                issue: Int
            }

            union Work = Book | Magazine

            type Author {
                name: String!
                works: [Work!]! @relationship(type: "WROTE", direction: OUT)
            }
        "#);

        let create = surface.get("AuthorWorksCreateInput").expect("member keyed create input");
        let members = create.fields().keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(members, vec!["Book", "Magazine"]);
        assert_eq!(
            field(&surface, "AuthorWorksCreateInput", "Book").field_type().to_string(),
            "AuthorWorksBookFieldInput",
        );
        assert_eq!(
            field(&surface, "AuthorWorksConnectInput", "Magazine").field_type().to_string(),
            "[AuthorWorksMagazineConnectFieldInput!]",
        );
        assert_eq!(field(&surface, "Author", "works").field_type().to_string(), "[Work!]!");
        assert_eq!(
            surface.get("Work").map(|work| work.kind().clone()),
            Some(GeneratedTypeKind::Union { members: vec!["Book".to_string(), "Magazine".to_string()] }),
        );
    }
}

mod outputs {
    use super::*;

    #[test]
    fn connection_types() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);

        assert_eq!(
            field(&surface, "MoviesConnection", "edges").field_type().to_string(),
            "[MovieEdge!]!",
        );
        assert_eq!(field(&surface, "MoviesConnection", "pageInfo").field_type().to_string(), "PageInfo!");
        assert_eq!(
            field(&surface, "MovieActorsRelationship", "properties").field_type().to_string(),
            "ActedIn!",
        );
        assert_eq!(
            field(&surface, "Movie", "actorsConnection").field_type().to_string(),
            "MovieActorsConnection!",
        );
    }

    #[test]
    fn aggregate_selections() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        let selection = surface.get("MovieAggregateSelection").expect("aggregate selection type");

        assert_eq!(field(&surface, "MovieAggregateSelection", "count").field_type().to_string(), "Int!");
        assert_eq!(
            field(&surface, "MovieAggregateSelection", "title").field_type().to_string(),
            "StringAggregateSelection!",
        );
        assert_eq!(
            field(&surface, "MovieAggregateSelection", "released").field_type().to_string(),
            "IntAggregateSelection!",
        );
        assert!(selection.field("actors").is_none());
        assert_eq!(field(&surface, "IntAggregateSelection", "average").field_type().to_string(), "Float");
    }

    #[test]
    fn every_output_object_has_typename() {
        let (_, surface) = fixtures::build(fixtures::MOVIE_TYPE_DEFS);
        for generated in surface.types().values().filter(|generated| generated.is_composite_output()) {
            assert!(generated.field("__typename").is_some(), "{} has __typename", generated.name());
        }
        assert!(surface.type_applies("Movie", "Movie"));
        assert!(!surface.type_applies("Actor", "Movie"));
    }
}
