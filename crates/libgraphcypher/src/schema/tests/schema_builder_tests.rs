use crate::schema::CallbackOutcome;
use crate::schema::CallbackRegistry;
use crate::schema::Direction;
use crate::schema::EntityRef;
use crate::schema::ScalarKind;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaModel;
use crate::schema::SchemaValidationError;
use crate::schema::WriteOperation;
use crate::test::fixtures;

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn build(type_defs: &str) -> Result<SchemaModel> {
    SchemaBuilder::new()
        .load_str(None, type_defs)?
        .build()
}

fn validation_errors(type_defs: &str) -> Vec<SchemaValidationError> {
    let err = build(type_defs).expect_err("type defs are invalid");
    err.validation_errors().to_vec()
}

mod nodes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_plain_object_is_a_node() -> Result<()> {
        let model = build(fixtures::MOVIE_TYPE_DEFS)?;

        let names = model.concrete_entities().keys().cloned().collect::<Vec<_>>();
        assert_eq!(names, vec!["Movie".to_string(), "Actor".to_string()]);
        assert!(model.relationship_properties("ActedIn").is_some());
        assert!(model.concrete("ActedIn").is_none());

        let movie = model.concrete("Movie").expect("Movie is a node");
        assert_eq!(movie.plural(), "movies");
        assert_eq!(movie.labels(), &["Movie".to_string()]);
        assert_eq!(movie.label_string(), ":Movie");

        Ok(())
    }

    #[test]
    fn node_labels() -> Result<()> {
        let model = build(r#"
            type Movie @node(labels: ["Film", "Movie"]) {
                title: String!
            }
        "#)?;

        let movie = model.concrete("Movie").expect("Movie is a node");
        assert_eq!(movie.primary_label(), "Film");
        assert_eq!(movie.label_string(), ":Film:Movie");

        Ok(())
    }

    #[test]
    fn plural_override_and_irregular_plural() -> Result<()> {
        let model = build(r#"
            type Person {
                name: String!
            }

            type Movie @plural(value: "films") {
                title: String!
            }
        "#)?;

        assert_eq!(model.concrete("Person").map(|p| p.plural()), Some("people"));
        assert_eq!(model.concrete("Movie").map(|m| m.plural()), Some("films"));

        Ok(())
    }

    #[test]
    fn limit_annotation() -> Result<()> {
        let model = build(r#"
            type Movie @limit(default: 10, max: 100) {
                title: String!
            }
        "#)?;

        let limit = model.concrete("Movie").and_then(|m| m.limit()).expect("limit is set");
        assert_eq!(limit.default_limit(), Some(10));
        assert_eq!(limit.max_limit(), Some(100));

        Ok(())
    }
}

mod attributes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn id_is_unique_and_generated() -> Result<()> {
        let model = build(fixtures::MOVIE_TYPE_DEFS)?;
        let id = model.concrete("Movie")
            .and_then(|movie| movie.attribute("id"))
            .expect("Movie.id exists");

        assert!(id.is_id());
        assert!(id.is_autogenerated());
        assert!(id.is_unique());
        assert!(!id.is_client_writable());
        assert_eq!(id.attr_type().kind(), &ScalarKind::ID);
        assert!(!id.attr_type().nullable());

        Ok(())
    }

    #[test]
    fn alias_changes_the_stored_property() -> Result<()> {
        let model = build(r#"
            type Movie {
                title: String! @alias(property: "movie_title")
            }
        "#)?;

        let title = model.concrete("Movie").and_then(|m| m.attribute("title")).expect("title exists");
        assert_eq!(title.name(), "title");
        assert_eq!(title.db_name(), "movie_title");

        Ok(())
    }

    #[test]
    fn cypher_fields_are_computed() -> Result<()> {
        let model = build(r#"
            type Movie {
                title: String!
                actorCount: Int @cypher(statement: "MATCH (this)<-[:ACTED_IN]-(a) RETURN count(a) AS total", columnName: "total")
            }
        "#)?;

        let count = model.concrete("Movie").and_then(|m| m.attribute("actorCount")).expect("actorCount exists");
        assert!(count.is_computed());
        assert!(!count.is_client_writable());
        let annotation = count.cypher().expect("cypher annotation");
        assert_eq!(annotation.column_name(), "total");

        Ok(())
    }

    #[test]
    fn timestamp_defaults_to_create_and_update() -> Result<()> {
        let model = build(r#"
            type Post {
                createdAt: DateTime! @timestamp(operations: [CREATE])
                updatedAt: DateTime @timestamp
            }
        "#)?;

        let post = model.concrete("Post").expect("Post is a node");
        let created = post.attribute("createdAt").expect("createdAt exists");
        let updated = post.attribute("updatedAt").expect("updatedAt exists");
        assert_eq!(created.timestamp_operations(), &[WriteOperation::Create]);
        assert!(updated.timestamp_operations().contains(&WriteOperation::Create));
        assert!(updated.timestamp_operations().contains(&WriteOperation::Update));

        Ok(())
    }

    #[test]
    fn populated_by_needs_a_registered_callback() -> Result<()> {
        let type_defs = r#"
            type Article {
                title: String!
                slug: String! @populatedBy(callback: "slugify", operations: [CREATE])
            }
        "#;

        let errors = validation_errors(type_defs);
        assert!(errors.iter().any(|err| matches!(
            err,
            SchemaValidationError::UnknownCallback { callback, .. } if callback == "slugify",
        )));
        assert_eq!(
            errors[0].to_string(),
            "PopulatedBy callback 'slugify' must be of type function",
        );

        let mut callbacks = CallbackRegistry::new();
        callbacks.register_fn("slugify", |_, _| async { Ok(CallbackOutcome::Unset) });
        let model = SchemaBuilder::new()
            .with_callbacks(&callbacks)
            .load_str(None, type_defs)?
            .build()?;
        let slug = model.concrete("Article").and_then(|a| a.attribute("slug")).expect("slug exists");
        let populated_by = slug.populated_by().expect("populatedBy annotation");
        assert_eq!(populated_by.callback(), "slugify");
        assert!(populated_by.runs_on(WriteOperation::Create));
        assert!(!populated_by.runs_on(WriteOperation::Update));

        Ok(())
    }

    #[test]
    fn timestamp_only_on_date_time() {
        let errors = validation_errors(r#"
            type Post {
                createdAt: String @timestamp
            }
        "#);
        assert!(matches!(
            &errors[..],
            [SchemaValidationError::InvalidDirective { directive, .. }] if directive == "timestamp",
        ));
    }
}

mod relationships {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relationship_fields() -> Result<()> {
        let model = build(fixtures::MOVIE_TYPE_DEFS)?;

        let actors = model.concrete("Movie")
            .and_then(|movie| movie.relationship("actors"))
            .expect("Movie.actors is a relationship");
        assert_eq!(actors.rel_type(), "ACTED_IN");
        assert_eq!(actors.direction(), Direction::In);
        assert_eq!(actors.target(), &EntityRef::Concrete("Actor".to_string()));
        assert_eq!(actors.properties(), Some("ActedIn"));
        assert_eq!(actors.source(), "Movie");
        assert!(actors.is_list());
        assert!(actors.aggregate());

        let movies = model.concrete("Actor")
            .and_then(|actor| actor.relationship("movies"))
            .expect("Actor.movies is a relationship");
        assert_eq!(movies.direction(), Direction::Out);

        Ok(())
    }

    #[test]
    fn union_and_interface_targets() -> Result<()> {
        let model = build(r#"
            interface Production {
                title: String!
            }

            type Movie implements Production {
                title: String!
            }

            type Series implements Production {
                title: String!
                episodes: Int
            }

            union Credit = Movie | Series

            type Person {
                name: String!
                credits: [Credit!]! @relationship(type: "CREDITED", direction: OUT)
                favourite: Production @relationship(type: "LIKES", direction: OUT)
            }
        "#)?;

        let person = model.concrete("Person").expect("Person is a node");
        assert_eq!(
            person.relationship("credits").map(|rel| rel.target().clone()),
            Some(EntityRef::Union("Credit".to_string())),
        );
        assert_eq!(
            person.relationship("favourite").map(|rel| rel.target().clone()),
            Some(EntityRef::Interface("Production".to_string())),
        );
        let members = model.concrete_members(&EntityRef::Union("Credit".to_string()))
            .into_iter()
            .map(|member| member.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(members, vec!["Movie".to_string(), "Series".to_string()]);
        assert!(model.composite("Production").is_some_and(|composite| composite.is_interface()));

        Ok(())
    }

    #[test]
    fn node_typed_field_without_directive() {
        let errors = validation_errors(r#"
            type Movie {
                title: String!
                director: Person
            }

            type Person {
                name: String!
            }
        "#);
        assert!(matches!(
            &errors[..],
            [SchemaValidationError::MissingRelationshipDirective { field_name, target, .. }]
                if field_name == "director" && target == "Person",
        ));
    }
}

mod rejected_definitions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reserved_root_type_names() {
        let errors = validation_errors(r#"
            type Query {
                hello: String
            }
        "#);
        assert!(matches!(
            &errors[..],
            [SchemaValidationError::ReservedTypeName { type_name, .. }] if type_name == "Query",
        ));
    }

    #[test]
    fn input_objects() {
        let errors = validation_errors(r#"
            type Movie {
                title: String!
            }

            input MovieInput {
                title: String!
            }
        "#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Input object definitions are not supported (`MovieInput`)");
    }

    #[test]
    fn validation_summary_counts_errors() {
        let one = build(r#"
            type Movie {
                title: String!
            }

            input MovieInput {
                title: String!
            }
        "#).expect_err("input objects are rejected");
        assert_eq!(
            one.to_string(),
            "Found 1 error in the type definitions:\n  * Input object definitions are not supported (`MovieInput`)",
        );

        let two = build(r#"
            type Movie {
                title: String!
            }

            input MovieInput {
                title: String!
            }

            input MovieFilter {
                title: String
            }
        "#).expect_err("input objects are rejected");
        assert!(two.to_string().starts_with("Found 2 errors in the type definitions:\n"), "{two}");
    }

    #[test]
    fn duplicate_types() {
        let result = build(r#"
            type Movie {
                title: String!
            }

            type Movie {
                released: Int
            }
        "#);
        assert!(matches!(
            result,
            Err(SchemaBuildError::DuplicateTypeDefinition { type_name, .. }) if type_name == "Movie",
        ));
    }

    #[test]
    fn parse_errors() {
        let result = SchemaBuilder::new().load_str(None, "type Movie {");
        assert!(matches!(result, Err(SchemaBuildError::ParseError { .. })));
    }

    #[test]
    fn directories_are_not_type_defs_files() {
        let dir = std::env::temp_dir();
        let result = SchemaBuilder::new().load_file(&dir);
        assert_eq!(
            result.err(),
            Some(SchemaBuildError::SchemaFileReadError(Box::new(
                crate::file_reader::TypeDefsReadError::NotAFile(dir),
            ))),
        );
    }
}

mod constraints {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_statement_per_unique_attribute() -> Result<()> {
        let model = build(r#"
            type Movie {
                id: ID! @id
                title: String! @unique(constraintName: "movie_title")
                released: Int
            }
        "#)?;

        assert_eq!(model.constraint_statements(), vec![
            "CREATE CONSTRAINT Movie_id IF NOT EXISTS FOR (n:Movie) REQUIRE n.id IS UNIQUE".to_string(),
            "CREATE CONSTRAINT movie_title IF NOT EXISTS FOR (n:Movie) REQUIRE n.title IS UNIQUE".to_string(),
        ]);

        Ok(())
    }
}

mod jwt {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn claim_paths() -> Result<()> {
        let model = build(r#"
            type JWTPayload @jwt {
                roles: [String!]! @jwtClaim(path: "app.roles")
                sub: String
            }

            type Movie {
                title: String!
            }
        "#)?;

        let shape = model.jwt().expect("a @jwt type is declared");
        assert_eq!(shape.name(), "JWTPayload");
        assert_eq!(
            shape.claim("roles").map(|claim| claim.path().to_vec()),
            Some(vec!["app".to_string(), "roles".to_string()]),
        );
        assert_eq!(
            shape.claim("sub").map(|claim| claim.path().to_vec()),
            Some(vec!["sub".to_string()]),
        );
        assert!(model.concrete("JWTPayload").is_none());

        Ok(())
    }
}
