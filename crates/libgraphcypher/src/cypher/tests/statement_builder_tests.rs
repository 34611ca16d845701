use crate::cypher::StatementBuilder;
use crate::cypher::StatementKind;
use crate::test::fixtures::MOVIE_TYPE_DEFS;
use crate::test::fixtures::build;
use crate::test::fixtures::resolve;
use crate::test::fixtures::translate;
use crate::test::fixtures::try_translate;
use crate::translate::TranslateError;
use crate::value::DbValue;

fn string(value: &str) -> DbValue {
    DbValue::String(value.to_string())
}

mod reads {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_read() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(&model, &surface, "{ movies { title } }");
        assert_eq!(statement.cypher, "MATCH (this:Movie)\nRETURN this { .title } AS this");
        assert_eq!(statement.kind, StatementKind::Read);
        assert!(statement.params.is_empty());
    }

    #[test]
    fn filtered_read() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(&model, &surface, r#"{ movies(where: { title: "Heat" }) { title } }"#);
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie)\nWHERE this.title = $param0\nRETURN this { .title } AS this",
        );
        assert_eq!(statement.params.get("param0"), Some(&string("Heat")));
    }

    #[test]
    fn sorted_and_paged_read() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            "{ movies(options: { sort: [{ title: DESC }], limit: 2, offset: 1 }) { title } }",
        );
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie)\nWITH * ORDER BY this.title DESC SKIP $param0 LIMIT $param1\nRETURN this { .title } AS this",
        );
        assert_eq!(statement.params.get("param0"), Some(&DbValue::Integer(1)));
        assert_eq!(statement.params.get("param1"), Some(&DbValue::Integer(2)));
    }

    #[test]
    fn aliased_fields_project_under_their_alias() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(&model, &surface, "{ movies { name: title released } }");
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie)\nRETURN this { name: this.title, .released } AS this",
        );
    }

    #[test]
    fn max_limit_caps_unbounded_reads() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let operation = resolve(&surface, "{ movies { title } }");
        let field = operation.root_fields().first().expect("one root field");
        let statement = StatementBuilder::new(&model, &surface, None)
            .with_max_limit(Some(5))
            .build(field, operation.kind())
            .expect("read translates");
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie)\nWITH * LIMIT $param0\nRETURN this { .title } AS this",
        );
        assert_eq!(statement.params.get("param0"), Some(&DbValue::Integer(5)));
    }

    #[test]
    fn relationship_filters_become_existential_subqueries() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            r#"{ movies(where: { actors_SOME: { name: "Tom" } }) { title } }"#,
        );
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie)\n\
             WHERE EXISTS { MATCH (this)<-[var1:ACTED_IN]-(this0:Actor) WHERE this0.name = $param0 }\n\
             RETURN this { .title } AS this",
        );
        assert_eq!(statement.params.get("param0"), Some(&string("Tom")));
    }

    #[test]
    fn nested_reads_are_collected_in_subqueries() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(&model, &surface, "{ movies { title actors { name } } }");
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie)\n\
             CALL {\n    \
                 WITH this\n    \
                 MATCH (this)<-[:ACTED_IN]-(this1:Actor)\n    \
                 WITH this1 { .name } AS this1\n    \
                 RETURN collect(this1) AS var0\n\
             }\n\
             RETURN this { .title, actors: var0 } AS this",
        );
    }

    #[test]
    fn declared_relationships_read_every_implementer() {
        let (model, surface) = build(r#"
            interface Step {
                name: String!
                nexts: [Step!]! @declareRelationship
                prevs: [Step!]! @declareRelationship
            }

            type Checkpoint implements Step {
                name: String!
                nexts: [Step!]! @relationship(type: "FOLLOWED_BY", direction: OUT)
                prevs: [Step!]! @relationship(type: "FOLLOWED_BY", direction: IN)
            }

            type Waypoint implements Step {
                name: String!
                nexts: [Step!]! @relationship(type: "FOLLOWED_BY", direction: OUT)
                prevs: [Step!]! @relationship(type: "FOLLOWED_BY", direction: IN)
            }
        "#);
        let statement = translate(&model, &surface, "{ checkpoints { nexts { name } prevs { name } } }");
        let cypher = &statement.cypher;

        assert!(cypher.starts_with("MATCH (this:Checkpoint)\n"), "{cypher}");
        assert_eq!(cypher.matches("(this)-[:FOLLOWED_BY]->(").count(), 2, "{cypher}");
        assert_eq!(cypher.matches("(this)<-[:FOLLOWED_BY]-(").count(), 2, "{cypher}");
        assert_eq!(cypher.matches(":Checkpoint)").count(), 3, "{cypher}");
        assert_eq!(cypher.matches(":Waypoint)").count(), 2, "{cypher}");
        assert_eq!(cypher.matches("UNION").count(), 2, "{cypher}");
        assert!(cypher.contains("__resolveType: \"Waypoint\""), "{cypher}");
    }
}

mod connections {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_connections_count_then_page_their_edges() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            "{ moviesConnection { totalCount edges { node { title } } } }",
        );
        assert_eq!(statement.kind, StatementKind::Connection);
        let cypher = &statement.cypher;
        assert!(cypher.contains("MATCH (this1:Movie)"), "{cypher}");
        assert!(cypher.contains("WITH { node: this1 { .title } } AS var0"), "{cypher}");
        assert!(cypher.contains("WITH var2, size(var2) AS var3"), "{cypher}");
        assert!(cypher.ends_with("RETURN { edges: var4, totalCount: var3 } AS this"), "{cypher}");
    }

    #[test]
    fn first_and_after_become_skip_and_limit() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            r#"{ moviesConnection(first: 2, after: "YXJyYXljb25uZWN0aW9uOjA=") { edges { node { title } } } }"#,
        );
        assert!(statement.cypher.contains("SKIP $param0 LIMIT $param1"), "{}", statement.cypher);
        assert_eq!(statement.params.get("param0"), Some(&DbValue::Integer(1)));
        assert_eq!(statement.params.get("param1"), Some(&DbValue::Integer(2)));
    }

    #[test]
    fn foreign_cursors_are_rejected() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let err = try_translate(
            &model,
            &surface,
            r#"{ moviesConnection(after: "nope") { totalCount } }"#,
            None,
        ).expect_err("cursor is not ours");
        assert!(matches!(err, TranslateError::InvalidCursor { .. }));
    }
}

mod aggregates {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn count_aggregate() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(&model, &surface, "{ moviesAggregate { count } }");
        assert_eq!(statement.kind, StatementKind::Aggregate);
        assert_eq!(
            statement.cypher,
            "CALL {\n    MATCH (this:Movie)\n    RETURN count(this) AS var0\n}\nRETURN { count: var0 } AS this",
        );
    }

    #[test]
    fn string_aggregates_collect_by_length() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(&model, &surface, "{ moviesAggregate { title { longest shortest } } }");
        assert!(statement.cypher.contains("WITH this ORDER BY size(this.title) DESC"), "{}", statement.cypher);
        assert!(
            statement.cypher.ends_with("RETURN { title: var0 } AS this"),
            "{}",
            statement.cypher,
        );
    }
}

mod mutations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_runs_one_subquery_per_input() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            r#"mutation { createMovies(input: [{ title: "Heat" }, { title: "Ronin" }]) { movies { title } } }"#,
        );
        assert_eq!(statement.kind, StatementKind::Create);
        let cypher = &statement.cypher;
        assert!(cypher.contains("CREATE (this0:Movie)"), "{cypher}");
        assert!(cypher.contains("CREATE (this1:Movie)"), "{cypher}");
        assert!(cypher.contains("this0.id = randomUUID()"), "{cypher}");
        assert!(cypher.contains("UNWIND [this0, this1] AS this"), "{cypher}");
        assert!(cypher.contains("\"create\""), "{cypher}");
        assert!(cypher.ends_with("AS __events"), "{cypher}");

        let values = statement.params.values().cloned().collect::<Vec<_>>();
        assert_eq!(values, vec![string("Heat"), string("Ronin")]);
    }

    #[test]
    fn update_applies_numeric_operators() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            r#"mutation {
                updateMovies(where: { id: "1" }, update: { released_INCREMENT: 1 }) { movies { title } }
            }"#,
        );
        assert_eq!(statement.kind, StatementKind::Update);
        let cypher = &statement.cypher;
        assert!(cypher.starts_with("MATCH (this:Movie) WHERE this.id = $param0\n"), "{cypher}");
        assert!(cypher.contains("SET this.released = this.released + $param1"), "{cypher}");
        assert_eq!(statement.params.get("param1"), Some(&DbValue::Integer(1)));
    }

    #[test]
    fn delete_returns_only_events() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let statement = translate(
            &model,
            &surface,
            r#"mutation { deleteMovies(where: { id: "1" }) { nodesDeleted } }"#,
        );
        assert_eq!(statement.kind, StatementKind::Delete);
        assert_eq!(
            statement.cypher,
            "MATCH (this:Movie) WHERE this.id = $param0\n\
             WITH *, this { .* } AS var0\n\
             WITH DISTINCT this, var0\n\
             DETACH DELETE this\n\
             RETURN collect({ event: \"delete\", typename: \"Movie\", old: var0, timestamp: timestamp() }) AS __events",
        );
    }
}

mod unsupported {
    use super::*;

    #[test]
    fn subscriptions_are_not_translated() {
        let (model, surface) = build(MOVIE_TYPE_DEFS);
        let err = try_translate(&model, &surface, "subscription { movieCreated { event } }", None)
            .expect_err("subscriptions use the event bus");
        assert!(matches!(
            err,
            TranslateError::UnsupportedRootField { ref field_name, .. } if field_name == "movieCreated",
        ));
    }
}
