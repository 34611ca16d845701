use crate::authorization::RuleEvaluator;
use crate::test::fixtures::build;
use crate::test::fixtures::try_translate;
use crate::translate::TranslateError;
use crate::value::DbValue;
use serde_json::json;

const POST_TYPE_DEFS: &str = r#"
    type Post @authorization(
        filter: [{ where: { node: { authorId: "$jwt.sub" } } }],
        validate: [
            { operations: [CREATE], where: { jwt: { role: "admin" } } },
            { operations: [UPDATE], when: [BEFORE], where: { node: { authorId: "$jwt.sub" } } }
        ]
    ) {
        title: String!
        authorId: String!
    }

    type Secret @authentication(operations: [READ]) {
        code: String!
    }
"#;

mod filters {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filters_narrow_reads_to_the_callers_nodes() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let jwt = json!({ "sub": "u1" });
        let statement = try_translate(&model, &surface, "{ posts { title } }", Some(&jwt))
            .expect("read translates");
        assert_eq!(
            statement.cypher,
            "MATCH (this:Post)\nWHERE this.authorId = $param0\nRETURN this { .title } AS this",
        );
        assert_eq!(statement.params.get("param0"), Some(&DbValue::String("u1".to_string())));
    }

    #[test]
    fn anonymous_reads_match_nothing() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let statement = try_translate(&model, &surface, "{ posts { title } }", None)
            .expect("read translates");
        assert_eq!(statement.cypher, "MATCH (this:Post)\nWHERE false\nRETURN this { .title } AS this");
        assert!(statement.params.is_empty());
    }

    #[test]
    fn authentication_is_required_for_listed_operations() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let err = try_translate(&model, &surface, "{ secrets { code } }", None)
            .expect_err("anonymous read");
        assert!(matches!(err, TranslateError::Unauthenticated));

        let jwt = json!({ "sub": "u1" });
        assert!(try_translate(&model, &surface, "{ secrets { code } }", Some(&jwt)).is_ok());
    }
}

mod validation {
    use super::*;

    const CREATE_POST: &str = r#"mutation {
        createPosts(input: [{ title: "Hello", authorId: "u1" }]) { posts { title } }
    }"#;

    #[test]
    fn satisfied_create_rules_add_no_check() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let jwt = json!({ "sub": "u1", "role": "admin" });
        let statement = try_translate(&model, &surface, CREATE_POST, Some(&jwt))
            .expect("create translates");
        assert!(!statement.cypher.contains("apoc.util.validate"));
    }

    #[test]
    fn create_rules_that_cannot_hold_are_forbidden() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let jwt = json!({ "sub": "u1", "role": "user" });
        let err = try_translate(&model, &surface, CREATE_POST, Some(&jwt))
            .expect_err("role does not match");
        assert!(matches!(err, TranslateError::Forbidden));
    }

    #[test]
    fn anonymous_creates_are_unauthenticated() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let err = try_translate(&model, &surface, CREATE_POST, None)
            .expect_err("no token");
        assert!(matches!(err, TranslateError::Unauthenticated));
    }

    #[test]
    fn node_rules_validate_before_the_update() {
        let (model, surface) = build(POST_TYPE_DEFS);
        let jwt = json!({ "sub": "u1" });
        let statement = try_translate(
            &model,
            &surface,
            r#"mutation { updatePosts(update: { title: "New" }) { posts { title } } }"#,
            Some(&jwt),
        ).expect("update translates");

        assert!(statement.cypher.starts_with("MATCH (this:Post) WHERE this.authorId = $param0\n"));
        let validate = "CALL apoc.util.validate(NOT (this.authorId = $param1), \"Forbidden\", [0])";
        let set = "SET this.title = $param2";
        let validate_at = statement.cypher.find(validate).expect("validation is emitted");
        let set_at = statement.cypher.find(set).expect("title is set");
        assert!(validate_at < set_at);
    }
}

mod claim_rules {
    use super::*;

    const GENRE_TYPE_DEFS: &str = r#"
        type Movie {
            title: String!
            genres: [Genre!]! @relationship(type: "IN_GENRE", direction: OUT)
        }

        type Genre @authorization(validate: [
            { operations: [CREATE, UPDATE], where: { jwt: { role: "admin" } } }
        ]) {
            name: String! @unique
        }
    "#;

    const CONNECT_OR_CREATE: &str = r#"mutation {
        createMovies(input: [{
            title: "Heat"
            genres: {
                connectOrCreate: [{
                    where: { node: { name: "Crime" } }
                    onCreate: { node: { name: "Crime" } }
                }]
            }
        }]) { movies { title } }
    }"#;

    const RENAME_GENRE: &str = r#"mutation {
        updateGenres(where: { name: "Crime" }, update: { name: "Noir" }) { genres { name } }
    }"#;

    #[test]
    fn on_create_nodes_follow_the_targets_create_rules() {
        let (model, surface) = build(GENRE_TYPE_DEFS);

        let user = json!({ "role": "user" });
        let err = try_translate(&model, &surface, CONNECT_OR_CREATE, Some(&user))
            .expect_err("role does not match");
        assert!(matches!(err, TranslateError::Forbidden));

        let admin = json!({ "role": "admin" });
        let statement = try_translate(&model, &surface, CONNECT_OR_CREATE, Some(&admin))
            .expect("connectOrCreate translates");
        assert!(statement.cypher.contains("MERGE (this"), "{}", statement.cypher);
        assert!(!statement.cypher.contains("apoc.util.validate"), "{}", statement.cypher);
    }

    #[test]
    fn mismatched_claims_fail_updates_in_the_database() {
        let (model, surface) = build(GENRE_TYPE_DEFS);

        let user = json!({ "role": "user" });
        let denied = try_translate(&model, &surface, RENAME_GENRE, Some(&user))
            .expect("update translates");
        assert!(
            denied.cypher.contains("CALL apoc.util.validate(NOT (false), \"Forbidden\", [0])"),
            "{}",
            denied.cypher,
        );

        let admin = json!({ "role": "admin" });
        let permitted = try_translate(&model, &surface, RENAME_GENRE, Some(&admin))
            .expect("update translates");
        assert!(!permitted.cypher.contains("apoc.util.validate"), "{}", permitted.cypher);
        assert!(permitted.cypher.contains("SET this.name = $param"), "{}", permitted.cypher);
    }
}

mod events {
    use super::*;

    #[test]
    fn subscribe_rules_are_evaluated_against_the_payload() {
        let (model, _) = build(POST_TYPE_DEFS);
        let post = model.concrete("Post").expect("Post");
        let payload = json!({ "title": "Hello", "authorId": "u1" });

        let owner = json!({ "sub": "u1" });
        assert!(RuleEvaluator::new(&model, Some(&owner)).allows_event(post, &payload));

        let other = json!({ "sub": "u2" });
        assert!(!RuleEvaluator::new(&model, Some(&other)).allows_event(post, &payload));
        assert!(!RuleEvaluator::new(&model, None).allows_event(post, &payload));
    }

    #[test]
    fn unannotated_entities_allow_every_event() {
        let (model, _) = build(POST_TYPE_DEFS);
        let secret = model.concrete("Secret").expect("Secret");
        assert!(RuleEvaluator::new(&model, None).allows_event(secret, &json!({ "code": "x" })));
    }
}
