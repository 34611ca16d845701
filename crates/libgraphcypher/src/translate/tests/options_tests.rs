use crate::schema::SchemaModel;
use crate::test::fixtures;
use crate::translate::LimitPolicy;
use crate::translate::Scope;
use crate::translate::SortField;
use crate::translate::TranslateError;
use crate::translate::connection_window;
use crate::translate::offset_to_cursor;
use crate::translate::read_options;
use serde_json::Value as JsonValue;
use serde_json::json;

type Result<T> = std::result::Result<T, TranslateError>;

fn movies() -> SchemaModel {
    fixtures::build_model(fixtures::MOVIE_TYPE_DEFS)
}

mod limit_policy {
    use super::*;

    #[test]
    fn requested_limits_are_capped() {
        let policy = LimitPolicy { default: Some(10), max: Some(50) };
        assert_eq!(policy.apply(None), Some(10));
        assert_eq!(policy.apply(Some(20)), Some(20));
        assert_eq!(policy.apply(Some(500)), Some(50));
    }

    #[test]
    fn max_alone_limits_unbounded_reads() {
        let policy = LimitPolicy { default: None, max: Some(50) };
        assert_eq!(policy.apply(None), Some(50));
        assert_eq!(LimitPolicy::default().apply(None), None);
    }

    #[test]
    fn annotation_and_global_max_take_the_smaller() -> std::result::Result<(), crate::schema::SchemaBuildError> {
        let model = crate::schema::SchemaBuilder::new()
            .load_str(None, "type Movie @limit(default: 5, max: 100) { title: String! }")?
            .build()?;
        let limit = model.concrete("Movie").and_then(|movie| movie.limit());

        let policy = LimitPolicy::new(limit, Some(20));
        assert_eq!(policy.default, Some(5));
        assert_eq!(policy.max, Some(20));
        assert_eq!(LimitPolicy::new(limit, None).max, Some(100));
        assert_eq!(LimitPolicy::new(None, Some(20)).max, Some(20));

        Ok(())
    }
}

mod options_input {
    use super::*;

    #[test]
    fn limit_offset_and_sort() -> Result<()> {
        let model = movies();
        let movie = model.concrete("Movie").expect("Movie is a node");
        let options = read_options(
            "Movie",
            movie.attributes(),
            &json!({ "limit": 10, "offset": 20, "sort": [{ "released": "DESC" }, { "title": "ASC" }] }),
            LimitPolicy::default(),
        )?;

        assert_eq!(options.limit, Some(10));
        assert_eq!(options.offset, Some(20));
        assert_eq!(options.sort, vec![
            SortField {
                db_name: Some("released".to_string()),
                descending: true,
                field_name: "released".to_string(),
                scope: Scope::Node,
            },
            SortField {
                db_name: Some("title".to_string()),
                descending: false,
                field_name: "title".to_string(),
                scope: Scope::Node,
            },
        ]);

        Ok(())
    }

    #[test]
    fn absent_options_still_get_the_default_limit() -> Result<()> {
        let model = movies();
        let movie = model.concrete("Movie").expect("Movie is a node");
        let options = read_options(
            "Movie",
            movie.attributes(),
            &JsonValue::Null,
            LimitPolicy { default: Some(25), max: None },
        )?;
        assert_eq!(options.limit, Some(25));
        assert!(options.sort.is_empty());

        Ok(())
    }

    #[test]
    fn invalid_options() {
        let model = movies();
        let movie = model.concrete("Movie").expect("Movie is a node");
        let attributes = movie.attributes();

        assert!(matches!(
            read_options("Movie", attributes, &json!({ "limit": -1 }), LimitPolicy::default()),
            Err(TranslateError::InvalidArgument { argument, .. }) if argument == "limit",
        ));
        assert_eq!(
            read_options("Movie", attributes, &json!({ "sort": [{ "rating": "ASC" }] }), LimitPolicy::default()),
            Err(TranslateError::UnknownField {
                field_name: "rating".to_string(),
                type_name: "MovieSort".to_string(),
            }),
        );
        assert!(matches!(
            read_options("Movie", attributes, &json!({ "sort": [{ "title": "UP" }] }), LimitPolicy::default()),
            Err(TranslateError::InvalidArgument { .. }),
        ));
    }
}

mod window {
    use super::*;

    #[test]
    fn after_skips_past_the_cursor() -> Result<()> {
        let after = json!(offset_to_cursor(9));
        let window = connection_window(Some(&json!(5)), Some(&after), LimitPolicy::default())?;
        assert_eq!(window.limit, Some(5));
        assert_eq!(window.offset, Some(10));

        Ok(())
    }

    #[test]
    fn invalid_cursor() {
        let result = connection_window(None, Some(&json!("bogus")), LimitPolicy::default());
        assert_eq!(result, Err(TranslateError::InvalidCursor { cursor: "bogus".to_string() }));
    }
}
