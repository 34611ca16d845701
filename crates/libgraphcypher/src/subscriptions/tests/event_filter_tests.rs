use crate::subscriptions::EventBus;
use crate::subscriptions::EventFilter;
use crate::subscriptions::EventKind;
use crate::subscriptions::SubscriptionEvent;
use crate::test::fixtures::MOVIE_TYPE_DEFS;
use crate::test::fixtures::build;
use crate::test::fixtures::resolve;
use crate::translate::TranslateError;
use crate::value::DbValue;
use futures::StreamExt;
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

fn filter_for(type_defs: &str, subscription: &str, jwt: Option<serde_json::Value>) -> Result<EventFilter, TranslateError> {
    let (model, surface) = build(type_defs);
    let operation = resolve(&surface, subscription);
    let field = operation.root_fields().first().expect("one root field");
    EventFilter::for_field(Arc::new(model), Arc::new(surface), field, jwt)
}

fn movie_event(kind: EventKind, title: &str) -> SubscriptionEvent {
    let state = IndexMap::from([
        ("id".to_string(), DbValue::String("1".to_string())),
        ("title".to_string(), DbValue::String(title.to_string())),
    ]);
    let (new, old) = match kind {
        EventKind::Delete => (None, Some(state)),
        EventKind::Create | EventKind::Update => (Some(state), None),
    };
    SubscriptionEvent {
        kind,
        new,
        old,
        timestamp: 1.0,
        type_name: "Movie".to_string(),
    }
}

mod matching {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn matching_events_are_shaped_like_the_selection() {
        let filter = filter_for(
            MOVIE_TYPE_DEFS,
            r#"subscription { created: movieCreated(where: { title_STARTS_WITH: "He" }) { event createdMovie { title } } }"#,
            None,
        ).expect("subscription resolves");

        let response = filter.respond(&movie_event(EventKind::Create, "Heat")).expect("event matches");
        assert_eq!(response.data, Some(json!({
            "created": { "event": "CREATE", "createdMovie": { "title": "Heat" } },
        })));
        assert!(response.errors.is_empty());
    }

    #[test]
    fn where_filters_events() {
        let filter = filter_for(
            MOVIE_TYPE_DEFS,
            r#"subscription { movieCreated(where: { title: "Heat" }) { event } }"#,
            None,
        ).expect("subscription resolves");
        assert!(filter.respond(&movie_event(EventKind::Create, "Ronin")).is_none());
    }

    #[test]
    fn other_kinds_and_types_are_ignored() {
        let filter = filter_for(MOVIE_TYPE_DEFS, "subscription { movieCreated { event } }", None)
            .expect("subscription resolves");
        assert!(filter.respond(&movie_event(EventKind::Delete, "Heat")).is_none());

        let mut actor_event = movie_event(EventKind::Create, "Heat");
        actor_event.type_name = "Actor".to_string();
        assert!(filter.respond(&actor_event).is_none());
    }

    #[test]
    fn deletes_carry_the_deleted_node() {
        let filter = filter_for(MOVIE_TYPE_DEFS, "subscription { movieDeleted { deletedMovie { title } } }", None)
            .expect("subscription resolves");
        let response = filter.respond(&movie_event(EventKind::Delete, "Heat")).expect("event matches");
        assert_eq!(response.data, Some(json!({ "movieDeleted": { "deletedMovie": { "title": "Heat" } } })));
    }
}

mod authorization {
    use super::*;

    const PRIVATE_MOVIES: &str = r#"
        type Movie @authorization(filter: [{ where: { node: { owner: "$jwt.sub" } } }]) {
            title: String!
            owner: String!
        }
    "#;

    fn owned_by(owner: &str) -> SubscriptionEvent {
        SubscriptionEvent {
            kind: EventKind::Create,
            new: Some(IndexMap::from([
                ("title".to_string(), DbValue::String("Heat".to_string())),
                ("owner".to_string(), DbValue::String(owner.to_string())),
            ])),
            old: None,
            timestamp: 1.0,
            type_name: "Movie".to_string(),
        }
    }

    #[test]
    fn subscribers_only_see_events_they_may_read() {
        let filter = filter_for(
            PRIVATE_MOVIES,
            "subscription { movieCreated { createdMovie { title } } }",
            Some(json!({ "sub": "alice" })),
        ).expect("subscription resolves");
        assert!(filter.respond(&owned_by("alice")).is_some());
        assert!(filter.respond(&owned_by("bob")).is_none());
    }

    #[test]
    fn authentication_is_checked_when_subscribing() {
        let err = filter_for(
            "type Movie @authentication(operations: [SUBSCRIBE]) { title: String! }",
            "subscription { movieCreated { event } }",
            None,
        ).expect_err("anonymous subscription");
        assert!(matches!(err, TranslateError::Unauthenticated));
    }
}

#[tokio::test]
async fn streams_deliver_events_published_after_subscribing() {
    let filter = filter_for(MOVIE_TYPE_DEFS, "subscription { movieUpdated { updatedMovie { title } } }", None)
        .expect("subscription resolves");
    let bus = EventBus::new(4);
    let mut stream = filter.into_stream(&bus);

    bus.publish(movie_event(EventKind::Create, "Heat"));
    bus.publish(movie_event(EventKind::Update, "Ronin"));

    let response = stream.next().await.expect("the update is delivered");
    assert_eq!(response.data, Some(json!({ "movieUpdated": { "updatedMovie": { "title": "Ronin" } } })));
}
