use crate::value::DbValue;
use crate::value::Point;
use indexmap::IndexMap;
use serde_json::json;

#[test]
fn from_json_keeps_integers_apart_from_floats() {
    let value = DbValue::from_json(&json!({ "a": 1, "b": [1.5, null], "c": "x" }));

    assert_eq!(value, DbValue::Map(IndexMap::from([
        ("a".to_string(), DbValue::Integer(1)),
        ("b".to_string(), DbValue::List(vec![DbValue::Float(1.5), DbValue::Null])),
        ("c".to_string(), DbValue::String("x".to_string())),
    ])));
}

#[test]
fn map_accessors() {
    let value = DbValue::from_json(&json!({ "count": 3, "name": "Alice" }));

    assert_eq!(value.get("count").and_then(DbValue::as_i64), Some(3));
    assert_eq!(value.get("count").and_then(DbValue::as_f64), Some(3.0));
    assert_eq!(value.get("name").and_then(DbValue::as_str), Some("Alice"));
    assert!(value.get("missing").is_none());
    assert!(DbValue::Integer(1).get("count").is_none());
}

#[test]
fn points_render_their_srid_and_coordinates() {
    let point = DbValue::Point(Point::geographic(1.5, 2.5, None));

    assert_eq!(point.to_json(), json!({ "srid": 4326, "x": 1.5, "y": 2.5 }));
}

#[test]
fn point_kinds_follow_the_srid() {
    let cartesian = Point::cartesian(1.0, 2.0, Some(3.0));
    let geographic = Point::geographic(1.0, 2.0, Some(3.0));

    assert_eq!(cartesian.srid, Point::CARTESIAN_3D);
    assert_eq!(cartesian.crs(), "cartesian-3d");
    assert_eq!(geographic.srid, Point::WGS84_3D);
    assert_eq!(geographic.to_graphql(), json!({
        "longitude": 1.0,
        "latitude": 2.0,
        "height": 3.0,
        "crs": "wgs-84-3d",
        "srid": 4979,
    }));
}
