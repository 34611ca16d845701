use crate::value::CypherDuration;
use crate::value::Point;
use crate::value::temporal;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use indexmap::IndexMap;
use serde::Serialize;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;

/// A `Time` value: a wall-clock time with a fixed UTC offset.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeWithOffset {
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

/// A value as the database sees it.
#[derive(Clone, Debug, PartialEq)]
pub enum DbValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<DbValue>),
    Map(IndexMap<String, DbValue>),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Duration(CypherDuration),
    LocalDateTime(NaiveDateTime),
    LocalTime(NaiveTime),
    Point(Point),
    Time(TimeWithOffset),
}
impl DbValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<DbValue>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, DbValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a key when this value is a map; `None` otherwise.
    pub fn get(&self, key: &str) -> Option<&DbValue> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    /// Converts untyped JSON into a value with no scalar information: numbers
    /// become integers when they fit, objects become maps.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) =>
                Self::List(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(entries) => Self::Map(
                entries.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Lossy JSON rendering used for logging and for values that reach the
    /// client without a declared scalar (e.g. subscription payload maps).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
impl Serialize for DbValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
            Self::Date(d) => serializer.serialize_str(&temporal::format_date(d)),
            Self::DateTime(dt) => serializer.serialize_str(&temporal::format_datetime(dt)),
            Self::Duration(d) => serializer.serialize_str(&d.to_string()),
            Self::LocalDateTime(dt) =>
                serializer.serialize_str(&temporal::format_local_datetime(dt)),
            Self::LocalTime(t) => serializer.serialize_str(&temporal::format_local_time(t)),
            Self::Point(point) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("srid", &point.srid)?;
                map.serialize_entry("x", &point.x)?;
                map.serialize_entry("y", &point.y)?;
                if let Some(z) = point.z {
                    map.serialize_entry("z", &z)?;
                }
                map.end()
            },
            Self::Time(t) =>
                serializer.serialize_str(&temporal::format_time(&t.time, &t.offset)),
        }
    }
}
impl From<bool> for DbValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
impl From<i64> for DbValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}
impl From<f64> for DbValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for DbValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl<T: Into<DbValue>> From<Vec<T>> for DbValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
