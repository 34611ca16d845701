use crate::value::DbValue;
use indexmap::IndexMap;
use serde::Deserialize;

/// One result row, by column name.
pub type Record = IndexMap<String, DbValue>;

/// Update statistics reported by the database for one statement.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryCounters {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub properties_set: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
}
impl QueryCounters {
    /// The counters as the `info` object of mutation responses.
    pub fn to_db_value(&self) -> DbValue {
        let count = |value: u64| DbValue::Integer(i64::try_from(value).unwrap_or(i64::MAX));
        DbValue::Map(IndexMap::from([
            ("nodesCreated".to_string(), count(self.nodes_created)),
            ("nodesDeleted".to_string(), count(self.nodes_deleted)),
            ("propertiesSet".to_string(), count(self.properties_set)),
            ("relationshipsCreated".to_string(), count(self.relationships_created)),
            ("relationshipsDeleted".to_string(), count(self.relationships_deleted)),
        ]))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub counters: QueryCounters,
    pub records: Vec<Record>,
}
impl QueryResult {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            counters: QueryCounters::default(),
            records,
        }
    }

    pub fn with_counters(mut self, counters: QueryCounters) -> Self {
        self.counters = counters;
        self
    }
}
