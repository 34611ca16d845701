use crate::value::DbValue;
use indexmap::IndexMap;

/// Per-statement naming environment: fresh variables (`this0`, `var1`)
/// and parameters (`param0`), numbered from one shared counter each.
#[derive(Debug, Default)]
pub struct CypherEnv {
    params: IndexMap<String, DbValue>,
    var_counter: usize,
}
impl CypherEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh node variable, `this<N>`.
    pub fn node_var(&mut self) -> String {
        self.fresh("this")
    }

    /// A fresh non-node variable, `var<N>`.
    pub fn var(&mut self) -> String {
        self.fresh("var")
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}{}", self.var_counter);
        self.var_counter += 1;
        name
    }

    /// Binds `value` to a new parameter and returns its reference
    /// (`$param<N>`).
    pub fn param(&mut self, value: DbValue) -> String {
        let name = format!("param{}", self.params.len());
        self.params.insert(name.clone(), value);
        format!("${name}")
    }

    pub fn params(&self) -> &IndexMap<String, DbValue> {
        &self.params
    }

    pub fn into_params(self) -> IndexMap<String, DbValue> {
        self.params
    }
}
