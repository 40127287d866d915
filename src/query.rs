use std::collections::HashMap;

use rusqlite::ToSql;

use crate::value::Value;

/// Named parameter bindings for SQL queries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: HashMap<String, Value>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value. `name` may carry its `:`, `@` or `$` prefix;
    /// bare names are bound as `:name`.
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn bind_name(name: &str) -> String {
    if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

/// SQL statement with named parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Params,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Binds the named parameters and hands the statement and bindings to `f`.
    ///
    /// ```rust,ignore
    /// let query = SqlQuery::new("select :n * 2").with_params(Params::new().with_value("n", 21));
    /// let v = query.with_bound(|sql, params| select_i64(&conn, sql, params))?;
    /// ```
    pub fn with_bound<R>(&self, f: impl FnOnce(&str, &[(&str, &dyn ToSql)]) -> R) -> R {
        let names: Vec<(String, &Value)> = self
            .params
            .values
            .iter()
            .map(|(name, value)| (bind_name(name), value))
            .collect();
        let bound: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();
        f(&self.statement, &bound)
    }
}
