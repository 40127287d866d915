use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::lock::Mutex;
use rusqlite::Connection;
use tracing::debug;

use crate::config::SelectConfig;
use crate::decode::Decode;
use crate::error::Result;
use crate::query::SqlQuery;
use crate::select;
use crate::value::Value;

/// Async access to the select helpers.
#[async_trait]
pub trait AsyncSelect: Send + Sync {
    async fn value<T: Decode + Send + 'static>(&self, query: &SqlQuery) -> Result<T>;

    async fn column<T: Decode + Send + 'static>(&self, query: &SqlQuery) -> Result<Vec<T>>;

    async fn row(&self, query: &SqlQuery) -> Result<Vec<Value>>;

    async fn map(&self, query: &SqlQuery) -> Result<HashMap<String, Value>>;

    async fn map_column(&self, query: &SqlQuery) -> Result<Vec<HashMap<String, Value>>>;
}

/// Shares one already-open connection between async tasks.
///
/// Queries run on the calling task while the connection lock is held, so the
/// service is meant for short statements against a local database.
#[derive(Clone)]
pub struct SelectService {
    config: SelectConfig,
    connection: Arc<Mutex<Connection>>,
}

impl SelectService {
    pub fn new(config: SelectConfig, connection: Connection) -> Self {
        Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Runs `f` with exclusive access to the connection.
    pub async fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> R) -> R {
        let conn = self.connection.lock().await;
        f(&conn)
    }

    fn log_statement(&self, op: &str, query: &SqlQuery) {
        if self.config.log_statements {
            debug!(
                service = %self.config.name,
                op,
                sql = %query.statement,
                params = query.params.values.len(),
                "running select"
            );
        }
    }
}

#[async_trait]
impl AsyncSelect for SelectService {
    async fn value<T: Decode + Send + 'static>(&self, query: &SqlQuery) -> Result<T> {
        self.log_statement("value", query);
        let conn = self.connection.lock().await;
        query.with_bound(|sql, params| select::select_value(&conn, sql, params))
    }

    async fn column<T: Decode + Send + 'static>(&self, query: &SqlQuery) -> Result<Vec<T>> {
        self.log_statement("column", query);
        let conn = self.connection.lock().await;
        query.with_bound(|sql, params| select::select_column(&conn, sql, params))
    }

    async fn row(&self, query: &SqlQuery) -> Result<Vec<Value>> {
        self.log_statement("row", query);
        let conn = self.connection.lock().await;
        query.with_bound(|sql, params| select::select_row(&conn, sql, params))
    }

    async fn map(&self, query: &SqlQuery) -> Result<HashMap<String, Value>> {
        self.log_statement("map", query);
        let conn = self.connection.lock().await;
        query.with_bound(|sql, params| select::select_map(&conn, sql, params))
    }

    async fn map_column(&self, query: &SqlQuery) -> Result<Vec<HashMap<String, Value>>> {
        self.log_statement("map_column", query);
        let conn = self.connection.lock().await;
        query.with_bound(|sql, params| select::select_map_column(&conn, sql, params))
    }
}
