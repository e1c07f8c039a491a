//! Database connection and query execution.

use std::path::Path;
use std::time::Duration;

use randtext_core::{QueryResult, Row, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::DbError;

/// SQLite database connection.
///
/// Provides query execution with `Value` parameters and typed row
/// deserialization.
#[derive(Debug)]
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Open (or create) a database file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Db::open("randtext.db")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| DbError::OpenError(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::configure(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::OpenError(e.to_string()))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, DbError> {
        conn.busy_timeout(Duration::from_millis(3000))
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Apply a named migration once.
    ///
    /// Applied names are recorded in `schema_migrations`; re-applying a
    /// recorded name is a no-op.
    pub fn migrate(&self, name: &str, sql: &str) -> Result<(), DbError> {
        let fail = |e: rusqlite::Error| DbError::MigrationError {
            name: name.to_string(),
            message: e.to_string(),
        };

        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    name TEXT PRIMARY KEY,
                    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
            )
            .map_err(fail)?;

        let applied: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE name = ?1)",
                [name],
                |row| row.get(0),
            )
            .map_err(fail)?;
        if applied {
            return Ok(());
        }

        debug!(migration = name, "Applying migration");
        self.conn.execute_batch(sql).map_err(fail)?;
        self.conn
            .execute("INSERT INTO schema_migrations (name) VALUES (?1)", [name])
            .map_err(fail)?;
        Ok(())
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.execute(
    ///     "INSERT INTO random_texts (value, length, created) VALUES (?1, ?2, ?3)",
    ///     params!["abc", 3i64, "2024-05-01"]
    /// )?;
    /// ```
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, DbError> {
        let changed = self
            .conn
            .execute(sql, params_from_iter(params.iter().map(to_sql)))?;
        Ok(changed)
    }

    /// Rowid of the most recent successful insert on this connection.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Execute a SQL query and return raw results.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(to_sql)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(from_sql))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Row::new(columns.clone(), values));
        }

        Ok(QueryResult::new(columns, out))
    }

    /// Execute a SQL query and deserialize results into a vector.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let records: Vec<TextRecord> = db.query_as(
    ///     "SELECT id, value, length, created FROM random_texts ORDER BY id DESC",
    ///     params![]
    /// )?;
    /// ```
    pub fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        self.query(sql, params)?.iter().map(deserialize_row).collect()
    }

    /// Execute a SQL query and return an optional single row.
    pub fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        result.first().map(deserialize_row).transpose()
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Deserialize a row by way of a JSON object keyed by column name.
fn deserialize_row<T: DeserializeOwned>(row: &Row) -> Result<T, DbError> {
    let map: serde_json::Map<String, serde_json::Value> = row
        .columns()
        .iter()
        .zip(row.values())
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();

    Ok(serde_json::from_value(serde_json::Value::Object(map))?)
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Blob(b) => match std::str::from_utf8(b) {
            Ok(s) => serde_json::Value::String(s.to_string()),
            Err(_) => serde_json::Value::from(b.clone()),
        },
    }
}
