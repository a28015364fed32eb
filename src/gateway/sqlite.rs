use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{Filter, Gateway, Order, Query, Row};
use crate::error::{CamaraError, Result};

/// Local stand-in for the hosted backend: one SQLite table per resource,
/// each row an `id` plus the record as a JSON document.
pub struct SqliteGateway {
    conn: Mutex<Connection>,
}

impl SqliteGateway {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }
}

fn remote(err: rusqlite::Error) -> CamaraError {
    CamaraError::gateway(err.to_string())
}

/// Table and column names are interpolated into SQL, so only plain
/// identifiers are accepted.
fn identifier(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(CamaraError::InvalidResource(name.to_string()))
    }
}

fn ensure_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )",
            identifier(table)?
        ),
        [],
    )
    .map_err(remote)?;
    Ok(())
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn where_clause(filters: &[Filter], params: &mut Vec<SqlValue>) -> Result<String> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let mut parts = Vec::with_capacity(filters.len());
    for filter in filters {
        let expr = format!("json_extract(data, '$.{}')", identifier(filter.column())?);
        match filter {
            Filter::Eq(_, value) => {
                params.push(to_sql(value));
                parts.push(format!("{} IS ?{}", expr, params.len()));
            }
            Filter::Neq(_, value) => {
                params.push(to_sql(value));
                parts.push(format!("{} IS NOT ?{}", expr, params.len()));
            }
            Filter::In(_, values) if values.is_empty() => parts.push("0".to_string()),
            Filter::In(_, values) => {
                let mut slots = Vec::with_capacity(values.len());
                for value in values {
                    params.push(to_sql(value));
                    slots.push(format!("?{}", params.len()));
                }
                parts.push(format!("{} IN ({})", expr, slots.join(", ")));
            }
        }
    }
    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

fn order_clause(order: &[Order]) -> Result<String> {
    if order.is_empty() {
        return Ok(" ORDER BY rowid".to_string());
    }
    let mut keys = Vec::with_capacity(order.len() * 2);
    for o in order {
        let expr = format!("json_extract(data, '$.{}')", identifier(&o.column)?);
        keys.push(format!(
            "({} IS NULL) {}",
            expr,
            if o.nulls_last { "ASC" } else { "DESC" }
        ));
        keys.push(format!("{} {}", expr, if o.ascending { "ASC" } else { "DESC" }));
    }
    Ok(format!(" ORDER BY {}", keys.join(", ")))
}

fn parse_row(data: &str) -> Result<Row> {
    match serde_json::from_str::<Value>(data)? {
        Value::Object(map) => Ok(map),
        _ => Err(CamaraError::gateway("stored row is not an object")),
    }
}

#[async_trait]
impl Gateway for SqliteGateway {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let conn = self.conn.lock().await;
        ensure_table(&conn, table)?;

        let mut params = Vec::new();
        let mut sql = format!("SELECT data FROM {}", table);
        sql.push_str(&where_clause(&query.filters, &mut params)?);
        sql.push_str(&order_clause(&query.order)?);
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        debug!(%sql, "select");

        let mut stmt = conn.prepare(&sql).map_err(remote)?;
        let data: Vec<String> = stmt
            .query_map(params_from_iter(params.iter()), |row| row.get(0))
            .map_err(remote)?
            .collect::<std::result::Result<_, _>>()
            .map_err(remote)?;

        data.iter()
            .map(|d| parse_row(d).map(|r| query.project(r)))
            .collect()
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64> {
        let conn = self.conn.lock().await;
        ensure_table(&conn, table)?;

        let mut params = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            table,
            where_clause(filters, &mut params)?
        );
        let count: i64 = conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(remote)?;
        Ok(count as u64)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row> {
        let conn = self.conn.lock().await;
        ensure_table(&conn, table)?;

        let id = match row.get("id").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        row.insert("id".into(), Value::String(id.clone()));
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        conn.execute(
            &format!("INSERT INTO {} (id, data) VALUES (?1, ?2)", table),
            rusqlite::params![id, Value::Object(row.clone()).to_string()],
        )
        .map_err(remote)?;
        Ok(row)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<()> {
        let mut conn = self.conn.lock().await;
        ensure_table(&conn, table)?;

        let tx = conn.transaction().map_err(remote)?;
        let mut params = Vec::new();
        let sql = format!(
            "SELECT id, data FROM {}{}",
            table,
            where_clause(filters, &mut params)?
        );
        let matching: Vec<(String, String)> = {
            let mut stmt = tx.prepare(&sql).map_err(remote)?;
            let rows = stmt
                .query_map(params_from_iter(params.iter()), |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .map_err(remote)?;
            rows.collect::<std::result::Result<_, _>>().map_err(remote)?
        };

        let now = Value::String(Utc::now().to_rfc3339());
        for (id, data) in &matching {
            let mut row = parse_row(data)?;
            for (k, v) in &patch {
                row.insert(k.clone(), v.clone());
            }
            row.insert("updated_at".into(), now.clone());
            tx.execute(
                &format!("UPDATE {} SET data = ?1 WHERE id = ?2", table),
                rusqlite::params![Value::Object(row).to_string(), id],
            )
            .map_err(remote)?;
        }
        tx.commit().map_err(remote)?;
        debug!(table, updated = matching.len(), "update");
        Ok(())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        let conn = self.conn.lock().await;
        ensure_table(&conn, table)?;

        let mut params = Vec::new();
        let sql = format!("DELETE FROM {}{}", table, where_clause(filters, &mut params)?);
        let deleted = conn
            .execute(&sql, params_from_iter(params.iter()))
            .map_err(remote)?;
        debug!(table, deleted, "delete");
        Ok(())
    }
}
