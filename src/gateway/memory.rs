use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::{Filter, Gateway, Query, Row};
use crate::error::{CamaraError, Result};

/// A call as it reached the gateway, recorded whether or not it failed.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Select { table: String },
    Count { table: String },
    Insert { table: String, row: Row },
    Update { table: String, patch: Row, filters: Vec<Filter> },
    Delete { table: String, filters: Vec<Filter> },
}

impl GatewayCall {
    pub fn table(&self) -> &str {
        match self {
            GatewayCall::Select { table }
            | GatewayCall::Count { table }
            | GatewayCall::Insert { table, .. }
            | GatewayCall::Update { table, .. }
            | GatewayCall::Delete { table, .. } => table,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, GatewayCall::Select { .. } | GatewayCall::Count { .. })
    }
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    calls: Vec<GatewayCall>,
    fail_next: Option<String>,
    failing_tables: HashMap<String, String>,
}

impl MemoryState {
    /// Log the call and decide whether it should fail.
    fn record(&mut self, call: GatewayCall) -> Result<()> {
        let failure = self.failing_tables.get(call.table()).cloned();
        self.calls.push(call);

        if let Some(message) = self.fail_next.take().or(failure) {
            return Err(CamaraError::gateway(message));
        }
        Ok(())
    }
}

/// Table store held in memory, with failure injection and a call log.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<MemoryState>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a row directly, bypassing the call log.
    pub fn seed(&self, table: &str, row: Value) -> Row {
        let mut row = match row {
            Value::Object(map) => map,
            _ => Row::new(),
        };
        stamp_new_row(&mut row);
        self.state()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    pub fn mutation_calls(&self) -> Vec<GatewayCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Fail the next call of any kind with `message`.
    pub fn fail_next(&self, message: &str) {
        self.state().fail_next = Some(message.to_string());
    }

    /// Fail every call on `table` until [`InMemoryGateway::recover`].
    pub fn fail_table(&self, table: &str, message: &str) {
        self.state()
            .failing_tables
            .insert(table.to_string(), message.to_string());
    }

    pub fn recover(&self) {
        let mut state = self.state();
        state.fail_next = None;
        state.failing_tables.clear();
    }
}

fn stamp_new_row(row: &mut Row) {
    if !row.contains_key("id") {
        row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    }
    if !row.contains_key("created_at") {
        row.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let mut state = self.state();
        state.record(GatewayCall::Select {
            table: table.to_string(),
        })?;

        let mut rows: Vec<Row> = state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        query.sort(&mut rows);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows.into_iter().map(|r| query.project(r)).collect())
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64> {
        let mut state = self.state();
        state.record(GatewayCall::Count {
            table: table.to_string(),
        })?;

        let count = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| filters.iter().all(|f| f.matches(r)))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row> {
        let mut state = self.state();
        state.record(GatewayCall::Insert {
            table: table.to_string(),
            row: row.clone(),
        })?;

        stamp_new_row(&mut row);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<()> {
        let mut state = self.state();
        state.record(GatewayCall::Update {
            table: table.to_string(),
            patch: patch.clone(),
            filters: filters.to_vec(),
        })?;

        let now = Value::String(Utc::now().to_rfc3339());
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| filters.iter().all(|f| f.matches(r))) {
                for (k, v) in &patch {
                    row.insert(k.clone(), v.clone());
                }
                row.insert("updated_at".into(), now.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        let mut state = self.state();
        state.record(GatewayCall::Delete {
            table: table.to_string(),
            filters: filters.to_vec(),
        })?;

        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|r| !filters.iter().all(|f| f.matches(r)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Order;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let gw = InMemoryGateway::new();
        let row = gw
            .insert("noticias", json!({"titulo": "A"}).as_object().cloned().unwrap())
            .await
            .unwrap();
        assert!(row.get("id").and_then(|v| v.as_str()).is_some());
        assert!(row.contains_key("created_at"));
        assert_eq!(gw.rows("noticias").len(), 1);
    }

    #[tokio::test]
    async fn test_update_touches_only_matching_rows() {
        let gw = InMemoryGateway::new();
        gw.seed("legislaturas", json!({"id": "a", "ativa": true}));
        gw.seed("legislaturas", json!({"id": "b", "ativa": true}));

        let patch = json!({"ativa": false}).as_object().cloned().unwrap();
        gw.update("legislaturas", patch, &[Filter::neq("id", "b")])
            .await
            .unwrap();

        let rows = gw.rows("legislaturas");
        assert_eq!(rows[0]["ativa"], json!(false));
        assert_eq!(rows[1]["ativa"], json!(true));
    }

    #[tokio::test]
    async fn test_select_orders_and_limits() {
        let gw = InMemoryGateway::new();
        gw.seed("vereadores", json!({"nome": "Carla"}));
        gw.seed("vereadores", json!({"nome": "Ana"}));
        gw.seed("vereadores", json!({"nome": "Bruno"}));

        let rows = gw
            .select("vereadores", &Query::new().order_by(Order::asc("nome")).limit(2))
            .await
            .unwrap();
        let names: Vec<_> = rows.iter().map(|r| r["nome"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Ana", "Bruno"]);
    }

    #[tokio::test]
    async fn test_fail_next_fails_once_and_is_logged() {
        let gw = InMemoryGateway::new();
        gw.fail_next("network down");

        let err = gw.count("noticias", &[]).await.unwrap_err();
        assert!(err.to_string().contains("network down"));
        assert_eq!(gw.count("noticias", &[]).await.unwrap(), 0);
        assert_eq!(gw.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_fail_table_until_recover() {
        let gw = InMemoryGateway::new();
        gw.fail_table("ouvidoria", "permission denied");

        assert!(gw.count("ouvidoria", &[]).await.is_err());
        assert!(gw.count("noticias", &[]).await.is_ok());

        gw.recover();
        assert!(gw.count("ouvidoria", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_matching_row() {
        let gw = InMemoryGateway::new();
        gw.seed("agenda", json!({"id": "x"}));
        gw.seed("agenda", json!({"id": "y"}));

        gw.delete("agenda", &[Filter::eq("id", "x")]).await.unwrap();
        let rows = gw.rows("agenda");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("y"));
    }
}
