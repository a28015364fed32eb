//! Remote data gateway contract.
//!
//! The hosted backend owns every record; screens only ever hold copies.
//! Everything that talks to it goes through [`Gateway`] (tables) and
//! [`AuthGateway`] (sessions), so the backend can be swapped for the
//! in-memory double in tests or the SQLite store used by the CLI.

mod auth;
mod memory;
mod query;
mod sqlite;

pub use auth::{AuthChange, AuthEvent, AuthGateway, AuthSubscription, AuthUser, LocalAuth, Session};
pub use memory::{GatewayCall, InMemoryGateway};
pub use query::{Filter, Order, Query};
pub use sqlite::SqliteGateway;

use async_trait::async_trait;

use crate::error::Result;

/// One record as the backend returns it.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>>;

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64>;

    /// Insert one row and return it as stored (with server-assigned id).
    async fn insert(&self, table: &str, row: Row) -> Result<Row>;

    /// Merge `patch` into every row matching all `filters`.
    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<()>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()>;
}
