//! Typed access to the backend's tables.
//!
//! Each entity describes itself through [`Resource`]; one generic
//! [`Repository`] turns intents (list, get, create, update, delete) into
//! gateway calls for any of them.

mod kind;

pub use kind::ResourceKind;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::entity::{CouncilMember, MemberSummary, RecordId};
use crate::error::{CamaraError, Result};
use crate::gateway::{Filter, Gateway, Order, Query, Row};
use crate::session::SessionContext;

/// Columns the backend owns; never sent on insert or update.
const SERVER_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

pub trait Resource:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    const KIND: ResourceKind;
    const TABLE: &'static str;
    /// Column filled with the signed-in user's id on every write.
    const AUTHOR_COLUMN: Option<&'static str> = None;

    fn id(&self) -> Option<RecordId>;

    /// Human label used in listings and notifications.
    fn title(&self) -> String;

    fn default_order() -> Vec<Order>;

    /// Names of required columns that are still blank.
    fn missing_required(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Fill derived fields before a write.
    fn prepare(&mut self) {}

    /// Council member this record references, shown alongside it in lists.
    fn member_id(&self) -> Option<RecordId> {
        None
    }

    fn set_member(&mut self, _member: MemberSummary) {}
}

/// A resource whose list rows carry a boolean switch
/// (publish/unpublish, activate/deactivate).
pub trait Toggle: Resource {
    fn flag(&self) -> bool;

    fn set_flag(&mut self, value: bool);

    fn flag_patch(value: bool) -> Row;

    /// Success message after switching to `value`.
    fn flag_message(value: bool) -> &'static str;
}

/// Marker for resources the admin area may delete.
pub trait Deletable: Resource {}

pub struct Repository<R> {
    gateway: Arc<dyn Gateway>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            _marker: PhantomData,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    pub async fn list(&self, order: &[Order], filters: &[Filter]) -> Result<Vec<R>> {
        let query = Query::new().orders(order).filters(filters);
        let rows = self.gateway.select(R::TABLE, &query).await?;
        debug!(table = R::TABLE, rows = rows.len(), "Loaded collection");
        let mut items = rows.into_iter().map(parse_row).collect::<Result<Vec<R>>>()?;
        self.embed_members(&mut items).await?;
        Ok(items)
    }

    /// Attach name and party of each referenced council member with one
    /// extra select. Records whose member no longer exists keep `None`.
    async fn embed_members(&self, items: &mut [R]) -> Result<()> {
        let mut ids: Vec<RecordId> = items.iter().filter_map(|r| r.member_id()).collect();
        if ids.is_empty() {
            return Ok(());
        }
        ids.sort();
        ids.dedup();

        let query = Query::new()
            .columns(&["id", "nome", "partido"])
            .filter(Filter::one_of("id", ids.iter().map(|id| id.to_string())));
        let rows = self.gateway.select(CouncilMember::TABLE, &query).await?;
        let members = rows
            .into_iter()
            .map(|row| serde_json::from_value::<MemberSummary>(Value::Object(row)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for item in items.iter_mut() {
            let found = item
                .member_id()
                .and_then(|id| members.iter().find(|m| m.id == Some(id)));
            if let Some(member) = found {
                item.set_member(member.clone());
            }
        }
        Ok(())
    }

    pub async fn list_default(&self) -> Result<Vec<R>> {
        self.list(&R::default_order(), &[]).await
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<R>> {
        let query = Query::new().filter(id_filter(id)).limit(1);
        let mut rows = self.gateway.select(R::TABLE, &query).await?;
        match rows.pop() {
            Some(row) => Ok(Some(parse_row(row)?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: RecordId) -> Result<R> {
        self.find(id)
            .await?
            .ok_or_else(|| CamaraError::not_found(R::KIND.singular(), id))
    }

    /// Insert `record` and return it as stored.
    pub async fn create(&self, record: &R, session: &SessionContext) -> Result<R> {
        let row = to_row(record, session)?;
        let stored = self.gateway.insert(R::TABLE, row).await?;
        let created: R = parse_row(stored)?;
        info!(table = R::TABLE, id = ?created.id(), "Created record");
        Ok(created)
    }

    /// Overwrite the editable columns of record `id`.
    pub async fn save(&self, id: RecordId, record: &R, session: &SessionContext) -> Result<()> {
        let row = to_row(record, session)?;
        self.gateway.update(R::TABLE, row, &[id_filter(id)]).await?;
        info!(table = R::TABLE, %id, "Updated record");
        Ok(())
    }

    pub async fn update(&self, id: RecordId, patch: Row) -> Result<()> {
        self.update_where(patch, &[id_filter(id)]).await
    }

    pub async fn update_where(&self, patch: Row, filters: &[Filter]) -> Result<()> {
        debug!(table = R::TABLE, columns = ?patch.keys().collect::<Vec<_>>(), "Patching rows");
        self.gateway.update(R::TABLE, patch, filters).await
    }

    pub async fn count(&self, filters: &[Filter]) -> Result<u64> {
        self.gateway.count(R::TABLE, filters).await
    }
}

impl<R: Deletable> Repository<R> {
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.gateway.delete(R::TABLE, &[id_filter(id)]).await?;
        info!(table = R::TABLE, %id, "Deleted record");
        Ok(())
    }
}

pub(crate) fn id_filter(id: RecordId) -> Filter {
    Filter::eq("id", id.to_string())
}

fn parse_row<R: Resource>(row: Row) -> Result<R> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Serialize a record for writing: server columns are dropped and the
/// author column is stamped from the session. No session, no write.
fn to_row<R: Resource>(record: &R, session: &SessionContext) -> Result<Row> {
    let mut row = match serde_json::to_value(record)? {
        Value::Object(row) => row,
        other => {
            return Err(CamaraError::InvalidResource(format!(
                "{} serialized to {}",
                R::TABLE,
                other
            )))
        }
    };
    for column in SERVER_COLUMNS {
        row.remove(column);
    }
    if let Some(column) = R::AUTHOR_COLUMN {
        let user = session.require_user()?;
        row.insert(column.to_string(), Value::String(user.id.to_string()));
    }
    Ok(row)
}
