//! Replying to ombudsman messages.

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::entity::{OmbudsmanMessage, OmbudsmanStatus, RecordId};
use crate::error::{CamaraError, Result};
use crate::gateway::Row;
use crate::resource::Repository;
use crate::session::SessionContext;

/// Store a reply on message `id` and mark it answered. The responder is
/// the signed-in user.
pub async fn respond(
    repo: &Repository<OmbudsmanMessage>,
    id: RecordId,
    response: &str,
    session: &SessionContext,
) -> Result<()> {
    let user = session.require_user()?;
    if response.trim().is_empty() {
        return Err(CamaraError::MissingFields(vec!["resposta".into()]));
    }

    let mut patch = Row::new();
    patch.insert("resposta".into(), Value::String(response.trim().to_string()));
    patch.insert("respondido_por".into(), Value::String(user.id.to_string()));
    patch.insert("respondido_em".into(), Value::String(Utc::now().to_rfc3339()));
    patch.insert(
        "status".into(),
        Value::String(OmbudsmanStatus::Answered.label().to_string()),
    );

    repo.update(id, patch).await?;
    info!(%id, responder = %user.email, "Ombudsman message answered");
    Ok(())
}
