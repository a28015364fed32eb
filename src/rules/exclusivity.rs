//! At most one legislative term is active.
//!
//! Activating a term first deactivates every other term, then sets the
//! target. An interruption between the two writes can leave no active
//! term, never two. Local copies change only after both writes succeed.

use serde_json::Value;
use tracing::{info, warn};

use crate::controller::ListView;
use crate::entity::{LegislativeTerm, RecordId};
use crate::error::{Notification, Result};
use crate::gateway::{Filter, Row};
use crate::resource::{Repository, ResourceKind};

const ACTIVE_COLUMN: &str = "ativa";

fn active_patch(value: bool) -> Row {
    let mut patch = Row::new();
    patch.insert(ACTIVE_COLUMN.into(), Value::Bool(value));
    patch
}

/// Recompute local flags after a successful activation.
pub fn apply_activation(terms: &mut [LegislativeTerm], target: RecordId, requested: bool) {
    for term in terms.iter_mut() {
        if term.id == Some(target) {
            term.active = requested;
        } else if requested {
            term.active = false;
        }
    }
}

/// Run the remote writes for setting `target` to `requested`.
pub async fn activate(
    repo: &Repository<LegislativeTerm>,
    target: RecordId,
    requested: bool,
) -> Result<()> {
    if requested {
        repo.update_where(
            active_patch(false),
            &[Filter::neq("id", target.to_string())],
        )
        .await?;
        info!(%target, "Deactivated other terms");
    }
    repo.update(target, active_patch(requested)).await?;
    info!(%target, active = requested, "Term activation applied");
    Ok(())
}

impl ListView<LegislativeTerm> {
    /// Exclusive counterpart of a row toggle.
    pub async fn set_active(&mut self, target: RecordId, requested: bool) -> bool {
        match activate(self.repository(), target, requested).await {
            Ok(()) => {
                apply_activation(self.items_mut(), target, requested);
                let title = if requested {
                    "Legislatura ativada"
                } else {
                    "Legislatura desativada"
                };
                self.notify(Notification::success(
                    title,
                    format!(
                        "A legislatura foi {} com sucesso.",
                        if requested { "ativada" } else { "desativada" }
                    ),
                ));
                true
            }
            Err(e) => {
                warn!(%target, error = %e, "Term activation failed");
                self.notify(Notification::error(
                    format!("Erro ao alterar status da {}", ResourceKind::Terms.singular()),
                    &e,
                ));
                false
            }
        }
    }
}
