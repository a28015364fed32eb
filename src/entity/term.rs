use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{null_default, RecordId};
use crate::gateway::Order;
use crate::resource::{Deletable, Resource, ResourceKind};

/// A legislative term. At most one term is active system-wide; see
/// [`crate::rules::exclusivity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegislativeTerm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "numero", deserialize_with = "null_default")]
    pub number: u32,
    #[serde(rename = "periodo_inicio")]
    pub starts_on: Option<NaiveDate>,
    #[serde(rename = "periodo_fim")]
    pub ends_on: Option<NaiveDate>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "ativa", deserialize_with = "null_default")]
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LegislativeTerm {
    pub fn new(number: u32, starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        Self {
            number,
            starts_on: Some(starts_on),
            ends_on: Some(ends_on),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}ª Legislatura", self.number)
    }

    /// Whole years covered, rounded up.
    pub fn duration_years(&self) -> Option<i64> {
        match (self.starts_on, self.ends_on) {
            (Some(start), Some(end)) => Some(crate::format::years_between(start, end)),
            _ => None,
        }
    }
}

impl Resource for LegislativeTerm {
    const KIND: ResourceKind = ResourceKind::Terms;
    const TABLE: &'static str = "legislaturas";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.display_name()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("numero")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.number == 0 {
            missing.push("numero");
        }
        if self.starts_on.is_none() {
            missing.push("periodo_inicio");
        }
        if self.ends_on.is_none() {
            missing.push("periodo_fim");
        }
        missing
    }
}

impl Deletable for LegislativeTerm {}
