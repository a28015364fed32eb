use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, MemberSummary, RecordId};
use crate::gateway::{Order, Row};
use crate::resource::{Deletable, Resource, ResourceKind, Toggle};

/// A seat on the chamber's directing board (Mesa Diretora).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "cargo", deserialize_with = "null_default")]
    pub role: String,
    #[serde(rename = "vereador_id")]
    pub council_member_id: Option<RecordId>,
    #[serde(rename = "periodo_inicio")]
    pub starts_on: Option<NaiveDate>,
    /// `None` while the mandate is ongoing.
    #[serde(rename = "periodo_fim")]
    pub ends_on: Option<NaiveDate>,
    #[serde(rename = "ativo", deserialize_with = "null_default")]
    pub active: bool,
    #[serde(rename = "telefone_institucional")]
    pub phone: Option<String>,
    #[serde(rename = "email_institucional")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Filled on list loads; never written back.
    #[serde(rename = "vereadores", default, skip_serializing)]
    pub member: Option<MemberSummary>,
}

impl Default for BoardMember {
    fn default() -> Self {
        Self {
            id: None,
            role: String::new(),
            council_member_id: None,
            starts_on: None,
            ends_on: None,
            active: true,
            phone: None,
            email: None,
            created_at: None,
            member: None,
        }
    }
}

impl BoardMember {
    pub fn is_ongoing(&self) -> bool {
        self.ends_on.is_none()
    }

    /// Whether the mandate covers `date`.
    pub fn serves_on(&self, date: NaiveDate) -> bool {
        let started = self.starts_on.map(|s| s <= date).unwrap_or(false);
        let not_ended = self.ends_on.map(|e| date <= e).unwrap_or(true);
        started && not_ended
    }
}

impl Resource for BoardMember {
    const KIND: ResourceKind = ResourceKind::BoardMembers;
    const TABLE: &'static str = "mesa_diretora";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        match &self.member {
            Some(member) => format!("{} - {}", self.role, member.label()),
            None => self.role.clone(),
        }
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("periodo_inicio")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.role) {
            missing.push("cargo");
        }
        if self.starts_on.is_none() {
            missing.push("periodo_inicio");
        }
        missing
    }

    fn member_id(&self) -> Option<RecordId> {
        self.council_member_id
    }

    fn set_member(&mut self, member: MemberSummary) {
        self.member = Some(member);
    }
}

impl Toggle for BoardMember {
    fn flag(&self) -> bool {
        self.active
    }

    fn set_flag(&mut self, value: bool) {
        self.active = value;
    }

    fn flag_patch(value: bool) -> Row {
        let mut patch = Row::new();
        patch.insert("ativo".into(), value.into());
        patch
    }

    fn flag_message(value: bool) -> &'static str {
        if value {
            "Membro ativado"
        } else {
            "Membro desativado"
        }
    }
}

impl Deletable for BoardMember {}
