use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, RecordId};
use crate::gateway::Order;
use crate::resource::{Resource, ResourceKind};

/// Workflow labels used by the ombudsman desk. The column itself is free
/// text, so unknown labels are kept as-is on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmbudsmanStatus {
    New,
    InProgress,
    Answered,
    Closed,
}

impl OmbudsmanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OmbudsmanStatus::New => "Nova",
            OmbudsmanStatus::InProgress => "Em andamento",
            OmbudsmanStatus::Answered => "Respondida",
            OmbudsmanStatus::Closed => "Fechada",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Nova" => Some(OmbudsmanStatus::New),
            "Em andamento" => Some(OmbudsmanStatus::InProgress),
            "Respondida" => Some(OmbudsmanStatus::Answered),
            "Fechada" => Some(OmbudsmanStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OmbudsmanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmbudsmanMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome", deserialize_with = "null_default")]
    pub sender_name: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "assunto", deserialize_with = "null_default")]
    pub subject: String,
    #[serde(rename = "mensagem", deserialize_with = "null_default")]
    pub body: String,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(rename = "resposta")]
    pub response: Option<String>,
    #[serde(rename = "respondido_por")]
    pub responded_by: Option<RecordId>,
    #[serde(rename = "respondido_em")]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(rename = "anexo_url")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for OmbudsmanMessage {
    fn default() -> Self {
        Self {
            id: None,
            sender_name: String::new(),
            email: String::new(),
            phone: None,
            subject: String::new(),
            body: String::new(),
            status: OmbudsmanStatus::New.label().to_string(),
            response: None,
            responded_by: None,
            responded_at: None,
            attachment_url: None,
            created_at: None,
        }
    }
}

impl OmbudsmanMessage {
    pub fn known_status(&self) -> Option<OmbudsmanStatus> {
        OmbudsmanStatus::from_label(&self.status)
    }

    pub fn is_answered(&self) -> bool {
        self.responded_at.is_some()
    }
}

impl Resource for OmbudsmanMessage {
    const KIND: ResourceKind = ResourceKind::Ombudsman;
    const TABLE: &'static str = "ouvidoria";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.subject.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("created_at")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.sender_name) {
            missing.push("nome");
        }
        if blank(&self.email) {
            missing.push("email");
        }
        if blank(&self.subject) {
            missing.push("assunto");
        }
        if blank(&self.body) {
            missing.push("mensagem");
        }
        missing
    }
}
