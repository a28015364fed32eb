use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, RecordId};
use crate::gateway::{Order, Row};
use crate::resource::{Deletable, Resource, ResourceKind, Toggle};

/// Flag, coat of arms, anthem and the like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficialSymbol {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "titulo", deserialize_with = "null_default")]
    pub title: String,
    #[serde(rename = "tipo", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "arquivo_url")]
    pub file_url: Option<String>,
    #[serde(rename = "conteudo_html")]
    pub html: Option<String>,
    #[serde(rename = "ativo", deserialize_with = "null_default")]
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for OfficialSymbol {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            kind: String::new(),
            description: None,
            file_url: None,
            html: None,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Resource for OfficialSymbol {
    const KIND: ResourceKind = ResourceKind::Symbols;
    const TABLE: &'static str = "simbolos_oficiais";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::asc("tipo")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("titulo");
        }
        if blank(&self.kind) {
            missing.push("tipo");
        }
        missing
    }
}

impl Toggle for OfficialSymbol {
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
            "Símbolo ativado"
        } else {
            "Símbolo desativado"
        }
    }
}

impl Deletable for OfficialSymbol {}
