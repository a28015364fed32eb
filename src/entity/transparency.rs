use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, RecordId};
use crate::gateway::Order;
use crate::resource::{Deletable, Resource, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "titulo", deserialize_with = "null_default")]
    pub title: String,
    #[serde(rename = "categoria", deserialize_with = "null_default")]
    pub category: String,
    #[serde(rename = "tipo_arquivo", deserialize_with = "null_default")]
    pub file_type: String,
    #[serde(rename = "arquivo_url", deserialize_with = "null_default")]
    pub file_url: String,
    #[serde(rename = "tamanho_arquivo")]
    pub file_size: Option<i64>,
    #[serde(rename = "data_documento")]
    pub document_date: Option<NaiveDate>,
    #[serde(rename = "data_publicacao")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "autor_id", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for TransparencyDocument {
    const KIND: ResourceKind = ResourceKind::Transparency;
    const TABLE: &'static str = "transparencia";
    const AUTHOR_COLUMN: Option<&'static str> = Some("autor_id");

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("data_publicacao")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("titulo");
        }
        if blank(&self.category) {
            missing.push("categoria");
        }
        if blank(&self.file_type) {
            missing.push("tipo_arquivo");
        }
        if blank(&self.file_url) {
            missing.push("arquivo_url");
        }
        missing
    }

    /// Documents without a publication time are published now.
    fn prepare(&mut self) {
        if self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }
}

impl Deletable for TransparencyDocument {}
