use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{nested_json, DynamicForm, RecordId};
use crate::format::{format_timestamp, short_id, yes_no};
use crate::gateway::Order;
use crate::resource::{Resource, ResourceKind};

/// The value submitted for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Text(String),
    /// Checkbox groups submit every ticked option.
    Choices(Vec<String>),
    Other(Value),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Flag(b) => f.write_str(yes_no(*b)),
            Answer::Text(s) => f.write_str(s),
            Answer::Choices(options) => f.write_str(&options.join(", ")),
            Answer::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One submission of a public form. Written by the portal; the admin
/// area only reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "formulario_id")]
    pub form_id: Option<RecordId>,
    /// Keyed by field id.
    #[serde(rename = "respostas", deserialize_with = "nested_json")]
    pub answers: BTreeMap<String, Answer>,
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FormResponse {
    pub fn answer(&self, field_id: &str) -> Option<&Answer> {
        self.answers.get(field_id)
    }

    /// Answers in the form's field order, labelled. Keys the form no
    /// longer has come last under their raw key.
    pub fn labelled(&self, form: &DynamicForm) -> Vec<(String, String)> {
        let mut rows: Vec<(String, String)> = form
            .fields
            .iter()
            .filter_map(|field| {
                self.answers
                    .get(&field.id)
                    .or_else(|| self.answers.get(&field.label))
                    .map(|answer| (field.label.clone(), answer.to_string()))
            })
            .collect();

        let known = |key: &String| form.fields.iter().any(|f| &f.id == key || &f.label == key);
        rows.extend(
            self.answers
                .iter()
                .filter(|(key, _)| !known(key))
                .map(|(key, answer)| (key.clone(), answer.to_string())),
        );
        rows
    }
}

impl Resource for FormResponse {
    const KIND: ResourceKind = ResourceKind::FormResponses;
    const TABLE: &'static str = "formulario_respostas";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        match (&self.created_at, &self.id) {
            (Some(at), _) => format!("Resposta de {}", format_timestamp(at)),
            (None, Some(id)) => format!("Resposta {}", short_id(id)),
            (None, None) => "Resposta".to_string(),
        }
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("created_at")]
    }
}
