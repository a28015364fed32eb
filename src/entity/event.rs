use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{blank, null_default, RecordId};
use crate::gateway::{Order, Row};
use crate::resource::{Deletable, Resource, ResourceKind, Toggle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Sessao,
    Audiencia,
    Reuniao,
    Evento,
}

impl EventType {
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Sessao => "Sessão",
            EventType::Audiencia => "Audiência Pública",
            EventType::Reuniao => "Reunião",
            EventType::Evento => "Evento",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Agendado,
    Andamento,
    Concluido,
    Cancelado,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Agendado => "Agendado",
            EventStatus::Andamento => "Em andamento",
            EventStatus::Concluido => "Concluído",
            EventStatus::Cancelado => "Cancelado",
        }
    }
}

/// Agenda entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "titulo", deserialize_with = "null_default")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "data_evento")]
    pub date: Option<NaiveDate>,
    #[serde(
        rename = "hora_inicio",
        serialize_with = "ser_time",
        deserialize_with = "de_time"
    )]
    pub starts_at: Option<NaiveTime>,
    #[serde(
        rename = "hora_fim",
        serialize_with = "ser_time",
        deserialize_with = "de_time"
    )]
    pub ends_at: Option<NaiveTime>,
    #[serde(rename = "local")]
    pub location: Option<String>,
    #[serde(rename = "tipo_evento", deserialize_with = "null_default")]
    pub kind: EventType,
    #[serde(rename = "publico", deserialize_with = "null_default")]
    pub public: bool,
    #[serde(deserialize_with = "null_default")]
    pub status: EventStatus,
    #[serde(rename = "autor_id", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            date: None,
            starts_at: None,
            ends_at: None,
            location: None,
            kind: EventType::default(),
            public: true,
            status: EventStatus::default(),
            author_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

fn ser_time<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
        None => s.serialize_none(),
    }
}

/// Times arrive as `HH:MM` from forms and `HH:MM:SS` from the database.
fn de_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl Resource for Event {
    const KIND: ResourceKind = ResourceKind::Agenda;
    const TABLE: &'static str = "agenda";
    const AUTHOR_COLUMN: Option<&'static str> = Some("autor_id");

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::asc("data_evento")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("titulo");
        }
        if self.date.is_none() {
            missing.push("data_evento");
        }
        missing
    }
}

impl Toggle for Event {
    fn flag(&self) -> bool {
        self.public
    }

    fn set_flag(&mut self, value: bool) {
        self.public = value;
    }

    fn flag_patch(value: bool) -> Row {
        let mut patch = Row::new();
        patch.insert("publico".into(), value.into());
        patch
    }

    fn flag_message(value: bool) -> &'static str {
        if value {
            "Evento tornado público"
        } else {
            "Evento tornado privado"
        }
    }
}

impl Deletable for Event {}
