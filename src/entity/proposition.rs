use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, ContentStatus, MemberSummary, RecordId};
use crate::gateway::Order;
use crate::resource::{Deletable, Resource, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PropositionType {
    #[default]
    #[serde(rename = "projeto_lei")]
    Bill,
    #[serde(rename = "requerimento")]
    Request,
    #[serde(rename = "mocao")]
    Motion,
    #[serde(rename = "emenda")]
    Amendment,
    #[serde(rename = "indicacao")]
    Indication,
}

impl PropositionType {
    pub fn label(&self) -> &'static str {
        match self {
            PropositionType::Bill => "Projeto de Lei",
            PropositionType::Request => "Requerimento",
            PropositionType::Motion => "Moção",
            PropositionType::Amendment => "Emenda",
            PropositionType::Indication => "Indicação",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            PropositionType::Bill => "PL",
            PropositionType::Request => "REQ",
            PropositionType::Motion => "MOC",
            PropositionType::Amendment => "EME",
            PropositionType::Indication => "IND",
        }
    }
}

impl std::fmt::Display for PropositionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropositionType::Bill => write!(f, "projeto_lei"),
            PropositionType::Request => write!(f, "requerimento"),
            PropositionType::Motion => write!(f, "mocao"),
            PropositionType::Amendment => write!(f, "emenda"),
            PropositionType::Indication => write!(f, "indicacao"),
        }
    }
}

impl std::str::FromStr for PropositionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "projeto_lei" | "bill" | "pl" => Ok(PropositionType::Bill),
            "requerimento" | "request" | "req" => Ok(PropositionType::Request),
            "mocao" | "motion" => Ok(PropositionType::Motion),
            "emenda" | "amendment" => Ok(PropositionType::Amendment),
            "indicacao" | "indication" => Ok(PropositionType::Indication),
            _ => Err(format!("Invalid proposition type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proposition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "numero", deserialize_with = "null_default")]
    pub number: String,
    #[serde(rename = "ano", deserialize_with = "null_default")]
    pub year: i32,
    #[serde(rename = "tipo", deserialize_with = "null_default")]
    pub kind: PropositionType,
    #[serde(rename = "ementa", deserialize_with = "null_default")]
    pub summary: String,
    #[serde(rename = "situacao", deserialize_with = "null_default")]
    pub situation: String,
    #[serde(deserialize_with = "null_default")]
    pub status: ContentStatus,
    #[serde(rename = "data_apresentacao")]
    pub filed_on: Option<NaiveDate>,
    /// Council member who filed it, when there is one.
    #[serde(rename = "autor_id")]
    pub author_id: Option<RecordId>,
    #[serde(rename = "arquivo_url")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "vereadores", default, skip_serializing)]
    pub author: Option<MemberSummary>,
}

impl Proposition {
    /// e.g. `PL 12/2024`
    pub fn display_key(&self) -> String {
        format!("{} {}/{}", self.kind.abbreviation(), self.number, self.year)
    }
}

impl Resource for Proposition {
    const KIND: ResourceKind = ResourceKind::Propositions;
    const TABLE: &'static str = "proposicoes";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        match &self.author {
            Some(author) => format!("{} - {}", self.display_key(), author.name),
            None => self.display_key(),
        }
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("created_at")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.number) {
            missing.push("numero");
        }
        if self.year <= 0 {
            missing.push("ano");
        }
        if blank(&self.summary) {
            missing.push("ementa");
        }
        if self.filed_on.is_none() {
            missing.push("data_apresentacao");
        }
        missing
    }

    fn member_id(&self) -> Option<RecordId> {
        self.author_id
    }

    fn set_member(&mut self, member: MemberSummary) {
        self.author = Some(member);
    }
}

impl Deletable for Proposition {}
