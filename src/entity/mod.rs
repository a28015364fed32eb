mod board_member;
mod content;
mod council_member;
mod event;
mod form;
mod form_response;
mod ombudsman;
mod proposition;
mod symbol;
mod term;
mod transparency;
mod user;

pub use board_member::BoardMember;
pub use content::{ContentBody, News, Page};
pub use council_member::{CouncilMember, MemberSummary, SocialLinks};
pub use event::{Event, EventStatus, EventType};
pub use form::{DynamicForm, FieldKind, FieldSpec};
pub use form_response::{Answer, FormResponse};
pub use ombudsman::{OmbudsmanMessage, OmbudsmanStatus};
pub use proposition::{Proposition, PropositionType};
pub use symbol::OfficialSymbol;
pub use term::LegislativeTerm;
pub use transparency::TransparencyDocument;
pub use user::{UserAccount, UserRole};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier assigned by the backend.
pub type RecordId = Uuid;

/// Lifecycle shared by news, pages and propositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "Rascunho",
            ContentStatus::Published => "Publicado",
            ContentStatus::Archived => "Arquivado",
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentStatus::Draft => write!(f, "draft"),
            ContentStatus::Published => write!(f, "published"),
            ContentStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" | "rascunho" => Ok(ContentStatus::Draft),
            "published" | "publicado" => Ok(ContentStatus::Published),
            "archived" | "arquivado" => Ok(ContentStatus::Archived),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Nested JSON columns (social links, form fields) were historically
/// written as a JSON string inside the JSON column. Accept null, the
/// structured value, or that string.
pub(crate) fn nested_json<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::String(s) if s.trim().is_empty() => Ok(T::default()),
        Value::String(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// Treat a JSON null as the field's default.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub(crate) fn blank_opt(s: &Option<String>) -> bool {
    s.as_deref().map(blank).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_status_round_trip_names() {
        assert_eq!("published".parse::<ContentStatus>().unwrap(), ContentStatus::Published);
        assert_eq!("Rascunho".parse::<ContentStatus>().unwrap(), ContentStatus::Draft);
        assert!("deleted".parse::<ContentStatus>().is_err());
        assert_eq!(ContentStatus::Archived.to_string(), "archived");
        assert_eq!(ContentStatus::Archived.label(), "Arquivado");
    }

    #[test]
    fn test_blank_helpers() {
        assert!(blank("   "));
        assert!(!blank("x"));
        assert!(blank_opt(&None));
        assert!(blank_opt(&Some(" ".into())));
    }
}
