use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, nested_json, null_default, RecordId};
use crate::gateway::{Order, Row};
use crate::resource::{Deletable, Resource, ResourceKind, Toggle};

/// Name and party of a council member, embedded in rows that reference one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome", deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "partido")]
    pub party: Option<String>,
}

impl MemberSummary {
    /// `Nome (PARTIDO)`, or just the name.
    pub fn label(&self) -> String {
        match self.party.as_deref().filter(|p| !blank(p)) {
            Some(party) => format!("{} ({})", self.name, party),
            None => self.name.clone(),
        }
    }
}

/// Social profiles shown on a council member's page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.facebook.is_none() && self.instagram.is_none() && self.twitter.is_none()
    }

    /// Set one network by name; blank values clear it.
    pub fn set(&mut self, network: &str, url: &str) -> bool {
        let value = if blank(url) {
            None
        } else {
            Some(url.trim().to_string())
        };
        match network {
            "facebook" => self.facebook = value,
            "instagram" => self.instagram = value,
            "twitter" => self.twitter = value,
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouncilMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome", deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "partido", deserialize_with = "null_default")]
    pub party: String,
    #[serde(rename = "ativo", deserialize_with = "null_default")]
    pub active: bool,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "biografia")]
    pub biography: Option<String>,
    pub foto_url: Option<String>,
    #[serde(rename = "ordem_exibicao")]
    pub display_order: Option<i64>,
    #[serde(rename = "redes_sociais", deserialize_with = "nested_json")]
    pub social_links: SocialLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for CouncilMember {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            party: String::new(),
            active: true,
            email: None,
            phone: None,
            biography: None,
            foto_url: None,
            display_order: Some(1),
            social_links: SocialLinks::default(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl CouncilMember {
    pub fn new(name: impl Into<String>, party: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            party: party.into(),
            ..Self::default()
        }
    }
}

impl Resource for CouncilMember {
    const KIND: ResourceKind = ResourceKind::CouncilMembers;
    const TABLE: &'static str = "vereadores";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        format!("{} ({})", self.name, self.party)
    }

    fn default_order() -> Vec<Order> {
        vec![Order::asc("ordem_exibicao").nulls_last(), Order::asc("nome")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("nome");
        }
        if blank(&self.party) {
            missing.push("partido");
        }
        missing
    }
}

impl Toggle for CouncilMember {
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
            "Vereador ativado"
        } else {
            "Vereador desativado"
        }
    }
}

impl Deletable for CouncilMember {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_social_links_from_legacy_string() {
        let member: CouncilMember = serde_json::from_value(json!({
            "nome": "Maria Souza",
            "partido": "PSD",
            "ativo": false,
            "redes_sociais": "{\"instagram\":\"https://instagram.com/maria\"}"
        }))
        .unwrap();
        assert_eq!(
            member.social_links.instagram.as_deref(),
            Some("https://instagram.com/maria")
        );
        assert!(!member.active);
    }

    #[test]
    fn test_social_links_null_and_object() {
        let member: CouncilMember =
            serde_json::from_value(json!({"nome": "A", "redes_sociais": null})).unwrap();
        assert!(member.social_links.is_empty());

        let member: CouncilMember = serde_json::from_value(json!({
            "nome": "A",
            "redes_sociais": {"facebook": "fb.com/a", "tiktok": "ignored"}
        }))
        .unwrap();
        assert_eq!(member.social_links.facebook.as_deref(), Some("fb.com/a"));
    }

    #[test]
    fn test_social_links_serialize_as_structured_json() {
        let mut member = CouncilMember::new("João", "MDB");
        assert!(member.social_links.set("twitter", "https://x.com/joao"));
        assert!(!member.social_links.set("orkut", "x"));
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["redes_sociais"], json!({"twitter": "https://x.com/joao"}));
    }

    #[test]
    fn test_defaults_match_new_member_form() {
        let member = CouncilMember::default();
        assert!(member.active);
        assert_eq!(member.display_order, Some(1));
        assert_eq!(member.missing_required(), vec!["nome", "partido"]);
    }
}
