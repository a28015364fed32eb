use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, RecordId};
use crate::gateway::{Order, Row};
use crate::resource::{Resource, ResourceKind, Toggle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin,
    #[default]
    #[serde(rename = "editor")]
    Editor,
    #[serde(rename = "operador")]
    Operator,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrador",
            UserRole::Editor => "Editor",
            UserRole::Operator => "Operador",
        }
    }
}

/// Admin-area profile. Governs access, not authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(deserialize_with = "null_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    #[serde(deserialize_with = "null_default")]
    pub role: UserRole,
    #[serde(deserialize_with = "null_default")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for UserAccount {
    fn default() -> Self {
        Self {
            id: None,
            full_name: String::new(),
            email: String::new(),
            role: UserRole::default(),
            is_active: true,
            created_at: None,
        }
    }
}

impl Resource for UserAccount {
    const KIND: ResourceKind = ResourceKind::Users;
    const TABLE: &'static str = "profiles";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.full_name.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("created_at")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.full_name) {
            missing.push("full_name");
        }
        if blank(&self.email) {
            missing.push("email");
        }
        missing
    }
}

impl Toggle for UserAccount {
    fn flag(&self) -> bool {
        self.is_active
    }

    fn set_flag(&mut self, value: bool) {
        self.is_active = value;
    }

    fn flag_patch(value: bool) -> Row {
        let mut patch = Row::new();
        patch.insert("is_active".into(), value.into());
        patch
    }

    fn flag_message(value: bool) -> &'static str {
        if value {
            "Usuário ativado"
        } else {
            "Usuário desativado"
        }
    }
}
