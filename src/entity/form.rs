use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, nested_json, null_default, RecordId};
use crate::gateway::{Order, Row};
use crate::resource::{Deletable, Resource, ResourceKind, Toggle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl FieldKind {
    /// Kinds that take a list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio | FieldKind::Checkbox)
    }
}

/// One field of a public form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "tipo", deserialize_with = "null_default")]
    pub kind: FieldKind,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "obrigatorio", deserialize_with = "null_default")]
    pub required: bool,
    #[serde(rename = "opcoes", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome", deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "email_destino")]
    pub target_email: Option<String>,
    #[serde(rename = "ativo", deserialize_with = "null_default")]
    pub active: bool,
    #[serde(rename = "campos", deserialize_with = "nested_json")]
    pub fields: Vec<FieldSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for DynamicForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            target_email: None,
            active: true,
            fields: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl DynamicForm {
    /// Append a blank text field and return its id.
    pub fn add_field(&mut self) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.fields.push(FieldSpec {
            id: id.clone(),
            ..FieldSpec::default()
        });
        id
    }

    pub fn remove_field(&mut self, id: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        self.fields.len() != before
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut FieldSpec> {
        self.fields.iter_mut().find(|f| f.id == id)
    }
}

impl Resource for DynamicForm {
    const KIND: ResourceKind = ResourceKind::Forms;
    const TABLE: &'static str = "formularios";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("created_at")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("nome");
        }
        if self.fields.iter().any(|f| blank(&f.label)) {
            missing.push("campos.label");
        }
        missing
    }

    /// Option lists only make sense on choice fields.
    fn prepare(&mut self) {
        for field in &mut self.fields {
            if !field.kind.has_options() {
                field.options = None;
            }
        }
    }
}

impl Toggle for DynamicForm {
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
            "Formulário ativado"
        } else {
            "Formulário desativado"
        }
    }
}

impl Deletable for DynamicForm {}
