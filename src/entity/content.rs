use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{blank, null_default, ContentStatus, RecordId};
use crate::format::slugify;
use crate::gateway::{Order, Row};
use crate::resource::{Deletable, Resource, ResourceKind, Toggle};

/// Fields shared by news articles and static pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBody {
    #[serde(rename = "titulo", deserialize_with = "null_default")]
    pub title: String,
    #[serde(rename = "conteudo", deserialize_with = "null_default")]
    pub body: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_default")]
    pub status: ContentStatus,
    #[serde(rename = "autor_id", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<RecordId>,
}

impl ContentBody {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("titulo");
        }
        if blank(&self.body) {
            missing.push("conteudo");
        }
        missing
    }

    /// Fill a blank slug from the title.
    pub fn derive_slug(&mut self) {
        if blank(&self.slug) {
            self.slug = slugify(&self.title);
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

fn publish_patch(value: bool) -> Row {
    let status = if value {
        ContentStatus::Published
    } else {
        ContentStatus::Draft
    };
    let mut patch = Row::new();
    patch.insert("status".into(), status.to_string().into());
    patch
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct News {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub content: ContentBody,
    #[serde(rename = "subtitulo")]
    pub subtitle: Option<String>,
    #[serde(rename = "destaque", deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(rename = "imagem_destaque")]
    pub cover_image: Option<String>,
    #[serde(rename = "data_publicacao")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "visualizacoes", deserialize_with = "null_default")]
    pub views: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl News {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content: ContentBody::new(title, body),
            ..Self::default()
        }
    }
}

impl Resource for News {
    const KIND: ResourceKind = ResourceKind::News;
    const TABLE: &'static str = "noticias";
    const AUTHOR_COLUMN: Option<&'static str> = Some("autor_id");

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.content.title.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::desc("created_at")]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        self.content.missing_required()
    }

    fn prepare(&mut self) {
        self.content.derive_slug();
    }
}

impl Toggle for News {
    fn flag(&self) -> bool {
        self.content.is_published()
    }

    fn set_flag(&mut self, value: bool) {
        self.content.status = if value {
            ContentStatus::Published
        } else {
            ContentStatus::Draft
        };
    }

    fn flag_patch(value: bool) -> Row {
        publish_patch(value)
    }

    fn flag_message(value: bool) -> &'static str {
        if value {
            "Notícia publicada"
        } else {
            "Notícia despublicada"
        }
    }
}

impl Deletable for News {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub content: ContentBody,
    pub meta_description: Option<String>,
    #[serde(rename = "ordem_menu")]
    pub menu_order: Option<i64>,
    #[serde(rename = "visivel_menu", deserialize_with = "null_default")]
    pub show_in_menu: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content: ContentBody::new(title, body),
            ..Self::default()
        }
    }
}

impl Resource for Page {
    const KIND: ResourceKind = ResourceKind::Pages;
    const TABLE: &'static str = "paginas";
    const AUTHOR_COLUMN: Option<&'static str> = Some("autor_id");

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn title(&self) -> String {
        self.content.title.clone()
    }

    fn default_order() -> Vec<Order> {
        vec![Order::asc("ordem_menu").nulls_last()]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        self.content.missing_required()
    }

    fn prepare(&mut self) {
        self.content.derive_slug();
    }
}

impl Toggle for Page {
    fn flag(&self) -> bool {
        self.content.is_published()
    }

    fn set_flag(&mut self, value: bool) {
        self.content.status = if value {
            ContentStatus::Published
        } else {
            ContentStatus::Draft
        };
    }

    fn flag_patch(value: bool) -> Row {
        publish_patch(value)
    }

    fn flag_message(value: bool) -> &'static str {
        if value {
            "Página publicada"
        } else {
            "Página despublicada"
        }
    }
}

impl Deletable for Page {}
