//! Screen-level controllers for the admin area.
//!
//! Controllers own a local copy of what they show, call the repository,
//! and turn every outcome into a [`Notification`]. Their methods report
//! success as `bool`/`Option`; the error itself has already been shown.

mod dashboard;
mod form;
mod list;

pub use dashboard::{Dashboard, DashboardSummary};
pub use form::{FormController, FormMode};
pub use list::{ListView, ViewState};

use std::sync::Mutex;

use crate::error::Notification;
use crate::format::{agree, capitalize};
use crate::resource::ResourceKind;

/// Presents notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in order.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries().pop()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.entries().into_iter().filter(|n| n.is_error()).collect()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}

/// Answers a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

// Notification wording, shared by the controllers.

fn article(kind: ResourceKind) -> &'static str {
    if kind.feminine() {
        "a"
    } else {
        "o"
    }
}

fn load_error_title(kind: ResourceKind) -> String {
    format!("Erro ao carregar {}", kind.plural())
}

fn fetch_error_title(kind: ResourceKind) -> String {
    format!("Erro ao carregar {}", kind.singular())
}

fn status_error_title(kind: ResourceKind) -> String {
    format!("Erro ao alterar status d{} {}", article(kind), kind.singular())
}

fn delete_prompt(kind: ResourceKind) -> String {
    let this = if kind.feminine() { "esta" } else { "este" };
    format!("Tem certeza que deseja excluir {} {}?", this, kind.singular())
}

fn delete_error_title(kind: ResourceKind) -> String {
    format!("Erro ao excluir {}", kind.singular())
}

fn deleted_title(kind: ResourceKind) -> String {
    format!(
        "{} {}",
        capitalize(kind.singular()),
        agree("excluíd", kind.feminine())
    )
}

fn save_verb(edit: bool) -> &'static str {
    if edit {
        "atualizad"
    } else {
        "criad"
    }
}

fn save_error_title(kind: ResourceKind, edit: bool) -> String {
    let verb = if edit { "atualizar" } else { "criar" };
    format!("Erro ao {} {}", verb, kind.singular())
}

fn saved_title(kind: ResourceKind, edit: bool) -> String {
    format!(
        "{} {}",
        capitalize(kind.singular()),
        agree(save_verb(edit), kind.feminine())
    )
}

fn saved_message(kind: ResourceKind, edit: bool) -> String {
    format!(
        "{} {} foi {} com sucesso.",
        capitalize(article(kind)),
        kind.singular(),
        agree(save_verb(edit), kind.feminine())
    )
}
