use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CamaraError {
    #[error("Usuário não autenticado")]
    NotAuthenticated,

    #[error("{0}")]
    Gateway(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// The failure was already shown to the user as a notification.
    #[error("Operation aborted")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl CamaraError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        CamaraError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        CamaraError::Gateway(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CamaraError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A user-visible message raised at an operation boundary.
///
/// Every failure a screen can hit (missing identity, gateway error,
/// missing row) collapses into one of these with a short title and the
/// underlying message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, err: &CamaraError) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_notification_carries_message() {
        let err = CamaraError::gateway("duplicate key value violates unique constraint");
        let n = Notification::error("Erro ao criar notícia", &err);
        assert!(n.is_error());
        assert_eq!(n.title, "Erro ao criar notícia");
        assert!(n.message.contains("duplicate key"));
    }

    #[test]
    fn test_missing_fields_message_lists_fields() {
        let err = CamaraError::MissingFields(vec!["titulo".into(), "conteudo".into()]);
        assert_eq!(err.to_string(), "Required fields missing: titulo, conteudo");
    }

    #[test]
    fn test_not_found_display() {
        let err = CamaraError::not_found("notícia", "abc");
        assert_eq!(err.to_string(), "notícia not found: abc");
    }
}
