use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CamaraError, Result};
use crate::gateway::AuthUser;

pub const DEFAULT_CONFIG_FILE: &str = "camara.yaml";

/// Identity the local auth provider signs in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl OperatorConfig {
    pub fn to_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Application configuration, read from `camara.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding every table.
    pub database: PathBuf,
    /// Level for the `camara` log target: "error" through "trace".
    pub log_level: String,
    pub operator: Option<OperatorConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(".camara/camara.db"),
            log_level: "info".to_string(),
            operator: None,
        }
    }
}

impl AppConfig {
    /// Read `path` (or `camara.yaml` in the working directory) and apply
    /// environment overrides. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            Self::from_yaml(&raw)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Overrides: `CAMARA_DB`, `CAMARA_LOG`, and `CAMARA_OPERATOR_EMAIL`
    /// together with `CAMARA_OPERATOR_ID`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(db) = lookup("CAMARA_DB").filter(|v| !v.is_empty()) {
            self.database = PathBuf::from(db);
        }
        if let Some(level) = lookup("CAMARA_LOG").filter(|v| !v.is_empty()) {
            self.log_level = level;
        }

        let email = lookup("CAMARA_OPERATOR_EMAIL").filter(|v| !v.is_empty());
        let id = lookup("CAMARA_OPERATOR_ID").filter(|v| !v.is_empty());
        match (email, id) {
            (None, None) => {}
            (Some(email), Some(id)) => {
                let id = id.parse::<Uuid>().map_err(|e| {
                    CamaraError::Config(format!("CAMARA_OPERATOR_ID is not a UUID: {}", e))
                })?;
                self.operator = Some(OperatorConfig {
                    id,
                    email,
                    name: None,
                });
            }
            (Some(_), None) => {
                return Err(CamaraError::Config(
                    "CAMARA_OPERATOR_EMAIL requires CAMARA_OPERATOR_ID".into(),
                ))
            }
            (None, Some(_)) => {
                return Err(CamaraError::Config(
                    "CAMARA_OPERATOR_ID requires CAMARA_OPERATOR_EMAIL".into(),
                ))
            }
        }
        Ok(())
    }

    /// Filter directive for the tracing subscriber.
    pub fn log_filter(&self) -> String {
        format!("camara={}", self.log_level)
    }
}
