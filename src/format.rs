//! Display helpers: slugs, pt-BR dates and labels.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Convert a title to a URL-safe slug
///
/// - Strips diacritics (`Área` becomes `area`)
/// - Converts to lowercase
/// - Collapses every run of other characters into one hyphen
/// - Trims leading/trailing hyphens
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // Start true to trim leading hyphens

    for c in title.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// `dd/mm/yyyy`
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy HH:MM`, in UTC
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y %H:%M").to_string()
}

pub fn format_optional_date(date: Option<&NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "—".to_string())
}

/// Shorten a UUID for display (first 8 chars)
pub fn short_id(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Span between two dates in years, rounded up (`ceil(days / 365.25)`).
pub fn years_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days() as f64;
    (days / 365.25).ceil() as i64
}

/// Gendered participle: `agree("criad", true)` is `criada`.
pub fn agree(stem: &str, feminine: bool) -> String {
    format!("{}{}", stem, if feminine { 'a' } else { 'o' })
}

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "sim"
    } else {
        "não"
    }
}

/// One card of the read-only settings screen.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSection {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub items: &'static [&'static str],
}

const SETTINGS: [SettingsSection; 5] = [
    SettingsSection {
        id: "site",
        title: "Configurações do Site",
        description: "Configurações gerais do portal",
        items: &[
            "Nome do município",
            "Logo da câmara",
            "Cores do tema",
            "Informações de contato",
        ],
    },
    SettingsSection {
        id: "users",
        title: "Gestão de Usuários",
        description: "Configurações de usuários e permissões",
        items: &[
            "Políticas de senha",
            "Níveis de acesso",
            "Notificações por email",
            "Sessões ativas",
        ],
    },
    SettingsSection {
        id: "security",
        title: "Segurança",
        description: "Configurações de segurança do sistema",
        items: &[
            "Autenticação dois fatores",
            "Logs de auditoria",
            "Backup automático",
            "Política de retenção",
        ],
    },
    SettingsSection {
        id: "email",
        title: "Configurações de Email",
        description: "Configurações do servidor de email",
        items: &[
            "Servidor SMTP",
            "Templates de email",
            "Assinatura automática",
            "Lista de distribuição",
        ],
    },
    SettingsSection {
        id: "database",
        title: "Banco de Dados",
        description: "Manutenção e backup do banco",
        items: &[
            "Backup automático",
            "Limpeza de logs",
            "Otimização",
            "Relatórios de uso",
        ],
    },
];

pub fn settings_sections() -> &'static [SettingsSection] {
    &SETTINGS
}
