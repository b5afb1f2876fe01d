//! LeadWatch configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LeadWatchError, Result};

pub const ENV_NOTION_TOKEN: &str = "NOTION_INTEGRATION_SECRET";
pub const ENV_NOTION_DATABASE: &str = "NOTION_DATABASE_ID";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_CHAT: &str = "TELEGRAM_GROUP_ID";
pub const ENV_TELEGRAM_THREAD: &str = "TELEGRAM_THREAD_ID";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadWatchConfig {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub fields: FieldMapping,
}

impl LeadWatchConfig {
    /// Load config from the default path (~/.leadwatch/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LeadWatchError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| LeadWatchError::Config(format!("Failed to parse config: {e}")))
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".leadwatch")
            .join("config.toml")
    }

    /// Overlay credentials from environment-style key/value pairs.
    /// Only non-empty values override what the file provided.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get(ENV_NOTION_TOKEN) {
            self.notion.token = v;
        }
        if let Some(v) = get(ENV_NOTION_DATABASE) {
            self.notion.database_id = v;
        }
        if let Some(v) = get(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = v;
        }
        if let Some(v) = get(ENV_TELEGRAM_CHAT) {
            self.telegram.chat_id = v;
        }
        if let Some(v) = get(ENV_TELEGRAM_THREAD) {
            let thread_id = v.parse::<i64>().map_err(|_| {
                LeadWatchError::Config(format!("{ENV_TELEGRAM_THREAD} must be an integer, got '{v}'"))
            })?;
            self.telegram.thread_id = Some(thread_id);
        }
        Ok(())
    }

    /// [`apply_env`](Self::apply_env) against the process environment.
    pub fn apply_process_env(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }
}

/// Notion database source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_notion_api_base")]
    pub api_base: String,
    #[serde(default = "default_notion_version")]
    pub version: String,
    #[serde(default = "default_notion_timeout")]
    pub timeout_secs: u64,
}

fn default_notion_api_base() -> String { "https://api.notion.com/v1".into() }
fn default_notion_version() -> String { "2022-06-28".into() }
fn default_notion_timeout() -> u64 { 30 }

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            database_id: String::new(),
            api_base: default_notion_api_base(),
            version: default_notion_version(),
            timeout_secs: default_notion_timeout(),
        }
    }
}

impl NotionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() || self.database_id.is_empty() {
            return Err(LeadWatchError::Config(format!(
                "{ENV_NOTION_TOKEN} and {ENV_NOTION_DATABASE} must be set"
            )));
        }
        Ok(())
    }
}

/// Telegram destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Group or chat id (numeric or `@channel`).
    #[serde(default)]
    pub chat_id: String,
    /// Forum topic inside the group.
    #[serde(default)]
    pub thread_id: Option<i64>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u64,
}

fn default_telegram_api_base() -> String { "https://api.telegram.org".into() }
fn default_telegram_timeout() -> u64 { 10 }

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            thread_id: None,
            api_base: default_telegram_api_base(),
            timeout_secs: default_telegram_timeout(),
        }
    }
}

impl TelegramConfig {
    /// Bot token is enough for discovery calls.
    pub fn validate_token(&self) -> Result<()> {
        if self.bot_token.is_empty() {
            return Err(LeadWatchError::Config(format!("{ENV_TELEGRAM_TOKEN} must be set")));
        }
        Ok(())
    }

    /// Sending needs both the token and a destination chat.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            return Err(LeadWatchError::Config(format!(
                "{ENV_TELEGRAM_TOKEN} and {ENV_TELEGRAM_CHAT} must be set"
            )));
        }
        Ok(())
    }
}

/// Alert message rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_team_name")]
    pub team_name: String,
    #[serde(default = "default_critical_cap")]
    pub critical_cap: usize,
    #[serde(default = "default_bucket_cap")]
    pub warning_cap: usize,
    #[serde(default = "default_bucket_cap")]
    pub attention_cap: usize,
    #[serde(default = "default_link_label")]
    pub link_label: String,
}

fn default_team_name() -> String { "Frutero".into() }
fn default_critical_cap() -> usize { 5 }
fn default_bucket_cap() -> usize { 3 }
fn default_link_label() -> String { "View in Notion".into() }

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            team_name: default_team_name(),
            critical_cap: default_critical_cap(),
            warning_cap: default_bucket_cap(),
            attention_cap: default_bucket_cap(),
            link_label: default_link_label(),
        }
    }
}

/// Notion property types the extractor knows how to read as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyShape {
    Title,
    RichText,
    Select,
    Status,
    MultiSelect,
    People,
    Email,
    Url,
    PhoneNumber,
}

impl PropertyShape {
    /// The key under which Notion nests the value for this type.
    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Select => "select",
            Self::Status => "status",
            Self::MultiSelect => "multi_select",
            Self::People => "people",
            Self::Email => "email",
            Self::Url => "url",
            Self::PhoneNumber => "phone_number",
        }
    }
}

/// One place a canonical attribute may live in a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCandidate {
    pub property: String,
    pub shape: PropertyShape,
}

impl FieldCandidate {
    pub fn new(property: &str, shape: PropertyShape) -> Self {
        Self {
            property: property.to_string(),
            shape,
        }
    }
}

/// Per-attribute candidate lists, tried in order; first non-empty match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(default = "default_name_fields")]
    pub name: Vec<FieldCandidate>,
    /// Date properties holding the last contact.
    #[serde(default = "default_last_contact_fields")]
    pub last_contact: Vec<String>,
    #[serde(default = "default_status_fields")]
    pub status: Vec<FieldCandidate>,
    #[serde(default = "default_email_fields")]
    pub email: Vec<FieldCandidate>,
    #[serde(default = "default_company_fields")]
    pub company: Vec<FieldCandidate>,
    #[serde(default = "default_contact_person_fields")]
    pub contact_person: Vec<FieldCandidate>,
    #[serde(default = "default_telegram_fields")]
    pub telegram: Vec<FieldCandidate>,
    #[serde(default = "default_tags_fields")]
    pub tags: Vec<FieldCandidate>,
    #[serde(default = "default_notes_fields")]
    pub notes: Vec<FieldCandidate>,
    #[serde(default = "default_owner_fields")]
    pub owner: Vec<FieldCandidate>,
}

use PropertyShape::*;

fn default_name_fields() -> Vec<FieldCandidate> {
    vec![
        FieldCandidate::new("Customer", Title),
        FieldCandidate::new("Point of Contact", Title),
        FieldCandidate::new("Name", Title),
    ]
}
fn default_last_contact_fields() -> Vec<String> { vec!["Last Contact Date".into()] }
fn default_status_fields() -> Vec<FieldCandidate> {
    vec![FieldCandidate::new("Status", Select), FieldCandidate::new("Status", Status)]
}
fn default_email_fields() -> Vec<FieldCandidate> {
    // The original CRM column carries a trailing space.
    vec![FieldCandidate::new("Email ", Email), FieldCandidate::new("Email", Email)]
}
fn default_company_fields() -> Vec<FieldCandidate> {
    vec![
        FieldCandidate::new("Industry", Select),
        FieldCandidate::new("Industry", RichText),
        FieldCandidate::new("Client", Select),
        FieldCandidate::new("Client", RichText),
    ]
}
fn default_contact_person_fields() -> Vec<FieldCandidate> {
    vec![
        FieldCandidate::new("Contact Person", RichText),
        FieldCandidate::new("Point of Contact", RichText),
    ]
}
fn default_telegram_fields() -> Vec<FieldCandidate> { vec![FieldCandidate::new("Telegram", RichText)] }
fn default_tags_fields() -> Vec<FieldCandidate> { vec![FieldCandidate::new("Tags", MultiSelect)] }
fn default_notes_fields() -> Vec<FieldCandidate> { vec![FieldCandidate::new("Notes", RichText)] }
fn default_owner_fields() -> Vec<FieldCandidate> {
    vec![FieldCandidate::new("Owner", People), FieldCandidate::new("Owner", Select)]
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            name: default_name_fields(),
            last_contact: default_last_contact_fields(),
            status: default_status_fields(),
            email: default_email_fields(),
            company: default_company_fields(),
            contact_person: default_contact_person_fields(),
            telegram: default_telegram_fields(),
            tags: default_tags_fields(),
            notes: default_notes_fields(),
            owner: default_owner_fields(),
        }
    }
}
