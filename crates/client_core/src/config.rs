use std::{collections::HashMap, fs, path::Path};

use shared::domain::UserRef;
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "catalog.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid items url '{url}': {source}")]
    InvalidItemsUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("items url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to parse {file}: {source}")]
    InvalidFile {
        file: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub items_url: String,
    pub thumbnail_url: String,
    pub user_id: String,
    pub username: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            items_url: "http://127.0.0.1:8080/api/items".into(),
            thumbnail_url: "http://127.0.0.1:8080/images/thumbnails/".into(),
            user_id: "local-user".into(),
            username: None,
        }
    }
}

impl ClientSettings {
    pub fn user(&self) -> UserRef {
        let user = UserRef::new(self.user_id.clone());
        match &self.username {
            Some(username) => user.with_username(username.clone()),
            None => user,
        }
    }
}

/// Defaults, then `catalog.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        apply_file(&mut settings, &raw).map_err(|source| SettingsError::InvalidFile {
            file: file.display().to_string(),
            source,
        })?;
    }
    apply_env(&mut settings, env);

    settings.items_url = normalize_items_url(&settings.items_url)?;
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("items_url") {
        settings.items_url = v.clone();
    }
    if let Some(v) = file_cfg.get("thumbnail_url") {
        settings.thumbnail_url = v.clone();
    }
    if let Some(v) = file_cfg.get("user_id") {
        settings.user_id = v.clone();
    }
    if let Some(v) = file_cfg.get("username") {
        settings.username = Some(v.clone());
    }
    Ok(())
}

fn apply_env(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("ITEMS_URL") {
        settings.items_url = v;
    }
    if let Some(v) = env("APP__ITEMS_URL") {
        settings.items_url = v;
    }

    if let Some(v) = env("THUMBNAIL_URL") {
        settings.thumbnail_url = v;
    }
    if let Some(v) = env("APP__THUMBNAIL_URL") {
        settings.thumbnail_url = v;
    }

    if let Some(v) = env("CATALOG_USER_ID") {
        settings.user_id = v;
    }
    if let Some(v) = env("CATALOG_USERNAME") {
        settings.username = Some(v);
    }
}

pub fn normalize_items_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|source| SettingsError::InvalidItemsUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(trimmed.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
