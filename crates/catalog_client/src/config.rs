use std::{collections::HashMap, fmt, fs};

use tracing::warn;

use crate::{BearerToken, MissingToken, DEFAULT_LANGUAGE};

pub const SETTINGS_FILE: &str = "movies.toml";

pub struct Settings {
    pub api_base_url: String,
    pub access_token: String,
    pub account_id: i64,
    pub language: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3".into(),
            access_token: String::new(),
            account_id: 21856281,
            language: DEFAULT_LANGUAGE.into(),
            request_timeout_secs: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Settings {
    pub fn bearer_token(&self) -> Result<BearerToken, MissingToken> {
        BearerToken::new(self.access_token.as_str())
    }
}

/// Defaults, then `movies.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(file = SETTINGS_FILE, "config: ignoring unparsable settings file: {err}");
            return;
        }
    };

    if let Some(v) = file_cfg.get("api_base_url").and_then(value_as_string) {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.get("access_token").and_then(value_as_string) {
        settings.access_token = v;
    }
    if let Some(v) = file_cfg.get("account_id").and_then(value_as_string) {
        set_parsed(&mut settings.account_id, "account_id", &v);
    }
    if let Some(v) = file_cfg.get("language").and_then(value_as_string) {
        settings.language = v;
    }
    if let Some(v) = file_cfg.get("request_timeout_secs").and_then(value_as_string) {
        set_parsed_opt(&mut settings.request_timeout_secs, "request_timeout_secs", &v);
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TMDB_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("TMDB_ACCESS_TOKEN") {
        settings.access_token = v;
    }
    if let Some(v) = lookup("APP__ACCESS_TOKEN") {
        settings.access_token = v;
    }

    if let Some(v) = lookup("TMDB_ACCOUNT_ID") {
        set_parsed(&mut settings.account_id, "TMDB_ACCOUNT_ID", &v);
    }
    if let Some(v) = lookup("APP__ACCOUNT_ID") {
        set_parsed(&mut settings.account_id, "APP__ACCOUNT_ID", &v);
    }

    if let Some(v) = lookup("APP__LANGUAGE") {
        settings.language = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        set_parsed_opt(
            &mut settings.request_timeout_secs,
            "APP__REQUEST_TIMEOUT_SECS",
            &v,
        );
    }
}

fn value_as_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = raw, "config: ignoring unparsable value"),
    }
}

fn set_parsed_opt<T: std::str::FromStr>(slot: &mut Option<T>, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = Some(parsed),
        Err(_) => warn!(key, value = raw, "config: ignoring unparsable value"),
    }
}
