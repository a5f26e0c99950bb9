use anirec_common::logging::redact_secret;
use serde::{Deserialize, Serialize};
use strum::EnumString;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_APP_TITLE: &str = "AniRec";
pub const DEVELOPMENT_REFERER: &str = "http://localhost:9002";
pub const PRODUCTION_REFERER: &str = "https://your-production-app-url.com";

/// Deployment environment, used only to pick a referer default.
#[derive(Debug, EnumString, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
}

/// Everything the pipeline needs to talk to the completion endpoint. Built
/// once by the caller and handed in, so nothing inside the pipeline reads the
/// process environment.
#[derive(Clone)]
pub struct RecommenderConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub referer: String,
    pub app_title: String,
}

impl RecommenderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: resolve_referer(None, AppEnvironment::Development),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_app_title(mut self, app_title: impl Into<String>) -> Self {
        self.app_title = app_title.into();
        self
    }
}

// Hand-written so the key never ends up in a `{:?}` log line.
impl std::fmt::Debug for RecommenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommenderConfig")
            .field("api_key", &redact_secret(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

/// Pick the referer header value: an explicit, non-blank app URL wins,
/// otherwise fall back to the default for the environment.
pub fn resolve_referer(app_url: Option<&str>, env: AppEnvironment) -> String {
    match app_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => match env {
            AppEnvironment::Development => DEVELOPMENT_REFERER.to_string(),
            AppEnvironment::Production => PRODUCTION_REFERER.to_string(),
        },
    }
}

/// Blank titles fall back to the default, same as an unset one.
pub fn resolve_app_title(app_title: Option<&str>) -> String {
    app_title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_APP_TITLE)
        .to_string()
}
