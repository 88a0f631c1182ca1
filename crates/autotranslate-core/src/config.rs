use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Settings key holding the Google Cloud credentials descriptor
pub const CREDENTIALS_SETTING: &str = "AUTOTRANSLATE_GOOGLE_TRANSLATOR_SERVICE_CREDENTIALS_JSON";

/// Prefix for settings read from the environment
pub const ENV_PREFIX: &str = "AUTOTRANSLATE";

/// Default source language code for the service contract
pub const DEFAULT_SOURCE_LANG: &str = "en";

/// Public web endpoint used by the free translator
pub const DEFAULT_WEB_API_BASE: &str = "https://translate.googleapis.com";

/// Google Cloud Translation endpoint used by the paid translator
pub const DEFAULT_CLOUD_API_BASE: &str = "https://translation.googleapis.com";

/// Cloud Translation v2 accepts at most this many segments per request
pub const DEFAULT_MAX_SEGMENTS: usize = 128;

/// Language codes following ISO 639-1 with regional variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which translator variant the factory should build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// Unauthenticated public web endpoint
    #[default]
    #[serde(alias = "free_web")]
    FreeWeb,
    /// Authenticated Google Cloud Translation API
    #[serde(alias = "paid_api")]
    PaidApi,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FreeWeb => write!(f, "free-web"),
            Self::PaidApi => write!(f, "paid-api"),
        }
    }
}

/// Translator settings.
///
/// Loaded from an optional TOML file, then overridden by `AUTOTRANSLATE_*`
/// environment variables. The credentials descriptor may be given either as
/// a JSON string or as an inline table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Translator variant to build
    #[serde(default)]
    pub service: ServiceKind,

    /// Source language; `None` leaves the choice to the variant's default
    #[serde(default)]
    pub source_lang: Option<Lang>,

    /// Target language used by callers that do not pass one
    #[serde(default)]
    pub target_lang: Option<Lang>,

    /// Credentials for the paid translator
    #[serde(default)]
    pub google_translator_service_credentials_json: Option<serde_json::Value>,

    /// Maximum segments per Cloud Translation request
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,

    /// Keep appending batch results to the paid translator's accumulator
    #[serde(default = "default_true")]
    pub accumulate_batches: bool,

    /// Base URL of the free web endpoint
    #[serde(default = "default_web_api_base")]
    pub web_api_base: String,

    /// Base URL of the Cloud Translation API
    #[serde(default = "default_cloud_api_base")]
    pub cloud_api_base: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_max_segments() -> usize {
    DEFAULT_MAX_SEGMENTS
}

const fn default_true() -> bool {
    true
}

fn default_web_api_base() -> String {
    DEFAULT_WEB_API_BASE.to_string()
}

fn default_cloud_api_base() -> String {
    DEFAULT_CLOUD_API_BASE.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service: ServiceKind::default(),
            source_lang: None,
            target_lang: None,
            google_translator_service_credentials_json: None,
            max_segments: default_max_segments(),
            accumulate_batches: default_true(),
            web_api_base: default_web_api_base(),
            cloud_api_base: default_cloud_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or the default locations) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load settings using an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            tracing::debug!("Loading settings from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            for candidate in default_config_paths() {
                builder = builder.add_source(config::File::from(candidate).required(false));
            }
        }

        let settings: Self = builder
            .add_source(env)
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| Error::ConfigLoad(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Supply the credentials descriptor as a raw JSON document
    pub fn set_credentials_json(&mut self, json: impl Into<String>) {
        self.google_translator_service_credentials_json = Some(serde_json::Value::String(json.into()));
    }

    /// Reject values no translator can work with
    pub fn validate(&self) -> Result<()> {
        if self.max_segments == 0 {
            return Err(Error::ConfigInvalid {
                field: "max_segments".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::ConfigInvalid {
                field: "request_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        for (field, value) in [
            ("web_api_base", &self.web_api_base),
            ("cloud_api_base", &self.cloud_api_base),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(Error::ConfigInvalid {
                    field: field.to_string(),
                    reason: format!("'{value}' is not an http(s) URL"),
                });
            }
        }

        Ok(())
    }
}

/// Config files consulted when no explicit path is given, lowest priority first
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(config_dir) = crate::util::config_dir() {
        paths.push(config_dir.join("autotranslate").join("config.toml"));
    }
    paths.push(PathBuf::from("autotranslate.toml"));
    paths
}
