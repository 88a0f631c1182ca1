//! Backend clients the translators delegate to.
//!
//! Each translator talks to its provider through one of the traits below, so
//! the HTTP clients can be swapped for stubs in tests.

mod auth;
mod cloud;
#[cfg(feature = "free-web")]
mod web;

pub use auth::{Authenticator, CLOUD_TRANSLATION_SCOPE};
pub use cloud::GoogleCloudClient;
#[cfg(feature = "free-web")]
pub use web::GoogleWebClient;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::config::Lang;
use crate::error::Result;

/// Unauthenticated web translation backend
#[async_trait]
pub trait WebBackend: Send + Sync {
    /// Translate a single string
    async fn translate(&self, text: &str, target: &Lang, source: &Lang) -> Result<String>;

    /// Translate a batch lazily.
    ///
    /// The stream yields translations in input order and is consumed once.
    fn translate_batch(&self, texts: Vec<String>, target: &Lang, source: &Lang) -> BoxStream<'_, Result<String>>;
}

/// One item of a Cloud Translation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Translation {
    pub fn new(translated_text: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
            detected_source_language: None,
            model: None,
        }
    }
}

/// Authenticated cloud translation backend
#[async_trait]
pub trait CloudBackend: Send + Sync {
    /// Translate a single string
    async fn translate(&self, text: &str, target: &Lang, source: &Lang) -> Result<Translation>;

    /// Translate a batch, returning one item per input in input order
    async fn translate_batch(&self, texts: &[String], target: &Lang, source: &Lang) -> Result<Vec<Translation>>;
}
