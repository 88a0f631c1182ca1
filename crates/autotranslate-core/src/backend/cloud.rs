use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::auth::Authenticator;
use super::{CloudBackend, Translation};
use crate::config::{Lang, Settings};
use crate::credentials::Credentials;
use crate::error::{Error, Result};

const TRANSLATE_PATH: &str = "language/translate/v2";

/// Google Cloud Translation v2 client
pub struct GoogleCloudClient {
    client: Client,
    /// Base URL for the API (e.g., "https://translation.googleapis.com")
    api_base: String,
    auth: Authenticator,
    /// Segments sent per request
    max_segments: usize,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    target: &'a str,
    source: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

impl GoogleCloudClient {
    /// Build an authenticated client from decoded credentials
    pub fn new(credentials: Credentials, settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: settings.cloud_api_base.clone(),
            auth: Authenticator::new(credentials)?,
            max_segments: settings.max_segments.max(1),
        })
    }

    /// Build a client against a non-default endpoint
    pub fn with_base_url(credentials: Credentials, api_base: impl Into<String>) -> Result<Self> {
        let settings = Settings {
            cloud_api_base: api_base.into(),
            ..Settings::default()
        };
        Self::new(credentials, &settings)
    }

    /// Change how many segments go into one request
    #[must_use]
    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments.max(1);
        self
    }

    async fn request(&self, q: &[String], target: &Lang, source: &Lang) -> Result<Vec<Translation>> {
        let url = crate::util::endpoint(&self.api_base, TRANSLATE_PATH);
        let body = TranslateRequest {
            q,
            target: target.as_str(),
            source: source.as_str(),
            format: "text",
        };

        debug!("Cloud translation of {} segment(s) {} -> {}", q.len(), source, target);

        let request = self.client.post(&url).json(&body);
        let response = self.auth.authorize(&self.client, request).await?.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::BackendStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: TranslateResponse =
            serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        if parsed.data.translations.len() != q.len() {
            return Err(Error::InvalidResponse(format!(
                "expected {} translations, got {}",
                q.len(),
                parsed.data.translations.len()
            )));
        }

        Ok(parsed.data.translations)
    }
}

impl std::fmt::Debug for GoogleCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCloudClient")
            .field("api_base", &self.api_base)
            .field("auth", &self.auth)
            .field("max_segments", &self.max_segments)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CloudBackend for GoogleCloudClient {
    async fn translate(&self, text: &str, target: &Lang, source: &Lang) -> Result<Translation> {
        self.request(&[text.to_string()], target, source)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("no translations in response".to_string()))
    }

    async fn translate_batch(&self, texts: &[String], target: &Lang, source: &Lang) -> Result<Vec<Translation>> {
        let mut translations = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.max_segments) {
            translations.extend(self.request(chunk, target, source).await?);
        }
        Ok(translations)
    }
}
