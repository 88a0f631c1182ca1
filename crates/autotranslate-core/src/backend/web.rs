use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace};

use super::WebBackend;
use crate::config::{Lang, Settings};
use crate::error::{Error, Result};

const TRANSLATE_PATH: &str = "translate_a/single";

/// Client for Google's public, unauthenticated translation endpoint
#[derive(Debug, Clone)]
pub struct GoogleWebClient {
    client: Client,
    /// Base URL (e.g., "https://translate.googleapis.com")
    api_base: String,
}

impl GoogleWebClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: settings.web_api_base.clone(),
        })
    }

    /// Build a client against a non-default endpoint
    pub fn with_base_url(api_base: impl Into<String>) -> Result<Self> {
        let settings = Settings {
            web_api_base: api_base.into(),
            ..Settings::default()
        };
        Self::new(&settings)
    }
}

async fn request(client: &Client, api_base: &str, text: &str, target: &Lang, source: &Lang) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let url = crate::util::endpoint(api_base, TRANSLATE_PATH);
    trace!("Web translation {} -> {}: {:?}", source, target, text);

    let response = client
        .get(&url)
        .query(&[
            ("client", "gtx"),
            ("sl", source.as_str()),
            ("tl", target.as_str()),
            ("dt", "t"),
            ("q", text),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::BackendStatus {
            status: status.as_u16(),
            body,
        });
    }

    parse_translation(&body)
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The body is a nested array whose first element lists sentence segments
/// as `[translated, original, ...]`; the translation is their concatenation.
fn parse_translation(body: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let segments = match value.get(0) {
        Some(serde_json::Value::Array(segments)) => segments,
        // Blank input comes back without a segment list
        Some(serde_json::Value::Null) => return Ok(String::new()),
        _ => return Err(Error::InvalidResponse("missing sentence segments".to_string())),
    };

    let mut translated = String::new();
    for segment in segments {
        match segment.get(0) {
            Some(serde_json::Value::String(part)) => translated.push_str(part),
            Some(serde_json::Value::Null) => {}
            _ => return Err(Error::InvalidResponse(format!("unexpected segment: {segment}"))),
        }
    }
    Ok(translated)
}

#[async_trait]
impl WebBackend for GoogleWebClient {
    async fn translate(&self, text: &str, target: &Lang, source: &Lang) -> Result<String> {
        request(&self.client, &self.api_base, text, target, source).await
    }

    fn translate_batch(&self, texts: Vec<String>, target: &Lang, source: &Lang) -> BoxStream<'_, Result<String>> {
        debug!("Web translation of {} string(s) {} -> {}", texts.len(), source, target);

        let target = target.clone();
        let source = source.clone();

        // One request per string, issued only when the consumer polls for it
        stream::iter(texts)
            .then(move |text| {
                let target = target.clone();
                let source = source.clone();
                async move { request(&self.client, &self.api_base, &text, &target, &source).await }
            })
            .boxed()
    }
}
