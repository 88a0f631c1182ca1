use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::{BatchMode, ServiceInfo, Translations, TranslatorService, ensure_target};
use crate::backend::{CloudBackend, GoogleCloudClient};
use crate::config::{DEFAULT_SOURCE_LANG, Lang, Settings};
use crate::credentials::Credentials;
use crate::error::Result;

/// Translator backed by the paid Google Cloud Translation API.
///
/// Batch results are appended to an accumulator that lives as long as the
/// translator, and `translate_strings` returns the whole accumulator: the
/// second call on an instance returns the first call's translations
/// followed by its own. Build with `accumulating(false)` (or set
/// `accumulate_batches = false`) to get only the current call's results.
pub struct PaidApiTranslator {
    translate_client: Arc<dyn CloudBackend>,
    translated_strings: Mutex<Vec<String>>,
    accumulate: bool,
}

impl PaidApiTranslator {
    /// Target language `translate_string` callers conventionally omit
    pub const STRING_DEFAULT_TARGET: &'static str = "en";
    /// Source language `translate_string` falls back to
    pub const STRING_DEFAULT_SOURCE: &'static str = "es";

    /// Build the translator from the credentials setting.
    ///
    /// Fails with `ConfigMissing` when the setting is absent or empty; no
    /// network request is made here.
    pub fn new(settings: &Settings) -> Result<Self> {
        let credentials =
            Credentials::from_setting(settings.google_translator_service_credentials_json.as_ref())?;
        let client = GoogleCloudClient::new(credentials, settings)?;
        debug!("Cloud translation client ready: {:?}", client);

        Ok(Self::with_client(Arc::new(client)).accumulating(settings.accumulate_batches))
    }

    /// Build the translator around any cloud backend
    pub fn with_client(translate_client: Arc<dyn CloudBackend>) -> Self {
        Self {
            translate_client,
            translated_strings: Mutex::new(Vec::new()),
            accumulate: true,
        }
    }

    /// Choose between accumulated and per-call batch results
    #[must_use]
    pub fn accumulating(mut self, accumulate: bool) -> Self {
        self.accumulate = accumulate;
        self
    }

    /// Snapshot of everything `translate_strings` has accumulated
    pub async fn translated_strings(&self) -> Vec<String> {
        self.translated_strings.lock().await.clone()
    }

    /// Empty the accumulator
    pub async fn clear_translated_strings(&self) {
        self.translated_strings.lock().await.clear();
    }
}

#[async_trait]
impl TranslatorService for PaidApiTranslator {
    fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: "Google Cloud Translation",
            requires_credentials: true,
            lazy_batches: false,
        }
    }

    async fn translate_string(&self, text: &str, target: &Lang, source: Option<&Lang>) -> Result<String> {
        ensure_target(target)?;
        let source = source
            .cloned()
            .unwrap_or_else(|| Lang::new(Self::STRING_DEFAULT_SOURCE));

        let response = self.translate_client.translate(text, target, &source).await?;
        Ok(response.translated_text)
    }

    /// `mode` is ignored: the batch is always translated eagerly.
    async fn translate_strings<'a>(
        &'a self,
        strings: Vec<String>,
        target: &Lang,
        source: Option<&Lang>,
        _mode: BatchMode,
    ) -> Result<Translations<'a>> {
        ensure_target(target)?;
        let source = source
            .cloned()
            .unwrap_or_else(|| Lang::new(DEFAULT_SOURCE_LANG));

        let response = self
            .translate_client
            .translate_batch(&strings, target, &source)
            .await?;
        let translated = response.into_iter().map(|item| item.translated_text);

        if !self.accumulate {
            return Ok(Translations::Eager(translated.collect()));
        }

        let mut accumulator = self.translated_strings.lock().await;
        accumulator.extend(translated);
        debug!("Accumulator now holds {} translation(s)", accumulator.len());
        Ok(Translations::Eager(accumulator.clone()))
    }
}
