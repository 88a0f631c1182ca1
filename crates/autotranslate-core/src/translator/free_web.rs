use async_trait::async_trait;
use futures::TryStreamExt;
use std::sync::Arc;
use tracing::debug;

use super::traits::{BatchMode, ServiceInfo, Translations, TranslatorService, ensure_target};
use crate::backend::WebBackend;
use crate::config::{DEFAULT_SOURCE_LANG, Lang, Settings};
use crate::error::Result;

/// Translator backed by Google's free web endpoint.
///
/// Optimized batches are returned as the backend's lazy stream; nothing is
/// requested until the caller polls it.
pub struct FreeWebTranslator {
    service: Arc<dyn WebBackend>,
}

impl FreeWebTranslator {
    /// Build the translator with the bundled web client
    #[cfg(feature = "free-web")]
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = crate::backend::GoogleWebClient::new(settings)?;
        Ok(Self::with_backend(Arc::new(client)))
    }

    /// The web client was compiled out
    #[cfg(not(feature = "free-web"))]
    pub fn new(_settings: &Settings) -> Result<Self> {
        Err(crate::error::Error::DependencyMissing("free-web"))
    }

    /// Build the translator around any web backend
    pub fn with_backend(service: Arc<dyn WebBackend>) -> Self {
        Self { service }
    }

    /// Translate any sequence of strings
    pub async fn translate_iter<I, S>(
        &self,
        strings: I,
        target: &Lang,
        source: Option<&Lang>,
        mode: BatchMode,
    ) -> Result<Translations<'_>>
    where
        I: IntoIterator<Item = S> + Send,
        S: Into<String>,
    {
        let strings = strings.into_iter().map(Into::into).collect();
        self.translate_strings(strings, target, source, mode).await
    }
}

fn source_or_default(source: Option<&Lang>) -> Lang {
    source.cloned().unwrap_or_else(|| Lang::new(DEFAULT_SOURCE_LANG))
}

#[async_trait]
impl TranslatorService for FreeWebTranslator {
    fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: "Google Translate (web)",
            requires_credentials: false,
            lazy_batches: true,
        }
    }

    async fn translate_string(&self, text: &str, target: &Lang, source: Option<&Lang>) -> Result<String> {
        ensure_target(target)?;
        let source = source_or_default(source);
        self.service.translate(text, target, &source).await
    }

    async fn translate_strings<'a>(
        &'a self,
        strings: Vec<String>,
        target: &Lang,
        source: Option<&Lang>,
        mode: BatchMode,
    ) -> Result<Translations<'a>> {
        ensure_target(target)?;
        let source = source_or_default(source);
        debug!("Translating {} string(s) via web backend ({:?})", strings.len(), mode);

        let translations = self.service.translate_batch(strings, target, &source);
        match mode {
            BatchMode::Optimized => Ok(Translations::Lazy(translations)),
            BatchMode::Eager => Ok(Translations::Eager(translations.try_collect().await?)),
        }
    }
}
