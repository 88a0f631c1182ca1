use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::config::Lang;
use crate::error::{Error, Result};

/// Information about a translator service
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// Human-readable name
    pub name: &'static str,
    /// Whether this service needs the credentials setting
    pub requires_credentials: bool,
    /// Whether optimized batches are streamed lazily
    pub lazy_batches: bool,
}

/// How `translate_strings` should hand back its results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// Results may arrive as a single-pass stream
    #[default]
    Optimized,
    /// Results are fully materialized before returning
    Eager,
}

impl BatchMode {
    pub const fn from_optimized(optimized: bool) -> Self {
        if optimized { Self::Optimized } else { Self::Eager }
    }

    pub const fn is_optimized(self) -> bool {
        matches!(self, Self::Optimized)
    }
}

/// Translations of a batch, in input order
pub enum Translations<'a> {
    /// Single-pass stream; each item is translated as it is polled
    Lazy(BoxStream<'a, Result<String>>),
    /// Materialized results, iterable any number of times
    Eager(Vec<String>),
}

impl<'a> Translations<'a> {
    pub const fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Materialized results, if there are any
    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::Eager(items) => Some(items),
            Self::Lazy(_) => None,
        }
    }

    /// Drain into a `Vec`, stopping at the first failed item
    pub async fn collect(self) -> Result<Vec<String>> {
        match self {
            Self::Eager(items) => Ok(items),
            Self::Lazy(stream) => stream.try_collect().await,
        }
    }

    /// View either shape as a stream
    pub fn into_stream(self) -> BoxStream<'a, Result<String>> {
        match self {
            Self::Lazy(stream) => stream,
            Self::Eager(items) => stream::iter(items.into_iter().map(Ok)).boxed(),
        }
    }
}

impl std::fmt::Debug for Translations<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lazy(_) => f.write_str("Translations::Lazy(..)"),
            Self::Eager(items) => f.debug_tuple("Translations::Eager").field(items).finish(),
        }
    }
}

/// A translation service.
///
/// Both operations must be provided by every implementation. `source` of
/// `None` selects the implementation's default source language.
#[async_trait]
pub trait TranslatorService: Send + Sync {
    /// Get information about this service
    fn info(&self) -> ServiceInfo;

    /// Get the service name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate one string into `target`
    async fn translate_string(&self, text: &str, target: &Lang, source: Option<&Lang>) -> Result<String>;

    /// Translate a batch into `target`, preserving input order
    async fn translate_strings<'a>(
        &'a self,
        strings: Vec<String>,
        target: &Lang,
        source: Option<&Lang>,
        mode: BatchMode,
    ) -> Result<Translations<'a>>;
}

/// Reject a blank target before anything is sent to a backend
pub(crate) fn ensure_target(target: &Lang) -> Result<()> {
    if target.is_empty() {
        return Err(Error::Precondition("target language must not be empty".to_string()));
    }
    Ok(())
}
