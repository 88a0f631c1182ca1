mod free_web;
mod paid_api;
mod traits;

pub use free_web::FreeWebTranslator;
pub use paid_api::PaidApiTranslator;
pub use traits::{BatchMode, ServiceInfo, Translations, TranslatorService};

use crate::config::{ServiceKind, Settings};
use crate::error::Result;
use std::sync::Arc;

/// Create the translator selected by `settings.service`
pub fn create_translator(settings: &Settings) -> Result<Arc<dyn TranslatorService>> {
    settings.validate()?;

    let translator: Arc<dyn TranslatorService> = match settings.service {
        ServiceKind::FreeWeb => Arc::new(FreeWebTranslator::new(settings)?),
        ServiceKind::PaidApi => Arc::new(PaidApiTranslator::new(settings)?),
    };

    tracing::debug!("Created translator: {}", translator.name());
    Ok(translator)
}
