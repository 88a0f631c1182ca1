//! autotranslate Core Library
//!
//! This library translates strings and batches of strings through
//! interchangeable Google translation backends:
//! - `FreeWebTranslator` for the public, unauthenticated web endpoint
//! - `PaidApiTranslator` for the Cloud Translation API with credentials
//!
//! Both implement [`TranslatorService`]; [`create_translator`] picks one from
//! [`Settings`].

pub mod backend;
pub mod config;
pub mod credentials;
pub mod error;
pub mod translator;
pub mod util;

pub use backend::{CloudBackend, Translation, WebBackend};
pub use config::{CREDENTIALS_SETTING, DEFAULT_SOURCE_LANG, Lang, ServiceKind, Settings};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use translator::{
    BatchMode, FreeWebTranslator, PaidApiTranslator, ServiceInfo, Translations, TranslatorService,
    create_translator,
};
