use thiserror::Error;

/// Unified error type for autotranslate-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Configuration and credentials (raised while building a translator)
/// - Caller preconditions (raised before any backend call)
/// - Backend failures (HTTP, auth, malformed responses), never retried
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration sources
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    /// Missing required configuration setting
    #[error("missing required setting: {0}")]
    ConfigMissing(String),

    /// Credentials descriptor present but not decodable
    #[error("invalid credentials: {0}")]
    CredentialsInvalid(String),

    /// Optional backend support was compiled out
    #[error("translator requires the `{0}` feature, which is not enabled")]
    DependencyMissing(&'static str),

    // ==========================================================================
    // Caller Errors
    // ==========================================================================
    /// Caller passed input the translator cannot accept
    #[error("precondition failed: {0}")]
    Precondition(String),

    // ==========================================================================
    // Backend Errors
    // ==========================================================================
    /// Transport-level failure from the HTTP client
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("translation backend returned HTTP {status}: {body}")]
    BackendStatus { status: u16, body: String },

    /// Backend answered with a body we could not interpret
    #[error("invalid translation backend response: {0}")]
    InvalidResponse(String),

    /// Access token could not be obtained
    #[error("authentication failed: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error was raised while building a translator
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad(_)
                | Self::ConfigInvalid { .. }
                | Self::ConfigMissing(_)
                | Self::CredentialsInvalid(_)
                | Self::DependencyMissing(_)
        )
    }

    /// Whether this error came from the translation backend
    pub const fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::BackendStatus { .. } | Self::InvalidResponse(_) | Self::Auth(_)
        )
    }
}
