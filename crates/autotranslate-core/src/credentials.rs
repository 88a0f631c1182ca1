//! Decoding of the Google Cloud credentials descriptor.
//!
//! The descriptor is either a service-account key file (as downloaded from
//! the Cloud console) or a bare API key: `{"api_key": "..."}`.

use serde::Deserialize;

use crate::config::CREDENTIALS_SETTING;
use crate::error::{Error, Result};

/// Token endpoint used when a key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Decoded credentials for the Cloud Translation API
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Service account exchanged for OAuth access tokens
    ServiceAccount(ServiceAccountKey),
    /// API key sent with every request
    ApiKey(String),
}

/// The fields of a service-account key file that token exchange needs
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Descriptor {
    ServiceAccount(ServiceAccountKey),
    ApiKey { api_key: String },
}

impl Credentials {
    /// Decode the value stored under the credentials setting.
    ///
    /// Absent, null, blank or empty-object values are reported as a missing
    /// setting, before anything touches the network.
    pub fn from_setting(value: Option<&serde_json::Value>) -> Result<Self> {
        let missing = || Error::ConfigMissing(CREDENTIALS_SETTING.to_string());

        match value {
            None | Some(serde_json::Value::Null) => Err(missing()),
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => Err(missing()),
            Some(serde_json::Value::String(s)) => Self::from_json_str(s),
            Some(serde_json::Value::Object(map)) if map.is_empty() => Err(missing()),
            Some(other) => Self::from_value(other.clone()),
        }
    }

    /// Decode a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::CredentialsInvalid(format!("not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let descriptor: Descriptor = serde_json::from_value(value).map_err(|_| {
            Error::CredentialsInvalid(
                "expected a service account key (client_email, private_key) or an api_key".to_string(),
            )
        })?;

        match descriptor {
            Descriptor::ServiceAccount(key) => {
                if let Some(kind) = key.kind.as_deref()
                    && kind != "service_account"
                {
                    return Err(Error::CredentialsInvalid(format!(
                        "unsupported credentials type '{kind}'"
                    )));
                }
                if key.private_key.trim().is_empty() || key.client_email.trim().is_empty() {
                    return Err(Error::CredentialsInvalid(
                        "service account key has an empty private_key or client_email".to_string(),
                    ));
                }
                Ok(Self::ServiceAccount(key))
            }
            Descriptor::ApiKey { api_key } if api_key.trim().is_empty() => {
                Err(Error::CredentialsInvalid("api_key is empty".to_string()))
            }
            Descriptor::ApiKey { api_key } => Ok(Self::ApiKey(api_key)),
        }
    }
}

// Keep secrets out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
