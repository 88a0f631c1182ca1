use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use crate::credentials::{Credentials, ServiceAccountKey};
use crate::error::{Error, Result};

/// OAuth scope granting access to the Cloud Translation API
pub const CLOUD_TRANSLATION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-translation";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for the signed assertion
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Refresh tokens this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

const fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

struct ServiceAccountAuth {
    client_email: String,
    token_uri: String,
    encoding_key: EncodingKey,
    header: Header,
    cached: Mutex<Option<AccessToken>>,
}

enum Method {
    ApiKey(String),
    ServiceAccount(Box<ServiceAccountAuth>),
}

/// Authenticated-credential object for the Cloud Translation client.
///
/// Built from decoded [`Credentials`]. Service accounts sign their key into
/// a JWT bearer assertion and trade it for an access token the first time a
/// request needs one; the token is then reused until shortly before expiry.
pub struct Authenticator {
    method: Method,
}

impl Authenticator {
    /// Prepare credentials for use. Never performs network I/O.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let method = match credentials {
            Credentials::ApiKey(key) => Method::ApiKey(key),
            Credentials::ServiceAccount(key) => Method::ServiceAccount(Box::new(service_account(key)?)),
        };
        Ok(Self { method })
    }

    /// Attach credentials to an outgoing request, fetching a token if needed
    pub async fn authorize(&self, client: &Client, request: RequestBuilder) -> Result<RequestBuilder> {
        match &self.method {
            Method::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            Method::ServiceAccount(auth) => {
                let token = auth.access_token(client).await?;
                Ok(request.bearer_auth(token))
            }
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.method {
            Method::ApiKey(_) => f.write_str("Authenticator::ApiKey"),
            Method::ServiceAccount(auth) => f
                .debug_struct("Authenticator::ServiceAccount")
                .field("client_email", &auth.client_email)
                .field("token_uri", &auth.token_uri)
                .finish_non_exhaustive(),
        }
    }
}

fn service_account(key: ServiceAccountKey) -> Result<ServiceAccountAuth> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| Error::CredentialsInvalid(format!("unreadable private_key: {e}")))?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id;

    Ok(ServiceAccountAuth {
        client_email: key.client_email,
        token_uri: key.token_uri,
        encoding_key,
        header,
        cached: Mutex::new(None),
    })
}

impl ServiceAccountAuth {
    async fn access_token(&self, client: &Client) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now() + EXPIRY_MARGIN
        {
            return Ok(token.value.clone());
        }

        let token = self.fetch(client).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch(&self, client: &Client) -> Result<AccessToken> {
        let iat = crate::util::unix_now();
        let claims = Claims {
            iss: &self.client_email,
            scope: CLOUD_TRANSLATION_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let assertion = jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| Error::Auth(format!("failed to sign assertion: {e}")))?;

        debug!("Requesting access token for {} from {}", self.client_email, self.token_uri);

        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("token endpoint returned HTTP {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("unexpected token response: {e}")))?;

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
