use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::credentials::ServiceAccountKey;
use crate::errors::CoreError;

/// Read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Lifetime requested for each signed assertion (Google's maximum).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before Google says they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Supplies OAuth2 bearer tokens to the Sheets client.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, CoreError>;
}

/// A fixed token, for tests or tokens minted elsewhere (e.g. `gcloud auth print-access-token`).
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, CoreError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Service-account OAuth2 flow (JWT bearer grant, RFC 7523).
///
/// Signs an RS256 assertion with the account's private key, exchanges it
/// at `token_uri` and reuses the access token until shortly before expiry.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scope: String,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self::with_client(key, Client::new())
    }

    pub fn with_client(key: ServiceAccountKey, client: Client) -> Self {
        Self {
            key,
            scope: SHEETS_SCOPE.to_string(),
            client,
            cached: Mutex::new(None),
        }
    }

    /// Build the signed assertion sent to the token endpoint.
    pub fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, CoreError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| CoreError::Credentials(format!("Unusable private key: {e}")))?;

        Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, CoreError> {
        let assertion = self.signed_assertion(now)?;
        debug!(token_uri = %self.key.token_uri, "requesting access token");

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::Auth(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Auth(format!("Malformed token response: {e}")))?;

        Ok(CachedToken {
            token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in - REFRESH_MARGIN_SECS),
        })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String, CoreError> {
        let now = Utc::now();
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.exchange(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
