use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::errors::CoreError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The service-account key file downloaded from Google Cloud.
///
/// Only the fields needed for the JWT bearer grant are read; the rest of
/// the JSON document is ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,

    pub client_email: String,

    /// PEM-encoded RSA private key
    pub private_key: String,

    #[serde(default)]
    pub private_key_id: Option<String>,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| CoreError::Credentials(format!("Malformed service-account JSON: {e}")))?;
        key.validate()?;
        Ok(key)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Credentials(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if let Some(kind) = &self.key_type {
            if kind != "service_account" {
                return Err(CoreError::Credentials(format!(
                    "Expected a service_account key, got '{kind}'"
                )));
            }
        }
        if self.client_email.trim().is_empty() {
            return Err(CoreError::Credentials("client_email is empty".into()));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(CoreError::Credentials(
                "private_key is not a PEM private key".into(),
            ));
        }
        Ok(())
    }
}
