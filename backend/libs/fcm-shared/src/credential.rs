use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::CredentialError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Firebase Service Account Key
///
/// Loaded once per process from the JSON document downloaded from the
/// Firebase console and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a service account key from its JSON text
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| CredentialError::Malformed(e.to_string()))?;
        key.validate()?;
        Ok(key)
    }

    /// Load a service account key file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> Result<(), CredentialError> {
        if let Some(kind) = self.key_type.as_deref() {
            if kind != "service_account" {
                return Err(CredentialError::Malformed(format!(
                    "expected type \"service_account\", got \"{kind}\""
                )));
            }
        }

        for (field, value) in [
            ("project_id", &self.project_id),
            ("private_key", &self.private_key),
            ("client_email", &self.client_email),
            ("token_uri", &self.token_uri),
        ] {
            if value.trim().is_empty() {
                return Err(CredentialError::Malformed(format!("{field} is empty")));
            }
        }

        Ok(())
    }
}

// Keep signing material out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
