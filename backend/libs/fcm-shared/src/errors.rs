use thiserror::Error;

use crate::models::ProviderFailure;

/// Service account credential errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read service account file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed service account key: {0}")]
    Malformed(String),
}

/// OAuth2 token exchange errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to parse private key: {0}")]
    KeyParse(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncode(String),

    #[error("Failed to get access token: {0}")]
    Request(String),

    #[error("Token request failed with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to parse token response: {0}")]
    ResponseParse(String),
}

/// FCM Client Error Types
#[derive(Error, Debug)]
pub enum FcmError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("FCM send request failed: {0}")]
    Transport(String),

    #[error("FCM API error: {0}")]
    Provider(ProviderFailure),

    #[error("Failed to parse FCM response: {0}")]
    Parse(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl FcmError {
    /// Provider rejection payload, if this error came from a non-200 response
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            FcmError::Provider(failure) => Some(failure),
            _ => None,
        }
    }
}
