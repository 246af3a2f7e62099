use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::credential::ServiceAccountKey;
use crate::errors::AuthError;

/// OAuth2 scope required by the FCM v1 send endpoint
pub const FIREBASE_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const LOG_PREFIX_CHARS: usize = 50;

/// Short-lived OAuth2 bearer token
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Leading characters of the token, safe to log
    pub fn prefix(&self) -> &str {
        match self.token.char_indices().nth(LOG_PREFIX_CHARS) {
            Some((idx, _)) => &self.token[..idx],
            None => &self.token,
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &format_args!("{}...", self.prefix()))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer tokens for the FCM API
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Exchange the credential for a token scoped to `FIREBASE_MESSAGING_SCOPE`
    async fn get_access_token(
        &self,
        credentials: &ServiceAccountKey,
    ) -> Result<AccessToken, AuthError>;
}

/// JWT Claims for Google OAuth2
#[derive(Debug, Serialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    pub fn for_service_account(credentials: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        Self {
            iss: credentials.client_email.clone(),
            sub: credentials.client_email.clone(),
            scope: FIREBASE_MESSAGING_SCOPE.to_string(),
            aud: credentials.token_uri.clone(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Google OAuth2 Token Response
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

/// Signs a service account JWT and exchanges it at the credential's `token_uri`.
///
/// Every call performs a fresh exchange; nothing is cached.
#[derive(Clone, Default)]
pub struct ServiceAccountTokenProvider {
    http_client: reqwest::Client,
}

impl ServiceAccountTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    fn sign_assertion(
        credentials: &ServiceAccountKey,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = JwtClaims::for_service_account(credentials, now);

        let mut header = Header::new(Algorithm::RS256);
        if !credentials.private_key_id.is_empty() {
            header.kid = Some(credentials.private_key_id.clone());
        }

        let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| AuthError::KeyParse(e.to_string()))?;

        encode(&header, &claims, &encoding_key).map_err(|e| AuthError::JwtEncode(e.to_string()))
    }

    async fn exchange(&self, credentials: &ServiceAccountKey) -> Result<AccessToken, AuthError> {
        let assertion = Self::sign_assertion(credentials, Utc::now())?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .http_client
            .post(&credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ResponseParse(e.to_string()))?;

        if token_response.access_token.is_empty() {
            return Err(AuthError::ResponseParse(
                "token endpoint returned an empty access_token".to_string(),
            ));
        }

        let expires_at = token_expiry(Utc::now(), token_response.expires_in)?;
        Ok(AccessToken::new(token_response.access_token, expires_at))
    }
}

/// Absolute expiry for an `expires_in` lifetime; negative or unrepresentable values are rejected
fn token_expiry(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>, AuthError> {
    if expires_in < 0 {
        return Err(AuthError::ResponseParse(format!(
            "negative expires_in: {expires_in}"
        )));
    }

    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AuthError::ResponseParse("expires_in out of range".to_string()))
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn get_access_token(
        &self,
        credentials: &ServiceAccountKey,
    ) -> Result<AccessToken, AuthError> {
        match self.exchange(credentials).await {
            Ok(token) => {
                info!(
                    project_id = %credentials.project_id,
                    token_prefix = %token.prefix(),
                    expires_at = %token.expires_at(),
                    "Access token generated"
                );
                Ok(token)
            }
            Err(e) => {
                error!(project_id = %credentials.project_id, "Error generating access token: {}", e);
                Err(e)
            }
        }
    }
}
