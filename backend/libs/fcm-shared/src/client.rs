use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::auth::{AccessToken, ServiceAccountTokenProvider, TokenProvider};
use crate::credential::ServiceAccountKey;
use crate::errors::FcmError;
use crate::models::*;

pub const DEFAULT_API_BASE: &str = "https://fcm.googleapis.com";

/// Firebase Cloud Messaging Client
///
/// Sends Android and Web push notifications through the FCM HTTP v1 API.
/// Each send acquires its own OAuth2 token from the configured
/// `TokenProvider`; tokens are never cached between calls.
pub struct FcmClient {
    pub project_id: String,
    pub credentials: Arc<ServiceAccountKey>,
    api_base: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: reqwest::Client,
}

impl FcmClient {
    /// Create new FCM client for the credential's project
    pub fn new(credentials: ServiceAccountKey) -> Self {
        let http_client = reqwest::Client::new();
        Self {
            project_id: credentials.project_id.clone(),
            credentials: Arc::new(credentials),
            api_base: DEFAULT_API_BASE.to_string(),
            token_provider: Arc::new(ServiceAccountTokenProvider::with_http_client(
                http_client.clone(),
            )),
            http_client,
        }
    }

    /// Point the client at a different API host (emulators, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_provider(mut self, token_provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = token_provider;
        self
    }

    /// `messages:send` URL for this project
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, self.project_id
        )
    }

    /// Get a fresh access token for the service account
    pub async fn get_access_token(&self) -> Result<AccessToken, FcmError> {
        Ok(self
            .token_provider
            .get_access_token(&self.credentials)
            .await?)
    }

    /// POST one message and classify the response.
    ///
    /// Transport and body parse failures are errors; any parsed response,
    /// successful or not, is a `SendResult`.
    pub async fn dispatch(
        &self,
        access_token: &AccessToken,
        message: &OutboundMessage,
    ) -> Result<SendResult, FcmError> {
        message.validate()?;

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", access_token.as_str()))
            .header("Content-Type", "application/json")
            .json(&FcmRequest { message })
            .send()
            .await
            .map_err(|e| FcmError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FcmError::Transport(e.to_string()))?;

        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| FcmError::Parse(format!("status {}: {}", status, e)))?;

        Ok(SendResult::from_response(status, body))
    }

    /// Send a message with an already acquired token
    pub async fn send_message(
        &self,
        access_token: &AccessToken,
        message: &OutboundMessage,
    ) -> Result<SentMessage, FcmError> {
        let result = self.dispatch(access_token, message).await.map_err(|e| {
            error!(project_id = %self.project_id, "Error sending message: {}", e);
            e
        })?;

        match &result {
            SendResult::Success(sent) => {
                info!(
                    project_id = %self.project_id,
                    message_id = sent.name().unwrap_or("<missing>"),
                    "Message sent successfully"
                );
            }
            SendResult::Failure(failure) => {
                error!(
                    project_id = %self.project_id,
                    status = failure.status,
                    body = %failure.body,
                    "Error sending message"
                );
            }
        }

        result.into_result()
    }

    /// Acquire a token, then send
    pub async fn send(&self, message: &OutboundMessage) -> Result<SentMessage, FcmError> {
        message.validate()?;
        let access_token = self.get_access_token().await?;
        self.send_message(&access_token, message).await
    }

    /// Send notification via FCM to a single device
    pub async fn send_to_device(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<SentMessage, FcmError> {
        let message =
            OutboundMessage::to_device(device_token, title, body).with_data(data.unwrap_or_default());
        self.send(&message).await
    }

    /// Send notification to topic
    pub async fn send_to_topic(
        &self,
        topic: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<SentMessage, FcmError> {
        let message =
            OutboundMessage::to_topic(topic, title, body).with_data(data.unwrap_or_default());
        self.send(&message).await
    }
}
