use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::errors::FcmError;

const TOPIC_PREFIX: &str = "/topics/";

/// Message target selector; exactly one per message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// FCM registration token of a single device
    Token(String),
    /// Topic name without the `/topics/` prefix
    Topic(String),
}

impl Target {
    pub fn device(token: impl Into<String>) -> Self {
        Target::Token(token.into())
    }

    /// Topic selector; a leading `/topics/` is stripped
    pub fn topic(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix(TOPIC_PREFIX) {
            Some(stripped) => Target::Topic(stripped.to_string()),
            None => Target::Topic(name),
        }
    }

    pub fn validate(&self) -> Result<(), FcmError> {
        match self {
            Target::Token(token) => {
                if token.trim().is_empty() {
                    return Err(FcmError::InvalidMessage(
                        "device token must not be empty".to_string(),
                    ));
                }
            }
            Target::Topic(topic) => {
                if topic.is_empty() {
                    return Err(FcmError::InvalidMessage(
                        "topic must not be empty".to_string(),
                    ));
                }
                if !topic.chars().all(is_topic_char) {
                    return Err(FcmError::InvalidMessage(format!(
                        "topic \"{topic}\" contains characters outside [a-zA-Z0-9-_.~%]"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_topic_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%')
}

/// FCM Notification Payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FcmNotification {
    pub title: String,
    pub body: String,
}

/// Message to deliver through the FCM v1 API
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    #[serde(flatten)]
    pub target: Target,
    pub notification: FcmNotification,
    pub data: HashMap<String, String>,
}

impl OutboundMessage {
    pub fn new(target: Target, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target,
            notification: FcmNotification {
                title: title.into(),
                body: body.into(),
            },
            data: HashMap::new(),
        }
    }

    pub fn to_device(
        device_token: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(Target::device(device_token), title, body)
    }

    pub fn to_topic(
        topic: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(Target::topic(topic), title, body)
    }

    pub fn with_data(mut self, data: HashMap<String, String>) -> Self {
        self.data = data;
        self
    }

    pub fn validate(&self) -> Result<(), FcmError> {
        self.target.validate()
    }
}

/// FCM Message Request envelope
#[derive(Debug, Serialize)]
pub struct FcmRequest<'a> {
    pub message: &'a OutboundMessage,
}

/// Successful send: the parsed response body
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub body: Value,
}

impl SentMessage {
    /// Provider message identifier, e.g. `projects/p/messages/0:1500415314455276%31bd1c9631bd1c96`
    pub fn name(&self) -> Option<&str> {
        self.body.get("name").and_then(Value::as_str)
    }
}

/// Non-200 response with its parsed error body, unmodified
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub status: u16,
    pub body: Value,
}

impl ProviderFailure {
    /// `error.status` from a Google API error body, e.g. `PERMISSION_DENIED`
    pub fn error_status(&self) -> Option<&str> {
        self.body.pointer("/error/status").and_then(Value::as_str)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.pointer("/error/message").and_then(Value::as_str)
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.status, self.body)
    }
}

/// Outcome of a send that reached the provider
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    Success(SentMessage),
    Failure(ProviderFailure),
}

impl SendResult {
    /// Only HTTP 200 counts as success
    pub fn from_response(status: u16, body: Value) -> Self {
        if status == 200 {
            SendResult::Success(SentMessage { body })
        } else {
            SendResult::Failure(ProviderFailure { status, body })
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Success(_))
    }

    pub fn into_result(self) -> Result<SentMessage, FcmError> {
        match self {
            SendResult::Success(sent) => Ok(sent),
            SendResult::Failure(failure) => Err(FcmError::Provider(failure)),
        }
    }
}
