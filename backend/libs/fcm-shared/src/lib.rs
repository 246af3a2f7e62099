/// Notes FCM Shared Library
///
/// Firebase Cloud Messaging (FCM) HTTP v1 client used by the notes backend
/// to push notifications to Android and Web devices.
///
/// It handles:
/// - Service account credential loading
/// - OAuth2 token generation using Google service accounts
/// - Single device and topic message delivery
/// - Mapping provider responses to typed success / failure results

pub mod auth;
pub mod client;
pub mod credential;
pub mod errors;
pub mod models;

pub use auth::{AccessToken, ServiceAccountTokenProvider, TokenProvider, FIREBASE_MESSAGING_SCOPE};
pub use client::{FcmClient, DEFAULT_API_BASE};
pub use credential::ServiceAccountKey;
pub use errors::{AuthError, CredentialError, FcmError};
pub use models::{
    FcmNotification, OutboundMessage, ProviderFailure, SendResult, SentMessage, Target,
};
