use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::ReceiverError;
use crate::payload::DisplayedNotification;

/// Options passed along with the title when showing a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub data: HashMap<String, String>,
}

/// An open window controlled by the service worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// Capabilities the browser host provides to the receiver.
///
/// Implementations bind these to `registration.showNotification`,
/// `clients.matchAll`, `WindowClient.focus` and `clients.openWindow`.
#[async_trait]
pub trait NotificationHost: Send + Sync {
    async fn show_notification(
        &self,
        title: &str,
        options: NotificationOptions,
    ) -> Result<(), ReceiverError>;

    /// Dismiss a notification the user interacted with
    async fn close_notification(
        &self,
        notification: &DisplayedNotification,
    ) -> Result<(), ReceiverError>;

    /// Window clients currently open, including uncontrolled ones
    async fn match_all_windows(&self) -> Result<Vec<WindowClient>, ReceiverError>;

    async fn focus(&self, client: &WindowClient) -> Result<(), ReceiverError>;

    async fn open_window(&self, url: &str) -> Result<WindowClient, ReceiverError>;
}
