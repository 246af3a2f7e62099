use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::ReceiverError;

/// Key in the custom data map that names the page to open on click
pub const ROUTE_KEY: &str = "route";

/// Notification block of a push; either field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Push payload as delivered to the service worker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundPush {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub notification: Option<PushNotification>,
    #[serde(default)]
    pub data: Option<HashMap<String, String>>,
}

impl InboundPush {
    pub fn from_json(json: &str) -> Result<Self, ReceiverError> {
        serde_json::from_str(json).map_err(|e| ReceiverError::Payload(e.to_string()))
    }

    pub fn title(&self) -> Option<&str> {
        self.notification.as_ref().and_then(|n| n.title.as_deref())
    }

    pub fn body(&self) -> Option<&str> {
        self.notification.as_ref().and_then(|n| n.body.as_deref())
    }

    /// Custom data, empty when the push carried none
    pub fn data(&self) -> HashMap<String, String> {
        self.data.clone().unwrap_or_default()
    }
}

/// Notification as shown by the host, with the push data attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl DisplayedNotification {
    /// Route to open on click; an empty value counts as absent
    pub fn route(&self) -> Option<&str> {
        self.data
            .get(ROUTE_KEY)
            .map(String::as_str)
            .filter(|route| !route.is_empty())
    }
}

/// User clicked a displayed notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationClick {
    pub notification: DisplayedNotification,
    #[serde(default)]
    pub action: Option<String>,
}
