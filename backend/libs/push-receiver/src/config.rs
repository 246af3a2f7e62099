pub const DEFAULT_TITLE: &str = "New Message";
pub const DEFAULT_BODY: &str = "You got a new notification.";
pub const DEFAULT_ROUTE: &str = "/";
pub const DEFAULT_ICON: &str = "/icons/Icon-192.png";

/// Display defaults applied when a push leaves fields out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    pub icon: String,
    pub default_title: String,
    pub default_body: String,
    pub default_route: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            default_body: DEFAULT_BODY.to_string(),
            default_route: DEFAULT_ROUTE.to_string(),
        }
    }
}

impl ReceiverConfig {
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}
