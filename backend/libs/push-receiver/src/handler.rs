use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::ReceiverConfig;
use crate::errors::ReceiverError;
use crate::host::{NotificationHost, NotificationOptions, WindowClient};
use crate::payload::{InboundPush, NotificationClick};

/// Where a click ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An open window already showed the route and was focused
    Focused(WindowClient),
    /// No window matched; a new one was opened at the route
    Opened(WindowClient),
}

/// One method per host event
#[async_trait]
pub trait PushEventHandler: Send + Sync {
    async fn on_background_message(&self, push: InboundPush) -> Result<(), ReceiverError>;

    async fn on_notification_click(
        &self,
        click: NotificationClick,
    ) -> Result<ClickOutcome, ReceiverError>;
}

/// Shows pushes as system notifications and routes clicks to windows
pub struct NotificationReceiver<H> {
    host: H,
    config: ReceiverConfig,
}

impl<H: NotificationHost> NotificationReceiver<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, ReceiverConfig::default())
    }

    pub fn with_config(host: H, config: ReceiverConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }
}

#[async_trait]
impl<H: NotificationHost> PushEventHandler for NotificationReceiver<H> {
    async fn on_background_message(&self, push: InboundPush) -> Result<(), ReceiverError> {
        info!(message_id = ?push.message_id, "Received background message");

        let title = push.title().unwrap_or(self.config.default_title.as_str()).to_string();
        let options = NotificationOptions {
            body: push.body().unwrap_or(self.config.default_body.as_str()).to_string(),
            icon: self.config.icon.clone(),
            data: push.data(),
        };

        self.host.show_notification(&title, options).await
    }

    async fn on_notification_click(
        &self,
        click: NotificationClick,
    ) -> Result<ClickOutcome, ReceiverError> {
        self.host.close_notification(&click.notification).await?;

        let route = click
            .notification
            .route()
            .unwrap_or(self.config.default_route.as_str());

        let windows = self.host.match_all_windows().await?;
        debug!(route, open_windows = windows.len(), "Routing notification click");

        if let Some(window) = windows.into_iter().find(|w| w.url.contains(route)) {
            self.host.focus(&window).await?;
            info!(route, window_id = %window.id, "Focused existing window");
            return Ok(ClickOutcome::Focused(window));
        }

        let window = self.host.open_window(route).await?;
        info!(route, window_id = %window.id, "Opened new window");
        Ok(ClickOutcome::Opened(window))
    }
}
