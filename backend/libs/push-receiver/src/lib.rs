/// Notes Push Receiver
///
/// Browser-side handling of FCM web pushes, written against an abstract
/// host so the logic can run inside any service worker binding.
///
/// It handles:
/// - Displaying a notification for a background push, with default texts
/// - Routing a notification click to an existing or new window
/// - Handing the host a completion future for every dispatched event

pub mod config;
pub mod errors;
pub mod handler;
pub mod host;
pub mod payload;
pub mod worker;

pub use config::ReceiverConfig;
pub use errors::ReceiverError;
pub use handler::{ClickOutcome, NotificationReceiver, PushEventHandler};
pub use host::{NotificationHost, NotificationOptions, WindowClient};
pub use payload::{DisplayedNotification, InboundPush, NotificationClick, PushNotification};
pub use worker::{EventCompletion, EventOutcome, HostEvent, ServiceWorker};
