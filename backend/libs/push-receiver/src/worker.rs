use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tracing::warn;

use crate::errors::ReceiverError;
use crate::handler::{ClickOutcome, PushEventHandler};
use crate::payload::{InboundPush, NotificationClick};

/// Events the host delivers to the worker
#[derive(Debug, Clone)]
pub enum HostEvent {
    Push(InboundPush),
    NotificationClick(NotificationClick),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Displayed,
    Clicked(ClickOutcome),
}

/// Resolves once the handler's work for an event is done.
///
/// The host must keep the worker alive until it resolves (`waitUntil`).
pub type EventCompletion = BoxFuture<'static, Result<EventOutcome, ReceiverError>>;

/// Entry point the host binding calls into; the handler is fixed at registration
#[derive(Clone)]
pub struct ServiceWorker {
    handler: Arc<dyn PushEventHandler>,
}

impl ServiceWorker {
    pub fn register<T>(handler: T) -> Self
    where
        T: PushEventHandler + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn dispatch(&self, event: HostEvent) -> EventCompletion {
        let handler = Arc::clone(&self.handler);
        async move {
            let outcome = match event {
                HostEvent::Push(push) => handler
                    .on_background_message(push)
                    .await
                    .map(|()| EventOutcome::Displayed),
                HostEvent::NotificationClick(click) => handler
                    .on_notification_click(click)
                    .await
                    .map(EventOutcome::Clicked),
            };

            if let Err(e) = &outcome {
                warn!("Push event handler failed: {}", e);
            }
            outcome
        }
        .boxed()
    }

    /// Dispatch a push whose payload is still raw JSON from the host
    pub fn dispatch_push_json(&self, json: &str) -> EventCompletion {
        match InboundPush::from_json(json) {
            Ok(push) => self.dispatch(HostEvent::Push(push)),
            Err(e) => {
                warn!("Dropping unparseable push payload: {}", e);
                future::ready(Err(e)).boxed()
            }
        }
    }
}
