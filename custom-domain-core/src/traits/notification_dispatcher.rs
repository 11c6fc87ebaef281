//! Notification collaborator

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::DomainEvent;

/// Fire-and-forget delivery of domain lifecycle events.
///
/// Callers log failures and carry on; an error here never fails the
/// operation that produced the event.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, event: &DomainEvent) -> CoreResult<()>;
}

/// Dispatcher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for NoopNotificationDispatcher {
    async fn dispatch(&self, event: &DomainEvent) -> CoreResult<()> {
        log::debug!("Dropping notification for domain {}", event.domain_id());
        Ok(())
    }
}
