//! Business logic service layer

mod default_domain_service;
mod domain_service;
mod moderation_service;
mod ssl_status_service;
mod verification_service;

pub use default_domain_service::DefaultDomainService;
pub use domain_service::DomainService;
pub use moderation_service::ModerationService;
pub use ssl_status_service::SslStatusService;
pub use verification_service::VerificationService;

use std::sync::Arc;

use custom_domain_provider::{DnsResolver, HostingPlatformClient};

use crate::error::{CoreError, CoreResult};
use crate::traits::{DomainRecordRepository, LinkReferenceStore, NotificationDispatcher};
use crate::types::{DomainEvent, DomainPolicy, DomainRecord};
use crate::utils::{KeyedLockGuard, KeyedLocks};

/// Service context - holds all dependencies
///
/// The platform layer creates this context and injects the storage and
/// client implementations. Services share one context, so the per-owner and
/// per-domain locks it holds apply across all of them.
///
/// Lock order is always owner before domain.
pub struct ServiceContext {
    /// Domain record persistence
    pub domain_repository: Arc<dyn DomainRecordRepository>,
    /// Hosting platform domain API
    pub hosting_client: Arc<dyn HostingPlatformClient>,
    /// Public DNS lookups (advisory)
    pub dns_resolver: Arc<dyn DnsResolver>,
    /// Link store, for referential checks on delete
    pub link_store: Arc<dyn LinkReferenceStore>,
    /// Lifecycle notifications
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub policy: DomainPolicy,
    owner_locks: KeyedLocks,
    domain_locks: KeyedLocks,
}

impl ServiceContext {
    /// Create service context
    #[must_use]
    pub fn new(
        domain_repository: Arc<dyn DomainRecordRepository>,
        hosting_client: Arc<dyn HostingPlatformClient>,
        dns_resolver: Arc<dyn DnsResolver>,
        link_store: Arc<dyn LinkReferenceStore>,
        notifier: Arc<dyn NotificationDispatcher>,
        policy: DomainPolicy,
    ) -> Self {
        Self {
            domain_repository,
            hosting_client,
            dns_resolver,
            link_store,
            notifier,
            policy,
            owner_locks: KeyedLocks::new(),
            domain_locks: KeyedLocks::new(),
        }
    }

    /// Serialize work across all records of one owner.
    pub(crate) async fn lock_owner(&self, owner_id: &str) -> KeyedLockGuard {
        self.owner_locks.lock(owner_id).await
    }

    /// Serialize work on one record.
    pub(crate) async fn lock_domain(&self, domain_id: &str) -> KeyedLockGuard {
        self.domain_locks.lock(domain_id).await
    }

    /// Load a record by id.
    pub(crate) async fn load(&self, domain_id: &str) -> CoreResult<DomainRecord> {
        self.domain_repository
            .find_by_id(domain_id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
    }

    /// Load a record and check that `owner_id` owns it.
    pub(crate) async fn load_owned(
        &self,
        domain_id: &str,
        owner_id: &str,
    ) -> CoreResult<DomainRecord> {
        let record = self.load(domain_id).await?;
        if record.owner_id != owner_id {
            return Err(CoreError::PermissionDenied(format!(
                "Domain {domain_id} does not belong to {owner_id}"
            )));
        }
        Ok(record)
    }

    /// Dispatch an event on a background task; failures are logged and swallowed.
    ///
    /// Callers may hold owner or domain locks, so delivery never runs inline.
    pub(crate) fn notify(&self, event: DomainEvent) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.dispatch(&event).await {
                log::warn!(
                    "Notification for domain {} failed: {e}",
                    event.domain_id()
                );
            }
        });
    }
}
