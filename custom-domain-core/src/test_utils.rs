//! Test helper module
//!
//! Mock collaborators and a factory for a fully wired `ServiceContext`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use custom_domain_provider::{
    DnsRecordType, DnsResolver, HostingDomain, HostingDomainStatus, HostingPlatformClient,
    HostingVerification, ProviderError,
};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{InMemoryDomainRecordRepository, LinkReferenceStore, NotificationDispatcher};
use crate::types::{DomainEvent, DomainPolicy};

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        service: "hosting".to_string(),
        detail: "connection reset".to_string(),
    }
}

// ===== MockHostingClient =====

/// Hosting platform double. Registered domains are remembered, so a second
/// `create_domain` for the same name returns the first identity.
#[derive(Default)]
pub struct MockHostingClient {
    registered: RwLock<HashMap<String, HostingDomain>>,
    create_error: RwLock<Option<ProviderError>>,
    verified: RwLock<bool>,
    verify_error: RwLock<Option<ProviderError>>,
    status: RwLock<Option<HostingDomainStatus>>,
    status_error: RwLock<Option<ProviderError>>,
    pub create_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
}

impl MockHostingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `name` was registered earlier (e.g. by a previous owner).
    pub async fn preregister(&self, name: &str, domain_id: &str) {
        self.registered.write().await.insert(
            name.to_string(),
            HostingDomain {
                domain_id: domain_id.to_string(),
                config_id: None,
                name: name.to_string(),
                verified: false,
            },
        );
    }

    pub async fn set_create_error(&self, err: Option<ProviderError>) {
        *self.create_error.write().await = err;
    }

    pub async fn set_verified(&self, verified: bool) {
        *self.verified.write().await = verified;
    }

    pub async fn set_verify_error(&self, err: Option<ProviderError>) {
        *self.verify_error.write().await = err;
    }

    pub async fn set_status(&self, status: HostingDomainStatus) {
        *self.status.write().await = Some(status);
    }

    pub async fn set_status_error(&self, err: Option<ProviderError>) {
        *self.status_error.write().await = err;
    }
}

#[async_trait]
impl HostingPlatformClient for MockHostingClient {
    async fn create_domain(&self, full_domain: &str) -> custom_domain_provider::Result<HostingDomain> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.create_error.read().await.clone() {
            return Err(err);
        }
        let mut registered = self.registered.write().await;
        let domain = registered
            .entry(full_domain.to_string())
            .or_insert_with(|| HostingDomain {
                domain_id: format!("dom_{full_domain}"),
                config_id: Some(format!("cfg_{full_domain}")),
                name: full_domain.to_string(),
                verified: false,
            });
        Ok(domain.clone())
    }

    async fn verify_domain(
        &self,
        _full_domain: &str,
    ) -> custom_domain_provider::Result<HostingVerification> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.verify_error.read().await.clone() {
            return Err(err);
        }
        Ok(HostingVerification {
            verified: *self.verified.read().await,
        })
    }

    async fn get_status(&self, _domain_id: &str) -> custom_domain_provider::Result<HostingDomainStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.status_error.read().await.clone() {
            return Err(err);
        }
        Ok(self
            .status
            .read()
            .await
            .clone()
            .unwrap_or(HostingDomainStatus {
                verified: false,
                ssl_issues: Vec::new(),
            }))
    }
}

// ===== MockDnsResolver =====

#[derive(Default)]
pub struct MockDnsResolver {
    values: RwLock<Vec<String>>,
    fail: RwLock<bool>,
    queried: RwLock<Vec<DnsRecordType>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_values(&self, values: Vec<&str>) {
        *self.values.write().await = values.into_iter().map(str::to_string).collect();
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Record types asked for, in order.
    pub async fn queried_types(&self) -> Vec<DnsRecordType> {
        self.queried.read().await.clone()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn query_records(
        &self,
        _hostname: &str,
        record_type: DnsRecordType,
    ) -> custom_domain_provider::Result<Vec<String>> {
        self.queried.write().await.push(record_type);
        if *self.fail.read().await {
            return Err(ProviderError::Timeout {
                service: "doh".to_string(),
                detail: "resolver timed out".to_string(),
            });
        }
        Ok(self.values.read().await.clone())
    }
}

// ===== MockLinkStore =====

#[derive(Default)]
pub struct MockLinkStore {
    counts: RwLock<HashMap<String, u64>>,
}

impl MockLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_links(&self, full_domain: &str, count: u64) {
        self.counts
            .write()
            .await
            .insert(full_domain.to_string(), count);
    }
}

#[async_trait]
impl LinkReferenceStore for MockLinkStore {
    async fn count_links_for_domain(&self, full_domain: &str) -> CoreResult<u64> {
        Ok(self
            .counts
            .read()
            .await
            .get(full_domain)
            .copied()
            .unwrap_or(0))
    }
}

// ===== RecordingNotifier =====

#[derive(Default)]
pub struct RecordingNotifier {
    events: RwLock<Vec<DomainEvent>>,
    fail: RwLock<bool>,
    delay: RwLock<Option<Duration>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.read().await.clone()
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Make every dispatch sleep before recording.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Events are delivered on spawned tasks; poll until `count` arrived.
    pub async fn wait_for_events(&self, count: usize) -> Vec<DomainEvent> {
        for _ in 0..200 {
            let events = self.events().await;
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.events().await
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn dispatch(&self, event: &DomainEvent) -> CoreResult<()> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.events.write().await.push(event.clone());
        if *self.fail.read().await {
            return Err(CoreError::ValidationError("mailer offline".to_string()));
        }
        Ok(())
    }
}

// ===== Factory methods =====

/// Handles on every collaborator behind a test `ServiceContext`.
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub repository: Arc<InMemoryDomainRecordRepository>,
    pub hosting: Arc<MockHostingClient>,
    pub resolver: Arc<MockDnsResolver>,
    pub links: Arc<MockLinkStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Create a `ServiceContext` for testing with the default policy
pub fn create_test_context() -> TestHarness {
    create_test_context_with_policy(DomainPolicy::default())
}

pub fn create_test_context_with_policy(policy: DomainPolicy) -> TestHarness {
    let repository = Arc::new(InMemoryDomainRecordRepository::new());
    let hosting = Arc::new(MockHostingClient::new());
    let resolver = Arc::new(MockDnsResolver::new());
    let links = Arc::new(MockLinkStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let ctx = Arc::new(ServiceContext::new(
        repository.clone(),
        hosting.clone(),
        resolver.clone(),
        links.clone(),
        notifier.clone(),
        policy,
    ));

    TestHarness {
        ctx,
        repository,
        hosting,
        resolver,
        links,
        notifier,
    }
}
