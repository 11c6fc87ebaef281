//! Platform-agnostic application bootstrap for custom domain provisioning.
//!
//! Provides `AppConfig` (environment configuration), `AppState` (service
//! container) and `AppStateBuilder` (adapter injection).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use custom_domain_core::error::{CoreError, CoreResult};
use custom_domain_core::services::{
    DefaultDomainService, DomainService, ModerationService, ServiceContext, SslStatusService,
    VerificationService,
};
use custom_domain_core::traits::{
    DomainRecordRepository, LinkReferenceStore, NoopNotificationDispatcher,
    NotificationDispatcher,
};
use custom_domain_core::types::DomainPolicy;
use custom_domain_provider::{
    DnsResolver, DohResolver, HostingApiClient, HostingPlatformClient,
};

pub use config::AppConfig;

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext` they share. Construct it once
/// at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters and the policy)
    pub ctx: Arc<ServiceContext>,
    pub domain_service: DomainService,
    pub verification_service: VerificationService,
    pub ssl_status_service: SslStatusService,
    pub default_domain_service: DefaultDomainService,
    pub moderation_service: ModerationService,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_repository`: where domain records live
/// - `hosting_client`: the hosting platform domain API
/// - `dns_resolver`: public DNS lookups
/// - `link_store`: counts links per domain before deletion
///
/// # Optional
/// - `notifier`: defaults to `NoopNotificationDispatcher`
/// - `policy`: defaults to `DomainPolicy::default()`
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn DomainRecordRepository>>,
    hosting_client: Option<Arc<dyn HostingPlatformClient>>,
    dns_resolver: Option<Arc<dyn DnsResolver>>,
    link_store: Option<Arc<dyn LinkReferenceStore>>,
    notifier: Option<Arc<dyn NotificationDispatcher>>,
    policy: Option<DomainPolicy>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain_repository: None,
            hosting_client: None,
            dns_resolver: None,
            link_store: None,
            notifier: None,
            policy: None,
        }
    }

    /// Start from configuration: builds the outbound clients and sets the policy.
    ///
    /// The repository and link store still have to be supplied.
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let hosting = HostingApiClient::new(&config.hosting)
            .map_err(|e| CoreError::ConfigError(format!("hosting client: {e}")))?;
        let resolver = DohResolver::new(&config.resolver)
            .map_err(|e| CoreError::ConfigError(format!("DNS resolver: {e}")))?;

        Ok(Self::new()
            .hosting_client(Arc::new(hosting))
            .dns_resolver(Arc::new(resolver))
            .policy(config.policy.clone()))
    }

    /// [`from_config`](Self::from_config) plus a `SqliteStore` opened at
    /// `config.database_path`.
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` for client setup failures and
    /// `CoreError::StorageError` if the database cannot be opened or migrated.
    #[cfg(feature = "sqlite-store")]
    pub async fn from_config_with_sqlite(config: &AppConfig) -> CoreResult<Self> {
        let builder = Self::from_config(config)?;
        let store = adapters::SqliteStore::new(&config.database_path).await?;
        Ok(builder.domain_repository(Arc::new(store)))
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn DomainRecordRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn hosting_client(mut self, client: Arc<dyn HostingPlatformClient>) -> Self {
        self.hosting_client = Some(client);
        self
    }

    #[must_use]
    pub fn dns_resolver(mut self, resolver: Arc<dyn DnsResolver>) -> Self {
        self.dns_resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn link_store(mut self, store: Arc<dyn LinkReferenceStore>) -> Self {
        self.link_store = Some(store);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn NotificationDispatcher>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: DomainPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let hosting_client = self.hosting_client.ok_or_else(|| {
            CoreError::ValidationError("hosting_client is required".to_string())
        })?;
        let dns_resolver = self
            .dns_resolver
            .ok_or_else(|| CoreError::ValidationError("dns_resolver is required".to_string()))?;
        let link_store = self
            .link_store
            .ok_or_else(|| CoreError::ValidationError("link_store is required".to_string()))?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(NoopNotificationDispatcher));
        let policy = self.policy.unwrap_or_default();

        log::debug!(
            "Building app state: quota {} per owner, {} verification attempts",
            policy.max_domains_per_owner,
            policy.max_verification_attempts
        );

        let ctx = Arc::new(ServiceContext::new(
            domain_repository,
            hosting_client,
            dns_resolver,
            link_store,
            notifier,
            policy,
        ));

        Ok(AppState {
            domain_service: DomainService::new(Arc::clone(&ctx)),
            verification_service: VerificationService::new(Arc::clone(&ctx)),
            ssl_status_service: SslStatusService::new(Arc::clone(&ctx)),
            default_domain_service: DefaultDomainService::new(Arc::clone(&ctx)),
            moderation_service: ModerationService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
