//! Domain record creation, listing and owner updates

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    CreateDomainRequest, DomainEvent, DomainRecord, SslStatus, UpdateDomainRequest,
};
use crate::utils::domain_name::{normalize_apex, normalize_label, validate_full_domain};
use crate::utils::token::generate_verification_token;

/// Domain CRUD service
pub struct DomainService {
    ctx: Arc<ServiceContext>,
}

impl DomainService {
    /// Create a domain service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Claim a custom domain for an owner.
    ///
    /// The first domain of an owner becomes its default. Fails with
    /// `DuplicateDomain` or `QuotaExceeded` before anything is persisted.
    pub async fn create_domain(
        &self,
        owner_id: &str,
        request: CreateDomainRequest,
    ) -> CoreResult<DomainRecord> {
        let apex_domain = normalize_apex(&request.apex_domain)?;
        let subdomain_label = normalize_label(request.subdomain_label.as_deref())?;
        let full_domain =
            DomainRecord::compose_full_domain(&apex_domain, subdomain_label.as_deref());
        validate_full_domain(&full_domain)?;

        let _owner = self.ctx.lock_owner(owner_id).await;
        let repository = &self.ctx.domain_repository;
        let policy = &self.ctx.policy;

        if repository.find_by_full_domain(&full_domain).await?.is_some() {
            return Err(CoreError::DuplicateDomain(full_domain));
        }
        let owned = repository.count_by_owner(owner_id).await?;
        if owned >= u64::from(policy.max_domains_per_owner) {
            return Err(CoreError::QuotaExceeded {
                owner_id: owner_id.to_string(),
                limit: policy.max_domains_per_owner,
            });
        }

        let now = Utc::now();
        let record = DomainRecord {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            verification_token: generate_verification_token(&full_domain),
            dns_records: policy.dns_instructions(subdomain_label.as_deref()),
            apex_domain,
            subdomain_label,
            full_domain,
            is_verified: false,
            verification_attempts: 0,
            max_verification_attempts: policy.max_verification_attempts,
            last_verification_check: None,
            is_active: true,
            is_default: owned == 0,
            is_blocked: false,
            blocked_reason: None,
            ssl_status: SslStatus::Pending,
            ssl_error: None,
            hosting_domain_id: None,
            hosting_config_id: None,
            created_at: now,
            updated_at: now,
        };

        // storage re-checks duplicates and quota atomically
        repository
            .create(&record, policy.max_domains_per_owner)
            .await?;
        log::info!(
            "Domain {} added for owner {owner_id} (id {}, default {})",
            record.full_domain,
            record.id,
            record.is_default
        );

        self.ctx
            .notify(DomainEvent::Added {
                domain_id: record.id.clone(),
                owner_id: record.owner_id.clone(),
                full_domain: record.full_domain.clone(),
            });

        Ok(record)
    }

    /// All domains of an owner, oldest first
    pub async fn list_domains(&self, owner_id: &str) -> CoreResult<Vec<DomainRecord>> {
        self.ctx.domain_repository.list_by_owner(owner_id).await
    }

    pub async fn get_domain(&self, domain_id: &str, owner_id: &str) -> CoreResult<DomainRecord> {
        self.ctx.load_owned(domain_id, owner_id).await
    }

    /// Apply an owner update.
    ///
    /// Deactivating the current default domain is refused; the owner has to
    /// switch or unset the default first.
    pub async fn update_domain(
        &self,
        domain_id: &str,
        owner_id: &str,
        request: UpdateDomainRequest,
    ) -> CoreResult<DomainRecord> {
        let _owner = self.ctx.lock_owner(owner_id).await;
        let _domain = self.ctx.lock_domain(domain_id).await;

        let mut record = self.ctx.load_owned(domain_id, owner_id).await?;

        let Some(is_active) = request.is_active else {
            return Ok(record);
        };
        if is_active == record.is_active {
            return Ok(record);
        }
        if !is_active && record.is_default {
            return Err(CoreError::NotEligible(format!(
                "{} is the default domain; choose another default before deactivating it",
                record.full_domain
            )));
        }

        record.is_active = is_active;
        record.touch();
        self.ctx.domain_repository.update(&record).await?;
        log::info!(
            "Domain {} {}",
            record.full_domain,
            if is_active { "activated" } else { "deactivated" }
        );
        Ok(record)
    }
}
