//! Admin moderation overlay
//!
//! Blocking is an axis of its own: none of these operations touch
//! `is_verified`, `is_active` or `is_default`.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{Actor, DomainRecord};

/// Moderation service
pub struct ModerationService {
    ctx: Arc<ServiceContext>,
}

impl ModerationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Block a domain. A blank reason is stored as `None`.
    pub async fn block_domain(
        &self,
        actor: &Actor,
        domain_id: &str,
        reason: Option<&str>,
    ) -> CoreResult<DomainRecord> {
        require_admin(actor)?;
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        self.modify(domain_id, |record| {
            record.is_blocked = true;
            record.blocked_reason = reason;
        })
        .await
        .inspect(|record| {
            log::info!(
                "Domain {} blocked by {} ({})",
                record.full_domain,
                actor.user_id,
                record.blocked_reason.as_deref().unwrap_or("no reason given")
            );
        })
    }

    pub async fn unblock_domain(&self, actor: &Actor, domain_id: &str) -> CoreResult<DomainRecord> {
        require_admin(actor)?;
        self.modify(domain_id, |record| {
            record.is_blocked = false;
            record.blocked_reason = None;
        })
        .await
        .inspect(|record| {
            log::info!("Domain {} unblocked by {}", record.full_domain, actor.user_id);
        })
    }

    /// Give an exhausted domain a fresh verification budget.
    ///
    /// The only path that lowers `verification_attempts`; every other write keeps it monotonic.
    pub async fn reset_verification_attempts(
        &self,
        actor: &Actor,
        domain_id: &str,
    ) -> CoreResult<DomainRecord> {
        require_admin(actor)?;
        self.modify(domain_id, |record| {
            record.verification_attempts = 0;
        })
        .await
        .inspect(|record| {
            log::info!(
                "Verification attempts of {} reset by {}",
                record.full_domain,
                actor.user_id
            );
        })
    }

    async fn modify(
        &self,
        domain_id: &str,
        apply: impl FnOnce(&mut DomainRecord),
    ) -> CoreResult<DomainRecord> {
        let _domain = self.ctx.lock_domain(domain_id).await;
        let mut record = self.ctx.load(domain_id).await?;
        apply(&mut record);
        record.touch();
        self.ctx.domain_repository.update(&record).await?;
        Ok(record)
    }
}

fn require_admin(actor: &Actor) -> CoreResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        log::warn!("Non-admin {} attempted a moderation action", actor.user_id);
        Err(CoreError::PermissionDenied(
            "Moderation requires an administrator".to_string(),
        ))
    }
}
