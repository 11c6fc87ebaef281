//! Default domain switching and deletion with promotion
//!
//! Every operation here takes the owner lock before the domain lock, and the
//! repository performs the multi-record writes atomically, so an owner never
//! ends up with two defaults.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::DomainRecord;

/// Default-domain consistency manager
pub struct DefaultDomainService {
    ctx: Arc<ServiceContext>,
}

impl DefaultDomainService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Make `domain_id` the owner's default domain.
    pub async fn set_default(&self, domain_id: &str, owner_id: &str) -> CoreResult<DomainRecord> {
        let _owner = self.ctx.lock_owner(owner_id).await;
        let _domain = self.ctx.lock_domain(domain_id).await;

        let record = self.ctx.load_owned(domain_id, owner_id).await?;
        if let Some(reason) = ineligibility(&record) {
            return Err(CoreError::NotEligible(format!(
                "{} cannot become the default domain: {reason}",
                record.full_domain
            )));
        }

        let updated = self
            .ctx
            .domain_repository
            .set_default(owner_id, domain_id)
            .await?;
        log::info!(
            "Default domain of {owner_id} switched to {}",
            updated.full_domain
        );
        Ok(updated)
    }

    /// Clear the default flag. No other domain is promoted.
    pub async fn unset_default(&self, domain_id: &str, owner_id: &str) -> CoreResult<DomainRecord> {
        let _owner = self.ctx.lock_owner(owner_id).await;
        let _domain = self.ctx.lock_domain(domain_id).await;

        let record = self.ctx.load_owned(domain_id, owner_id).await?;
        if !record.is_default {
            return Err(CoreError::NotEligible(format!(
                "{} is not the default domain",
                record.full_domain
            )));
        }

        let updated = self
            .ctx
            .domain_repository
            .clear_default(owner_id, domain_id)
            .await?;
        log::info!("Owner {owner_id} no longer has a default domain");
        Ok(updated)
    }

    /// Delete a domain nobody links to.
    ///
    /// When the deleted domain was the default, the oldest remaining eligible
    /// domain takes over; having none is not an error.
    pub async fn delete_domain(&self, domain_id: &str, owner_id: &str) -> CoreResult<()> {
        let _owner = self.ctx.lock_owner(owner_id).await;
        let _domain = self.ctx.lock_domain(domain_id).await;

        let record = self.ctx.load_owned(domain_id, owner_id).await?;
        let link_count = self
            .ctx
            .link_store
            .count_links_for_domain(&record.full_domain)
            .await?;
        if link_count > 0 {
            return Err(CoreError::HasReferencingLinks {
                domain: record.full_domain,
                link_count,
            });
        }

        let promoted = self
            .ctx
            .domain_repository
            .delete_and_promote(owner_id, domain_id)
            .await?;
        log::info!("Domain {} deleted", record.full_domain);
        match promoted {
            Some(id) => log::info!("Domain {id} promoted to default for {owner_id}"),
            None if record.is_default => {
                log::info!("No eligible domain left to promote for {owner_id}");
            }
            None => {}
        }
        Ok(())
    }
}

fn ineligibility(record: &DomainRecord) -> Option<&'static str> {
    if !record.is_verified {
        Some("domain is not verified")
    } else if !record.is_active {
        Some("domain is inactive")
    } else if record.is_blocked {
        Some("domain is blocked")
    } else if record.is_default {
        Some("domain is already the default")
    } else {
        None
    }
}
