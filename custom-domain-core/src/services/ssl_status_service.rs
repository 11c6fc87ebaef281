//! On-demand certificate status checks

use std::sync::Arc;

use custom_domain_provider::HostingDomainStatus;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DomainRecord, SslStatus};

/// SSL status poller
pub struct SslStatusService {
    ctx: Arc<ServiceContext>,
}

impl SslStatusService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Refresh `ssl_status` from the hosting platform.
    ///
    /// Requires a verified domain that has been registered with the platform.
    /// Never touches the verification counters. Nothing is persisted when the
    /// platform call fails.
    pub async fn check_ssl(&self, domain_id: &str, owner_id: &str) -> CoreResult<DomainRecord> {
        let _domain = self.ctx.lock_domain(domain_id).await;
        let mut record = self.ctx.load_owned(domain_id, owner_id).await?;

        if !record.is_verified {
            return Err(CoreError::NotEligible(format!(
                "{} is not verified yet",
                record.full_domain
            )));
        }
        let Some(hosting_id) = record.hosting_domain_id.clone() else {
            return Err(CoreError::NotEligible(format!(
                "{} is not registered with the hosting platform",
                record.full_domain
            )));
        };

        let status = self
            .ctx
            .hosting_client
            .get_status(&hosting_id)
            .await
            .map_err(|e| {
                log::warn!("SSL status check for {} failed: {e}", record.full_domain);
                CoreError::from(e)
            })?;

        let (ssl_status, ssl_error) = classify(&status);
        if record.ssl_status == ssl_status && record.ssl_error == ssl_error {
            return Ok(record);
        }

        log::info!(
            "SSL status of {} changed: {} -> {ssl_status}",
            record.full_domain,
            record.ssl_status
        );
        record.ssl_status = ssl_status;
        record.ssl_error = ssl_error;
        record.touch();
        self.ctx.domain_repository.update(&record).await?;
        Ok(record)
    }
}

/// Issues win over the verified flag; the first reported reason is kept.
fn classify(status: &HostingDomainStatus) -> (SslStatus, Option<String>) {
    if let Some(issue) = status.ssl_issues.first() {
        return (SslStatus::Error, Some(issue.reason.clone()));
    }
    if status.verified {
        (SslStatus::Active, None)
    } else {
        (SslStatus::Pending, None)
    }
}
