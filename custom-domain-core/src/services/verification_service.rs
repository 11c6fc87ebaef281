//! Domain ownership verification
//!
//! One call is one bounded attempt: the counter is bumped and persisted before
//! any remote work, so neither a failing hosting platform nor a cancelled
//! request can buy extra attempts.

use std::sync::Arc;

use chrono::Utc;
use custom_domain_provider::ProviderError;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    DomainEvent, DomainRecord, PendingVerification, SslStatus, VerificationOutcome,
};

/// Verification orchestrator
pub struct VerificationService {
    ctx: Arc<ServiceContext>,
}

impl VerificationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Run one verification attempt for `domain_id`.
    ///
    /// # Returns
    /// * `Verified` - ownership confirmed
    /// * `Pending` - DNS not in place yet, with remediation details
    ///
    /// # Errors
    /// * `AlreadyVerified`, `AttemptsExhausted` - nothing was counted
    /// * `ExternalServiceError` - the attempt was counted; retry later
    pub async fn verify_domain(
        &self,
        domain_id: &str,
        owner_id: &str,
    ) -> CoreResult<VerificationOutcome> {
        let _domain = self.ctx.lock_domain(domain_id).await;
        let mut record = self.ctx.load_owned(domain_id, owner_id).await?;

        if record.is_verified {
            return Err(CoreError::AlreadyVerified(record.full_domain));
        }
        if record.attempts_exhausted() {
            return Err(CoreError::AttemptsExhausted {
                attempts: record.verification_attempts,
                max: record.max_verification_attempts,
            });
        }

        record.verification_attempts += 1;
        record.last_verification_check = Some(Utc::now());
        record.touch();
        self.ctx.domain_repository.update(&record).await?;

        let remaining = record.remaining_attempts();
        log::debug!(
            "Verifying {} (attempt {}/{})",
            record.full_domain,
            record.verification_attempts,
            record.max_verification_attempts
        );

        self.ensure_hosting_domain(&mut record)
            .await
            .map_err(|e| external_failure(&record, e, remaining))?;

        let verification = self
            .ctx
            .hosting_client
            .verify_domain(&record.full_domain)
            .await
            .map_err(|e| external_failure(&record, e, remaining))?;

        if !verification.verified {
            return Ok(VerificationOutcome::Pending(
                self.pending_details(record, remaining).await,
            ));
        }

        record.is_verified = true;
        record.ssl_status = SslStatus::Pending;
        record.ssl_error = None;
        record.touch();
        self.ctx.domain_repository.update(&record).await?;
        log::info!(
            "Domain {} verified after {} attempt(s)",
            record.full_domain,
            record.verification_attempts
        );

        self.ctx
            .notify(DomainEvent::Verified {
                domain_id: record.id.clone(),
                owner_id: record.owner_id.clone(),
                full_domain: record.full_domain.clone(),
            });

        Ok(VerificationOutcome::Verified(record))
    }

    /// Register the domain with the hosting platform and persist its ids.
    ///
    /// Registration is idempotent on the platform side, so this runs on every
    /// attempt; ids are only written when they change.
    async fn ensure_hosting_domain(&self, record: &mut DomainRecord) -> Result<(), ProviderError> {
        let hosting = self
            .ctx
            .hosting_client
            .create_domain(&record.full_domain)
            .await?;

        let domain_id = Some(hosting.domain_id);
        let config_id = hosting.config_id.or_else(|| record.hosting_config_id.clone());
        if record.hosting_domain_id == domain_id && record.hosting_config_id == config_id {
            return Ok(());
        }

        record.hosting_domain_id = domain_id;
        record.hosting_config_id = config_id;
        record.touch();
        if let Err(e) = self.ctx.domain_repository.update(record).await {
            // the ids are re-learned on the next attempt
            log::error!(
                "Failed to store hosting ids for {}: {e}",
                record.full_domain
            );
        }
        Ok(())
    }

    /// Build the pending result, asking a public resolver what it currently sees.
    async fn pending_details(
        &self,
        record: DomainRecord,
        remaining_attempts: u32,
    ) -> PendingVerification {
        let expected = record.expected_target().unwrap_or_default().to_string();
        let record_type = record
            .dns_records
            .first()
            .map_or(custom_domain_provider::DnsRecordType::Cname, |r| r.record_type);

        let observed_values = match self
            .ctx
            .dns_resolver
            .query_records(&record.full_domain, record_type)
            .await
        {
            Ok(values) => values,
            Err(e) => {
                log::warn!(
                    "DNS lookup for {} failed, continuing without it: {e}",
                    record.full_domain
                );
                Vec::new()
            }
        };

        let found = if observed_values.is_empty() {
            "no record found".to_string()
        } else {
            format!("currently resolves to {}", observed_values.join(", "))
        };
        let message = format!(
            "Add a {record_type} record for {} pointing to {expected} ({found}). \
             {remaining_attempts} verification attempt(s) remaining.",
            record.full_domain
        );
        log::info!(
            "Domain {} not verified yet ({remaining_attempts} attempt(s) left)",
            record.full_domain
        );

        PendingVerification {
            record,
            expected_cname: expected,
            observed_values,
            remaining_attempts,
            message,
        }
    }
}

fn external_failure(record: &DomainRecord, err: ProviderError, remaining: u32) -> CoreError {
    log::warn!(
        "Verification of {} failed at the hosting platform ({remaining} attempt(s) left): {err}",
        record.full_domain
    );
    CoreError::from(err).with_remaining_attempts(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, network_error, TestHarness};
    use crate::traits::DomainRecordRepository;
    use crate::types::fixtures::record;
    use std::sync::atomic::Ordering;

    async fn seed(h: &TestHarness, attempts: u32, max: u32) -> DomainRecord {
        let mut r = record("d1", "alice", "go.example.com");
        r.verification_attempts = attempts;
        r.max_verification_attempts = max;
        h.repository.create(&r, 5).await.unwrap();
        r
    }

    async fn stored(h: &TestHarness) -> DomainRecord {
        h.repository.find_by_id("d1").await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn successful_verification_sets_pending_ssl() {
        let h = create_test_context();
        seed(&h, 0, 10).await;
        h.hosting.set_verified(true).await;
        let svc = VerificationService::new(h.ctx.clone());

        let outcome = svc.verify_domain("d1", "alice").await.unwrap();

        assert!(outcome.is_verified());
        let saved = stored(&h).await;
        assert!(saved.is_verified);
        assert_eq!(saved.ssl_status, SslStatus::Pending);
        assert_eq!(saved.verification_attempts, 1);
        assert!(saved.last_verification_check.is_some());
        assert_eq!(saved.hosting_domain_id.as_deref(), Some("dom_go.example.com"));
        assert_eq!(saved.hosting_config_id.as_deref(), Some("cfg_go.example.com"));
        assert!(matches!(
            h.notifier.wait_for_events(1).await.as_slice(),
            [DomainEvent::Verified { domain_id, .. }] if domain_id == "d1"
        ));
    }

    #[tokio::test]
    async fn not_verified_returns_pending_with_remediation() {
        let h = create_test_context();
        seed(&h, 2, 10).await;
        h.resolver.set_values(vec!["old-host.example.net"]).await;
        let svc = VerificationService::new(h.ctx.clone());

        let outcome = svc.verify_domain("d1", "alice").await.unwrap();

        let VerificationOutcome::Pending(pending) = outcome else {
            panic!("expected pending outcome");
        };
        assert_eq!(pending.expected_cname, "cname.shortlinks.example");
        assert_eq!(pending.remaining_attempts, 7);
        assert_eq!(pending.observed_values, vec!["old-host.example.net"]);
        assert!(pending.message.contains("cname.shortlinks.example"));
        assert!(pending.message.contains("7 verification attempt(s) remaining"));

        let saved = stored(&h).await;
        assert!(!saved.is_verified);
        assert_eq!(saved.verification_attempts, 3);
        assert!(h.notifier.events().await.is_empty());
    }

    #[tokio::test]
    async fn apex_pending_details_use_the_stored_a_record() {
        let h = create_test_context();
        let mut r = record("d1", "alice", "example.com");
        r.dns_records = vec![crate::types::DnsInstruction {
            record_type: custom_domain_provider::DnsRecordType::A,
            name: "@".to_string(),
            value: "203.0.113.7".to_string(),
            ttl: None,
        }];
        h.repository.create(&r, 5).await.unwrap();
        let svc = VerificationService::new(h.ctx.clone());

        let VerificationOutcome::Pending(pending) = svc.verify_domain("d1", "alice").await.unwrap()
        else {
            panic!("expected pending outcome");
        };
        assert_eq!(pending.expected_cname, "203.0.113.7");
        assert!(pending.message.contains("Add a A record"));
        assert!(!pending.message.contains("cname.shortlinks.example"));
        assert_eq!(
            h.resolver.queried_types().await,
            vec![custom_domain_provider::DnsRecordType::A]
        );
    }

    #[tokio::test]
    async fn resolver_failure_is_advisory_only() {
        let h = create_test_context();
        seed(&h, 0, 10).await;
        h.resolver.set_fail(true).await;
        let svc = VerificationService::new(h.ctx.clone());

        let outcome = svc.verify_domain("d1", "alice").await.unwrap();
        let VerificationOutcome::Pending(pending) = outcome else {
            panic!("expected pending outcome");
        };
        assert!(pending.observed_values.is_empty());
        assert!(pending.message.contains("no record found"));
    }

    #[tokio::test]
    async fn exhausted_attempts_do_not_increment() {
        // Scenario C
        let h = create_test_context();
        seed(&h, 10, 10).await;
        let svc = VerificationService::new(h.ctx.clone());

        let err = svc.verify_domain("d1", "alice").await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::AttemptsExhausted {
                attempts: 10,
                max: 10
            }
        ));
        let saved = stored(&h).await;
        assert_eq!(saved.verification_attempts, 10);
        assert!(saved.last_verification_check.is_none());
        assert_eq!(h.hosting.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn last_attempt_then_exhausted() {
        let h = create_test_context();
        seed(&h, 9, 10).await;
        let svc = VerificationService::new(h.ctx.clone());

        let outcome = svc.verify_domain("d1", "alice").await.unwrap();
        assert!(matches!(
            outcome,
            VerificationOutcome::Pending(PendingVerification {
                remaining_attempts: 0,
                ..
            })
        ));
        assert!(matches!(
            svc.verify_domain("d1", "alice").await,
            Err(CoreError::AttemptsExhausted { attempts: 10, .. })
        ));
        assert_eq!(stored(&h).await.verification_attempts, 10);
    }

    #[tokio::test]
    async fn hosting_failure_still_counts_the_attempt() {
        let h = create_test_context();
        seed(&h, 0, 10).await;
        h.hosting.set_verify_error(Some(network_error())).await;
        let svc = VerificationService::new(h.ctx.clone());

        let err = svc.verify_domain("d1", "alice").await.unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(
            err,
            CoreError::ExternalServiceError {
                remaining_attempts: Some(9),
                ..
            }
        ));
        let saved = stored(&h).await;
        assert_eq!(saved.verification_attempts, 1);
        // identity learned before the failure is kept
        assert!(saved.hosting_domain_id.is_some());
    }

    #[tokio::test]
    async fn create_failure_is_external_error() {
        let h = create_test_context();
        seed(&h, 0, 10).await;
        h.hosting.set_create_error(Some(network_error())).await;
        let svc = VerificationService::new(h.ctx.clone());

        let err = svc.verify_domain("d1", "alice").await.unwrap_err();
        assert!(matches!(err, CoreError::ExternalServiceError { .. }));
        assert_eq!(h.hosting.verify_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stored(&h).await.verification_attempts, 1);
    }

    #[tokio::test]
    async fn domain_already_on_platform_is_reused() {
        let h = create_test_context();
        seed(&h, 0, 10).await;
        h.hosting.preregister("go.example.com", "dom_existing").await;
        h.hosting.set_verified(true).await;
        let svc = VerificationService::new(h.ctx.clone());

        let outcome = svc.verify_domain("d1", "alice").await.unwrap();

        assert!(outcome.is_verified());
        assert_eq!(
            outcome.record().hosting_domain_id.as_deref(),
            Some("dom_existing")
        );
    }

    #[tokio::test]
    async fn already_verified_is_rejected_without_counting() {
        let h = create_test_context();
        let mut r = seed(&h, 1, 10).await;
        r.is_verified = true;
        h.repository.update(&r).await.unwrap();
        let svc = VerificationService::new(h.ctx.clone());

        assert!(matches!(
            svc.verify_domain("d1", "alice").await,
            Err(CoreError::AlreadyVerified(_))
        ));
        assert_eq!(stored(&h).await.verification_attempts, 1);
    }

    #[tokio::test]
    async fn foreign_owner_is_denied() {
        let h = create_test_context();
        seed(&h, 0, 10).await;
        let svc = VerificationService::new(h.ctx.clone());

        assert!(matches!(
            svc.verify_domain("d1", "mallory").await,
            Err(CoreError::PermissionDenied(_))
        ));
        assert_eq!(stored(&h).await.verification_attempts, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_attempts_never_exceed_max() {
        let h = create_test_context();
        seed(&h, 0, 3).await;
        let svc = Arc::new(VerificationService::new(h.ctx.clone()));

        let calls = (0..8).map(|_| {
            let svc = Arc::clone(&svc);
            async move { svc.verify_domain("d1", "alice").await }
        });
        let results = futures::future::join_all(calls).await;

        let pending = results.iter().filter(|r| r.is_ok()).count();
        let exhausted = results
            .iter()
            .filter(|r| matches!(r, Err(CoreError::AttemptsExhausted { .. })))
            .count();
        assert_eq!(pending, 3);
        assert_eq!(exhausted, 5);
        assert_eq!(stored(&h).await.verification_attempts, 3);
    }
}
