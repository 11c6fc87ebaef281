//! Verification attempt results

use serde::Serialize;

use super::DomainRecord;

/// Non-error result of a verification attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum VerificationOutcome {
    /// Ownership confirmed; the record is now verified with `ssl_status = pending`
    Verified(DomainRecord),
    /// DNS not (yet) in place; the attempt was counted
    Pending(PendingVerification),
}

impl VerificationOutcome {
    #[must_use]
    pub fn record(&self) -> &DomainRecord {
        match self {
            Self::Verified(record) => record,
            Self::Pending(pending) => &pending.record,
        }
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

/// What the owner still has to do, with the budget left to do it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerification {
    pub record: DomainRecord,
    /// Value of the first DNS instruction
    pub expected_cname: String,
    /// Values a public resolver currently returns for the domain (advisory)
    pub observed_values: Vec<String>,
    pub remaining_attempts: u32,
    /// Remediation text for the owner
    pub message: String,
}
