//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use custom_domain_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Input failed validation (domain names, labels, request fields)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No domain record with this id
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// `full_domain` is already claimed by some owner
    #[error("Domain already exists: {0}")]
    DuplicateDomain(String),

    /// Owner already holds the maximum number of domains
    #[error("Domain quota exceeded: {owner_id} already has {limit} domains")]
    QuotaExceeded { owner_id: String, limit: u32 },

    #[error("Domain already verified: {0}")]
    AlreadyVerified(String),

    /// Verification budget used up; only an admin reset reopens it
    #[error("Verification attempts exhausted ({attempts}/{max})")]
    AttemptsExhausted { attempts: u32, max: u32 },

    /// Hosting platform or resolver failure; the caller may retry
    #[error("External service error: {detail}")]
    ExternalServiceError {
        service: String,
        detail: String,
        /// Verification attempts left, when the failure happened during verification
        remaining_attempts: Option<u32>,
    },

    /// A state precondition does not hold
    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Deletion blocked by links that still use the domain
    #[error("Domain {domain} is referenced by {link_count} link(s)")]
    HasReferencingLinks { domain: String, link_count: u64 },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_)
            | Self::DomainNotFound(_)
            | Self::DuplicateDomain(_)
            | Self::QuotaExceeded { .. }
            | Self::AlreadyVerified(_)
            | Self::AttemptsExhausted { .. }
            | Self::ExternalServiceError { .. }
            | Self::NotEligible(_)
            | Self::PermissionDenied(_)
            | Self::HasReferencingLinks { .. } => true,
            Self::StorageError(_) | Self::SerializationError(_) | Self::ConfigError(_) => false,
        }
    }

    /// Whether the same call may succeed if simply retried later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalServiceError { .. })
    }

    /// Attach the remaining verification budget to an external failure.
    #[must_use]
    pub fn with_remaining_attempts(self, remaining: u32) -> Self {
        match self {
            Self::ExternalServiceError {
                service, detail, ..
            } => Self::ExternalServiceError {
                service,
                detail,
                remaining_attempts: Some(remaining),
            },
            other => other,
        }
    }
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        Self::ExternalServiceError {
            service: err.service().to_string(),
            detail: err.to_string(),
            remaining_attempts: None,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
