use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    DnsRecordType, HostingDomain, HostingDomainStatus, HostingVerification,
};

/// Raw API error as returned by the remote side (internal use).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code, if the API sends one.
    pub code: Option<String>,
    /// HTTP status of the failed response.
    pub status: u16,
    /// Original error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: None,
            status,
            message: message.into(),
        }
    }

    pub fn with_code(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            status,
            message: message.into(),
        }
    }
}

/// Maps raw API errors onto `ProviderError` (internal use).
pub(crate) trait ProviderErrorMapper {
    /// Service identifier used in every error.
    fn service_name(&self) -> &'static str;

    /// Map a raw API error. `domain` is the name or id the call was about.
    fn map_error(&self, raw: RawApiError, domain: &str) -> ProviderError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            service: self.service_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            service: self.service_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Hosting platform domain API.
///
/// Verification and SSL status checks both go through this one abstraction.
#[async_trait]
pub trait HostingPlatformClient: Send + Sync {
    /// Register `full_domain` with the platform.
    ///
    /// Idempotent: when the platform reports the domain as already in use,
    /// the existing identity is returned instead of an error.
    async fn create_domain(&self, full_domain: &str) -> Result<HostingDomain>;

    /// Ask the platform to (re)check DNS ownership of `full_domain`.
    async fn verify_domain(&self, full_domain: &str) -> Result<HostingVerification>;

    /// Fetch verification and certificate status by platform domain id.
    async fn get_status(&self, domain_id: &str) -> Result<HostingDomainStatus>;
}

/// Public DNS lookup, used for diagnostics only.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Query `hostname` for records of `record_type`, returning their values.
    ///
    /// An empty list means the name has no such record (including NXDOMAIN).
    async fn query_records(&self, hostname: &str, record_type: DnsRecordType)
    -> Result<Vec<String>>;
}
