use serde::{Deserialize, Serialize};

/// Unified error type for all outbound service calls.
///
/// Each variant carries a `service` field naming the remote side that produced
/// the error (`"hosting"`, `"doh"`), plus variant-specific context. All variants
/// are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): connectivity issues or 502/503/504
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (connection refused, TLS failure, gateway errors).
    NetworkError {
        /// Service that produced the error.
        service: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Service that produced the error.
        service: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Service that produced the error.
        service: String,
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The bearer credential is missing, invalid or expired.
    InvalidCredentials {
        /// Service that produced the error.
        service: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The credential lacks permission for the requested scope (team/org).
    PermissionDenied {
        /// Service that produced the error.
        service: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The hosting platform does not know the requested domain.
    DomainNotFound {
        /// Service that produced the error.
        service: String,
        /// Domain name or platform id that was not found.
        domain: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The domain is already registered on the hosting platform.
    ///
    /// The hosting client resolves this into the existing identity; callers
    /// normally never observe it.
    DomainInUse {
        /// Service that produced the error.
        service: String,
        /// Domain name that is already registered.
        domain: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (malformed domain name, etc.).
    InvalidParameter {
        /// Service that produced the error.
        service: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse the remote response.
    ParseError {
        /// Service that produced the error.
        service: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// An unrecognized error from the remote API.
    Unknown {
        /// Service that produced the error.
        service: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether this is expected behavior (bad input, unknown domain, revoked token),
    /// used for log level classification.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::DomainNotFound { .. }
                | Self::DomainInUse { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether a retry of the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Name of the remote service that produced the error.
    #[must_use]
    pub fn service(&self) -> &str {
        match self {
            Self::NetworkError { service, .. }
            | Self::Timeout { service, .. }
            | Self::RateLimited { service, .. }
            | Self::InvalidCredentials { service, .. }
            | Self::PermissionDenied { service, .. }
            | Self::DomainNotFound { service, .. }
            | Self::DomainInUse { service, .. }
            | Self::InvalidParameter { service, .. }
            | Self::ParseError { service, .. }
            | Self::Unknown { service, .. } => service,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { service, detail } => {
                write!(f, "[{service}] Network error: {detail}")
            }
            Self::Timeout { service, detail } => {
                write!(f, "[{service}] Request timeout: {detail}")
            }
            Self::RateLimited {
                service,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{service}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{service}] Rate limited")
                }
            }
            Self::InvalidCredentials {
                service,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{service}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                service,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{service}] Permission denied: {msg}")
                } else {
                    write!(f, "[{service}] Permission denied")
                }
            }
            Self::DomainNotFound {
                service, domain, ..
            } => {
                write!(f, "[{service}] Domain '{domain}' not found")
            }
            Self::DomainInUse {
                service, domain, ..
            } => {
                write!(f, "[{service}] Domain '{domain}' is already in use")
            }
            Self::InvalidParameter {
                service,
                param,
                detail,
            } => {
                write!(f, "[{service}] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { service, detail } => {
                write!(f, "[{service}] Parse error: {detail}")
            }
            Self::Unknown {
                service,
                raw_message,
                ..
            } => {
                write!(f, "[{service}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            service: "hosting".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[hosting] Network error: connection refused");
    }

    #[test]
    fn display_rate_limited_with_retry_after() {
        let e = ProviderError::RateLimited {
            service: "hosting".to_string(),
            retry_after: Some(12),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[hosting] Rate limited (retry after 12s)");
    }

    #[test]
    fn display_domain_in_use() {
        let e = ProviderError::DomainInUse {
            service: "hosting".to_string(),
            domain: "go.example.com".to_string(),
            raw_message: None,
        };
        assert_eq!(
            e.to_string(),
            "[hosting] Domain 'go.example.com' is already in use"
        );
    }

    #[test]
    fn transient_errors_are_retryable() {
        let timeout = ProviderError::Timeout {
            service: "doh".into(),
            detail: "elapsed".into(),
        };
        let auth = ProviderError::InvalidCredentials {
            service: "hosting".into(),
            raw_message: None,
        };
        assert!(timeout.is_retryable());
        assert!(!timeout.is_expected());
        assert!(!auth.is_retryable());
        assert!(auth.is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = ProviderError::ParseError {
            service: "doh".into(),
            detail: "eof".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "ParseError");
        assert_eq!(json["service"], "doh");
    }

    #[test]
    fn service_accessor() {
        let e = ProviderError::Unknown {
            service: "hosting".into(),
            raw_code: Some("boom".into()),
            raw_message: "boom".into(),
        };
        assert_eq!(e.service(), "hosting");
    }
}
