//! Hosting API error mapping

use crate::error::ProviderError;
use crate::traits::{ProviderErrorMapper, RawApiError};

use super::HostingApiClient;

/// Error codes first, HTTP status as fallback.
impl ProviderErrorMapper for HostingApiClient {
    fn service_name(&self) -> &'static str {
        "hosting"
    }

    fn map_error(&self, raw: RawApiError, domain: &str) -> ProviderError {
        let service = self.service_name().to_string();
        match (raw.code.as_deref(), raw.status) {
            (Some("domain_already_in_use" | "domain_already_exists"), _) | (None, 409) => {
                ProviderError::DomainInUse {
                    service,
                    domain: domain.to_string(),
                    raw_message: Some(raw.message),
                }
            }

            (Some("not_found" | "domain_not_found"), _) | (None, 404) => {
                ProviderError::DomainNotFound {
                    service,
                    domain: domain.to_string(),
                    raw_message: Some(raw.message),
                }
            }

            (Some("invalid_token" | "unauthorized"), _) | (_, 401) => {
                ProviderError::InvalidCredentials {
                    service,
                    raw_message: Some(raw.message),
                }
            }

            (Some("forbidden" | "invalid_team"), _) | (_, 403) => {
                ProviderError::PermissionDenied {
                    service,
                    raw_message: Some(raw.message),
                }
            }

            (Some("invalid_domain" | "invalid_name"), _) | (None, 400 | 422) => {
                ProviderError::InvalidParameter {
                    service,
                    param: "name".to_string(),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::HostingSettings;

    fn client() -> HostingApiClient {
        HostingApiClient::new(&HostingSettings {
            base_url: "https://api.test".into(),
            api_token: "token".into(),
            team_id: None,
            timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn already_in_use_by_code() {
        let err = client().map_error(
            RawApiError::with_code(400, "domain_already_in_use", "taken"),
            "go.example.com",
        );
        assert!(matches!(
            err,
            ProviderError::DomainInUse { domain, .. } if domain == "go.example.com"
        ));
    }

    #[test]
    fn already_exists_by_code() {
        let err = client().map_error(
            RawApiError::with_code(409, "domain_already_exists", "exists"),
            "go.example.com",
        );
        assert!(matches!(err, ProviderError::DomainInUse { .. }));
    }

    #[test]
    fn conflict_status_without_code() {
        let err = client().map_error(RawApiError::new(409, "conflict"), "go.example.com");
        assert!(matches!(err, ProviderError::DomainInUse { .. }));
    }

    #[test]
    fn not_found() {
        let err = client().map_error(RawApiError::new(404, "nope"), "dom_1");
        assert!(matches!(
            err,
            ProviderError::DomainNotFound { domain, .. } if domain == "dom_1"
        ));
    }

    #[test]
    fn unauthorized_status_wins_over_unknown_code() {
        let err = client().map_error(
            RawApiError::with_code(401, "whatever", "bad token"),
            "go.example.com",
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn forbidden_team_scope() {
        let err = client().map_error(
            RawApiError::with_code(400, "invalid_team", "no access to team"),
            "go.example.com",
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }

    #[test]
    fn invalid_domain_name() {
        let err = client().map_error(
            RawApiError::with_code(400, "invalid_domain", "bad name"),
            "bad..name",
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { param, .. } if param == "name"
        ));
    }

    #[test]
    fn unknown_code_falls_back() {
        let err = client().map_error(
            RawApiError::with_code(500, "internal", "kaboom"),
            "go.example.com",
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code, raw_message, .. }
                if raw_code.as_deref() == Some("internal") && raw_message == "kaboom"
        ));
    }
}
