//! Hosting API wire types

use serde::{Deserialize, Serialize};

use crate::types::{HostingDomain, HostingDomainStatus, SslIssue};

/// Response envelope shared by every hosting endpoint.
#[derive(Debug, Deserialize)]
pub struct HostingResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<HostingApiError>>,
}

#[derive(Debug, Deserialize)]
pub struct HostingApiError {
    pub code: String,
    pub message: String,
}

/// Body of `POST /domains`.
#[derive(Debug, Serialize)]
pub struct CreateDomainBody<'a> {
    pub name: &'a str,
}

/// Domain resource returned by `POST /domains` and `GET /domains/{name}`.
#[derive(Debug, Deserialize)]
pub struct DomainPayload {
    pub id: String,
    #[serde(default)]
    pub config_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

impl From<DomainPayload> for HostingDomain {
    fn from(p: DomainPayload) -> Self {
        Self {
            domain_id: p.id,
            config_id: p.config_id,
            name: p.name,
            verified: p.verified,
        }
    }
}

/// Result of `POST /domains/{name}/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyPayload {
    pub verified: bool,
}

/// Result of `GET /domains/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub verified: bool,
    #[serde(default)]
    pub ssl_issues: Vec<SslIssuePayload>,
}

#[derive(Debug, Deserialize)]
pub struct SslIssuePayload {
    pub reason: String,
}

impl From<StatusPayload> for HostingDomainStatus {
    fn from(p: StatusPayload) -> Self {
        Self {
            verified: p.verified,
            ssl_issues: p
                .ssl_issues
                .into_iter()
                .map(|i| SslIssue { reason: i.reason })
                .collect(),
        }
    }
}
