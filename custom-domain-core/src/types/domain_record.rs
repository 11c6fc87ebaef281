//! Custom domain record type definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use custom_domain_provider::DnsRecordType;

/// Certificate issuance state on the hosting platform.
///
/// Only meaningful once the domain is verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslStatus {
    #[default]
    Pending,
    Active,
    Error,
}

impl SslStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SslStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SslStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "error" => Ok(Self::Error),
            other => Err(format!("Unknown SSL status: {other}")),
        }
    }
}

/// A DNS record the owner has to create at their DNS host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsInstruction {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Record name relative to the apex (`"@"` for the apex itself)
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// A custom domain claimed by an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: String,
    pub owner_id: String,
    /// Lowercase, no trailing dot
    pub apex_domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain_label: Option<String>,
    /// `label.apex` or `apex`; unique across all owners
    pub full_domain: String,
    pub verification_token: String,
    pub dns_records: Vec<DnsInstruction>,

    pub is_verified: bool,
    pub verification_attempts: u32,
    pub max_verification_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verification_check: Option<DateTime<Utc>>,

    pub is_active: bool,
    pub is_default: bool,

    pub is_blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,

    pub ssl_status: SslStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_domain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_config_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Join an optional label and an apex into the served host name.
    #[must_use]
    pub fn compose_full_domain(apex_domain: &str, subdomain_label: Option<&str>) -> String {
        match subdomain_label {
            Some(label) => format!("{label}.{apex_domain}"),
            None => apex_domain.to_string(),
        }
    }

    /// Whether the record may become the owner's default domain.
    #[must_use]
    pub fn is_default_eligible(&self) -> bool {
        self.is_verified && self.is_active && !self.is_blocked
    }

    /// Whether links on this domain may be served. A block always wins.
    #[must_use]
    pub fn is_servable(&self) -> bool {
        !self.is_blocked && self.is_verified && self.is_active
    }

    #[must_use]
    pub fn remaining_attempts(&self) -> u32 {
        self.max_verification_attempts
            .saturating_sub(self.verification_attempts)
    }

    #[must_use]
    pub fn attempts_exhausted(&self) -> bool {
        self.verification_attempts >= self.max_verification_attempts
    }

    /// Value the owner's first DNS record must point at.
    #[must_use]
    pub fn expected_target(&self) -> Option<&str> {
        self.dns_records.first().map(|r| r.value.as_str())
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn full_domain_composition() {
        assert_eq!(
            DomainRecord::compose_full_domain("example.com", Some("go")),
            "go.example.com"
        );
        assert_eq!(
            DomainRecord::compose_full_domain("example.com", None),
            "example.com"
        );
    }

    #[test]
    fn blocked_record_is_never_servable() {
        let mut r = record("d1", "o1", "go.example.com");
        r.is_verified = true;
        assert!(r.is_servable());
        assert!(r.is_default_eligible());

        r.is_blocked = true;
        assert!(!r.is_servable());
        assert!(!r.is_default_eligible());
    }

    #[test]
    fn remaining_attempts_saturates() {
        let mut r = record("d1", "o1", "go.example.com");
        r.verification_attempts = 12;
        assert_eq!(r.remaining_attempts(), 0);
        assert!(r.attempts_exhausted());
    }

    #[test]
    fn serializes_camel_case_with_lowercase_ssl_status() {
        let r = record("d1", "o1", "go.example.com");
        let json = serde_json::to_value(&r).unwrap_or_default();
        assert_eq!(json["fullDomain"], "go.example.com");
        assert_eq!(json["sslStatus"], "pending");
        assert_eq!(json["dnsRecords"][0]["type"], "CNAME");
        assert!(json.get("blockedReason").is_none());
    }

    #[test]
    fn ssl_status_parses_wire_names() {
        assert_eq!("active".parse::<SslStatus>(), Ok(SslStatus::Active));
        assert!("ACTIVE".parse::<SslStatus>().is_err());
    }
}
