use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============ DNS ============

/// DNS record types the provisioning workflow deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsRecordType {
    /// IPv4 address record, used for apex domains.
    A,
    /// Canonical name record, used for subdomains.
    #[serde(rename = "CNAME")]
    Cname,
}

impl DnsRecordType {
    /// Upper-case wire name (`"A"`, `"CNAME"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
        }
    }

    /// Numeric RR type from RFC 1035, as reported in DNS JSON answers.
    #[must_use]
    pub fn rr_type(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Cname => 5,
        }
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DnsRecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "CNAME" => Ok(Self::Cname),
            other => Err(format!("Unsupported record type: {other}")),
        }
    }
}

/// Settings for the DNS-over-HTTPS resolver client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverSettings {
    /// JSON API endpoint, e.g. `https://cloudflare-dns.com/dns-query`.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://cloudflare-dns.com/dns-query".to_string(),
            timeout_secs: 5,
        }
    }
}

impl ResolverSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============ Hosting platform ============

/// Connection settings for the hosting platform domain API.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingSettings {
    /// API base URL without trailing slash, e.g. `https://api.hosting.example/v1`.
    pub base_url: String,
    /// Bearer token.
    pub api_token: String,
    /// Optional team/org scope, sent as the `X-Team-Id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for HostingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostingSettings")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("team_id", &self.team_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HostingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Identity of a domain resource on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingDomain {
    /// Platform-side domain id.
    pub domain_id: String,
    /// Platform-side routing/config id, if the platform assigns one.
    pub config_id: Option<String>,
    /// Fully-qualified domain name.
    pub name: String,
    /// Whether the platform already considers the domain verified.
    pub verified: bool,
}

/// Result of a verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingVerification {
    pub verified: bool,
}

/// A certificate issuance problem reported by the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslIssue {
    pub reason: String,
}

/// Domain and certificate status on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingDomainStatus {
    pub verified: bool,
    pub ssl_issues: Vec<SslIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_wire_names() {
        assert_eq!(DnsRecordType::A.as_str(), "A");
        assert_eq!(DnsRecordType::Cname.to_string(), "CNAME");
        assert_eq!(DnsRecordType::Cname.rr_type(), 5);
        assert_eq!("cname".parse::<DnsRecordType>(), Ok(DnsRecordType::Cname));
        assert!("MX".parse::<DnsRecordType>().is_err());
    }

    #[test]
    fn hosting_settings_debug_redacts_token() {
        let settings = HostingSettings {
            base_url: "https://api.test".into(),
            api_token: "super-secret".into(),
            team_id: None,
            timeout_secs: 10,
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
