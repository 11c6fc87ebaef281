//! Provisioning policy values

use serde::{Deserialize, Serialize};

use super::DnsInstruction;
use custom_domain_provider::DnsRecordType;

/// Per-deployment settings that shape new domain records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainPolicy {
    /// Host name subdomains must CNAME to
    pub cname_target: String,
    /// IPv4 address apex domains must point an A record at
    pub apex_a_record: String,
    pub max_domains_per_owner: u32,
    pub max_verification_attempts: u32,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        Self {
            cname_target: "cname.shortlinks.example".to_string(),
            apex_a_record: "76.76.21.21".to_string(),
            max_domains_per_owner: 5,
            max_verification_attempts: 10,
        }
    }
}

impl DomainPolicy {
    /// DNS records the owner must create for a domain.
    ///
    /// The first entry is always the one verification checks against.
    #[must_use]
    pub fn dns_instructions(&self, subdomain_label: Option<&str>) -> Vec<DnsInstruction> {
        match subdomain_label {
            Some(label) => vec![DnsInstruction {
                record_type: DnsRecordType::Cname,
                name: label.to_string(),
                value: self.cname_target.clone(),
                ttl: None,
            }],
            None => vec![
                DnsInstruction {
                    record_type: DnsRecordType::A,
                    name: "@".to_string(),
                    value: self.apex_a_record.clone(),
                    ttl: None,
                },
                DnsInstruction {
                    record_type: DnsRecordType::Cname,
                    name: "www".to_string(),
                    value: self.cname_target.clone(),
                    ttl: None,
                },
            ],
        }
    }
}
