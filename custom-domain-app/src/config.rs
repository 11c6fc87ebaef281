//! Application configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use custom_domain_core::error::{CoreError, CoreResult};
use custom_domain_core::types::DomainPolicy;
use custom_domain_provider::{HostingSettings, ResolverSettings};
use serde::{Deserialize, Serialize};

const DEFAULT_DB_PATH: &str = "custom-domains.db";
const DEFAULT_HOSTING_BASE_URL: &str = "https://api.hosting.example/v1";
const DEFAULT_HOSTING_TIMEOUT_SECS: u64 = 10;

/// Everything needed to wire an `AppState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// `SQLite` database file
    pub database_path: PathBuf,
    pub hosting: HostingSettings,
    pub resolver: ResolverSettings,
    pub policy: DomainPolicy,
}

impl Default for AppConfig {
    /// Defaults for every value; `hosting.api_token` is left empty.
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            hosting: HostingSettings {
                base_url: DEFAULT_HOSTING_BASE_URL.to_string(),
                api_token: String::new(),
                team_id: None,
                timeout_secs: DEFAULT_HOSTING_TIMEOUT_SECS,
            },
            resolver: ResolverSettings::default(),
            policy: DomainPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CUSTOM_DOMAIN_DB_PATH`: database file (default: custom-domains.db)
    /// - `HOSTING_API_BASE_URL`: hosting API base URL
    /// - `HOSTING_API_TOKEN`: hosting API bearer token (**required**)
    /// - `HOSTING_TEAM_ID`: team scope header value (optional)
    /// - `HOSTING_TIMEOUT_SECS`: hosting request timeout (default: 10)
    /// - `DOH_ENDPOINT`: DNS-over-HTTPS JSON endpoint (default: Cloudflare)
    /// - `DOH_TIMEOUT_SECS`: resolver timeout (default: 5)
    /// - `CNAME_TARGET`: CNAME target for subdomains
    /// - `APEX_A_RECORD`: A record value for apex domains
    /// - `MAX_DOMAINS_PER_OWNER`: per-owner quota (default: 5)
    /// - `MAX_VERIFICATION_ATTEMPTS`: verification budget per domain (default: 10)
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_token = var("HOSTING_API_TOKEN").ok_or_else(|| {
            CoreError::ConfigError("HOSTING_API_TOKEN is required".to_string())
        })?;

        Ok(Self {
            database_path: var("CUSTOM_DOMAIN_DB_PATH")
                .map_or(defaults.database_path, PathBuf::from),
            hosting: HostingSettings {
                base_url: var("HOSTING_API_BASE_URL").unwrap_or(defaults.hosting.base_url),
                api_token,
                team_id: var("HOSTING_TEAM_ID"),
                timeout_secs: parse_nonzero(
                    "HOSTING_TIMEOUT_SECS",
                    var("HOSTING_TIMEOUT_SECS"),
                    defaults.hosting.timeout_secs,
                )?,
            },
            resolver: ResolverSettings {
                endpoint: var("DOH_ENDPOINT").unwrap_or(defaults.resolver.endpoint),
                timeout_secs: parse_nonzero(
                    "DOH_TIMEOUT_SECS",
                    var("DOH_TIMEOUT_SECS"),
                    defaults.resolver.timeout_secs,
                )?,
            },
            policy: DomainPolicy {
                cname_target: var("CNAME_TARGET").unwrap_or(defaults.policy.cname_target),
                apex_a_record: var("APEX_A_RECORD").unwrap_or(defaults.policy.apex_a_record),
                max_domains_per_owner: parse_var(
                    "MAX_DOMAINS_PER_OWNER",
                    var("MAX_DOMAINS_PER_OWNER"),
                    defaults.policy.max_domains_per_owner,
                )?,
                max_verification_attempts: parse_nonzero(
                    "MAX_VERIFICATION_ATTEMPTS",
                    var("MAX_VERIFICATION_ATTEMPTS"),
                    defaults.policy.max_verification_attempts,
                )?,
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>, default: T) -> CoreResult<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| CoreError::ConfigError(format!("{key} has an invalid value: {raw}"))),
    }
}

/// A zero timeout or attempt budget would make every call fail.
fn parse_nonzero<T>(key: &str, value: Option<String>, default: T) -> CoreResult<T>
where
    T: FromStr + Default + PartialEq,
{
    let parsed = parse_var(key, value, default)?;
    if parsed == T::default() {
        return Err(CoreError::ConfigError(format!("{key} must be greater than zero")));
    }
    Ok(parsed)
}
