//! DNS-over-HTTPS resolver client (JSON API)

mod types;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::DnsResolver;
use crate::types::{DnsRecordType, ResolverSettings};

use types::DohResponse;

const SERVICE: &str = "doh";
/// RCODE for a successful lookup.
const RCODE_NOERROR: u32 = 0;
/// RCODE for a name that does not exist.
const RCODE_NXDOMAIN: u32 = 3;

/// Resolver speaking the `application/dns-json` dialect served by
/// Cloudflare (`cloudflare-dns.com/dns-query`) and Google (`dns.google/resolve`).
pub struct DohResolver {
    client: Client,
    endpoint: String,
}

impl DohResolver {
    pub fn new(settings: &ResolverSettings) -> Result<Self> {
        Ok(Self {
            client: HttpUtils::build_client(SERVICE, settings.timeout())?,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl DnsResolver for DohResolver {
    async fn query_records(
        &self,
        hostname: &str,
        record_type: DnsRecordType,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}?name={}&type={}",
            self.endpoint,
            urlencoding::encode(hostname),
            record_type.as_str()
        );
        let request = self
            .client
            .get(&url)
            .header("Accept", "application/dns-json");

        let (status, body) = HttpUtils::execute_request(request, SERVICE, "GET", &url).await?;
        if !(200..300).contains(&status) {
            return Err(ProviderError::Unknown {
                service: SERVICE.to_string(),
                raw_code: Some(status.to_string()),
                raw_message: format!("Resolver returned HTTP {status}"),
            });
        }

        let response: DohResponse = HttpUtils::parse_json(&body, SERVICE)?;
        match response.status {
            RCODE_NOERROR => Ok(response.values_of(record_type)),
            RCODE_NXDOMAIN => {
                log::debug!("[{SERVICE}] {hostname} does not exist (NXDOMAIN)");
                Ok(Vec::new())
            }
            rcode => {
                log::debug!("[{SERVICE}] {hostname} {record_type} lookup returned RCODE {rcode}");
                Ok(Vec::new())
            }
        }
    }
}
