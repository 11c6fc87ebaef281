//! Hosting platform domain API client

mod client;
mod error;
mod http;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::types::HostingSettings;
use crate::utils::log_sanitizer::mask_secret;

/// Header carrying the optional team/org scope.
pub(crate) const TEAM_HEADER: &str = "X-Team-Id";
/// Retries for idempotent GET calls.
pub(crate) const MAX_GET_RETRIES: u32 = 2;

/// Client for the hosting platform's domain endpoints.
pub struct HostingApiClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_token: String,
    pub(crate) team_id: Option<String>,
}

impl HostingApiClient {
    pub fn new(settings: &HostingSettings) -> Result<Self> {
        log::debug!(
            "[hosting] Client for {} (token {}, team {:?})",
            settings.base_url,
            mask_secret(&settings.api_token),
            settings.team_id
        );
        Ok(Self {
            client: HttpUtils::build_client("hosting", settings.timeout())?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
            team_id: settings.team_id.clone().filter(|t| !t.is_empty()),
        })
    }
}
