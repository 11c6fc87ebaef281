//! Hosting API request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::types::HostingResponse;
use super::{HostingApiClient, MAX_GET_RETRIES, TEAM_HEADER};

impl HostingApiClient {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Accept", "application/json");
        match &self.team_id {
            Some(team) => builder.header(TEAM_HEADER, team),
            None => builder,
        }
    }

    /// Execute a GET request (retried on transient failures).
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, subject: &str) -> Result<T> {
        let url = self.url(path);
        let (status, body) = HttpUtils::execute_request_with_retry(
            self.request(Method::GET, &url),
            self.service_name(),
            "GET",
            &url,
            MAX_GET_RETRIES,
        )
        .await?;
        self.unwrap_envelope(status, &body, subject)
    }

    /// Execute a POST request (never retried).
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        subject: &str,
    ) -> Result<T> {
        let url = self.url(path);
        let (status, response_body) = HttpUtils::execute_request(
            self.request(Method::POST, &url).json(body),
            self.service_name(),
            "POST",
            &url,
        )
        .await?;
        self.unwrap_envelope(status, &response_body, subject)
    }

    /// Turn a raw response into `T` or a mapped `ProviderError`.
    ///
    /// `subject` is the domain name or id the call concerns, used in errors.
    fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        status: u16,
        body: &str,
        subject: &str,
    ) -> Result<T> {
        if !(200..300).contains(&status) {
            // error bodies are usually, but not always, enveloped
            let raw = match serde_json::from_str::<HostingResponse<serde_json::Value>>(body) {
                Ok(envelope) => first_error(status, envelope),
                Err(_) => RawApiError::new(status, truncate_for_log(body)),
            };
            log::warn!(
                "[{}] API error for {subject}: HTTP {status} {:?} {}",
                self.service_name(),
                raw.code,
                raw.message
            );
            return Err(self.map_error(raw, subject));
        }

        let envelope: HostingResponse<T> = HttpUtils::parse_json(body, self.service_name())?;
        if !envelope.success {
            let raw = first_error(status, envelope);
            log::warn!(
                "[{}] API reported failure for {subject}: {:?} {}",
                self.service_name(),
                raw.code,
                raw.message
            );
            return Err(self.map_error(raw, subject));
        }

        envelope
            .result
            .ok_or_else(|| self.parse_error("response is missing the result field"))
    }
}

fn first_error<T>(status: u16, envelope: HostingResponse<T>) -> RawApiError {
    envelope
        .errors
        .and_then(|errors| errors.into_iter().next())
        .map_or_else(
            || RawApiError::new(status, "Unknown error"),
            |e| RawApiError::with_code(status, e.code, e.message),
        )
}
