//! Shared HTTP plumbing for the outbound clients.
//!
//! Each client builds its own `RequestBuilder` (URL, auth headers, body) and
//! hands it to [`HttpUtils`] for sending, logging, status triage and reading
//! the body. Response parsing stays with the client, since the hosting API and
//! the DoH resolver use unrelated payload shapes.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Connect timeout shared by all clients (seconds).
const CONNECT_TIMEOUT_SECS: u64 = 5;
/// Upper bound for a server-supplied `Retry-After` (seconds).
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Upper bound for exponential backoff (milliseconds).
const MAX_BACKOFF_MS: u64 = 10_000;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Build a `reqwest::Client` with an explicit overall request timeout.
    pub fn build_client(service: &str, timeout: Duration) -> Result<Client, ProviderError> {
        Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError {
                service: service.to_string(),
                detail: format!("Failed to build HTTP client: {e}"),
            })
    }

    /// Send a request and return `(status_code, body)`.
    ///
    /// Transport failures become `NetworkError`/`Timeout`, HTTP 429 becomes
    /// `RateLimited` and 502-504 become `NetworkError`. Every other status is
    /// returned to the caller for API-specific mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        service: &str,
        method: &str,
        target: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{service}] {method} {target}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{service}] Response Status: {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{service}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                service: service.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body)),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{service}] Upstream unavailable (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                service: service.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                service: service.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("[{service}] Response Body: {}", truncate_for_log(&body));

        Ok((status_code, body))
    }

    /// Parse a JSON body into `T`.
    pub fn parse_json<T>(body: &str, service: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(body).map_err(|e| {
            log::error!("[{service}] JSON parse failed: {e}");
            log::error!("[{service}] Raw response: {}", truncate_for_log(body));
            ProviderError::ParseError {
                service: service.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Like [`execute_request`](Self::execute_request), retrying transient failures.
    ///
    /// Only use for idempotent calls. Retries `NetworkError`, `Timeout` and
    /// `RateLimited` up to `max_retries` times with exponential backoff
    /// (100ms, 200ms, 400ms, ... capped at 10s) or the server's `Retry-After`.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        service: &str,
        method: &str,
        target: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        let mut attempt = 0;
        loop {
            // RequestBuilder is single-use; bodies that cannot be cloned disable retry
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{service}] Cannot clone request, sending without retry");
                return Self::execute_request(request_builder, service, method, target).await;
            };

            match Self::execute_request(req, service, method, target).await {
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    attempt += 1;
                    log::warn!(
                        "[{service}] {method} {target} failed (attempt {attempt}/{max_retries}), retrying in {:.1}s: {e}",
                        delay.as_secs_f32(),
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

/// Delay before the next retry: the server's `Retry-After` when rate limited,
/// exponential backoff otherwise.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS))
    } else {
        backoff_delay(attempt)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(MAX_BACKOFF_MS))
}
