//! `HostingPlatformClient` implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::traits::HostingPlatformClient;
use crate::types::{HostingDomain, HostingDomainStatus, HostingVerification};

use super::HostingApiClient;
use super::types::{CreateDomainBody, DomainPayload, StatusPayload, VerifyPayload};

#[async_trait]
impl HostingPlatformClient for HostingApiClient {
    async fn create_domain(&self, full_domain: &str) -> Result<HostingDomain> {
        let body = CreateDomainBody { name: full_domain };
        match self
            .post::<DomainPayload, _>("/domains", &body, full_domain)
            .await
        {
            Ok(payload) => {
                log::info!("[hosting] Registered domain {full_domain} as {}", payload.id);
                Ok(payload.into())
            }
            Err(ProviderError::DomainInUse { .. }) => {
                log::info!("[hosting] Domain {full_domain} already registered, reusing it");
                let path = format!("/domains/{}", urlencoding::encode(full_domain));
                let payload: DomainPayload = self.get(&path, full_domain).await?;
                Ok(payload.into())
            }
            Err(e) => Err(e),
        }
    }

    async fn verify_domain(&self, full_domain: &str) -> Result<HostingVerification> {
        let path = format!("/domains/{}/verify", urlencoding::encode(full_domain));
        let payload: VerifyPayload = self
            .post(&path, &serde_json::json!({}), full_domain)
            .await?;
        log::debug!(
            "[hosting] Verification for {full_domain}: verified={}",
            payload.verified
        );
        Ok(HostingVerification {
            verified: payload.verified,
        })
    }

    async fn get_status(&self, domain_id: &str) -> Result<HostingDomainStatus> {
        let path = format!("/domains/{}/status", urlencoding::encode(domain_id));
        let payload: StatusPayload = self.get(&path, domain_id).await?;
        Ok(payload.into())
    }
}
