//! Link store collaborator

use async_trait::async_trait;

use crate::error::CoreResult;

/// Read-only view of the shortener's link store.
///
/// Used to refuse deletion of a domain that links are still served from.
#[async_trait]
pub trait LinkReferenceStore: Send + Sync {
    /// Number of links that use `full_domain`
    async fn count_links_for_domain(&self, full_domain: &str) -> CoreResult<u64>;
}
