//! Domain lifecycle events handed to the notification dispatcher

use serde::Serialize;

/// Event emitted after a state change has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A domain record was created
    #[serde(rename_all = "camelCase")]
    Added {
        domain_id: String,
        owner_id: String,
        full_domain: String,
    },
    /// DNS ownership was confirmed by the hosting platform
    #[serde(rename_all = "camelCase")]
    Verified {
        domain_id: String,
        owner_id: String,
        full_domain: String,
    },
}

impl DomainEvent {
    #[must_use]
    pub fn domain_id(&self) -> &str {
        match self {
            Self::Added { domain_id, .. } | Self::Verified { domain_id, .. } => domain_id,
        }
    }
}
