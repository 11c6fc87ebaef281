//! Custom Domain Core Library
//!
//! Business logic for attaching custom domains to a URL shortener:
//! - Domain records and the per-owner quota (`DomainService`)
//! - Ownership verification against the hosting platform (`VerificationService`)
//! - Certificate status checks (`SslStatusService`)
//! - The one-default-domain-per-owner rule (`DefaultDomainService`)
//! - Admin block/unblock (`ModerationService`)
//!
//! Storage, the link store and notifications are abstracted through traits;
//! the outbound HTTP clients come from `custom-domain-provider`.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{
    DomainRecordRepository, InMemoryDomainRecordRepository, LinkReferenceStore,
    NoopNotificationDispatcher, NotificationDispatcher,
};
