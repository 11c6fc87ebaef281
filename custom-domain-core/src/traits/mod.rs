//! Storage and collaborator abstraction trait definitions

mod domain_record_repository;
mod link_reference_store;
mod notification_dispatcher;

pub use domain_record_repository::{DomainRecordRepository, InMemoryDomainRecordRepository};
pub use link_reference_store::LinkReferenceStore;
pub use notification_dispatcher::{NoopNotificationDispatcher, NotificationDispatcher};
