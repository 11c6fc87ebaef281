//! Type definition module

mod domain_record;
mod event;
mod policy;
mod request;
mod verification;

pub use domain_record::{DnsInstruction, DomainRecord, SslStatus};
pub use event::DomainEvent;
pub use policy::DomainPolicy;
pub use request::{Actor, CreateDomainRequest, UpdateDomainRequest};
pub use verification::{PendingVerification, VerificationOutcome};

#[cfg(test)]
pub(crate) use domain_record::fixtures;

// Re-export public types from the provider library
pub use custom_domain_provider::{DnsRecordType, HostingDomain, HostingDomainStatus, SslIssue};
