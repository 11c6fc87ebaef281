//! # custom-domain-provider
//!
//! Outbound clients used by custom domain provisioning.
//!
//! | Client | Trait | Purpose |
//! |--------|-------|---------|
//! | [`HostingApiClient`] | [`HostingPlatformClient`] | Register domains, trigger verification, read SSL status |
//! | [`DohResolver`] | [`DnsResolver`] | Public DNS lookups (diagnostics only) |
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: use rustls.
//! - **`native-tls`**: use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use custom_domain_provider::{HostingApiClient, HostingPlatformClient, HostingSettings};
//!
//! # async fn example() -> custom_domain_provider::Result<()> {
//! let client = HostingApiClient::new(&HostingSettings {
//!     base_url: "https://api.hosting.example/v1".to_string(),
//!     api_token: "token".to_string(),
//!     team_id: None,
//!     timeout_secs: 10,
//! })?;
//!
//! let domain = client.create_domain("go.example.com").await?;
//! let verification = client.verify_domain("go.example.com").await?;
//! println!("{} verified: {}", domain.domain_id, verification.verified);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ProviderError>`](ProviderError). Transient
//! failures (`NetworkError`, `Timeout`, `RateLimited`) are retried for GET
//! requests only; POST requests are sent once.

mod error;
mod hosting;
mod http_client;
mod resolver;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use traits::{DnsResolver, HostingPlatformClient};

pub use types::{
    DnsRecordType, HostingDomain, HostingDomainStatus, HostingSettings, HostingVerification,
    ResolverSettings, SslIssue,
};

pub use hosting::HostingApiClient;
pub use resolver::DohResolver;
