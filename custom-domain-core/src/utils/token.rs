//! Verification token generation

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
const TOKEN_LEN: usize = 32;

/// Random-looking token bound to a domain, 32 lowercase hex characters.
#[must_use]
pub fn generate_verification_token(full_domain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(full_domain.as_bytes());
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    let mut token = hex::encode(hasher.finalize());
    token.truncate(TOKEN_LEN);
    token
}
