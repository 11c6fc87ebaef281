//! Domain name normalization and validation

use crate::error::{CoreError, CoreResult};

/// Longest DNS name in presentation form (RFC 1035).
const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Trim whitespace and a single trailing dot.
#[must_use]
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

/// Convert a (possibly internationalized) name to its lowercase ASCII form.
fn to_ascii(name: &str) -> CoreResult<String> {
    idna::domain_to_ascii_strict(name)
        .map_err(|_| CoreError::ValidationError(format!("Invalid domain name: {name}")))
}

/// Normalize and validate an apex domain such as `example.com`.
///
/// Unicode names are stored in punycode (`bücher.example` becomes
/// `xn--bcher-kva.example`).
pub fn normalize_apex(input: &str) -> CoreResult<String> {
    let apex = normalize(input);
    if apex.is_empty() {
        return Err(CoreError::ValidationError(
            "Domain name cannot be empty".to_string(),
        ));
    }
    let apex = to_ascii(&apex)?;
    if apex.len() > MAX_NAME_LEN {
        return Err(CoreError::ValidationError(format!(
            "Domain name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if !apex.contains('.') {
        return Err(CoreError::ValidationError(format!(
            "'{apex}' is not a registrable domain (missing a dot)"
        )));
    }
    for label in apex.split('.') {
        validate_label(label)?;
    }
    Ok(apex)
}

/// Normalize and validate an optional single subdomain label such as `go`.
///
/// Blank input means "no label".
pub fn normalize_label(input: Option<&str>) -> CoreResult<Option<String>> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let label = raw.trim();
    if label.is_empty() {
        return Ok(None);
    }
    if label.contains('.') {
        return Err(CoreError::ValidationError(format!(
            "Subdomain label '{label}' must be a single label without dots"
        )));
    }
    let label = to_ascii(label)?;
    validate_label(&label)?;
    Ok(Some(label))
}

/// Checks on an ASCII (post-IDNA) label.
fn validate_label(label: &str) -> CoreResult<()> {
    if label.is_empty() {
        return Err(CoreError::ValidationError(
            "Domain name contains an empty label".to_string(),
        ));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(CoreError::ValidationError(format!(
            "Label '{label}' exceeds {MAX_LABEL_LEN} characters"
        )));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(CoreError::ValidationError(format!(
            "Label '{label}' may only contain a-z, 0-9 and '-'"
        )));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(CoreError::ValidationError(format!(
            "Label '{label}' cannot start or end with '-'"
        )));
    }
    Ok(())
}

/// Check the composed host name length.
pub fn validate_full_domain(full_domain: &str) -> CoreResult<()> {
    if full_domain.len() > MAX_NAME_LEN {
        return Err(CoreError::ValidationError(format!(
            "Domain name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}
