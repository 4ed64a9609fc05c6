//! Field validation shared by registration, history lookup, and recharge.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ModelError;

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

/// A mobile number is exactly ten ASCII digits.
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

pub fn validate_mobile(mobile: &str) -> Result<(), ModelError> {
    if !is_valid_mobile(mobile) {
        return Err(ModelError::Validation("Invalid mobile number".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("Name is required".into()));
    }
    Ok(())
}

/// Intentionally shallow: the original contract only requires an `@`.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("Valid email is required".into()));
    }
    Ok(())
}
