//! Patient identity rules.
//!
//! The affiliation identifier is the natural key shared by the identity
//! registry and the waitlist. It is compared exactly, after trimming.

use crate::error::CoreError;

/// Maximum length of an affiliation identifier, in characters.
pub const MAX_AFFILIATION_ID_CHARS: usize = 8;

/// Trim an affiliation identifier and check its length.
pub fn normalize_affiliation_id(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "affiliation_id is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_AFFILIATION_ID_CHARS {
        return Err(CoreError::Validation(format!(
            "affiliation_id must be at most {MAX_AFFILIATION_ID_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a required free-text field, rejecting blank input.
pub fn require_non_blank(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Message returned when registering an affiliation identifier that is taken.
pub fn duplicate_affiliation_message(affiliation_id: &str, existing_name: &str) -> String {
    format!(
        "Affiliation number {affiliation_id} is already registered to {existing_name}"
    )
}
