//! Input checks shared by the bounded contexts.

use crate::error::DomainError;

/// Trims `value` and checks it is non-empty and at most `max_chars` long.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming `field` when the check fails.
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`], but blank input is `None` rather than an error.
///
/// # Errors
///
/// Returns `DomainError::Validation` when the text exceeds `max_chars`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => required_text(field, text, max_chars).map(Some),
    }
}
