//! Bridge from `validator` derive errors to [`CoreError::Validation`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run the derived validators and flatten any failure into one message.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|e| CoreError::Validation(describe(&e)))
}

/// `field: reason` pairs, sorted by field name, joined with `; `.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Reject strings that are empty after trimming.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}
