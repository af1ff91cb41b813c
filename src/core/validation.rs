//! Input validation for envgroup operations.
//!
//! Validates group names, namespaces and other identifiers callers pass in.

use crate::core::constants::{MAX_NAME_LEN, VERSION_SEPARATOR};
use crate::error::{Result, ValidationError};

/// Validate an environment group name.
///
/// Group names must:
/// - Not be empty
/// - Not contain the version separator `.`
/// - Only use ASCII letters, digits, `-` and `_`
/// - Be at most 253 characters
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_group_name(name: &str) -> Result<()> {
    validate_identifier("group name", name)
}

/// Validate a target namespace.
///
/// Namespaces follow the same character rules as group names.
///
/// # Errors
///
/// Returns `ValidationError::EmptyField` for an empty namespace.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    validate_identifier("namespace", namespace)
}

/// Reject an empty required field.
pub fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field }.into());
    }
    Ok(())
}

fn validate_identifier(field: &'static str, value: &str) -> Result<()> {
    require(field, value)?;

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidName {
            field,
            value: value.to_string(),
            reason: format!("longer than {} characters", MAX_NAME_LEN),
        }
        .into());
    }

    for (i, ch) in value.chars().enumerate() {
        if ch == VERSION_SEPARATOR {
            return Err(ValidationError::InvalidName {
                field,
                value: value.to_string(),
                reason: format!("'{}' is reserved for versioned names", VERSION_SEPARATOR),
            }
            .into());
        }
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(ValidationError::InvalidName {
                field,
                value: value.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, '-' and '_' are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Split a `KEY=VALUE` assignment.
///
/// The value may itself contain `=`. An empty value is allowed here and
/// filtered later, like any other empty entry.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ValidationError::InvalidAssignment(raw.to_string()).into()),
    }
}
