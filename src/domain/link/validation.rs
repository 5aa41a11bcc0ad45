//! Link validation

use thiserror::Error;

/// Errors that can occur during link validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinkValidationError {
    #[error("Link ID cannot be empty")]
    EmptyId,

    #[error("Link ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("Link ID can only contain alphanumeric characters and hyphens")]
    InvalidIdCharacters,

    #[error("Link ID cannot start or end with a hyphen")]
    InvalidIdFormat,

    #[error("Link name cannot be empty")]
    EmptyName,

    #[error("Link name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_LINK_ID_LENGTH: usize = 50;
const MAX_LINK_NAME_LENGTH: usize = 150;

/// Validate a link ID
///
/// Link ids cross the trust boundary on every visitor request, so the format
/// check runs before any storage lookup.
pub fn validate_link_id(id: &str) -> Result<(), LinkValidationError> {
    if id.is_empty() {
        return Err(LinkValidationError::EmptyId);
    }

    if id.len() > MAX_LINK_ID_LENGTH {
        return Err(LinkValidationError::IdTooLong(MAX_LINK_ID_LENGTH));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(LinkValidationError::InvalidIdCharacters);
    }

    if id.starts_with('-') || id.ends_with('-') {
        return Err(LinkValidationError::InvalidIdFormat);
    }

    Ok(())
}

/// Validate a link name
pub fn validate_link_name(name: &str) -> Result<(), LinkValidationError> {
    if name.is_empty() {
        return Err(LinkValidationError::EmptyName);
    }

    if name.len() > MAX_LINK_NAME_LENGTH {
        return Err(LinkValidationError::NameTooLong(MAX_LINK_NAME_LENGTH));
    }

    Ok(())
}
