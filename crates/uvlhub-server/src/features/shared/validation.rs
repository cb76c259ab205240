//! Shared validation utilities
//!
//! Common validation functions for input data across commands and queries.

use thiserror::Error;

/// Errors that can occur during title/name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be between 1 and {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },
}

/// Errors that can occur during rating validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateValidationError {
    #[error("Rate must be between 1 and 5")]
    OutOfRange,
}

/// Errors that can occur during ORCID validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrcidValidationError {
    #[error("ORCID must have the format 0000-0000-0000-0000")]
    InvalidFormat,
}

/// Validate a required text field
///
/// # Rules
/// - Must not be empty (after trimming whitespace)
/// - Must not exceed max_length characters
pub fn validate_text(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), TextValidationError> {
    if value.trim().is_empty() {
        return Err(TextValidationError::Required { field });
    }

    if value.len() > max_length {
        return Err(TextValidationError::TooLong { field, max_length });
    }

    Ok(())
}

/// Validate a dataset rating value (1 through 5 inclusive)
pub fn validate_rate(rate: i32) -> Result<(), RateValidationError> {
    if !(1..=5).contains(&rate) {
        return Err(RateValidationError::OutOfRange);
    }
    Ok(())
}

/// Validate an ORCID identifier: four groups of four digits separated by
/// hyphens (the final character may be `X`).
pub fn validate_orcid(orcid: &str) -> Result<(), OrcidValidationError> {
    let groups: Vec<&str> = orcid.split('-').collect();
    if groups.len() != 4 {
        return Err(OrcidValidationError::InvalidFormat);
    }
    for (i, group) in groups.iter().enumerate() {
        if group.len() != 4 {
            return Err(OrcidValidationError::InvalidFormat);
        }
        let valid = group.chars().enumerate().all(|(j, c)| {
            c.is_ascii_digit() || (i == 3 && j == 3 && c == 'X')
        });
        if !valid {
            return Err(OrcidValidationError::InvalidFormat);
        }
    }
    Ok(())
}

/// Validate that an uploaded filename is a UVL file.
pub fn is_uvl_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".uvl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Sample Dataset", "title", 120).is_ok());
        assert_eq!(
            validate_text("   ", "title", 120),
            Err(TextValidationError::Required { field: "title" })
        );
        assert_eq!(
            validate_text(&"x".repeat(121), "title", 120),
            Err(TextValidationError::TooLong {
                field: "title",
                max_length: 120
            })
        );
    }

    #[test]
    fn test_validate_rate_bounds() {
        assert!(validate_rate(1).is_ok());
        assert!(validate_rate(5).is_ok());
        assert_eq!(validate_rate(0), Err(RateValidationError::OutOfRange));
        assert_eq!(validate_rate(6), Err(RateValidationError::OutOfRange));
    }

    #[test]
    fn test_validate_orcid() {
        assert!(validate_orcid("0000-0002-1825-0097").is_ok());
        assert!(validate_orcid("0000-0002-1825-009X").is_ok());
        assert!(validate_orcid("0000-0002-1825").is_err());
        assert!(validate_orcid("0000-0002-1825-00971").is_err());
        assert!(validate_orcid("abcd-0002-1825-0097").is_err());
    }

    #[test]
    fn test_is_uvl_filename() {
        assert!(is_uvl_filename("model.uvl"));
        assert!(is_uvl_filename("MODEL.UVL"));
        assert!(!is_uvl_filename("model.txt"));
        assert!(!is_uvl_filename("uvl"));
    }
}
