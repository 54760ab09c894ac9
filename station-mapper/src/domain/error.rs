//! Domain error types.
//!
//! Validation failures happen before anything is mutated, so callers can
//! simply re-prompt.

/// A required input field was missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A text field was empty (or only whitespace)
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// No owning station was chosen
    #[error("a station must be selected")]
    NoStation,
}

impl ValidationError {
    /// Reject an empty or whitespace-only field.
    pub fn require(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(ValidationError::EmptyField(field))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::EmptyField("name").to_string(),
            "name must not be empty"
        );
        assert_eq!(
            ValidationError::NoStation.to_string(),
            "a station must be selected"
        );
    }

    #[test]
    fn require_rejects_blank() {
        assert!(ValidationError::require("name", "Central").is_ok());
        assert_eq!(
            ValidationError::require("address", ""),
            Err(ValidationError::EmptyField("address"))
        );
        assert_eq!(
            ValidationError::require("address", "   "),
            Err(ValidationError::EmptyField("address"))
        );
    }
}
