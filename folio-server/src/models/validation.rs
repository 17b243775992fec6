//! Validation error types

use std::fmt;

/// Validation error for domain models and request bodies
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Required field is missing or blank
    Required { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., slug)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value outside an allow-list
    InvalidVariant { field: &'static str, value: String },

    /// Payload exceeds a size limit
    TooLarge { field: &'static str, max_bytes: usize },

    /// Id refers to a row that doesn't exist
    UnknownReference(String),

    /// Request body could not be parsed
    InvalidBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::TooLarge { field, max_bytes } => {
                write!(f, "{} exceeds maximum size of {}MB", field, max_bytes / 1024 / 1024)
            }
            Self::UnknownReference(detail) => write!(f, "unknown reference: {}", detail),
            Self::InvalidBody(detail) => write!(f, "invalid request body: {}", detail),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 256 characters"
        );
    }

    #[test]
    fn required_names_the_field() {
        let err = ValidationError::Required { field: "imageUrl" };
        assert_eq!(err.to_string(), "imageUrl is required");
    }

    #[test]
    fn too_large_reports_megabytes() {
        let err = ValidationError::TooLarge {
            field: "file",
            max_bytes: 5 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "file exceeds maximum size of 5MB");
    }
}
