//! Validation error types

use std::fmt;

/// Validation error for customer input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing or blank
    Empty { field: &'static str },

    /// Field exceeds maximum length (in characters)
    TooLong { field: &'static str, max: usize },

    /// Field doesn't match the required shape
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be decoded as JSON
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::MalformedBody { reason } => {
                write!(f, "malformed request body: {}", reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
