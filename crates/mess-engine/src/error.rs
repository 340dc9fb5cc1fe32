//! Error types for mess-engine operations.
//!
//! Resolution itself is infallible: malformed rule data means the rule never
//! applies. Errors only surface at the input boundaries -- validating a
//! pattern definition, a numeric month index, or an IANA time zone name.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessError {
    /// A pattern definition failed boundary validation (bad name, empty meal
    /// list, weekday outside 1..=7, inverted date window).
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A calendar coordinate was out of range (month index above 11, or a
    /// year beyond the supported calendar).
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The given string is not a recognized IANA time zone identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Convenience alias used throughout mess-engine.
pub type Result<T> = std::result::Result<T, MessError>;
