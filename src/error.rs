//! Error types for Agrolytics operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Agrolytics operations.
///
/// Provides detailed context about failures including malformed input
/// records, invalid engine parameters, and payload deserialization issues.
///
/// # Examples
///
/// ```
/// use agrolytics::error::AnalyticsError;
///
/// let err = AnalyticsError::MalformedRecord {
///     context: "churn input".to_string(),
///     detail: "empty _id".to_string(),
/// };
/// assert!(err.to_string().contains("Malformed record"));
/// ```
#[derive(Debug)]
pub enum AnalyticsError {
    /// An input record is unusable even after field defaulting.
    MalformedRecord {
        /// Which boundary rejected the record
        context: String,
        /// What was wrong with it
        detail: String,
    },

    /// Invalid engine parameter value provided.
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::MalformedRecord { context, detail } => {
                write!(f, "Malformed record in {context}: {detail}")
            }
            AnalyticsError::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter: {param} = {value}, expected {constraint}"
                )
            }
            AnalyticsError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            AnalyticsError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalyticsError {}

impl From<&str> for AnalyticsError {
    fn from(msg: &str) -> Self {
        AnalyticsError::Other(msg.to_string())
    }
}

impl From<String> for AnalyticsError {
    fn from(msg: String) -> Self {
        AnalyticsError::Other(msg)
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Serialization(err.to_string())
    }
}

impl AnalyticsError {
    /// Create a malformed-record error with boundary context
    #[must_use]
    pub fn malformed_record(context: &str, detail: &str) -> Self {
        Self::MalformedRecord {
            context: context.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Create an invalid-parameter error
    #[must_use]
    pub fn invalid_parameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for AnalyticsError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<AnalyticsError> for &str {
    fn eq(&self, other: &AnalyticsError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
