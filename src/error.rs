//! Error types for condition building

use serde_json::Value;
use thiserror::Error;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, ConditionError>;

/// Usage errors raised while building a condition.
///
/// None of these are recoverable by the builder itself; the operation that
/// raised it has left the builder untouched.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// Value matches none of the accepted fragment shapes
    #[error("Invalid fragment {0}")]
    InvalidFragmentShape(Value),

    /// Bracket mode outside of always/never/auto
    #[error("Unknown bracket mode {0}")]
    InvalidBracketMode(String),

    /// `append_each` called without a transform
    #[error("Transform expected")]
    MissingTransform,
}

impl ConditionError {
    /// Create an invalid bracket mode error from anything printable
    pub fn invalid_bracket_mode(value: impl ToString) -> Self {
        Self::InvalidBracketMode(value.to_string())
    }

    /// Check if this is an invalid fragment shape error
    pub fn is_invalid_fragment(&self) -> bool {
        matches!(self, Self::InvalidFragmentShape(_))
    }

    /// Check if this is an invalid bracket mode error
    pub fn is_invalid_bracket_mode(&self) -> bool {
        matches!(self, Self::InvalidBracketMode(_))
    }

    /// Check if this is a missing transform error
    pub fn is_missing_transform(&self) -> bool {
        matches!(self, Self::MissingTransform)
    }
}
