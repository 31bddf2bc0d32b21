//! Core error types.

use thiserror::Error;

/// Errors raised while validating domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Rating outside the integer domain 1..=10.
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Review dropped at ingestion because of its rating.
    #[error("Review {review_id} rejected: rating {value} is not an integer in 1..=10")]
    RejectedReview { review_id: String, value: f64 },

    /// Review dropped at ingestion because it carries no numeric rating.
    #[error("Review {review_id} rejected: no numeric rating")]
    MissingRating { review_id: String },

    /// Unknown sort key.
    #[error("Unknown sort key: {0}")]
    UnknownSort(String),

    /// Unknown accommodation type.
    #[error("Unknown accommodation type: {0}")]
    UnknownAccommodationType(String),

    /// Client-side validation failure.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// Check if this error comes from caller input rather than server data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownSort(_)
                | CoreError::UnknownAccommodationType(_)
                | CoreError::Validation(_)
        )
    }
}
