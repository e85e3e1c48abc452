//! Client error types.

/// Errors that can occur when calling external services.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or a generic fallback.
        message: String,
    },

    /// A response body did not match the expected shape.
    ///
    /// Required fields that are absent are rejected here rather than
    /// silently defaulted.
    #[error("decode error: {0}")]
    Decode(String),

    /// A required configuration value is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The planner produced an itinerary that fails validation.
    #[error("invalid itinerary: {0}")]
    InvalidItinerary(String),

    /// The planner returned no usable text.
    #[error("empty completion from planner")]
    EmptyCompletion,
}
