//! Voice bridge error types.

/// Errors that can occur in the voice session bridge.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// A required secret is missing; the call cannot be started.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The operation is not valid in the current call state.
    #[error("invalid call state: {0}")]
    InvalidState(String),

    /// The external transport failed to carry out a request.
    #[error("transport error: {0}")]
    Transport(String),
}
