//! LLM Error Types
//!
//! Defines error types for LLM operations.

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LLMError {
    /// Map a non-success HTTP status onto the matching variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => LLMError::AuthError(message),
            429 => LLMError::RateLimited(message),
            _ => LLMError::ApiError { status, message },
        }
    }
}

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;
