//! Error types for Gemini API operations

use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during Gemini API operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// No API keys configured, or every configured key is blacklisted
    #[error("No available API keys")]
    NoKeys,

    /// The retry budget ran out before any key produced a reply
    #[error("All retries failed with available API keys")]
    Exhausted,

    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// The API answered 200 but the reply carried no text
    #[error("Empty reply from completion API")]
    EmptyReply,
}
