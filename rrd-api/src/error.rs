/// Error types for the rainfall API library
use thiserror::Error;

/// Main error type for rainfall API operations
#[derive(Error, Debug)]
pub enum RainfallError {
    /// The request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection refused, DNS failure, or unreachable host
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Non-success HTTP status code
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Success status but the body lacks the expected records collection
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Configuration loading failed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for RainfallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RainfallError::Timeout
        } else if err.is_decode() {
            RainfallError::MalformedResponse(err.to_string())
        } else {
            RainfallError::NetworkUnreachable(err.to_string())
        }
    }
}

/// Type alias for Results using RainfallError
pub type Result<T> = std::result::Result<T, RainfallError>;
