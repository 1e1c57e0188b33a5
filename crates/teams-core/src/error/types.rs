//! Core error type for the Teams client

use thiserror::Error;

/// Result type alias for Teams client operations
pub type TeamsResult<T> = Result<T, TeamsError>;

/// Main error type for the Teams client
#[derive(Error, Debug, Clone)]
pub enum TeamsError {
    /// Malformed local input rejected before any network call (PKCE lengths etc.)
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        message: String,
        parameter: Option<String>,
    },

    /// Missing or empty session cookie / refresh token
    #[error("Invalid credential: {message}")]
    InvalidCredential { message: String },

    /// The silent authorize request did not answer with a redirect
    #[error("Silent sign-in failed: authorize endpoint returned HTTP {status} instead of a redirect")]
    SilentAuthFailed { status: u16 },

    /// The identity provider answered with something we cannot interpret
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Refresh-token grant exhausted every permitted attempt
    #[error("Failed to refresh token: {status} {status_text}")]
    TokenRefreshFailed {
        status: u16,
        status_text: String,
        oauth_error: Option<String>,
    },

    /// HTTP transport failures and non-2xx REST responses
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Configuration and profile resolution errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid user input (command arguments)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },
}
