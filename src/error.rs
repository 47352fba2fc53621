//! Error types for configuration, authentication, the token cache and the
//! Web API client.
//!
//! The split mirrors how each failure is recovered from: a [`ConfigError`]
//! halts startup, an [`AuthError`] sends the user back to the login link and
//! an [`ApiError`] is shown inline without ending the session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("token cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token cache is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token is available; log in first")]
    LoginRequired,
    #[error("Authorization was denied: {0}")]
    Denied(String),
    #[error("The authorization code or refresh token is invalid: {0}. The user should be reauthorized")]
    InvalidGrant(String),
    #[error("The authorization code has already been exchanged")]
    CodeAlreadyUsed,
    #[error("Spotify rejected the access token even after a refresh")]
    TokenRejected,
    #[error("Token endpoint responded with {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("Token endpoint returned an unexpected body: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The access token is expired or invalid")]
    Unauthorized,
    #[error("limit must be between 1 and {max}, got {got}")]
    InvalidLimit { got: u32, max: u32 },
    #[error("Spotify responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Spotify returned an unexpected body: {0}")]
    Decode(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failure of a data fetch made on behalf of a [`Session`](crate::session::Session).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
