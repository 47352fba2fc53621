//! # Spotify Integration Module
//!
//! The integration layer between the dashboard and the Spotify Web API. It
//! handles HTTP communication, the OAuth handshake and error mapping, and
//! exposes plain Rust types to the report and presentation layers.
//!
//! ## Architecture
//!
//! ```text
//! Presentation Layer (HTTP dashboard, CLI)
//!          ↓
//! Session (token state)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     └── Top items (tracks, artists)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - authorization URL, code exchange, expiry check and refresh
//! - [`top`] - `GET /me/top/tracks` and `GET /me/top/artists`
//!
//! ## Error Types
//!
//! - [`AuthError`](crate::error::AuthError) for the token endpoint
//! - [`ApiError`](crate::error::ApiError) for the data endpoints; a 401 is
//!   reported as `ApiError::Unauthorized` so callers can refresh the token
//!
//! No call is retried automatically.

pub mod auth;
pub mod top;

use reqwest::Client;

use crate::config::Config;

/// Builds the HTTP client shared by the OAuth controller and the API client,
/// with the configured request timeout.
pub fn http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
