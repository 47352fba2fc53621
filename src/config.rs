//! Configuration management for the dashboard.
//!
//! Configuration values come from environment variables and an optional
//! `.env` file in the local data directory. The configuration system follows
//! a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! The three client secrets have no default; [`Config::from_env`] fails with a
//! [`ConfigError`] when any of them is missing.

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_SCOPE: &str = "user-top-read";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at `<data_local_dir>/spotretro/.env`:
/// - Linux: `~/.local/share/spotretro/.env`
/// - macOS: `~/Library/Application Support/spotretro/.env`
/// - Windows: `%LOCALAPPDATA%/spotretro/.env`
///
/// Variables already present in the process environment are not overridden.
/// A missing file is not an error; the required values may come from the
/// environment alone.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Platform specific directory holding the `.env` file and the token cache.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotretro");
    path
}

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: SocketAddr,
    pub token_cache_path: PathBuf,
    /// Seconds subtracted from `expires_at` when checking expiry.
    pub expiry_margin_secs: i64,
    pub http_timeout: Duration,
}

impl Config {
    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] if a client secret is unset or empty
    /// - [`ConfigError::Invalid`] if an optional value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// This is what [`Config::from_env`] uses; tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let client_id = required("SPOTIFY_API_AUTH_CLIENT_ID")?;
        let client_secret = required("SPOTIFY_API_AUTH_CLIENT_SECRET")?;
        let redirect_uri = required("SPOTIFY_API_REDIRECT_URI")?;

        let server_addr = parse_or(
            "SERVER_ADDRESS",
            optional("SERVER_ADDRESS"),
            DEFAULT_SERVER_ADDRESS,
        )?;
        let expiry_margin_secs: i64 = parse_or(
            "SPOTRETRO_EXPIRY_MARGIN_SECS",
            optional("SPOTRETRO_EXPIRY_MARGIN_SECS"),
            "0",
        )?;
        if expiry_margin_secs < 0 {
            return Err(ConfigError::Invalid {
                var: "SPOTRETRO_EXPIRY_MARGIN_SECS",
                value: expiry_margin_secs.to_string(),
            });
        }
        let timeout_secs: u64 = parse_or(
            "SPOTRETRO_HTTP_TIMEOUT_SECS",
            optional("SPOTRETRO_HTTP_TIMEOUT_SECS"),
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: optional("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: optional("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: optional("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            server_addr,
            token_cache_path: optional("SPOTRETRO_TOKEN_CACHE")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("cache/token.json")),
            expiry_margin_secs,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T: FromStr>(
    var: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value: raw })
}
