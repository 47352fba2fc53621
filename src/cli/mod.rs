//! # CLI Module
//!
//! Command implementations behind the `spotretro` binary. Each command takes
//! an [`App`] built once from the [`Config`] and reports progress and failures
//! through the crate's `info!`, `success!`, `warning!` and `error!` macros.
//!
//! ## Commands
//!
//! - [`serve`] - run the dashboard server
//! - [`auth`] - log in from the terminal through the local callback server
//! - [`tracks`], [`genres`], [`years`] - print the dashboard's reports as tables
//! - [`export`] - write the top tracks CSV to a file
//! - [`logout`] - forget the cached token
//!
//! ## Data Flow
//!
//! ```text
//! CLI command
//!     ↓
//! Session (token cache, refresh)
//!     ↓
//! Spotify API client
//!     ↓
//! Report builder → table / CSV
//! ```

mod auth;
mod report;
mod serve;

use std::sync::Arc;

use crate::{
    config::Config,
    management::TokenCache,
    spotify::{self, auth::OAuthController, top::ApiClient},
};

pub use auth::{auth, logout};
pub use report::{export, genres, tracks, years};
pub use serve::serve;

/// Long-lived collaborators shared by every command.
pub struct App {
    pub config: Config,
    pub oauth: Arc<OAuthController>,
    pub api: ApiClient,
}

impl App {
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = spotify::http_client(&config)?;
        let cache = TokenCache::new(config.token_cache_path.clone());
        let oauth = Arc::new(OAuthController::new(&config, http.clone(), cache));
        let api = ApiClient::new(config.api_url.clone(), http);

        Ok(App { config, oauth, api })
    }
}
