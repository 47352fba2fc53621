//! # API Module
//!
//! HTTP endpoints of the dashboard server, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! - [`dashboard`] - `GET /`, the dashboard for `?window=short|medium|long`,
//!   or a login link when there is no usable token
//! - [`login`] - `GET /login`, redirects to Spotify's authorization page
//! - [`callback`] - `GET /callback`, exchanges the authorization code and
//!   redirects back to `/`
//! - [`export_csv`] - `GET /export.csv`, the top tracks as a CSV download
//! - [`health`] - `GET /health`, status and version
//!
//! ## State
//!
//! Handlers share an [`AppState`] through an `Extension` layer. It carries the
//! one [`Session`] of the server behind an async mutex, so each request runs
//! its token check, refresh and fetches as one sequential chain.

mod callback;
mod dashboard;
mod export;
mod health;
mod login;
pub mod render;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{session::Session, spotify::top::ApiClient};

pub use callback::callback;
pub use dashboard::{ARTIST_LIMIT, TRACK_LIMIT, WindowParams, dashboard};
pub use export::export_csv;
pub use health::health;
pub use login::login;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub api: Arc<ApiClient>,
}

impl AppState {
    pub fn new(session: Session, api: ApiClient) -> Self {
        AppState {
            session: Arc::new(Mutex::new(session)),
            api: Arc::new(api),
        }
    }
}
