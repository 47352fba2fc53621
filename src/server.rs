use std::net::SocketAddr;

use axum::{Extension, Router, routing::get};

use crate::api::{self, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::dashboard))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/export.csv", get(api::export_csv))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

/// Binds `addr` and serves the dashboard until the process ends.
pub async fn start_api_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await
}
