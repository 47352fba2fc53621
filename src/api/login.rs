use axum::{Extension, response::Redirect};

use crate::api::AppState;

/// Sends the browser to Spotify's authorization page.
pub async fn login(Extension(state): Extension<AppState>) -> Redirect {
    let session = state.session.lock().await;
    Redirect::to(&session.oauth().authorization_url())
}
