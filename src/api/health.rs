use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{api::AppState, session::AuthState, utils};

pub async fn health(Extension(state): Extension<AppState>) -> Json<Value> {
    let session = state.session.lock().await;
    let auth = match session.state(utils::now_timestamp()) {
        AuthState::NoToken => "no_token",
        AuthState::Valid => "valid",
        AuthState::Expired => "expired",
    };

    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "auth": auth,
    }))
}
