use axum::{
    Extension,
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::{AppState, render},
    success, warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Resumes the login after Spotify redirects back.
///
/// On success the code is exchanged, the session updated, and the browser sent
/// to `/` so the code no longer shows in the address bar. Any failure renders
/// the login link again.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<AppState>,
) -> Response {
    let mut session = state.session.lock().await;
    let login_url = session.oauth().authorization_url();

    if let Some(error) = params.error {
        warning!("Authorization was denied: {}", error);
        return Html(render::login_page(
            &login_url,
            Some(&format!("Spotify did not authorize the login ({error}).")),
        ))
        .into_response();
    }

    let Some(code) = params.code else {
        return Html(render::login_page(
            &login_url,
            Some("The callback is missing the authorization code."),
        ))
        .into_response();
    };

    match session.complete_login(&code).await {
        Ok(_) => {
            success!("Authentication successful!");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html(render::login_page(&login_url, Some("Login failed. Please try again.")))
                .into_response()
        }
    }
}
