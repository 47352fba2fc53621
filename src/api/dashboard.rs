use axum::{
    Extension,
    extract::Query,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    api::{
        AppState,
        render::{self, DashboardView},
    },
    error::{AuthError, FetchError},
    report,
    session::Session,
    types::TimeWindow,
    utils, warning,
};

/// Number of tracks shown on the dashboard.
pub const TRACK_LIMIT: u32 = 10;
/// Number of artists whose genres are tallied.
pub const ARTIST_LIMIT: u32 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    #[serde(default)]
    pub window: TimeWindow,
}

pub async fn dashboard(
    Query(params): Query<WindowParams>,
    Extension(state): Extension<AppState>,
) -> Response {
    let mut session = state.session.lock().await;
    let window = params.window;

    let tracks = match session
        .top_tracks(&state.api, window, TRACK_LIMIT, utils::now_timestamp())
        .await
    {
        Ok(tracks) => Ok(tracks),
        Err(FetchError::Auth(e)) => return login_prompt(&session, &e).into_response(),
        Err(FetchError::Api(e)) => {
            warning!("Failed to fetch top tracks: {}", e);
            Err(format!("Could not load your top tracks: {e}"))
        }
    };

    let genres = match session
        .top_artists(&state.api, window, ARTIST_LIMIT, utils::now_timestamp())
        .await
    {
        Ok(artists) => Ok(report::top_genres(
            &report::genre_tally(&artists),
            report::TOP_GENRES,
        )),
        Err(FetchError::Auth(e)) => return login_prompt(&session, &e).into_response(),
        Err(FetchError::Api(e)) => {
            warning!("Failed to fetch top artists: {}", e);
            Err(format!("Could not load your top artists: {e}"))
        }
    };

    Html(render::dashboard_page(&DashboardView {
        window,
        tracks,
        genres,
    }))
    .into_response()
}

pub(crate) fn login_prompt(session: &Session, e: &AuthError) -> Html<String> {
    let message = match e {
        AuthError::LoginRequired => None,
        _ => {
            warning!("Session needs a new login: {}", e);
            Some("Your Spotify session expired. Please log in again.")
        }
    };
    Html(render::login_page(&session.oauth().authorization_url(), message))
}
