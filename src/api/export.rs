use axum::{
    Extension,
    extract::Query,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::{AppState, dashboard::TRACK_LIMIT, dashboard::WindowParams, dashboard::login_prompt},
    error::FetchError,
    report, utils, warning,
};

/// Serves the dashboard's top tracks as a CSV attachment, in the order
/// Spotify returned them.
pub async fn export_csv(
    Query(params): Query<WindowParams>,
    Extension(state): Extension<AppState>,
) -> Response {
    let mut session = state.session.lock().await;

    match session
        .top_tracks(&state.api, params.window, TRACK_LIMIT, utils::now_timestamp())
        .await
    {
        Ok(tracks) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", report::CSV_FILE_NAME),
                ),
            ],
            report::to_csv(&tracks),
        )
            .into_response(),
        Err(FetchError::Auth(e)) => {
            (StatusCode::UNAUTHORIZED, login_prompt(&session, &e)).into_response()
        }
        Err(FetchError::Api(e)) => {
            warning!("Failed to export top tracks: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                format!("Could not load your top tracks: {e}"),
            )
                .into_response()
        }
    }
}
