#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use spotretro::{
    config::Config,
    management::TokenCache,
    spotify::{self, auth::OAuthController, top::ApiClient},
    types::TokenRecord,
};

pub const GOOD_CODE: &str = "good-code";
pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-refreshed";
/// Accepted by the token endpoint but rejected by the data endpoints.
pub const STALE_ACCESS_TOKEN: &str = "stale";
pub const SERVER_ERROR_TOKEN: &str = "boom";
pub const GARBLED_TOKEN: &str = "garbled";
pub const BAD_RELEASE_DATE_TOKEN: &str = "bad-date";
/// Exchanged like [`GOOD_CODE`] but the response carries no `scope`.
pub const NO_SCOPE_CODE: &str = "no-scope-code";
/// Refreshes successfully into an access token the data endpoints still reject.
pub const REJECTED_REFRESH_TOKEN: &str = "refresh-rejected";

#[derive(Default)]
pub struct FakeState {
    consumed: Mutex<HashSet<String>>,
    token_requests: AtomicUsize,
}

/// In-process stand-in for the Spotify accounts and Web API endpoints.
pub struct FakeSpotify {
    pub base: String,
    state: Arc<FakeState>,
}

impl FakeSpotify {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/top/tracks", get(top_tracks))
            .route("/v1/me/top/artists", get(top_artists))
            .with_state(Arc::clone(&state));

        let base = serve(app).await;
        FakeSpotify {
            base: format!("http://{}", base),
            state,
        }
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn config(&self, cache_path: &Path) -> Config {
        config_at(&self.base, cache_path)
    }

    pub fn oauth(&self, cache_path: &Path) -> Arc<OAuthController> {
        oauth_at(&self.base, cache_path)
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(format!("{}/v1", self.base), reqwest::Client::new())
    }
}

/// Config pointing every Spotify URL at `base`.
pub fn config_at(base: &str, cache_path: &Path) -> Config {
    let values: HashMap<&str, String> = HashMap::from([
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client-id".to_string()),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "client-secret".to_string()),
        (
            "SPOTIFY_API_REDIRECT_URI",
            "http://127.0.0.1:8888/callback".to_string(),
        ),
        ("SPOTIFY_API_AUTH_URL", format!("{}/authorize", base)),
        ("SPOTIFY_API_TOKEN_URL", format!("{}/api/token", base)),
        ("SPOTIFY_API_URL", format!("{}/v1", base)),
        (
            "SPOTRETRO_TOKEN_CACHE",
            cache_path.to_string_lossy().into_owned(),
        ),
        ("SPOTRETRO_HTTP_TIMEOUT_SECS", "5".to_string()),
    ]);
    Config::from_lookup(|key| values.get(key).cloned()).unwrap()
}

pub fn oauth_at(base: &str, cache_path: &Path) -> Arc<OAuthController> {
    let config = config_at(base, cache_path);
    let http = spotify::http_client(&config).unwrap();
    Arc::new(OAuthController::new(
        &config,
        http,
        TokenCache::new(cache_path),
    ))
}

/// Serves `app` on an ephemeral local port and returns its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn token_record(access_token: &str, refresh_token: &str, expires_at: i64) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        expires_at,
        scope: "user-top-read".to_string(),
        token_type: "Bearer".to_string(),
    }
}

fn oauth_error(error: &str, description: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error, "error_description": description })),
    )
        .into_response()
}

async fn token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        return oauth_error("invalid_client", "Invalid client");
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => {
            let code = form.get("code").cloned().unwrap_or_default();
            let fresh = state.consumed.lock().unwrap().insert(code.clone());
            if !fresh || (code != GOOD_CODE && code != NO_SCOPE_CODE) {
                return oauth_error("invalid_grant", "Invalid authorization code");
            }
            let mut body = json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": REFRESH_TOKEN,
                "scope": "user-top-read",
            });
            if code == NO_SCOPE_CODE {
                body.as_object_mut().unwrap().remove("scope");
            }
            Json(body).into_response()
        }
        Some("refresh_token") => {
            let access_token = match form.get("refresh_token").map(String::as_str) {
                Some(REFRESH_TOKEN) => REFRESHED_ACCESS_TOKEN,
                Some(REJECTED_REFRESH_TOKEN) => STALE_ACCESS_TOKEN,
                _ => return oauth_error("invalid_grant", "Invalid refresh token"),
            };
            Json(json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "user-top-read",
            }))
            .into_response()
        }
        _ => oauth_error("unsupported_grant_type", "grant_type must be set"),
    }
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "status": status.as_u16(), "message": message } })),
    )
        .into_response()
}

/// Shared checks of both data endpoints; `Err` carries the response to send.
fn check_request(headers: &HeaderMap, query: &HashMap<String, String>) -> Result<usize, Response> {
    match bearer(headers).as_str() {
        ACCESS_TOKEN | REFRESHED_ACCESS_TOKEN | BAD_RELEASE_DATE_TOKEN => {}
        SERVER_ERROR_TOKEN => {
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error"));
        }
        GARBLED_TOKEN => return Err((StatusCode::OK, "{\"items\": [").into_response()),
        _ => return Err(api_error(StatusCode::UNAUTHORIZED, "The access token expired")),
    }

    let range_ok = matches!(
        query.get("time_range").map(String::as_str),
        Some("short_term" | "medium_term" | "long_term")
    );
    let limit = query.get("limit").and_then(|l| l.parse::<usize>().ok());
    match limit {
        Some(limit) if range_ok => Ok(limit),
        _ => Err(api_error(StatusCode::BAD_REQUEST, "Invalid query")),
    }
}

pub fn tracks_json() -> serde_json::Value {
    json!([
        {
            "name": "Blinding Lights",
            "popularity": 80,
            "album": { "name": "After Hours", "release_date": "2020-03-20" },
            "artists": [{ "name": "The Weeknd" }]
        },
        {
            "name": "Levitating, Remix",
            "popularity": 45,
            "album": { "name": "Club \"Future\" Nostalgia", "release_date": "2020-08" },
            "artists": [{ "name": "Dua Lipa" }, { "name": "DaBaby" }]
        },
        {
            "name": "drivers license",
            "popularity": 99,
            "album": { "name": "SOUR", "release_date": "2021" },
            "artists": [{ "name": "Olivia Rodrigo" }]
        }
    ])
}

async fn top_tracks(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    let limit = match check_request(&headers, &query) {
        Ok(limit) => limit,
        Err(res) => return res,
    };

    let mut items = tracks_json();
    if bearer(&headers) == BAD_RELEASE_DATE_TOKEN {
        items[0]["album"]["release_date"] = json!("unknown");
    }
    let items: Vec<_> = items
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .collect();

    Json(json!({ "items": items, "total": 3, "limit": limit, "offset": 0 })).into_response()
}

async fn top_artists(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    let limit = match check_request(&headers, &query) {
        Ok(limit) => limit,
        Err(res) => return res,
    };

    let items: Vec<_> = vec![
        json!({ "name": "The Weeknd", "genres": ["pop", "rock"], "popularity": 95 }),
        json!({ "name": "Dua Lipa", "genres": ["pop"], "popularity": 90 }),
        json!({ "name": "Unknown Local Act", "popularity": 3 }),
    ]
    .into_iter()
    .take(limit)
    .collect();

    Json(json!({ "items": items })).into_response()
}
