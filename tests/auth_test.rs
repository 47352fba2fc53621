mod common;

use axum::{Json, Router, routing::post};
use common::{
    ACCESS_TOKEN, FakeSpotify, GOOD_CODE, NO_SCOPE_CODE, REFRESH_TOKEN, REFRESHED_ACCESS_TOKEN,
    token_record,
};
use serde_json::json;
use spotretro::{
    error::AuthError,
    management::TokenCache,
    spotify::auth::is_expired,
    utils,
};
use tempfile::TempDir;

#[test]
fn test_is_expired_boundaries() {
    let token = token_record("a", "r", 1_000);

    assert!(!is_expired(&token, 0, 0));
    assert!(!is_expired(&token, 999, 0));
    assert!(is_expired(&token, 1_000, 0));
    assert!(is_expired(&token, 5_000, 0));
}

#[test]
fn test_is_expired_with_margin() {
    let token = token_record("a", "r", 1_000);

    assert!(!is_expired(&token, 939, 60));
    assert!(is_expired(&token, 940, 60));
}

#[tokio::test]
async fn test_authorization_url_is_deterministic() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let oauth = spotify.oauth(&dir.path().join("token.json"));

    let url = oauth.authorization_url();
    assert_eq!(url, oauth.authorization_url());
    assert!(url.starts_with(&format!("{}/authorize?", spotify.base)));
    assert!(url.contains("client_id=client-id"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
    assert!(url.contains("scope=user-top-read"));
    assert_eq!(spotify.token_requests(), 0);
}

#[tokio::test]
async fn test_exchange_code_persists_token() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("cache/token.json");
    let oauth = spotify.oauth(&cache_path);

    let before = utils::now_timestamp();
    let token = oauth.exchange_code(GOOD_CODE).await.unwrap();

    assert_eq!(token.access_token, ACCESS_TOKEN);
    assert_eq!(token.refresh_token, REFRESH_TOKEN);
    assert_eq!(token.scope, "user-top-read");
    assert!(token.expires_at >= before + 3600);
    assert!(!oauth.is_expired(&token, utils::now_timestamp()));

    let cached = TokenCache::new(&cache_path).load().await.unwrap();
    assert_eq!(cached, Some(token));
}

#[tokio::test]
async fn test_second_exchange_of_same_code_fails() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("token.json");
    let oauth = spotify.oauth(&cache_path);

    let first = oauth.exchange_code(GOOD_CODE).await.unwrap();
    let requests = spotify.token_requests();

    let second = oauth.exchange_code(GOOD_CODE).await;
    assert!(matches!(second, Err(AuthError::CodeAlreadyUsed)));
    assert_eq!(spotify.token_requests(), requests);

    // a fresh controller has no local memory; the provider rejects the code
    let restarted = spotify.oauth(&cache_path);
    let third = restarted.exchange_code(GOOD_CODE).await;
    assert!(matches!(third, Err(AuthError::InvalidGrant(_))));

    let cached = TokenCache::new(&cache_path).load().await.unwrap();
    assert_eq!(cached, Some(first));
}

#[tokio::test]
async fn test_invalid_code_is_rejected_without_touching_cache() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("token.json");
    let oauth = spotify.oauth(&cache_path);

    let result = oauth.exchange_code("not-a-code").await;
    assert!(matches!(result, Err(AuthError::InvalidGrant(_))));
    assert_eq!(TokenCache::new(&cache_path).load().await.unwrap(), None);
}

#[tokio::test]
async fn test_refresh_replaces_cache_and_keeps_refresh_token() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("token.json");
    let oauth = spotify.oauth(&cache_path);

    let expired = token_record(ACCESS_TOKEN, REFRESH_TOKEN, 0);
    TokenCache::new(&cache_path).persist(&expired).await.unwrap();
    assert!(oauth.is_expired(&expired, utils::now_timestamp()));

    let refreshed = oauth.refresh(&expired).await.unwrap();
    assert_eq!(refreshed.access_token, REFRESHED_ACCESS_TOKEN);
    assert_eq!(refreshed.refresh_token, REFRESH_TOKEN);
    assert!(!oauth.is_expired(&refreshed, utils::now_timestamp()));

    let cached = TokenCache::new(&cache_path).load().await.unwrap();
    assert_eq!(cached, Some(refreshed));
}

#[tokio::test]
async fn test_failed_refresh_leaves_cache_unchanged() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("token.json");
    let oauth = spotify.oauth(&cache_path);

    let revoked = token_record(ACCESS_TOKEN, "revoked", 0);
    TokenCache::new(&cache_path).persist(&revoked).await.unwrap();

    let result = oauth.refresh(&revoked).await;
    assert!(matches!(result, Err(AuthError::InvalidGrant(_))));

    let cached = TokenCache::new(&cache_path).load().await.unwrap();
    assert_eq!(cached, Some(revoked));
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_an_auth_error() {
    let dir = TempDir::new().unwrap();
    let spotify = FakeSpotify::start().await;
    let mut config = spotify.config(&dir.path().join("token.json"));
    // nothing listens on the discard port
    config.token_url = "http://127.0.0.1:9/api/token".to_string();
    let oauth = spotretro::spotify::auth::OAuthController::new(
        &config,
        spotretro::spotify::http_client(&config).unwrap(),
        TokenCache::new(&config.token_cache_path),
    );

    let result = oauth.exchange_code(GOOD_CODE).await;
    assert!(matches!(result, Err(AuthError::Http(_))));
    assert_eq!(TokenCache::new(&config.token_cache_path).load().await.unwrap(), None);
}

#[tokio::test]
async fn test_guard_remembers_last_exchanged_code() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let oauth = spotify.oauth(&dir.path().join("token.json"));

    oauth.exchange_code(GOOD_CODE).await.unwrap();
    let result = oauth.exchange_code("not-a-code").await;
    assert!(matches!(result, Err(AuthError::InvalidGrant(_))));

    // a rejected code does not displace the last exchanged one
    let requests = spotify.token_requests();
    let result = oauth.exchange_code(GOOD_CODE).await;
    assert!(matches!(result, Err(AuthError::CodeAlreadyUsed)));
    assert_eq!(spotify.token_requests(), requests);
}

#[tokio::test]
async fn test_exchange_without_scope_keeps_configured_scope() {
    let spotify = FakeSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let oauth = spotify.oauth(&dir.path().join("token.json"));

    let token = oauth.exchange_code(NO_SCOPE_CODE).await.unwrap();
    assert_eq!(token.scope, "user-top-read");
}

#[tokio::test]
async fn test_out_of_range_expires_in_is_a_decode_error() {
    for expires_in in [i64::MAX, 0, -60] {
        let app = Router::new().route(
            "/api/token",
            post(move || async move {
                Json(json!({
                    "access_token": ACCESS_TOKEN,
                    "token_type": "Bearer",
                    "expires_in": expires_in,
                    "refresh_token": REFRESH_TOKEN,
                    "scope": "user-top-read",
                }))
            }),
        );
        let base = format!("http://{}", common::serve(app).await);
        let dir = TempDir::new().unwrap();
        let cache_path = dir.path().join("token.json");
        let oauth = common::oauth_at(&base, &cache_path);

        let result = oauth.exchange_code(GOOD_CODE).await;
        assert!(
            matches!(result, Err(AuthError::Decode(_))),
            "expires_in {expires_in}: {result:?}"
        );

        let result = oauth.refresh(&token_record(ACCESS_TOKEN, REFRESH_TOKEN, 0)).await;
        assert!(matches!(result, Err(AuthError::Decode(_))));
        assert_eq!(TokenCache::new(&cache_path).load().await.unwrap(), None);
    }
}
