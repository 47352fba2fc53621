//! Explicit session context holding the single token of this instance.
//!
//! A `Session` is created once per server (or CLI invocation) and passed to
//! whatever needs a token. It walks the token state machine:
//!
//! ```text
//! NoToken --complete_login--> Valid --time passes--> Expired --refresh--> Valid
//! ```
//!
//! A failed login or refresh leaves the session in the state it was in.

use std::sync::Arc;

use crate::{
    error::{ApiError, AuthError, CacheError, FetchError},
    spotify::{auth::OAuthController, top::ApiClient},
    types::{ArtistRecord, TimeWindow, TokenRecord, TrackRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoToken,
    Valid,
    Expired,
}

pub struct Session {
    oauth: Arc<OAuthController>,
    token: Option<TokenRecord>,
}

impl Session {
    /// A session without a token, regardless of what the cache holds.
    pub fn new(oauth: Arc<OAuthController>) -> Self {
        Session { oauth, token: None }
    }

    /// A session seeded from the token cache.
    pub async fn restore(oauth: Arc<OAuthController>) -> Result<Self, CacheError> {
        let token = oauth.cache().load().await?;
        Ok(Session { oauth, token })
    }

    pub fn oauth(&self) -> &OAuthController {
        &self.oauth
    }

    pub fn token(&self) -> Option<&TokenRecord> {
        self.token.as_ref()
    }

    pub fn state(&self, now: i64) -> AuthState {
        match &self.token {
            None => AuthState::NoToken,
            Some(t) if self.oauth.is_expired(t, now) => AuthState::Expired,
            Some(_) => AuthState::Valid,
        }
    }

    /// Exchanges `code` and makes the resulting token current.
    pub async fn complete_login(&mut self, code: &str) -> Result<&TokenRecord, AuthError> {
        let token = self.oauth.exchange_code(code).await?;
        let token = self.token.insert(token);
        Ok(&*token)
    }

    /// Returns an access token that is valid at `now`, refreshing an expired one.
    ///
    /// # Errors
    ///
    /// [`AuthError::LoginRequired`] without a token, or whatever the refresh
    /// failed with. Either way the caller should prompt for a new login.
    pub async fn access_token(&mut self, now: i64) -> Result<String, AuthError> {
        match self.state(now) {
            AuthState::NoToken => Err(AuthError::LoginRequired),
            AuthState::Valid => self
                .token
                .as_ref()
                .map(|t| t.access_token.clone())
                .ok_or(AuthError::LoginRequired),
            AuthState::Expired => self.force_refresh().await,
        }
    }

    /// Refreshes the current token whatever its expiry says. Used when Spotify
    /// rejects a token the session still considers valid.
    pub async fn force_refresh(&mut self) -> Result<String, AuthError> {
        let current = self.token.as_ref().ok_or(AuthError::LoginRequired)?;
        let refreshed = self.oauth.refresh(current).await?;
        let access_token = refreshed.access_token.clone();
        self.token = Some(refreshed);
        Ok(access_token)
    }

    /// Fetches top tracks with the session's token.
    ///
    /// If Spotify answers 401 for a token that looked valid, the token is
    /// refreshed once and the request repeated with the new one. A second 401
    /// is an [`AuthError::TokenRejected`].
    pub async fn top_tracks(
        &mut self,
        api: &ApiClient,
        window: TimeWindow,
        limit: u32,
        now: i64,
    ) -> Result<Vec<TrackRecord>, FetchError> {
        let token = self.access_token(now).await?;
        match api.top_tracks(&token, window, limit).await {
            Err(ApiError::Unauthorized) => {
                let token = self.force_refresh().await?;
                retried(api.top_tracks(&token, window, limit).await)
            }
            other => Ok(other?),
        }
    }

    /// Fetches top artists; see [`top_tracks`](Self::top_tracks).
    pub async fn top_artists(
        &mut self,
        api: &ApiClient,
        window: TimeWindow,
        limit: u32,
        now: i64,
    ) -> Result<Vec<ArtistRecord>, FetchError> {
        let token = self.access_token(now).await?;
        match api.top_artists(&token, window, limit).await {
            Err(ApiError::Unauthorized) => {
                let token = self.force_refresh().await?;
                retried(api.top_artists(&token, window, limit).await)
            }
            other => Ok(other?),
        }
    }

    /// Forgets the token and removes it from the cache.
    pub async fn logout(&mut self) -> Result<(), CacheError> {
        self.oauth.cache().clear().await?;
        self.token = None;
        Ok(())
    }
}

/// Result of a request repeated after a forced refresh.
fn retried<T>(result: Result<T, ApiError>) -> Result<T, FetchError> {
    match result {
        Err(ApiError::Unauthorized) => Err(AuthError::TokenRejected.into()),
        other => Ok(other?),
    }
}
