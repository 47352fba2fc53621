use std::sync::Mutex;

use chrono::Utc;
use reqwest::{Client, Response};

use crate::{
    config::Config,
    error::AuthError,
    management::TokenCache,
    types::{TokenErrorResponse, TokenRecord, TokenResponse},
};

/// Returns `true` once `now` has reached the token's expiry, minus `margin_secs`.
///
/// With a zero margin a token is valid for every `now < expires_at` and expired
/// from `expires_at` onwards.
pub fn is_expired(token: &TokenRecord, now: i64, margin_secs: i64) -> bool {
    now >= token.expires_at.saturating_sub(margin_secs)
}

/// Drives the OAuth 2.0 authorization-code handshake with Spotify.
///
/// The controller owns the client credentials and the [`TokenCache`]. Every
/// successful exchange or refresh replaces the cached record; a failed one
/// leaves it exactly as it was.
///
/// # Authentication Flow
///
/// 1. **Authorization URL**: [`authorization_url`](Self::authorization_url)
///    builds the link the user opens in a browser
/// 2. **Callback**: Spotify redirects back with a `code` query parameter
/// 3. **Token Exchange**: [`exchange_code`](Self::exchange_code) trades the
///    code for an access and refresh token pair
/// 4. **Refresh**: once [`is_expired`](Self::is_expired) reports expiry,
///    [`refresh`](Self::refresh) trades the refresh token for a new record
pub struct OAuthController {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
    expiry_margin_secs: i64,
    http: Client,
    cache: TokenCache,
    last_code: Mutex<Option<String>>,
}

impl OAuthController {
    pub fn new(config: &Config, http: Client, cache: TokenCache) -> Self {
        OAuthController {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            expiry_margin_secs: config.expiry_margin_secs,
            http,
            cache,
            last_code: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Builds the URL of Spotify's authorization page. Deterministic and free of
    /// side effects.
    pub fn authorization_url(&self) -> String {
        format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
            auth_url = self.auth_url,
            client_id = urlencoding::encode(&self.client_id),
            redirect_uri = urlencoding::encode(&self.redirect_uri),
            scope = urlencoding::encode(&self.scope),
        )
    }

    pub fn is_expired(&self, token: &TokenRecord, now: i64) -> bool {
        is_expired(token, now, self.expiry_margin_secs)
    }

    /// Exchanges an authorization code for a token record and persists it.
    ///
    /// Repeating the code this controller exchanged last is rejected with
    /// [`AuthError::CodeAlreadyUsed`] before any request is made.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidGrant`] - the code is invalid, expired or already used
    /// - [`AuthError::Rejected`] - any other non-2xx response
    /// - [`AuthError::Http`] - network failure or timeout
    /// - [`AuthError::Decode`] - the response is not a token response, or its
    ///   `expires_in` is not a positive number of seconds
    /// - [`AuthError::Cache`] - the token could not be written
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        if self.is_consumed(code) {
            return Err(AuthError::CodeAlreadyUsed);
        }

        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let body = read_token_response(res).await?;
        self.mark_consumed(code);

        let refresh_token = body
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Decode("missing refresh_token".to_string()))?;

        let token = into_record(body, refresh_token, &self.scope, Utc::now().timestamp())?;
        self.cache.persist(&token).await?;
        Ok(token)
    }

    /// Trades the refresh token of `token` for a new record and replaces the
    /// cached one. Spotify may omit a new refresh token, in which case the old
    /// one is kept.
    pub async fn refresh(&self, token: &TokenRecord) -> Result<TokenRecord, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", token.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let body = read_token_response(res).await?;
        let refresh_token = body
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| token.refresh_token.clone());

        let refreshed = into_record(body, refresh_token, &token.scope, Utc::now().timestamp())?;
        self.cache.persist(&refreshed).await?;
        Ok(refreshed)
    }

    fn is_consumed(&self, code: &str) -> bool {
        self.last_code
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_deref()
            == Some(code)
    }

    fn mark_consumed(&self, code: &str) {
        *self.last_code.lock().unwrap_or_else(|e| e.into_inner()) = Some(code.to_string());
    }
}

fn into_record(
    body: TokenResponse,
    refresh_token: String,
    fallback_scope: &str,
    now: i64,
) -> Result<TokenRecord, AuthError> {
    let expires_at = Some(body.expires_in)
        .filter(|secs| *secs > 0)
        .and_then(|secs| now.checked_add(secs))
        .ok_or_else(|| AuthError::Decode(format!("invalid expires_in {}", body.expires_in)))?;

    let scope = if body.scope.is_empty() {
        fallback_scope.to_string()
    } else {
        body.scope
    };

    Ok(TokenRecord {
        access_token: body.access_token,
        refresh_token,
        expires_at,
        scope,
        token_type: body.token_type,
    })
}

async fn read_token_response(res: Response) -> Result<TokenResponse, AuthError> {
    let status = res.status();
    let text = res.text().await?;

    if status.is_success() {
        return serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()));
    }

    match serde_json::from_str::<TokenErrorResponse>(&text) {
        Ok(err) => {
            let message = err.error_description.unwrap_or_else(|| err.error.clone());
            match err.error.as_str() {
                "invalid_grant" => Err(AuthError::InvalidGrant(message)),
                "access_denied" => Err(AuthError::Denied(message)),
                _ => Err(AuthError::Rejected {
                    status: status.as_u16(),
                    message,
                }),
            }
        }
        Err(_) => Err(AuthError::Rejected {
            status: status.as_u16(),
            message: text,
        }),
    }
}
