use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    api::AppState,
    cli::App,
    error,
    server::start_api_server,
    session::Session,
    success,
    types::TokenRecord,
    warning,
};

/// How long [`auth`] waits for the browser to come back to the callback.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the authorization-code login from the terminal.
///
/// 1. **Server Start**: launches the local server that receives the callback
/// 2. **Browser Launch**: opens the authorization URL in the default browser
/// 3. **User Authorization**: the user grants access on Spotify's page
/// 4. **Callback Handling**: the server exchanges the code, which persists
///    the token to the cache
///
/// Browser launch failures print the URL for manual navigation. A login that
/// does not complete within two minutes terminates with an error.
pub async fn auth(app: &App) {
    let state = AppState::new(Session::new(Arc::clone(&app.oauth)), app.api.clone());

    let server_state = state.clone();
    let addr = app.config.server_addr;
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state, addr).await {
            error!("Failed to start callback server on {}: {}", addr, e);
        }
    });

    let auth_url = app.oauth.authorization_url();
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(Arc::clone(&state.session)).await {
        Some(token) => success!(
            "Authentication successful! Token saved to {} (scope: {})",
            app.oauth.cache().path().display(),
            token.scope
        ),
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the session once per second until the callback stored a token.
async fn wait_for_token(session: Arc<Mutex<Session>>) -> Option<TokenRecord> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        let lock = session.lock().await;
        if let Some(token) = lock.token() {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

pub async fn logout(app: &App) {
    let mut session = Session::new(Arc::clone(&app.oauth));
    match session.logout().await {
        Ok(()) => success!("Removed cached token {}", app.oauth.cache().path().display()),
        Err(e) => error!("Failed to remove cached token: {}", e),
    }
}
