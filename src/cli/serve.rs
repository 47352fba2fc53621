use std::sync::Arc;

use crate::{
    api::AppState, cli::App, error, info, server::start_api_server, session::Session, warning,
};

/// Serves the dashboard, resuming from the cached token when there is one.
pub async fn serve(app: &App, open: bool) {
    let session = match Session::restore(Arc::clone(&app.oauth)).await {
        Ok(session) => session,
        Err(e) => {
            warning!("Ignoring unreadable token cache: {}", e);
            Session::new(Arc::clone(&app.oauth))
        }
    };

    let state = AppState::new(session, app.api.clone());
    let addr = app.config.server_addr;
    let url = format!("http://{}/", addr);

    info!("Dashboard listening on {}", url);
    if open && webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to {} manually", url)
    }

    if let Err(e) = start_api_server(state, addr).await {
        error!("Failed to run server on {}: {}", addr, e);
    }
}
