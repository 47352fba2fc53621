use std::{path::Path, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::App,
    error,
    error::FetchError,
    info, report,
    session::Session,
    success,
    types::{ArtistRecord, GenreTableRow, TimeWindow, TrackRecord},
    utils,
};

pub async fn tracks(app: &App, window: TimeWindow, limit: u32) {
    let tracks = fetch_tracks(app, window, limit).await;
    if tracks.is_empty() {
        info!("No top tracks for {}.", window.label().to_lowercase());
        return;
    }

    println!("{}", Table::new(report::popularity_ranking(&tracks)));
}

pub async fn genres(app: &App, window: TimeWindow, limit: u32) {
    let artists = fetch_artists(app, window, limit).await;
    let shares = report::top_genres(&report::genre_tally(&artists), report::TOP_GENRES);
    if shares.is_empty() {
        info!("Your top artists have no genres listed.");
        return;
    }

    let rows: Vec<GenreTableRow> = shares
        .into_iter()
        .map(|g| GenreTableRow {
            genre: g.genre,
            count: g.count,
            share: format!("{:.1}%", g.share * 100.0),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn years(app: &App, window: TimeWindow, limit: u32) {
    let tracks = fetch_tracks(app, window, limit).await;
    let buckets = report::year_histogram(&tracks);
    if buckets.is_empty() {
        info!("No top tracks for {}.", window.label().to_lowercase());
        return;
    }

    println!("{}", Table::new(buckets));
}

pub async fn export(app: &App, window: TimeWindow, limit: u32, output: &Path) {
    let tracks = fetch_tracks(app, window, limit).await;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = async_fs::create_dir_all(parent).await {
            error!("Cannot create {}: {}", parent.display(), e);
        }
    }

    match async_fs::write(output, report::to_csv(&tracks)).await {
        Ok(()) => success!("Wrote {} tracks to {}", tracks.len(), output.display()),
        Err(e) => error!("Cannot write {}: {}", output.display(), e),
    }
}

async fn restore_session(app: &App) -> Session {
    match Session::restore(Arc::clone(&app.oauth)).await {
        Ok(session) => session,
        Err(e) => error!("Failed to load token. Please run spotretro auth\n Error: {}", e),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

async fn fetch_tracks(app: &App, window: TimeWindow, limit: u32) -> Vec<TrackRecord> {
    let mut session = restore_session(app).await;

    let pb = spinner("Fetching top tracks...");
    let result = session
        .top_tracks(&app.api, window, limit, utils::now_timestamp())
        .await;
    pb.finish_and_clear();

    unwrap_fetch(result)
}

async fn fetch_artists(app: &App, window: TimeWindow, limit: u32) -> Vec<ArtistRecord> {
    let mut session = restore_session(app).await;

    let pb = spinner("Fetching top artists...");
    let result = session
        .top_artists(&app.api, window, limit, utils::now_timestamp())
        .await;
    pb.finish_and_clear();

    unwrap_fetch(result)
}

fn unwrap_fetch<T>(result: Result<T, FetchError>) -> T {
    match result {
        Ok(items) => items,
        Err(FetchError::Auth(e)) => {
            error!("Not logged in. Please run spotretro auth\n Error: {}", e)
        }
        Err(FetchError::Api(e)) => error!("Cannot fetch from Spotify. Err: {}", e),
    }
}
