//! HTML for the dashboard pages. Charts are plain CSS bars.

use crate::{
    report,
    types::{GenreShare, TimeWindow, TrackRecord, YearBucket},
    utils::escape_html,
};

const STYLE: &str = "body{font-family:sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem;color:#191414}\
h1{color:#1db954}\
table{border-collapse:collapse;width:100%}\
th,td{text-align:left;padding:.3rem .5rem;border-bottom:1px solid #ddd}\
.bar{background:#1db954;height:1rem}\
.error{color:#b00020}\
nav a{margin-right:1rem}";

pub struct DashboardView {
    pub window: TimeWindow,
    pub tracks: Result<Vec<TrackRecord>, String>,
    pub genres: Result<Vec<GenreShare>, String>,
}

pub fn login_page(auth_url: &str, message: Option<&str>) -> String {
    let notice = message
        .map(|m| format!("<p class=\"error\">{}</p>", escape_html(m)))
        .unwrap_or_default();

    layout(&format!(
        "{notice}<p>Log in to Spotify to see your data:</p>\
         <p><a href=\"{url}\">Spotify Login</a></p>",
        url = escape_html(auth_url),
    ))
}

pub fn dashboard_page(view: &DashboardView) -> String {
    let mut body = window_nav(view.window);

    body.push_str("<h2>Your top tracks</h2>");
    match &view.tracks {
        Ok(tracks) => body.push_str(&tracks_section(tracks)),
        Err(e) => body.push_str(&inline_error(e)),
    }

    body.push_str("<h2>Your favourite genres</h2>");
    match &view.genres {
        Ok(genres) => body.push_str(&genres_section(genres)),
        Err(e) => body.push_str(&inline_error(e)),
    }

    body.push_str("<h2>Release years of your top tracks</h2>");
    match &view.tracks {
        Ok(tracks) => {
            body.push_str(&years_section(&report::year_histogram(tracks)));
            body.push_str(&format!(
                "<p><a href=\"/export.csv?window={window}\" download=\"{file}\">Download the track data as CSV</a></p>",
                window = view.window.as_str(),
                file = report::CSV_FILE_NAME,
            ));
        }
        Err(e) => body.push_str(&inline_error(e)),
    }

    layout(&body)
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Spotify Retrospective</title>\
         <style>{STYLE}</style></head><body><h1>Spotify Retrospective</h1>{body}</body></html>"
    )
}

fn window_nav(current: TimeWindow) -> String {
    let links: String = TimeWindow::ALL
        .iter()
        .map(|w| {
            if *w == current {
                format!("<strong>{}</strong>", w.label())
            } else {
                format!("<a href=\"/?window={}\">{}</a>", w.as_str(), w.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("<nav>{links}</nav>")
}

fn inline_error(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape_html(message))
}

fn bar(percent: f64) -> String {
    format!(
        "<div class=\"bar\" style=\"width:{:.1}%\"></div>",
        percent.clamp(0.0, 100.0)
    )
}

fn tracks_section(tracks: &[TrackRecord]) -> String {
    if tracks.is_empty() {
        return "<p>No top tracks for this period.</p>".to_string();
    }

    let rows: String = report::popularity_ranking(tracks)
        .iter()
        .map(|t| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td style=\"width:30%\">{}</td></tr>",
                escape_html(&t.name),
                escape_html(&t.artist),
                escape_html(&t.album),
                t.release_year,
                t.popularity,
                bar(t.popularity as f64),
            )
        })
        .collect();

    format!(
        "<table><tr><th>Track</th><th>Artist</th><th>Album</th><th>Release Year</th><th>Popularity</th><th></th></tr>{rows}</table>"
    )
}

fn genres_section(genres: &[GenreShare]) -> String {
    if genres.is_empty() {
        return "<p>Your top artists have no genres listed.</p>".to_string();
    }

    let rows: String = genres
        .iter()
        .map(|g| {
            format!(
                "<tr><td>{}</td><td>{:.1}%</td><td style=\"width:50%\">{}</td></tr>",
                escape_html(&g.genre),
                g.share * 100.0,
                bar(g.share * 100.0),
            )
        })
        .collect();

    format!("<table><tr><th>Genre</th><th>Share</th><th></th></tr>{rows}</table>")
}

fn years_section(buckets: &[YearBucket]) -> String {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    if max == 0 {
        return "<p>No release years to show.</p>".to_string();
    }

    let rows: String = buckets
        .iter()
        .map(|b| {
            format!(
                "<tr><td>{}</td><td>{}</td><td style=\"width:50%\">{}</td></tr>",
                b.year,
                b.count,
                bar(b.count as f64 * 100.0 / max as f64),
            )
        })
        .collect();

    format!("<table><tr><th>Release Year</th><th>Tracks</th><th></th></tr>{rows}</table>")
}
