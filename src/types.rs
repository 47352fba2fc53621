use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// The single OAuth token record kept by the token cache.
///
/// `expires_at` is an absolute unix timestamp in seconds, computed from the
/// provider's `expires_in` at the moment the token was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub scope: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Lookback period over which Spotify computes "top" items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Roughly the last four weeks
    #[default]
    Short,
    /// Roughly the last six months
    Medium,
    /// Several years of history
    Long,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Short, TimeWindow::Medium, TimeWindow::Long];

    /// Value of the `time_range` query parameter.
    pub fn as_time_range(&self) -> &'static str {
        match self {
            TimeWindow::Short => "short_term",
            TimeWindow::Medium => "medium_term",
            TimeWindow::Long => "long_term",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Short => "short",
            TimeWindow::Medium => "medium",
            TimeWindow::Long => "long",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Short => "Last 4 weeks",
            TimeWindow::Medium => "Last 6 months",
            TimeWindow::Long => "All time",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub popularity: u32,
    pub album: Album,
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub release_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: u32,
}

/// A top track flattened for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct TrackRecord {
    #[tabled(rename = "Track")]
    pub name: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Album")]
    pub album: String,
    #[tabled(rename = "Release Year")]
    pub release_year: i32,
    #[tabled(rename = "Popularity")]
    pub popularity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRecord {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShare {
    pub genre: String,
    pub count: usize,
    pub share: f64,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct YearBucket {
    #[tabled(rename = "Release Year")]
    pub year: i32,
    #[tabled(rename = "Tracks")]
    pub count: usize,
}
