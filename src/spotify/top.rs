use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    types::{ApiErrorResponse, Artist, ArtistRecord, Paging, TimeWindow, Track, TrackRecord},
    utils,
};

/// Largest page Spotify serves from the top-items endpoints.
pub const MAX_LIMIT: u32 = 50;

/// Read-only client for the user's top tracks and artists.
///
/// Every call is a single bearer-authenticated GET; nothing is cached.
#[derive(Debug, Clone)]
pub struct ApiClient {
    api_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>, http: Client) -> Self {
        ApiClient {
            api_url: api_url.into(),
            http,
        }
    }

    /// Retrieves the user's top tracks for `window`, in the order Spotify ranks them.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    /// * `window` - Lookback period the ranking is computed over
    /// * `limit` - Number of tracks to return (1-50)
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidLimit`] - `limit` is outside 1-50, no request is made
    /// - [`ApiError::Unauthorized`] - the token is expired or was revoked
    /// - [`ApiError::Status`] - any other non-2xx response
    /// - [`ApiError::Decode`] - the body is not a page of tracks
    /// - [`ApiError::Http`] - network failure or timeout
    pub async fn top_tracks(
        &self,
        token: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ApiError> {
        let page: Paging<Track> = self.top_items("tracks", token, window, limit).await?;
        page.items.into_iter().map(track_record).collect()
    }

    /// Retrieves the user's top artists for `window`. Errors as for
    /// [`top_tracks`](Self::top_tracks).
    pub async fn top_artists(
        &self,
        token: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<ArtistRecord>, ApiError> {
        let page: Paging<Artist> = self.top_items("artists", token, window, limit).await?;
        Ok(page
            .items
            .into_iter()
            .map(|a| ArtistRecord {
                name: a.name,
                genres: a.genres,
                popularity: a.popularity,
            })
            .collect())
    }

    async fn top_items<T: DeserializeOwned>(
        &self,
        kind: &str,
        token: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Paging<T>, ApiError> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(ApiError::InvalidLimit {
                got: limit,
                max: MAX_LIMIT,
            });
        }

        let api_url = format!(
            "{uri}/me/top/{kind}?time_range={range}&limit={limit}",
            uri = self.api_url,
            kind = kind,
            range = window.as_time_range(),
            limit = limit
        );

        let res = self.http.get(&api_url).bearer_auth(token).send().await?;
        read_json(res).await
    }
}

fn track_record(track: Track) -> Result<TrackRecord, ApiError> {
    let release_year = utils::release_year(&track.album.release_date).ok_or_else(|| {
        ApiError::Decode(format!(
            "unexpected release_date {:?} for track {:?}",
            track.album.release_date, track.name
        ))
    })?;

    Ok(TrackRecord {
        artist: track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default(),
        release_year,
        album: track.album.name,
        name: track.name,
        popularity: track.popularity,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let status = res.status();
    let text = res.text().await?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}
