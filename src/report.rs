//! Turns top tracks and artists into the structures the dashboard and the
//! CLI render: a popularity ranking, genre shares, a release-year histogram
//! and the CSV export.

use std::collections::{BTreeMap, HashMap};

use crate::{
    types::{ArtistRecord, GenreShare, TrackRecord, YearBucket},
    utils,
};

pub const CSV_HEADER: &str = "Track,Artist,Album,Release Year,Popularity";
pub const CSV_FILE_NAME: &str = "top_tracks_by_year.csv";
pub const TOP_GENRES: usize = 10;

/// Tracks ordered by descending popularity. Equal popularities keep their
/// original order.
pub fn popularity_ranking(tracks: &[TrackRecord]) -> Vec<TrackRecord> {
    let mut ranked = tracks.to_vec();
    ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    ranked
}

/// Counts every genre across `artists`, in the order each genre first appears.
pub fn genre_tally(artists: &[ArtistRecord]) -> Vec<(String, usize)> {
    let mut tally: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for genre in artists.iter().flat_map(|a| a.genres.iter()) {
        match index.get(genre.as_str()) {
            Some(&i) => tally[i].1 += 1,
            None => {
                index.insert(genre.as_str(), tally.len());
                tally.push((genre.clone(), 1));
            }
        }
    }

    tally
}

/// The `n` most frequent genres of `tally`, with their share of the selected
/// total. Ties keep first-encountered order.
pub fn top_genres(tally: &[(String, usize)], n: usize) -> Vec<GenreShare> {
    let mut sorted = tally.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(n);

    let total: usize = sorted.iter().map(|(_, count)| count).sum();
    sorted
        .into_iter()
        .map(|(genre, count)| GenreShare {
            genre,
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect()
}

/// One bucket per distinct release year, ascending.
pub fn year_histogram(tracks: &[TrackRecord]) -> Vec<YearBucket> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for track in tracks {
        *years.entry(track.release_year).or_default() += 1;
    }

    years
        .into_iter()
        .map(|(year, count)| YearBucket { year, count })
        .collect()
}

/// Renders `tracks` as CSV in the given order.
pub fn to_csv(tracks: &[TrackRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for t in tracks {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            utils::csv_field(&t.name),
            utils::csv_field(&t.artist),
            utils::csv_field(&t.album),
            t.release_year,
            t.popularity
        ));
    }

    out
}
