//! Adapter layer: Convert iTunes DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Disambiguation between several results also lives here, since it works on
//! the raw result list.

use chrono::{Datelike, NaiveDateTime};
use std::collections::HashSet;

use super::dto;
use crate::enrichment::domain::CatalogMatch;
use crate::query::words;

/// Thumbnail size token in artwork URLs
const THUMBNAIL_TOKEN: &str = "100x100bb";
/// Replacement token for the full-size cover
const FULL_SIZE_TOKEN: &str = "1000x1000bb";

/// Pick the result that best matches `query`.
///
/// With `strict`, or a single result, the first result wins. Otherwise each
/// title is scored by how many query words it shares; ties go to the title
/// with fewer words, and a candidate must share at least one word to beat
/// the first result.
pub fn select_best<'a>(
    query: &str,
    results: &'a [dto::SongResult],
    strict: bool,
) -> Option<&'a dto::SongResult> {
    let first = results.first()?;
    if strict || results.len() == 1 {
        return Some(first);
    }

    let query_words: HashSet<String> = words(query).into_iter().collect();

    let mut best = 0;
    let mut best_score = 0;
    let mut best_len = usize::MAX;

    for (i, result) in results.iter().enumerate() {
        let title_words = words(result.track_name.as_deref().unwrap_or_default());
        let len = title_words.len();
        let score = title_words
            .into_iter()
            .collect::<HashSet<_>>()
            .intersection(&query_words)
            .count();

        if score > best_score || (score > 0 && score == best_score && len < best_len) {
            best = i;
            best_score = score;
            best_len = len;
        }
    }

    tracing::debug!(query, chosen = best, score = best_score, candidates = results.len(), "Disambiguated catalog results");
    results.get(best)
}

/// Convert a search result into a catalog match
pub fn to_catalog_match(result: &dto::SongResult) -> CatalogMatch {
    CatalogMatch {
        title: result.track_name.clone(),
        artist: result.artist_name.clone(),
        album: result.collection_name.clone(),
        genre: result.primary_genre_name.clone(),
        year: result.release_date.as_deref().and_then(parse_year),
        artwork_url: result
            .artwork_url100
            .as_deref()
            .map(|url| url.replace(THUMBNAIL_TOKEN, FULL_SIZE_TOKEN)),
        disc_number: result.disc_number,
        disc_count: result.disc_count,
        track_number: result.track_number,
        track_count: result.track_count,
        explicit: result.track_explicitness.as_deref() == Some("explicit"),
        album_url: result.collection_view_url.clone(),
        track_url: result.track_view_url.clone(),
    }
}

/// Year of an ISO-8601 `...Z` timestamp
fn parse_year(date: &str) -> Option<i32> {
    match NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%SZ") {
        Ok(dt) => Some(dt.year()),
        Err(e) => {
            tracing::debug!(date, error = %e, "Unparseable release date");
            None
        }
    }
}
