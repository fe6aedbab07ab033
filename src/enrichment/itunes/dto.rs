//! iTunes Search API Data Transfer Objects
//!
//! These types match EXACTLY what the search endpoint returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the itunes module - convert to domain types.
//!
//! Every field of a result is optional: music videos, podcasts and partial
//! catalog entries omit different subsets.

use serde::{Deserialize, Serialize};

/// `GET /search` response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<SongResult>,
}

/// One entry of `results[]` for `entity=song`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResult {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub primary_genre_name: Option<String>,
    /// ISO-8601 with a `Z` suffix, e.g. `1971-09-09T07:00:00Z`
    pub release_date: Option<String>,
    /// 100x100 thumbnail
    pub artwork_url100: Option<String>,
    pub disc_count: Option<i32>,
    pub disc_number: Option<i32>,
    pub track_count: Option<i32>,
    pub track_number: Option<i32>,
    /// `explicit`, `cleaned` or `notExplicit`
    pub track_explicitness: Option<String>,
    pub collection_view_url: Option<String>,
    pub track_view_url: Option<String>,
}

// ============================================================================
// Contract Tests - verify we can parse real API responses
// ============================================================================
