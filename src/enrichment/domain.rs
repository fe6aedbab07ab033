//! Internal domain models for catalog and lyrics lookups.
//!
//! These types are OUR types - they don't change when external APIs or page
//! layouts change. Every provider response gets converted into these types
//! via adapters.

/// A song identified by the catalog service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogMatch {
    /// Track title
    pub title: Option<String>,
    /// Performing artist (also used as album artist)
    pub artist: Option<String>,
    /// Album (collection) title
    pub album: Option<String>,
    /// Primary genre
    pub genre: Option<String>,
    /// Release year
    pub year: Option<i32>,
    /// High resolution cover image URL
    pub artwork_url: Option<String>,
    pub disc_number: Option<i32>,
    pub disc_count: Option<i32>,
    pub track_number: Option<i32>,
    pub track_count: Option<i32>,
    /// Catalog marks the track as explicit
    pub explicit: bool,
    /// Album page
    pub album_url: Option<String>,
    /// Track page
    pub track_url: Option<String>,
}

/// Lyrics scraped from a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsMatch {
    pub lyrics: String,
    /// Author/copyright line, title-cased
    pub writer: Option<String>,
}

/// Which lyrics site produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentSource {
    AzLyrics,
    Musixmatch,
}

impl std::fmt::Display for EnrichmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AzLyrics => "AZLyrics",
            Self::Musixmatch => "Musixmatch",
        })
    }
}

/// Errors that can occur during enrichment.
///
/// None of these abort a run: resolvers log them and carry on as if nothing
/// was found.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Title-case a free-text line: every letter following a non-letter is
/// upper-cased, every other letter lower-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
