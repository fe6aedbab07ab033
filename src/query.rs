//! Search query derivation.
//!
//! Turns whatever is known about a song (embedded title/artist, or just the
//! file name) into the strings sent to the catalog and lyrics providers.
//! Two strings are produced: the full query and a minimal one with every
//! parenthetical span removed, used as a fallback when the full one misses.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Annotations that never help a search: `[...]` spans, `(radio edit)`
/// markers and a leading `NN.` track ordinal.
static ANNOTATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\[.*\])|(\(radio\s+edit\))|(^[0-9]+\.?)").expect("valid annotation regex")
});

/// Any parenthetical span, greedy from the first `(` to the last `)`.
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\(.*\)").expect("valid parenthetical regex"));

/// Confidence tier of a derived search query.
///
/// Ordered: a query only ever gets replaced by one of higher accuracy, unless
/// the title or artist is explicitly changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryAccuracy {
    /// No query has been generated yet
    #[default]
    Unset,
    /// Derived from the file name only
    Filename,
    /// Derived from a known title and artist
    Full,
}

impl QueryAccuracy {
    /// Numeric tier (0, 50 or 100).
    pub fn score(self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::Filename => 50,
            Self::Full => 100,
        }
    }
}

/// A derived pair of search strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub full: String,
    pub minimal: String,
    pub accuracy: QueryAccuracy,
}

impl SearchQuery {
    /// The full or minimal variant.
    pub fn get(&self, minimal: bool) -> &str {
        if minimal { &self.minimal } else { &self.full }
    }
}

/// Derive a search query.
///
/// Returns `None` when nothing better than `current` can be produced, in which
/// case the caller keeps its existing query.
pub fn generate(
    title: Option<&str>,
    artist: Option<&str>,
    filename: &Path,
    current: QueryAccuracy,
) -> Option<SearchQuery> {
    if current < QueryAccuracy::Full {
        let title = title.filter(|t| !t.is_empty());
        let artist = artist.filter(|a| !a.is_empty());
        if let (Some(title), Some(artist)) = (title, artist) {
            let full = strip_annotations(&format!("{title} {artist}"));
            return Some(SearchQuery {
                minimal: minimize(&full),
                full,
                accuracy: QueryAccuracy::Full,
            });
        }
    }

    if current < QueryAccuracy::Filename {
        let stem = filename
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let full = strip_annotations(&stem.replace('_', " "));
        return Some(SearchQuery {
            minimal: minimize(&full),
            full,
            accuracy: QueryAccuracy::Filename,
        });
    }

    None
}

fn strip_annotations(raw: &str) -> String {
    collapse_whitespace(&ANNOTATIONS.replace_all(raw, ""))
}

fn minimize(full: &str) -> String {
    collapse_whitespace(&PARENTHETICAL.replace_all(full, ""))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-folded word set used to compare queries against catalog titles.
///
/// Words are runs of `\w` characters and apostrophes.
pub fn words(text: &str) -> Vec<String> {
    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w']+").expect("valid word regex"));
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn no_file() -> &'static Path {
        Path::new("/music/unused.mp3")
    }

    #[test]
    fn test_title_and_artist_give_full_accuracy() {
        let q = generate(Some("Imagine"), Some("John Lennon"), no_file(), QueryAccuracy::Unset)
            .unwrap();
        assert_eq!(q.full, "Imagine John Lennon");
        assert_eq!(q.minimal, "Imagine John Lennon");
        assert_eq!(q.accuracy, QueryAccuracy::Full);
    }

    #[test]
    fn test_parenthetical_only_removed_from_minimal() {
        let q = generate(
            Some("Hey Jude (Remastered 2015)"),
            Some("The Beatles"),
            no_file(),
            QueryAccuracy::Unset,
        )
        .unwrap();
        assert_eq!(q.full, "Hey Jude (Remastered 2015) The Beatles");
        assert_eq!(q.minimal, "Hey Jude The Beatles");
    }

    #[test]
    fn test_brackets_and_radio_edit_stripped() {
        let q = generate(
            Some("Song [Official Video] (Radio Edit)"),
            Some("Band"),
            no_file(),
            QueryAccuracy::Unset,
        )
        .unwrap();
        assert_eq!(q.full, "Song Band");
    }

    #[test]
    fn test_filename_with_ordinal_and_radio_edit() {
        let q = generate(
            None,
            None,
            Path::new("/music/01. Song Name (Radio Edit).mp3"),
            QueryAccuracy::Unset,
        )
        .unwrap();
        assert_eq!(q.full, "song name");
        assert_eq!(q.minimal, "song name");
        assert_eq!(q.accuracy, QueryAccuracy::Filename);
    }

    #[test]
    fn test_filename_underscores_become_spaces() {
        let q = generate(
            None,
            None,
            Path::new("Imagine_-_John_Lennon.flac"),
            QueryAccuracy::Unset,
        )
        .unwrap();
        assert_eq!(q.full, "imagine - john lennon");
        assert_eq!(q.accuracy, QueryAccuracy::Filename);
    }

    #[test]
    fn test_partial_tags_fall_back_to_filename() {
        let q = generate(Some("Imagine"), Some(""), Path::new("track.mp3"), QueryAccuracy::Unset)
            .unwrap();
        assert_eq!(q.full, "track");
        assert_eq!(q.accuracy, QueryAccuracy::Filename);
    }

    #[test]
    fn test_full_accuracy_never_downgraded() {
        assert!(generate(None, None, Path::new("x.mp3"), QueryAccuracy::Full).is_none());
        assert!(generate(Some("A"), Some("B"), Path::new("x.mp3"), QueryAccuracy::Full).is_none());
    }

    #[test]
    fn test_filename_accuracy_kept_without_tags() {
        assert!(generate(None, None, Path::new("x.mp3"), QueryAccuracy::Filename).is_none());
    }

    #[test]
    fn test_filename_accuracy_upgraded_by_tags() {
        let q = generate(Some("A"), Some("B"), Path::new("x.mp3"), QueryAccuracy::Filename)
            .unwrap();
        assert_eq!(q.accuracy, QueryAccuracy::Full);
    }

    #[test]
    fn test_accuracy_scores() {
        assert_eq!(QueryAccuracy::Unset.score(), 0);
        assert_eq!(QueryAccuracy::Filename.score(), 50);
        assert_eq!(QueryAccuracy::Full.score(), 100);
    }

    #[test]
    fn test_words_keep_apostrophes_and_fold_case() {
        assert_eq!(words("Don't Stop (Live)"), vec!["don't", "stop", "live"]);
    }

    fn is_subsequence(needle: &str, haystack: &str) -> bool {
        let mut hay = haystack.chars();
        needle.chars().all(|c| hay.any(|h| h == c))
    }

    fn has_parenthetical_span(s: &str) -> bool {
        match s.find('(') {
            Some(open) => s[open..].contains(')'),
            None => false,
        }
    }

    proptest! {
        #[test]
        fn prop_title_artist_always_full(
            title in "[A-Za-z0-9 ()\\[\\]'.]{1,24}",
            artist in "[A-Za-z0-9 ()'.]{1,16}",
        ) {
            let q = generate(Some(&title), Some(&artist), no_file(), QueryAccuracy::Unset).unwrap();
            prop_assert_eq!(q.accuracy, QueryAccuracy::Full);
            prop_assert!(is_subsequence(&q.minimal, &q.full));
            prop_assert!(!has_parenthetical_span(&q.minimal));
        }

        #[test]
        fn prop_filename_never_downgrades_full(name in "[a-z_ .()0-9]{1,20}") {
            let path = Path::new("/music").join(format!("{name}.mp3"));
            prop_assert!(generate(None, None, &path, QueryAccuracy::Full).is_none());
        }
    }
}
