//! The canonical song record.
//!
//! A [`Song`] is the in-memory representation of one audio file's metadata.
//! Every other component reads or writes it: the tag codec seeds it, the
//! catalog and lyrics resolvers fill it in, and the codec writes it back.
//!
//! # Invariants
//!
//! - The search query is derived state. Every mutator that can change it
//!   calls [`Song::rebuild_query`]; its accuracy only goes down when the
//!   title or artist is explicitly replaced.
//! - Disc/track numbers never exceed their counts, and non-positive values
//!   are stored as absent.
//! - The cover is either a remote URL or a local file, never both.

use std::path::{Path, PathBuf};

use crate::enrichment::domain::{CatalogMatch, LyricsMatch};
use crate::error::{Result, ResultExt};
use crate::metadata::{self, SeedFields, TagFormat};
use crate::query::{self, QueryAccuracy, SearchQuery};

/// A number/count pair such as "track 3 of 12".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Numbering {
    pub number: Option<u32>,
    pub count: Option<u32>,
}

impl Numbering {
    /// Normalize raw values: non-positive becomes absent, number is clamped
    /// to count.
    pub fn new(number: Option<i32>, count: Option<i32>) -> Self {
        let positive = |v: Option<i32>| v.filter(|&v| v > 0).map(|v| v as u32);
        let count = positive(count);
        let number = positive(number).map(|n| match count {
            Some(c) if n > c => c,
            _ => n,
        });
        Self { number, count }
    }

    /// Both values, when both are known.
    pub fn pair(&self) -> Option<(u32, u32)> {
        Some((self.number?, self.count?))
    }
}

/// Where the cover image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    /// Not downloaded yet
    Remote(String),
    /// Downloaded to a local file
    Local(PathBuf),
}

/// Canonical metadata for one audio file.
#[derive(Debug, Clone)]
pub struct Song {
    path: PathBuf,
    original_path: PathBuf,
    format: TagFormat,
    query: SearchQuery,

    title: Option<String>,
    artist: Option<String>,
    album_artist: Option<String>,
    album: Option<String>,
    genre: Option<String>,
    composer: Option<String>,
    group: Option<String>,
    year: Option<i32>,
    disc: Numbering,
    track: Numbering,
    explicit: bool,
    lyrics: Option<String>,
    lyrics_writer: Option<String>,
    cover: Option<Cover>,
    album_url: Option<String>,
    track_url: Option<String>,

    found: bool,
}

impl Song {
    /// Build a record from already-loaded seed fields. No I/O.
    ///
    /// `path` is the working file (possibly a temporary copy), `original_path`
    /// the file the user pointed at; the filename query comes from the latter.
    pub fn new(path: &Path, original_path: &Path, seed: SeedFields) -> Result<Self> {
        let format = TagFormat::from_path(path)?;
        let mut song = Self {
            path: path.to_path_buf(),
            original_path: original_path.to_path_buf(),
            format,
            query: SearchQuery::default(),
            title: None,
            artist: None,
            album_artist: None,
            album: None,
            genre: None,
            composer: None,
            group: None,
            year: None,
            disc: Numbering::default(),
            track: Numbering::default(),
            explicit: false,
            lyrics: None,
            lyrics_writer: None,
            cover: None,
            album_url: None,
            track_url: None,
            found: false,
        };
        song.apply_seed(seed);
        Ok(song)
    }

    /// Open a file: load its existing tags and derive the first query.
    pub fn open(path: &Path, original_path: &Path) -> Result<Self> {
        let seed = metadata::load(path)
            .with_context(format!("reading tags of {}", original_path.display()))?;
        Self::new(path, original_path, seed)
    }

    fn apply_seed(&mut self, seed: SeedFields) {
        if seed.title.is_some() {
            self.set_title(seed.title);
        }
        if seed.artist.is_some() {
            self.set_artist(seed.artist);
        }
        self.rebuild_query();
    }

    // ------------------------------------------------------------------
    // Query state
    // ------------------------------------------------------------------

    /// Re-derive the search query if a better one is available now.
    pub fn rebuild_query(&mut self) {
        if let Some(q) = query::generate(
            self.title.as_deref(),
            self.artist.as_deref(),
            &self.original_path,
            self.query.accuracy,
        ) {
            tracing::debug!(query = %q.full, minimal = %q.minimal, accuracy = q.accuracy.score(), "Query derived");
            self.query = q;
        }
    }

    pub fn query(&self) -> &str {
        &self.query.full
    }

    pub fn minimal_query(&self) -> &str {
        &self.query.minimal
    }

    pub fn search_query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn query_accuracy(&self) -> QueryAccuracy {
        self.query.accuracy
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Replace the title. Forces a fresh query.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = non_empty(title);
        self.query.accuracy = QueryAccuracy::Unset;
        self.rebuild_query();
    }

    /// Replace the artist. Forces a fresh query.
    pub fn set_artist(&mut self, artist: Option<String>) {
        self.artist = non_empty(artist);
        self.query.accuracy = QueryAccuracy::Unset;
        self.rebuild_query();
    }

    pub fn set_track(&mut self, number: Option<i32>, count: Option<i32>) {
        self.track = Numbering::new(number, count);
    }

    pub fn set_disc(&mut self, number: Option<i32>, count: Option<i32>) {
        self.disc = Numbering::new(number, count);
    }

    pub fn set_year(&mut self, year: Option<i32>) {
        self.year = year.filter(|&y| y > 0);
    }

    pub fn set_cover_url(&mut self, url: Option<String>) {
        self.cover = non_empty(url).map(Cover::Remote);
    }

    /// Point the cover at a downloaded file; the remote URL is dropped.
    pub fn set_cover_path(&mut self, path: PathBuf) {
        self.cover = Some(Cover::Local(path));
    }

    pub fn set_lyrics(&mut self, lyrics: LyricsMatch) {
        self.lyrics = non_empty(Some(lyrics.lyrics));
        self.lyrics_writer = non_empty(lyrics.writer);
    }

    /// Take every field from a catalog match and mark the song as found.
    ///
    /// Title and artist are stored without resetting the query; the query is
    /// only rebuilt when it was below full accuracy.
    pub fn apply_catalog_match(&mut self, m: CatalogMatch) {
        self.title = non_empty(m.title);
        self.artist = non_empty(m.artist);
        self.album_artist = self.artist.clone();
        self.album = non_empty(m.album);
        self.genre = non_empty(m.genre);
        self.set_year(m.year);
        self.set_cover_url(m.artwork_url);
        self.set_disc(m.disc_number, m.disc_count);
        self.set_track(m.track_number, m.track_count);
        self.explicit = m.explicit;
        self.album_url = non_empty(m.album_url);
        self.track_url = non_empty(m.track_url);
        self.found = true;

        if self.query.accuracy < QueryAccuracy::Full {
            self.rebuild_query();
        }
    }

    /// Move the record to a new working file (after conversion) and re-seed
    /// from its tags.
    pub fn set_path(&mut self, path: &Path) -> Result<()> {
        self.format = TagFormat::from_path(path)?;
        self.path = path.to_path_buf();
        let seed = metadata::load(path)?;
        self.apply_seed(seed);
        Ok(())
    }

    /// Write the record into the file's tags.
    ///
    /// A no-op returning `false` unless a catalog match was applied.
    pub fn save(&self, watermark: Option<&str>) -> Result<bool> {
        if !self.found {
            return Ok(false);
        }
        let cover = match &self.cover {
            Some(Cover::Local(p)) => Some(
                std::fs::read(p).with_context(format!("reading cover {}", p.display()))?,
            ),
            _ => None,
        };
        metadata::save(self, cover.as_deref(), watermark)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn format(&self) -> TagFormat {
        self.format
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn album_artist(&self) -> Option<&str> {
        self.album_artist.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn disc(&self) -> Numbering {
        self.disc
    }

    pub fn track(&self) -> Numbering {
        self.track
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn lyrics(&self) -> Option<&str> {
        self.lyrics.as_deref()
    }

    pub fn lyrics_writer(&self) -> Option<&str> {
        self.lyrics_writer.as_deref()
    }

    pub fn cover(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    /// Remote cover URL, if the cover has not been downloaded.
    pub fn cover_url(&self) -> Option<&str> {
        match &self.cover {
            Some(Cover::Remote(url)) => Some(url),
            _ => None,
        }
    }

    pub fn album_url(&self) -> Option<&str> {
        self.album_url.as_deref()
    }

    pub fn track_url(&self) -> Option<&str> {
        self.track_url.as_deref()
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Both title and artist are known.
    pub fn has_identity(&self) -> bool {
        self.title.is_some() && self.artist.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
