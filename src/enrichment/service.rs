//! Enrichment service - orchestrates catalog, cover and lyrics lookups
//!
//! This is the high-level API for enriching a [`Song`]:
//! 1. Resolve the full query against the catalog
//! 2. If nothing matched (and not strict), retry with the minimal query
//! 3. Download the cover image to a local file
//! 4. Look up lyrics, when title and artist are known
//!
//! Steps 3 and 4 only run when step 1 or 2 found the song. Failures in any
//! step are logged and treated as "not found"; they never abort the file.

use std::path::Path;

use crate::config::Config;
use crate::enrichment::{
    coverart::CoverArtClient,
    domain::EnrichmentError,
    itunes::ITunesClient,
    lyrics::LyricsResolver,
    traits::{CatalogApi, CoverArtApi},
};
use crate::model::{Cover, Song};
use crate::temp::TempFile;

/// Configuration for the enrichment service
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Never retry the catalog with the minimal query; take the first result
    pub strict_meta: bool,
    /// Never retry lyrics searches with the minimal query
    pub strict_lyrics: bool,
    /// Look up lyrics at all
    pub fetch_lyrics: bool,
    /// Download the cover image
    pub fetch_cover: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            strict_meta: false,
            strict_lyrics: false,
            fetch_lyrics: true,
            fetch_cover: true,
        }
    }
}

impl EnrichmentConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            strict_meta: config.catalog.strict,
            strict_lyrics: config.lyrics.strict,
            fetch_lyrics: config.lyrics.enabled,
            fetch_cover: config.tagging.embed_cover,
        }
    }
}

/// Build the HTTP client shared by every provider.
pub fn http_client(config: &Config) -> Result<reqwest::Client, EnrichmentError> {
    let mut builder = reqwest::Client::builder().user_agent(config.network.user_agent.clone());
    if let Some(timeout) = config.network.timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| EnrichmentError::Network(format!("failed to build HTTP client: {e}")))
}

/// Result of [`EnrichmentService::resolve_all`]
#[derive(Debug, Default)]
pub struct Resolution {
    /// The catalog identified the song
    pub found: bool,
    /// Downloaded cover image, deleted when dropped
    pub cover: Option<TempFile>,
}

/// Service for enriching song metadata from external sources
pub struct EnrichmentService {
    config: EnrichmentConfig,
    catalog: Box<dyn CatalogApi>,
    covers: Box<dyn CoverArtApi>,
    lyrics: LyricsResolver,
}

impl EnrichmentService {
    /// Create a service backed by the real providers
    pub fn new(config: &Config) -> Result<Self, EnrichmentError> {
        let http = http_client(config)?;
        Ok(Self::with_clients(
            EnrichmentConfig::from_config(config),
            Box::new(ITunesClient::new(http.clone(), config.catalog.countries.clone())),
            Box::new(CoverArtClient::new(http.clone())),
            LyricsResolver::from_config(&config.lyrics, &http),
        ))
    }

    /// Create a service from explicit clients (tests inject mocks here)
    pub fn with_clients(
        config: EnrichmentConfig,
        catalog: Box<dyn CatalogApi>,
        covers: Box<dyn CoverArtApi>,
        lyrics: LyricsResolver,
    ) -> Self {
        Self {
            config,
            catalog,
            covers,
            lyrics,
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Resolve the song against the catalog with one of its queries.
    ///
    /// Applies the match to the song and returns whether one was found.
    pub async fn fetch_info(&self, song: &mut Song, minimal: bool) -> bool {
        let query = song.search_query().get(minimal).to_string();
        if query.is_empty() {
            return false;
        }

        match self.catalog.resolve(&query, self.config.strict_meta).await {
            Ok(Some(found)) => {
                tracing::info!(query, title = ?found.title, artist = ?found.artist, "Catalog match");
                song.apply_catalog_match(found);
                true
            }
            Ok(None) => {
                tracing::info!(query, "No catalog match");
                false
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Catalog lookup failed");
                false
            }
        }
    }

    /// Run the whole enrichment policy on a song.
    ///
    /// Covers are written into `cover_dir`; with `None` the cover stays a
    /// remote URL. The downloaded file is owned by the returned
    /// [`Resolution`], and by this future until then.
    pub async fn resolve_all(&self, song: &mut Song, cover_dir: Option<&Path>) -> Resolution {
        let mut found = self.fetch_info(song, false).await;

        if !found && !self.config.strict_meta && !song.minimal_query().is_empty() {
            tracing::info!("Retrying catalog with the minimal query");
            found = self.fetch_info(song, true).await;
        }

        if !found {
            return Resolution::default();
        }

        let cover = match cover_dir {
            Some(dir) if self.config.fetch_cover => self.fetch_cover(song, dir).await,
            _ => None,
        };

        if self.config.fetch_lyrics && song.has_identity() {
            let found = self
                .lyrics
                .resolve(song.query(), song.minimal_query(), self.config.strict_lyrics)
                .await;
            if let Some(found) = found {
                song.set_lyrics(found);
            }
        }

        Resolution { found: true, cover }
    }

    /// Download the song's remote cover into `dir` and point the song at it.
    async fn fetch_cover(&self, song: &mut Song, dir: &Path) -> Option<TempFile> {
        let Some(Cover::Remote(url)) = song.cover().cloned() else {
            return None;
        };

        let art = match self.covers.download(&url).await {
            Ok(art) => art,
            Err(e) => {
                tracing::warn!(url, error = %e, "Cover download failed");
                return None;
            }
        };

        match art.write_to(dir) {
            Ok(file) => {
                tracing::debug!(path = %file.path().display(), bytes = art.data.len(), "Cover saved");
                song.set_cover_path(file.path().to_path_buf());
                Some(file)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not store cover image");
                None
            }
        }
    }
}
