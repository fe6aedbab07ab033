//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use autotagger::enrichment::traits::CatalogApi;
//!
//! // In production code:
//! async fn process(client: &dyn CatalogApi, query: &str) {
//!     let found = client.resolve(query, false).await?;
//! }
//!
//! // In tests:
//! struct MockCatalog { ... }
//! impl CatalogApi for MockCatalog { ... }
//! ```

use async_trait::async_trait;

use super::coverart::CoverArt;
use super::domain::{CatalogMatch, EnrichmentError, EnrichmentSource, LyricsMatch};

/// Trait for song catalog lookup.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Resolve a free-text query to a single song, if any.
    async fn resolve(
        &self,
        query: &str,
        strict: bool,
    ) -> Result<Option<CatalogMatch>, EnrichmentError>;
}

/// Trait for cover image download.
#[async_trait]
pub trait CoverArtApi: Send + Sync {
    /// Download the image at `url`.
    async fn download(&self, url: &str) -> Result<CoverArt, EnrichmentError>;
}

/// A lyrics site, queried in two phases.
///
/// `search` turns a query into the URL of a lyrics page; `load` extracts the
/// lyrics from that page. Retry and fallback policy is not the provider's
/// concern, see [`LyricsResolver`](super::lyrics::LyricsResolver).
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Which site this is, for logging
    fn source(&self) -> EnrichmentSource;

    /// Find the lyrics page for `query`.
    async fn search(&self, query: &str) -> Result<Option<String>, EnrichmentError>;

    /// Extract lyrics from the page at `url`.
    async fn load(&self, url: &str) -> Result<Option<LyricsMatch>, EnrichmentError>;
}

// Implement traits for real clients

#[async_trait]
impl CatalogApi for super::itunes::ITunesClient {
    async fn resolve(
        &self,
        query: &str,
        strict: bool,
    ) -> Result<Option<CatalogMatch>, EnrichmentError> {
        self.resolve(query, strict).await
    }
}

#[async_trait]
impl CoverArtApi for super::coverart::CoverArtClient {
    async fn download(&self, url: &str) -> Result<CoverArt, EnrichmentError> {
        self.download(url).await
    }
}
