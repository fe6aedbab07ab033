//! Metadata enrichment - resolves songs against the online catalog and lyrics sites.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`itunes/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs (or scraped pages) to domain models
//! - **Clients** - HTTP clients for the catalog, cover images and lyrics sites
//! - **Service** - High-level orchestration of the enrichment flow
//!
//! This decoupling means:
//! 1. API and page layout changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can swap providers without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use autotagger::enrichment::EnrichmentService;
//!
//! let service = EnrichmentService::new(&config)?;
//! let mut song = Song::open(path, path)?;
//! let resolution = service.resolve_all(&mut song, Some(cover_dir)).await;
//! if resolution.found {
//!     song.save(config.tagging.watermark())?;
//! }
//! ```

pub mod coverart;
pub mod domain;
pub mod itunes;
pub mod lyrics;
pub mod service;
pub mod traits;

pub use coverart::{CoverArt, CoverArtClient};
pub use domain::{CatalogMatch, EnrichmentError, EnrichmentSource, LyricsMatch};
pub use itunes::ITunesClient;
pub use lyrics::LyricsResolver;
pub use service::{EnrichmentConfig, EnrichmentService, Resolution, http_client};
