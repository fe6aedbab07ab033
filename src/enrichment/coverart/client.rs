//! Cover image HTTP client
//!
//! Fetches artwork from the catalog's image CDN. No API key required.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::enrichment::domain::EnrichmentError;
use crate::temp::TempFile;

/// Downloaded cover art
#[derive(Debug, Clone)]
pub struct CoverArt {
    /// Image data (JPEG)
    pub data: Vec<u8>,
    /// MIME type reported by the server
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

impl CoverArt {
    /// Write the image to `<dir>/<sha256(url)>.jpg`.
    ///
    /// The file is removed again when the returned guard is dropped.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<TempFile> {
        let file = TempFile::new(dir.join(cover_file_name(&self.url)));
        std::fs::write(file.path(), &self.data)?;
        Ok(file)
    }
}

/// Local file name for a cover URL: hex SHA-256 of the URL plus `.jpg`.
pub fn cover_file_name(url: &str) -> String {
    format!("{:x}.jpg", Sha256::digest(url.as_bytes()))
}

/// Cover image client
pub struct CoverArtClient {
    http_client: reqwest::Client,
}

impl CoverArtClient {
    /// Create a new client
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Download an image from a URL
    pub async fn download(&self, url: &str) -> Result<CoverArt, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            return Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // Get content type
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?
            .to_vec();

        if data.is_empty() {
            return Err(EnrichmentError::InvalidResponse("empty image body".to_string()));
        }

        Ok(CoverArt {
            data,
            mime_type,
            url: url.to_string(),
        })
    }
}
