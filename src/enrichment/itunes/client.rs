//! iTunes Search HTTP client
//!
//! Handles communication with the iTunes Search API.
//! See: https://performance-partners.apple.com/search-api
//!
//! No API key. Apple throttles at roughly 20 requests per minute per IP, which
//! a sequential tagging run stays well under.

use super::{adapter, dto};
use crate::enrichment::domain::{CatalogMatch, EnrichmentError};

/// Fixed page size; disambiguation only looks at the first few anyway
const RESULT_LIMIT: u32 = 10;

/// iTunes Search API client
pub struct ITunesClient {
    http_client: reqwest::Client,
    base_url: String,
    countries: Vec<String>,
}

impl ITunesClient {
    /// Create a new client searching the given storefronts, in order.
    ///
    /// An empty country list falls back to the US storefront.
    pub fn new(http_client: reqwest::Client, countries: Vec<String>) -> Self {
        Self {
            http_client,
            base_url: "https://itunes.apple.com".to_string(),
            countries: if countries.is_empty() {
                vec!["US".to_string()]
            } else {
                countries
            },
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            countries: vec!["US".to_string()],
        }
    }

    /// Resolve a query to a single song.
    ///
    /// Storefronts are tried in order until one returns results. A failing
    /// storefront is skipped; the error is only returned when every
    /// storefront failed.
    pub async fn resolve(
        &self,
        query: &str,
        strict: bool,
    ) -> Result<Option<CatalogMatch>, EnrichmentError> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        let mut last_error = None;
        let mut any_succeeded = false;

        for country in &self.countries {
            match self.search(query, country).await {
                Ok(response) => {
                    any_succeeded = true;
                    tracing::debug!(query, country, results = response.results.len(), "Catalog search");
                    if let Some(best) = adapter::select_best(query, &response.results, strict) {
                        return Ok(Some(adapter::to_catalog_match(best)));
                    }
                }
                Err(e) => {
                    tracing::debug!(query, country, error = %e, "Catalog search failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_succeeded => Err(e),
            _ => Ok(None),
        }
    }

    /// Build the search URL for one storefront
    fn search_url(&self, query: &str, country: &str) -> String {
        format!(
            "{}/search?term={}&country={}&entity=song&limit={}&version=2&explicit=Yes&media=music",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(country),
            RESULT_LIMIT
        )
    }

    /// Send the HTTP request and parse the response
    async fn search(
        &self,
        query: &str,
        country: &str,
    ) -> Result<dto::SearchResponse, EnrichmentError> {
        let url = self.search_url(query, country);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            return Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        // The API answers with text/javascript, so decode the body ourselves
        let body = response
            .text()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}
