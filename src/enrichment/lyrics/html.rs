//! Page fetching and text extraction shared by the scrapers.
//!
//! `scraper::Html` is not `Send`, so documents are only ever parsed inside
//! synchronous helpers, never held across an `.await`.

use scraper::ElementRef;

use crate::enrichment::domain::{EnrichmentError, title_case};

/// GET a page and return its body as text.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, EnrichmentError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| EnrichmentError::Network(e.to_string()))?;

    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(EnrichmentError::RateLimited);
    }

    if !status.is_success() {
        return Err(EnrichmentError::Network(format!(
            "HTTP {}: {} ({})",
            status,
            status.canonical_reason().unwrap_or("Unknown"),
            url
        )));
    }

    response
        .text()
        .await
        .map_err(|e| EnrichmentError::Network(e.to_string()))
}

/// All text below `element`, trimmed; `None` when blank.
pub fn text_of(element: ElementRef<'_>) -> Option<String> {
    let text: String = element.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Normalize an author/copyright line: trimmed, title-cased.
pub fn writer_of(element: ElementRef<'_>) -> Option<String> {
    text_of(element).map(|t| title_case(&t.to_lowercase()))
}
