//! AZLyrics scraper
//!
//! Search results are a `table.table-condensed`; real result links open in a
//! new tab, which tells them apart from the pagination links above them.
//! Lyrics pages keep the text in the only class-less `div` of `div.main-page`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::html::{fetch_page, text_of, writer_of};
use crate::enrichment::domain::{EnrichmentError, EnrichmentSource, LyricsMatch};
use crate::enrichment::traits::LyricsProvider;

static RESULTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.table-condensed").expect("valid selector"));
static RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[target="_blank"]"#).expect("valid selector"));
static MAIN_PAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.main-page").expect("valid selector"));
static DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div").expect("valid selector"));
static WRITER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.smt > small").expect("valid selector"));

/// AZLyrics client
pub struct AzLyrics {
    http_client: reqwest::Client,
    search_url: String,
}

impl AzLyrics {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            search_url: "https://search.azlyrics.com/search.php?q=".to_string(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(query))
    }
}

/// First result link of a search page
fn parse_search(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let table = doc.select(&RESULTS).next()?;
    let link = table.select(&RESULT_LINK).next()?;
    let href = link.value().attr("href")?.trim();
    (!href.is_empty()).then(|| href.to_string())
}

/// Lyrics and writer of a lyrics page
fn parse_lyrics(body: &str) -> Option<LyricsMatch> {
    let doc = Html::parse_document(body);
    let main = doc.select(&MAIN_PAGE).next()?;
    let block = main
        .select(&DIV)
        .find(|div| div.value().attr("class").is_none())?;
    let lyrics = text_of(block)?;
    let writer = doc.select(&WRITER).next().and_then(writer_of);
    Some(LyricsMatch { lyrics, writer })
}

#[async_trait]
impl LyricsProvider for AzLyrics {
    fn source(&self) -> EnrichmentSource {
        EnrichmentSource::AzLyrics
    }

    async fn search(&self, query: &str) -> Result<Option<String>, EnrichmentError> {
        let body = fetch_page(&self.http_client, &self.search_url(query)).await?;
        Ok(parse_search(&body))
    }

    async fn load(&self, url: &str) -> Result<Option<LyricsMatch>, EnrichmentError> {
        let body = fetch_page(&self.http_client, url).await?;
        Ok(parse_lyrics(&body))
    }
}
