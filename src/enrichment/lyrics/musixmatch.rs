//! Musixmatch scraper
//!
//! The search page lists hits in `div.main-panel`; a `div.box-content` is only
//! present when there is at least one. Lyrics pages split the text across
//! `p.mxm-lyrics__content` paragraphs.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::html::{fetch_page, text_of, writer_of};
use crate::enrichment::domain::{EnrichmentError, EnrichmentSource, LyricsMatch};
use crate::enrichment::traits::LyricsProvider;

const SITE: &str = "https://www.musixmatch.com";

static MAIN_PANEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.main-panel").expect("valid selector"));
static BOX_CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.box-content").expect("valid selector"));
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.title").expect("valid selector"));
static CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.mxm-lyrics__content").expect("valid selector"));
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("valid selector"));
static COPYRIGHT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.mxm-lyrics__copyright").expect("valid selector"));

/// Musixmatch client
pub struct Musixmatch {
    http_client: reqwest::Client,
}

impl Musixmatch {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

/// Search URL; parentheses stay literal in the path.
fn search_url(query: &str) -> String {
    let encoded = urlencoding::encode(query)
        .replace("%28", "(")
        .replace("%29", ")");
    format!("{SITE}/search/{encoded}")
}

/// Absolute URL of the first hit on a search page
fn parse_search(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let panel = doc.select(&MAIN_PANEL).next()?;
    panel.select(&BOX_CONTENT).next()?;
    let href = panel.select(&TITLE_LINK).next()?.value().attr("href")?;
    Some(format!("{SITE}{}", href.trim()))
}

/// Lyrics and copyright line of a lyrics page
fn parse_lyrics(body: &str) -> Option<LyricsMatch> {
    let doc = Html::parse_document(body);
    let content = doc.select(&CONTENT).next()?;
    let lyrics = text_of(content.select(&SPAN).next()?)?;
    let writer = doc.select(&COPYRIGHT).next().and_then(writer_of);
    Some(LyricsMatch { lyrics, writer })
}

#[async_trait]
impl LyricsProvider for Musixmatch {
    fn source(&self) -> EnrichmentSource {
        EnrichmentSource::Musixmatch
    }

    async fn search(&self, query: &str) -> Result<Option<String>, EnrichmentError> {
        let body = fetch_page(&self.http_client, &search_url(query)).await?;
        Ok(parse_search(&body))
    }

    async fn load(&self, url: &str) -> Result<Option<LyricsMatch>, EnrichmentError> {
        let body = fetch_page(&self.http_client, url).await?;
        Ok(parse_lyrics(&body))
    }
}
