//! Lyrics lookup across several scraped sites.
//!
//! # Architecture
//!
//! - Each site implements [`LyricsProvider`]: `search` (query → page URL) and
//!   `load` (page URL → lyrics). Providers know nothing about retries.
//! - [`LyricsResolver`] owns the retry policy and tries providers in priority
//!   order; the first one that returns lyrics wins.
//!
//! Per provider, the policy is:
//!
//! 1. search with the full query;
//! 2. if that finds nothing, search again with the minimal query (unless
//!    strict, or there is no minimal query);
//! 3. load the page that was found;
//! 4. if the page had no lyrics and step 1 had succeeded, run search + load
//!    once more with the minimal query (same conditions as step 2).
//!
//! A network or parse failure counts as "nothing found" for that step.

mod azlyrics;
mod html;
mod musixmatch;

pub use azlyrics::AzLyrics;
pub use musixmatch::Musixmatch;

use crate::config::LyricsConfig;
use crate::enrichment::domain::{EnrichmentError, LyricsMatch};
use crate::enrichment::traits::LyricsProvider;

/// Tries lyrics providers in order until one has the song.
pub struct LyricsResolver {
    providers: Vec<Box<dyn LyricsProvider>>,
}

impl LyricsResolver {
    /// Build a resolver over explicit providers, highest priority first.
    pub fn new(providers: Vec<Box<dyn LyricsProvider>>) -> Self {
        Self { providers }
    }

    /// Build the real providers named in the config, in the configured order.
    ///
    /// Unknown names are skipped with a warning.
    pub fn from_config(config: &LyricsConfig, http_client: &reqwest::Client) -> Self {
        let providers = config
            .providers
            .iter()
            .filter_map(|name| -> Option<Box<dyn LyricsProvider>> {
                match name.to_ascii_lowercase().as_str() {
                    "azlyrics" => Some(Box::new(AzLyrics::new(http_client.clone()))),
                    "musixmatch" => Some(Box::new(Musixmatch::new(http_client.clone()))),
                    other => {
                        tracing::warn!(provider = other, "Unknown lyrics provider, skipped");
                        None
                    }
                }
            })
            .collect();
        Self::new(providers)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Find lyrics for a song.
    ///
    /// `minimal` is the fallback query; an empty one counts as absent. With
    /// `strict`, only `full` is ever used.
    pub async fn resolve(&self, full: &str, minimal: &str, strict: bool) -> Option<LyricsMatch> {
        if full.trim().is_empty() {
            return None;
        }
        let fallback = (!strict && !minimal.trim().is_empty()).then_some(minimal);

        for provider in &self.providers {
            tracing::info!(source = %provider.source(), query = full, "Querying lyrics provider");
            if let Some(found) = self.resolve_with(provider.as_ref(), full, fallback).await {
                tracing::info!(source = %provider.source(), "Lyrics found");
                return Some(found);
            }
        }
        tracing::info!(query = full, "No lyrics found");
        None
    }

    async fn resolve_with(
        &self,
        provider: &dyn LyricsProvider,
        full: &str,
        fallback: Option<&str>,
    ) -> Option<LyricsMatch> {
        let mut used_fallback = false;
        let mut url = search(provider, full).await;

        if url.is_none()
            && let Some(minimal) = fallback
        {
            tracing::info!(source = %provider.source(), "Retrying lyrics search with the minimal query");
            used_fallback = true;
            url = search(provider, minimal).await;
        }

        let url = url?;
        let found = load(provider, &url).await;
        if found.is_some() || used_fallback {
            return found;
        }

        let minimal = fallback?;
        tracing::info!(source = %provider.source(), "Lyrics page was empty, retrying with the minimal query");
        let url = search(provider, minimal).await?;
        load(provider, &url).await
    }
}

async fn search(provider: &dyn LyricsProvider, query: &str) -> Option<String> {
    or_log(provider, provider.search(query).await)
}

async fn load(provider: &dyn LyricsProvider, url: &str) -> Option<LyricsMatch> {
    or_log(provider, provider.load(url).await).filter(|m| !m.lyrics.trim().is_empty())
}

fn or_log<T>(provider: &dyn LyricsProvider, result: Result<Option<T>, EnrichmentError>) -> Option<T> {
    match result {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(source = %provider.source(), error = %e, "Lyrics provider request failed");
            None
        }
    }
}
