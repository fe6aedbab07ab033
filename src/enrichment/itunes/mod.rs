//! iTunes Search API integration
//!
//! The song catalog: resolves a free-text query to one song, disambiguating
//! when several come back.
//!
//! API docs: https://performance-partners.apple.com/search-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::{select_best, to_catalog_match};
pub use client::ITunesClient;
