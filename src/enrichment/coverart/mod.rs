//! Cover art download
//!
//! The catalog hands out a direct image URL; this module fetches it and
//! stores it under a name derived from the URL.

mod client;

pub use client::{CoverArt, CoverArtClient, cover_file_name};
