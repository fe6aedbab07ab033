//! Single-file lookup without writing.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::enrichment::EnrichmentService;
use crate::model::{Cover, Song};

/// Resolve one file and print the match
pub fn cmd_identify(rt: &Runtime, config: &Config, path: &Path) -> anyhow::Result<()> {
    let mut song = Song::open(path, path)?;
    let service = EnrichmentService::new(config)?;

    println!("Identifying: {}", path.display());
    println!("  Query:  {} ({})", song.query(), song.query_accuracy().score());
    println!();

    // No cover directory: the cover stays a remote URL and nothing is written
    let resolution = rt.block_on(service.resolve_all(&mut song, None));
    if !resolution.found {
        println!("✗ No match found");
        return Ok(());
    }

    println!("✓ Match found!");
    println!();
    print_field("Title", song.title());
    print_field("Artist", song.artist());
    print_field("Album", song.album());
    print_field("Genre", song.genre());
    if let Some(year) = song.year() {
        println!("  Year:   {year}");
    }
    if let Some((n, c)) = song.track().pair() {
        println!("  Track:  {n}/{c}");
    }
    if let Some((n, c)) = song.disc().pair() {
        println!("  Disc:   {n}/{c}");
    }
    if song.is_explicit() {
        println!("  Explicit");
    }
    if let Some(Cover::Remote(url)) = song.cover() {
        println!("  Cover:  {url}");
    }
    print_field("URL", song.track_url());

    if let Some(lyrics) = song.lyrics() {
        println!();
        print_field("Writer", song.lyrics_writer());
        println!("  Lyrics: {} lines", lyrics.lines().count());
    }
    Ok(())
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("  {:<7} {value}", format!("{label}:"));
    }
}
