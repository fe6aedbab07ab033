//! Offline query inspection.

use std::path::Path;

use crate::metadata;
use crate::model::Song;

/// Print the seed tags of a file and the queries derived from them
pub fn cmd_query(path: &Path) -> anyhow::Result<()> {
    let seed = metadata::load(path)?;
    println!("File:     {}", path.display());
    println!("Title:    {}", seed.title.as_deref().unwrap_or("-"));
    println!("Artist:   {}", seed.artist.as_deref().unwrap_or("-"));

    let song = Song::new(path, path, seed)?;
    println!("Query:    {}", song.query());
    println!("Minimal:  {}", song.minimal_query());
    println!("Accuracy: {}", song.query_accuracy().score());
    Ok(())
}
