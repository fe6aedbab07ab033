//! Audio file tag reading and writing.
//!
//! Uses the lofty crate for format-independent tag access: every format is
//! handled through lofty's generic [`Tag`], with [`TagFormat`] deciding which
//! native schema the canonical fields land in.
//!
//! # Features
//! - Seed title/artist from whatever tags a file already has
//! - Write the full canonical record into MP4, ID3v2 (MP3/AIFF) and Vorbis
//!   comment (FLAC/OGG) tags
//! - Embed front-cover art, natively or as a base64 picture block for OGG
//! - Optional watermark in the comment field

pub mod format;
pub mod picture;
pub mod schema;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Song;

pub use format::{SUPPORTED_EXTENSIONS, SchemaFamily, TagFormat};

/// The only fields ever read back from a file: they seed the search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedFields {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Read the seed fields from a file's existing tags.
///
/// Missing tags are not an error; an unsupported extension or an unreadable
/// file is.
pub fn load(path: &Path) -> Result<SeedFields> {
    let format = TagFormat::from_path(path)?;

    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, e.to_string()))?
        .options(ParseOptions::new().read_properties(false))
        .read()
        .map_err(|e| Error::metadata(path, e.to_string()))?;

    // Prefer the schema we write, then whatever the file has
    let tag = tagged_file
        .tag(format.tag_type())
        .or_else(|| tagged_file.primary_tag())
        .or_else(|| tagged_file.first_tag());

    Ok(SeedFields {
        title: tag.and_then(|t| non_empty(t.title())),
        artist: tag.and_then(|t| non_empty(t.artist())),
    })
}

fn non_empty(s: Option<Cow<'_, str>>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Write `song` into the tags of the file at its current path.
pub fn save(song: &Song, cover: Option<&[u8]>, watermark: Option<&str>) -> Result<()> {
    let path = song.path();
    let format = song.format();

    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, e.to_string()))?
        .options(ParseOptions::new().read_properties(false))
        .read()
        .map_err(|e| Error::metadata(path, e.to_string()))?;

    let mut tag = tagged_file
        .tag(format.tag_type())
        .cloned()
        .unwrap_or_else(|| Tag::new(format.tag_type()));

    schema::write_fields(format, &mut tag, song, cover, watermark);

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::metadata(path, format!("failed to write tags: {e}")))?;

    tracing::debug!(path = %path.display(), ?format, "Tags written");
    Ok(())
}
