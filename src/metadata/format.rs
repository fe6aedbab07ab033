//! Supported audio containers and the tag schema each one uses.

use lofty::tag::TagType;
use std::path::Path;

use crate::error::{Error, Result};

/// Audio formats whose tags can be read and written.
///
/// Five containers, three schema families: MP4 atoms, ID3v2 frames (MP3 and
/// AIFF) and Vorbis comments (FLAC and OGG).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFormat {
    Mp4,
    Mp3,
    Flac,
    Aiff,
    Ogg,
}

/// Schema family a [`TagFormat`] serializes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFamily {
    Mp4Atoms,
    Id3v2,
    VorbisComments,
}

/// File extensions the codec accepts, lower-case.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["m4a", "mp3", "flac", "aiff", "aif", "ogg"];

impl TagFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "m4a" => Ok(Self::Mp4),
            "mp3" => Ok(Self::Mp3),
            "flac" => Ok(Self::Flac),
            "aiff" | "aif" => Ok(Self::Aiff),
            "ogg" => Ok(Self::Ogg),
            other => Err(Error::unsupported(other)),
        }
    }

    /// Detect the format of a file from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::unsupported(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    pub fn family(self) -> SchemaFamily {
        match self {
            Self::Mp4 => SchemaFamily::Mp4Atoms,
            Self::Mp3 | Self::Aiff => SchemaFamily::Id3v2,
            Self::Flac | Self::Ogg => SchemaFamily::VorbisComments,
        }
    }

    /// The lofty tag type written for this format.
    pub fn tag_type(self) -> TagType {
        match self.family() {
            SchemaFamily::Mp4Atoms => TagType::Mp4Ilst,
            SchemaFamily::Id3v2 => TagType::Id3v2,
            SchemaFamily::VorbisComments => TagType::VorbisComments,
        }
    }

    /// Whether cover art can be stored as a native picture.
    ///
    /// OGG gets a base64 FLAC picture block in a text comment instead.
    pub fn has_native_pictures(self) -> bool {
        !matches!(self, Self::Ogg)
    }
}
