//! Cover art encoding.
//!
//! Native containers take a lofty [`Picture`] directly. Vorbis comments in
//! OGG carry the image as a base64 FLAC `METADATA_BLOCK_PICTURE` block.

use lofty::picture::{MimeType, Picture, PictureInformation, PictureType};

/// Vorbis comment key holding an encoded picture block.
pub const PICTURE_BLOCK_KEY: &str = "METADATA_BLOCK_PICTURE";

/// Front cover picture for formats with native picture support.
pub fn front_cover(data: &[u8]) -> Picture {
    Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::Jpeg),
        None::<String>,
        data.to_vec(),
    )
}

/// Base64 FLAC picture block of a JPEG front cover, ready for a Vorbis comment.
///
/// Dimensions, depth and palette size are left at zero, which readers treat
/// as "unknown".
pub fn encoded_picture_block(data: &[u8]) -> String {
    let encoded = front_cover(data).as_flac_bytes(PictureInformation::default(), true);
    String::from_utf8_lossy(&encoded).into_owned()
}
