//! Test utilities and fixtures for autotagger tests.
//!
//! This module provides common test helpers and fixture factories to reduce
//! boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use autotagger::test_utils::{sample_match, write_minimal_flac};
//!
//! #[test]
//! fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let path = write_minimal_flac(dir.path(), "song.flac");
//!     let found = sample_match();
//!     // ... test logic
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::enrichment::domain::CatalogMatch;

/// A complete catalog match for "Imagine" by John Lennon.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let custom = CatalogMatch {
///     explicit: true,
///     ..sample_match()
/// };
/// ```
pub fn sample_match() -> CatalogMatch {
    CatalogMatch {
        title: Some("Imagine".to_string()),
        artist: Some("John Lennon".to_string()),
        album: Some("Imagine".to_string()),
        genre: Some("Rock".to_string()),
        year: Some(1971),
        artwork_url: Some(
            "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/1000x1000bb.jpg".to_string(),
        ),
        disc_number: Some(1),
        disc_count: Some(1),
        track_number: Some(1),
        track_count: Some(10),
        explicit: false,
        album_url: Some("https://itunes.apple.com/us/album/imagine/1440853776".to_string()),
        track_url: Some(
            "https://itunes.apple.com/us/album/imagine/1440853776?i=1440853781&uo=4".to_string(),
        ),
    }
}

/// Write the smallest FLAC file the tag codec accepts: the stream marker and
/// a single STREAMINFO block, no audio frames.
///
/// Returns the path of the new file inside `dir`.
pub fn write_minimal_flac(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = Vec::with_capacity(42);
    bytes.extend_from_slice(b"fLaC");
    // Last-metadata-block flag + STREAMINFO type, then a 24-bit length
    bytes.push(0x80);
    bytes.extend_from_slice(&[0x00, 0x00, 34]);

    // Min/max block size
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    // Min/max frame size, unknown
    bytes.extend_from_slice(&[0; 6]);
    // 44.1 kHz, stereo, 16 bits per sample, zero samples
    let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36);
    bytes.extend_from_slice(&packed.to_be_bytes());
    // MD5 of the (empty) audio
    bytes.extend_from_slice(&[0; 16]);

    write_fixture(dir, name, bytes)
}

/// Write the smallest MPEG-1 Layer III stream the codec accepts: four silent
/// 128 kbps / 44.1 kHz frames.
pub fn write_minimal_mp3(dir: &Path, name: &str) -> PathBuf {
    const FRAME_LEN: usize = 417;
    let mut bytes = Vec::with_capacity(4 * FRAME_LEN);
    for _ in 0..4 {
        bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        bytes.resize(bytes.len() + FRAME_LEN - 4, 0);
    }
    write_fixture(dir, name, bytes)
}

/// Write an AIFF file with a COMM chunk and an empty SSND chunk.
pub fn write_minimal_aiff(dir: &Path, name: &str) -> PathBuf {
    let mut comm = Vec::with_capacity(18);
    // Mono, zero sample frames, 16 bits
    comm.extend_from_slice(&1u16.to_be_bytes());
    comm.extend_from_slice(&0u32.to_be_bytes());
    comm.extend_from_slice(&16u16.to_be_bytes());
    // 44100 as an 80-bit extended float
    comm.extend_from_slice(&[0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]);

    let mut body = Vec::new();
    body.extend_from_slice(b"AIFF");
    body.extend_from_slice(b"COMM");
    body.extend_from_slice(&(comm.len() as u32).to_be_bytes());
    body.extend_from_slice(&comm);
    body.extend_from_slice(b"SSND");
    body.extend_from_slice(&8u32.to_be_bytes());
    // Offset and block size
    body.extend_from_slice(&[0; 8]);

    let mut bytes = Vec::with_capacity(body.len() + 8);
    bytes.extend_from_slice(b"FORM");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    write_fixture(dir, name, bytes)
}

/// Write an Ogg Vorbis stream holding only the three header packets, one
/// page each.
pub fn write_minimal_ogg(dir: &Path, name: &str) -> PathBuf {
    let mut ident = b"\x01vorbis".to_vec();
    ident.extend_from_slice(&0u32.to_le_bytes());
    ident.push(2);
    ident.extend_from_slice(&44_100u32.to_le_bytes());
    // Maximum, nominal and minimum bitrate
    ident.extend_from_slice(&0u32.to_le_bytes());
    ident.extend_from_slice(&128_000u32.to_le_bytes());
    ident.extend_from_slice(&0u32.to_le_bytes());
    ident.extend_from_slice(&[0xB8, 0x01]);

    let vendor = b"autotagger";
    let mut comment = b"\x03vorbis".to_vec();
    comment.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    comment.extend_from_slice(vendor);
    comment.extend_from_slice(&0u32.to_le_bytes());
    comment.push(1);

    let mut setup = b"\x05vorbis".to_vec();
    setup.extend_from_slice(&[0; 8]);

    let mut bytes = ogg_page(0x02, 0, &ident);
    bytes.extend(ogg_page(0x00, 1, &comment));
    bytes.extend(ogg_page(0x00, 2, &setup));
    write_fixture(dir, name, bytes)
}

/// One Ogg page carrying a single short packet. The CRC is left at zero.
fn ogg_page(header_type: u8, sequence: u32, packet: &[u8]) -> Vec<u8> {
    assert!(packet.len() < 255, "packet needs more than one lacing value");
    let mut page = Vec::with_capacity(28 + packet.len());
    page.extend_from_slice(b"OggS");
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&0u64.to_le_bytes());
    page.extend_from_slice(&1u32.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&0u32.to_le_bytes());
    page.push(1);
    page.push(packet.len() as u8);
    page.extend_from_slice(packet);
    page
}

/// Write an MP4 file with an `ftyp` and a `moov` holding only `mvhd`.
pub fn write_minimal_m4a(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&24u32.to_be_bytes());
    bytes.extend_from_slice(b"ftypM4A ");
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(b"M4A isom");

    let mut mvhd = vec![0u8; 100];
    // Timescale, after version/flags and two timestamps
    mvhd[12..16].copy_from_slice(&1000u32.to_be_bytes());
    bytes.extend_from_slice(&(8 + 8 + mvhd.len() as u32).to_be_bytes());
    bytes.extend_from_slice(b"moov");
    bytes.extend_from_slice(&(8 + mvhd.len() as u32).to_be_bytes());
    bytes.extend_from_slice(b"mvhd");
    bytes.extend_from_slice(&mvhd);
    write_fixture(dir, name, bytes)
}

/// Write the minimal fixture matching `name`'s extension.
pub fn write_minimal_audio(dir: &Path, name: &str) -> PathBuf {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "flac" => write_minimal_flac(dir, name),
        "mp3" => write_minimal_mp3(dir, name),
        "aiff" | "aif" => write_minimal_aiff(dir, name),
        "ogg" => write_minimal_ogg(dir, name),
        "m4a" => write_minimal_m4a(dir, name),
        other => panic!("no audio fixture for .{other}"),
    }
}

fn write_fixture(dir: &Path, name: &str, bytes: Vec<u8>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write audio fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_match_defaults() {
        let found = sample_match();
        assert_eq!(found.title.as_deref(), Some("Imagine"));
        assert_eq!(found.year, Some(1971));
        assert!(!found.explicit);
        assert!(found.track_url.unwrap().contains("itunes"));
    }

    #[test]
    fn test_minimal_flac_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_minimal_flac(dir.path(), "x.flac");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 42);
        assert_eq!(&bytes[..4], b"fLaC");
        assert_eq!(bytes[7], 34);
    }

    #[test]
    fn test_minimal_fixture_headers() {
        let dir = tempfile::tempdir().unwrap();
        let read = |name: &str| std::fs::read(write_minimal_audio(dir.path(), name)).unwrap();

        let mp3 = read("x.mp3");
        assert_eq!(mp3.len(), 4 * 417);
        assert_eq!(&mp3[417..419], &[0xFF, 0xFB]);

        let aiff = read("x.aif");
        assert_eq!(&aiff[8..12], b"AIFF");
        assert_eq!(u32::from_be_bytes(aiff[4..8].try_into().unwrap()) as usize, aiff.len() - 8);

        let ogg = read("x.ogg");
        assert_eq!(&ogg[29..35], b"vorbis");
        assert_eq!(ogg.windows(4).filter(|w| *w == b"OggS").count(), 3);

        let m4a = read("x.m4a");
        assert_eq!(&m4a[4..8], b"ftyp");
        assert_eq!(&m4a[28..32], b"moov");
        assert_eq!(u32::from_be_bytes(m4a[24..28].try_into().unwrap()) as usize, m4a.len() - 24);
    }
}
