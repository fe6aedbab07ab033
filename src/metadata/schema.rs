//! Canonical record → native tag schema mapping.
//!
//! Every format family gets one writer. Each writer sets every field its
//! schema supports; a field with no value is removed from the tag so stale
//! data never survives a re-tag.

use lofty::mp4::AdvisoryRating;
use lofty::picture::PictureType;
use lofty::tag::{Accessor, ItemKey, ItemValue, Tag, TagItem};

use super::format::{SchemaFamily, TagFormat};
use super::picture;
use crate::model::{Numbering, Song};

/// Vorbis key for the track page URL
const VORBIS_TRACK_URL: &str = "WWWAUDIOFILE";
/// Vorbis key for the album page URL
const VORBIS_ALBUM_URL: &str = "WWWARTIST";
/// Plain year, kept apart from the typed DATE comment
const VORBIS_YEAR: &str = "YEAR";
/// ID3v2 plain-text year frame
const ID3_YEAR: &str = "TYER";
/// ID3v2 official audio file webpage frame
const ID3_TRACK_URL: &str = "WOAF";

/// Write all of `song`'s fields into `tag` using `format`'s schema.
///
/// `cover` is the raw JPEG to embed; `watermark` goes into the comment field
/// when present and leaves it untouched otherwise.
pub fn write_fields(
    format: TagFormat,
    tag: &mut Tag,
    song: &Song,
    cover: Option<&[u8]>,
    watermark: Option<&str>,
) {
    set_text(tag, ItemKey::TrackTitle, song.title());
    set_text(tag, ItemKey::TrackArtist, song.artist());
    set_text(tag, ItemKey::AlbumArtist, song.album_artist());
    set_text(tag, ItemKey::AlbumTitle, song.album());
    set_text(tag, ItemKey::Genre, song.genre());
    set_text(tag, ItemKey::Composer, song.composer());
    set_text(tag, ItemKey::Lyrics, song.lyrics());

    let year = song.year().map(|y| y.to_string());

    match format.family() {
        SchemaFamily::Mp4Atoms => {
            set_text(tag, ItemKey::RecordingDate, year.as_deref());
            set_text(tag, ItemKey::ContentGroup, song.group());
            let rating = if song.is_explicit() {
                AdvisoryRating::Explicit
            } else {
                AdvisoryRating::Clean
            };
            let rating = rating.as_u8().to_string();
            set_text(tag, ItemKey::ParentalAdvisory, Some(&rating));
            set_numbering_accessor(tag, song.disc(), song.track());
        }
        SchemaFamily::Id3v2 => {
            // A RecordingDate item would become a typed TDRC timestamp
            remove(tag, &ItemKey::RecordingDate);
            set_unknown_text(tag, ID3_YEAR, year.as_deref());
            set_text(tag, ItemKey::Lyricist, song.lyrics_writer());
            match song.track_url() {
                Some(url) if !url.is_empty() => {
                    set_unknown(tag, ID3_TRACK_URL, ItemValue::Locator(url.to_string()))
                }
                _ => remove(tag, &ItemKey::Unknown(ID3_TRACK_URL.to_string())),
            }
            set_numbering_accessor(tag, song.disc(), song.track());
        }
        SchemaFamily::VorbisComments => {
            set_unknown_text(tag, VORBIS_YEAR, year.as_deref());
            set_text(tag, ItemKey::Lyricist, song.lyrics_writer());
            set_text(tag, ItemKey::ContentGroup, song.group());
            set_unknown_text(tag, VORBIS_TRACK_URL, song.track_url());
            set_unknown_text(tag, VORBIS_ALBUM_URL, song.album_url());
            // Counts live inside the "n/c" value
            remove(tag, &ItemKey::DiscTotal);
            remove(tag, &ItemKey::TrackTotal);
            let disc = song.disc().pair().map(format_pair);
            let track = song.track().pair().map(format_pair);
            set_text(tag, ItemKey::DiscNumber, disc.as_deref());
            set_text(tag, ItemKey::TrackNumber, track.as_deref());
        }
    }

    if let Some(data) = cover {
        tag.remove_picture_type(PictureType::CoverFront);
        if format.has_native_pictures() {
            tag.push_picture(picture::front_cover(data));
        } else {
            set_unknown(
                tag,
                picture::PICTURE_BLOCK_KEY,
                ItemValue::Text(picture::encoded_picture_block(data)),
            );
        }
    }

    if let Some(text) = watermark {
        tag.insert_text(ItemKey::Comment, text.to_string());
    }
}

/// `"number/count"` as stored by Vorbis comments.
fn format_pair((number, count): (u32, u32)) -> String {
    format!("{number}/{count}")
}

/// Numbering through the typed accessors; an incomplete pair is removed.
fn set_numbering_accessor(tag: &mut Tag, disc: Numbering, track: Numbering) {
    match disc.pair() {
        Some((number, count)) => {
            tag.set_disk(number);
            tag.set_disk_total(count);
        }
        None => {
            tag.remove_disk();
            tag.remove_disk_total();
        }
    }
    match track.pair() {
        Some((number, count)) => {
            tag.set_track(number);
            tag.set_track_total(count);
        }
        None => {
            tag.remove_track();
            tag.remove_track_total();
        }
    }
}

fn set_text(tag: &mut Tag, key: ItemKey, value: Option<&str>) {
    match value {
        Some(v) if !v.is_empty() => {
            if !tag.insert_text(key.clone(), v.to_string()) {
                tracing::debug!(?key, tag_type = ?tag.tag_type(), "Key not representable, skipped");
            }
        }
        _ => remove(tag, &key),
    }
}

fn set_unknown_text(tag: &mut Tag, key: &str, value: Option<&str>) {
    match value {
        Some(v) if !v.is_empty() => set_unknown(tag, key, ItemValue::Text(v.to_string())),
        _ => remove(tag, &ItemKey::Unknown(key.to_string())),
    }
}

/// Insert a raw, format-specific key that has no generic [`ItemKey`].
fn set_unknown(tag: &mut Tag, key: &str, value: ItemValue) {
    let key = ItemKey::Unknown(key.to_string());
    remove(tag, &key);
    tag.insert_unchecked(TagItem::new(key, value));
}

fn remove(tag: &mut Tag, key: &ItemKey) {
    tag.retain(|item| item.key() != key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::domain::LyricsMatch;
    use crate::test_utils::sample_match;
    use lofty::id3::v2::{Frame, FrameId, Id3v2Tag};
    use lofty::mp4::Ilst;
    use std::path::Path;

    fn song_for(ext: &str) -> Song {
        let path = format!("/music/in.{ext}");
        let mut song = Song::new(Path::new(&path), Path::new(&path), Default::default()).unwrap();
        song.apply_catalog_match(sample_match());
        song.set_lyrics(LyricsMatch {
            lyrics: "Imagine there's no heaven".to_string(),
            writer: Some("John Lennon".to_string()),
        });
        song
    }

    fn written(ext: &str, cover: Option<&[u8]>, watermark: Option<&str>) -> Tag {
        let song = song_for(ext);
        let format = TagFormat::from_extension(ext).unwrap();
        let mut tag = Tag::new(format.tag_type());
        write_fields(format, &mut tag, &song, cover, watermark);
        tag
    }

    fn unknown<'a>(tag: &'a Tag, key: &str) -> Option<&'a str> {
        tag.get_string(&ItemKey::Unknown(key.to_string()))
    }

    #[test]
    fn test_common_fields_in_every_format() {
        for ext in ["m4a", "mp3", "flac", "aiff", "ogg"] {
            let tag = written(ext, None, None);
            assert_eq!(tag.get_string(&ItemKey::TrackTitle), Some("Imagine"), "{ext}");
            assert_eq!(tag.get_string(&ItemKey::TrackArtist), Some("John Lennon"), "{ext}");
            assert_eq!(tag.get_string(&ItemKey::AlbumArtist), Some("John Lennon"), "{ext}");
            assert_eq!(tag.get_string(&ItemKey::AlbumTitle), Some("Imagine"), "{ext}");
            assert_eq!(tag.get_string(&ItemKey::Genre), Some("Rock"), "{ext}");
            assert!(tag.get_string(&ItemKey::Lyrics).is_some(), "{ext}");
        }
    }

    #[test]
    fn test_mp4_schema() {
        let tag = written("m4a", None, None);
        assert_eq!(tag.get_string(&ItemKey::RecordingDate), Some("1971"));
        assert_eq!(Ilst::from(tag.clone()).advisory_rating(), Some(AdvisoryRating::Clean));
        assert_eq!(tag.track(), Some(1));
        assert_eq!(tag.track_total(), Some(10));
        assert_eq!(tag.disk(), Some(1));
        assert_eq!(tag.disk_total(), Some(1));
        assert!(tag.get_string(&ItemKey::Lyricist).is_none());
    }

    #[test]
    fn test_mp4_explicit_rating() {
        let mut song = song_for("m4a");
        let mut explicit = sample_match();
        explicit.explicit = true;
        song.apply_catalog_match(explicit);
        let mut tag = Tag::new(TagFormat::Mp4.tag_type());
        write_fields(TagFormat::Mp4, &mut tag, &song, None, None);
        assert_eq!(Ilst::from(tag).advisory_rating(), Some(AdvisoryRating::Explicit));
    }

    #[test]
    fn test_id3_schema() {
        for ext in ["mp3", "aiff"] {
            let tag = written(ext, None, None);
            assert!(tag.get_string(&ItemKey::RecordingDate).is_none());
            assert_eq!(tag.get_string(&ItemKey::Lyricist), Some("John Lennon"));
            assert_eq!(tag.track(), Some(1));
            assert_eq!(tag.track_total(), Some(10));
            let url = tag
                .get(&ItemKey::Unknown("WOAF".to_string()))
                .map(|item| item.value().clone());
            assert!(matches!(url, Some(ItemValue::Locator(ref u)) if u.contains("itunes")));

            let id3 = Id3v2Tag::from(tag);
            let year = id3.get(&FrameId::new("TYER").unwrap());
            assert!(matches!(year, Some(Frame::Text(f)) if f.value == "1971"), "{ext}");
            assert!(id3.get(&FrameId::new("TDRC").unwrap()).is_none(), "{ext}");
        }
    }

    #[test]
    fn test_id3_year_replaces_stale_timestamp() {
        let mut tag = Tag::new(TagFormat::Mp3.tag_type());
        tag.insert_text(ItemKey::RecordingDate, "1999-01-01".to_string());
        write_fields(TagFormat::Mp3, &mut tag, &song_for("mp3"), None, None);
        assert!(tag.get_string(&ItemKey::RecordingDate).is_none());
        assert_eq!(unknown(&tag, "TYER"), Some("1971"));
    }

    #[test]
    fn test_vorbis_schema() {
        for ext in ["flac", "ogg"] {
            let tag = written(ext, None, None);
            assert_eq!(unknown(&tag, "YEAR"), Some("1971"));
            assert_eq!(tag.get_string(&ItemKey::TrackNumber), Some("1/10"));
            assert_eq!(tag.get_string(&ItemKey::DiscNumber), Some("1/1"));
            assert!(unknown(&tag, "WWWAUDIOFILE").unwrap().contains("itunes"));
            assert!(unknown(&tag, "WWWARTIST").unwrap().contains("album"));
        }
    }

    #[test]
    fn test_numbering_omitted_without_count() {
        let mut song = song_for("flac");
        let mut partial = sample_match();
        partial.track_count = None;
        partial.disc_number = None;
        song.apply_catalog_match(partial);
        let mut tag = Tag::new(TagFormat::Flac.tag_type());
        write_fields(TagFormat::Flac, &mut tag, &song, None, None);
        assert!(tag.get_string(&ItemKey::TrackNumber).is_none());
        assert!(tag.get_string(&ItemKey::DiscNumber).is_none());
    }

    fn incomplete_numbering(ext: &str) -> Song {
        let mut song = song_for(ext);
        let mut partial = sample_match();
        partial.track_count = None;
        partial.disc_count = None;
        song.apply_catalog_match(partial);
        song
    }

    #[test]
    fn test_incomplete_numbering_clears_stale_vorbis_values() {
        let mut tag = Tag::new(TagFormat::Flac.tag_type());
        tag.insert_text(ItemKey::TrackNumber, "7/9".to_string());
        tag.insert_text(ItemKey::TrackTotal, "9".to_string());
        tag.insert_text(ItemKey::DiscNumber, "2/2".to_string());

        write_fields(TagFormat::Flac, &mut tag, &incomplete_numbering("flac"), None, None);
        assert!(tag.get_string(&ItemKey::TrackNumber).is_none());
        assert!(tag.get_string(&ItemKey::TrackTotal).is_none());
        assert!(tag.get_string(&ItemKey::DiscNumber).is_none());
    }

    #[test]
    fn test_incomplete_numbering_clears_stale_accessor_values() {
        for format in [TagFormat::Mp3, TagFormat::Mp4] {
            let mut tag = Tag::new(format.tag_type());
            tag.set_track(7);
            tag.set_track_total(9);
            tag.set_disk(2);
            tag.set_disk_total(2);

            let ext = if format == TagFormat::Mp3 { "mp3" } else { "m4a" };
            write_fields(format, &mut tag, &incomplete_numbering(ext), None, None);
            assert_eq!(tag.track(), None, "{format:?}");
            assert_eq!(tag.track_total(), None, "{format:?}");
            assert_eq!(tag.disk(), None, "{format:?}");
            assert_eq!(tag.disk_total(), None, "{format:?}");
        }
    }

    #[test]
    fn test_empty_fields_clear_stale_values() {
        let mut tag = Tag::new(TagFormat::Flac.tag_type());
        tag.insert_text(ItemKey::Composer, "Stale Composer".to_string());
        let song = song_for("flac");
        write_fields(TagFormat::Flac, &mut tag, &song, None, None);
        assert!(song.composer().is_none());
        assert!(tag.get_string(&ItemKey::Composer).is_none());
    }

    #[test]
    fn test_watermark_only_touches_comment() {
        let tag = written("mp3", None, Some("Processed by autotagger"));
        assert_eq!(
            tag.get_string(&ItemKey::Comment),
            Some("Processed by autotagger")
        );
        assert_eq!(tag.get_string(&ItemKey::TrackTitle), Some("Imagine"));

        let mut tag = Tag::new(TagFormat::Flac.tag_type());
        tag.insert_text(ItemKey::Comment, "keep me".to_string());
        write_fields(TagFormat::Flac, &mut tag, &song_for("flac"), None, None);
        assert_eq!(tag.get_string(&ItemKey::Comment), Some("keep me"));
    }

    #[test]
    fn test_native_cover_embedding() {
        let cover = [0xFF, 0xD8, 0xFF, 0xE0];
        for ext in ["m4a", "mp3", "flac"] {
            let tag = written(ext, Some(&cover), None);
            assert_eq!(tag.pictures().len(), 1, "{ext}");
            assert_eq!(tag.pictures()[0].pic_type(), PictureType::CoverFront);
        }
    }

    #[test]
    fn test_ogg_cover_is_text_block() {
        let cover = [0xFF, 0xD8, 0xFF, 0xE0];
        let tag = written("ogg", Some(&cover), None);
        assert!(tag.pictures().is_empty());
        assert_eq!(
            unknown(&tag, "METADATA_BLOCK_PICTURE"),
            Some(picture::encoded_picture_block(&cover).as_str())
        );
    }
}
