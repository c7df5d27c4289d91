//! Read and write paths for the whole tag envelope.

use tracing::debug;

use crate::codec::{chapters, descriptor, lyrics, DecodeLimits, ExtendedAudioInfo};
use crate::error::{Error, Result};
use crate::metadata::{ChapterRecord, LyricsRecord, MediaFile};
use crate::wire::WireWriter;

/// Everything the envelope carries for one file, in decoded form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    pub info: ExtendedAudioInfo,
    pub chapters: Vec<ChapterRecord>,
    pub lyrics: Vec<LyricsRecord>,
}

impl TagSnapshot {
    pub fn capture(file: &MediaFile) -> Self {
        Self {
            info: ExtendedAudioInfo::from_variant(file.variant()),
            chapters: file.tag().map(chapters::collect).unwrap_or_default(),
            lyrics: lyrics::collect(file),
        }
    }

    /// Top-level entries the envelope will declare.
    pub fn entry_count(&self) -> u32 {
        self.info.count()
            + u32::from(!self.chapters.is_empty())
            + u32::from(!self.lyrics.is_empty())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = WireWriter::new();
        writer.begin_map(self.entry_count());
        descriptor::encode_entries(&mut writer, &self.info);
        if !self.chapters.is_empty() {
            chapters::encode(&mut writer, &self.chapters);
        }
        if !self.lyrics.is_empty() {
            lyrics::encode(&mut writer, &self.lyrics);
        }
        writer.end_map();
        writer.finish()
    }
}

/// Sections of an incoming envelope that will replace stored data.
/// `None` leaves that part of the file alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub chapters: Option<Vec<ChapterRecord>>,
    pub lyrics: Option<Vec<LyricsRecord>>,
}

impl TagUpdate {
    /// Decode every section before anything is committed, so a malformed
    /// envelope never leaves the file half-updated.
    pub fn decode(data: &[u8], limits: &DecodeLimits) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidInput("No tag data provided".to_string()));
        }
        Ok(Self {
            chapters: chapters::decode(data, limits)?,
            lyrics: lyrics::decode(data, limits)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_none() && self.lyrics.is_none()
    }

    /// Commit the decoded sections. Returns whether anything changed.
    ///
    /// Records the file cannot store side by side fail the call before
    /// either section is committed.
    pub fn apply(self, file: &mut MediaFile) -> Result<bool> {
        if let Some(records) = &self.chapters {
            chapters::check_ids(records)?;
        }

        // lyrics storage checks its input before replacing anything
        let mut changed = match self.lyrics {
            Some(records) => lyrics::commit(file, records)?,
            None => false,
        };

        if let Some(records) = self.chapters {
            match file.tag_mut() {
                Some(tag) => {
                    chapters::commit(tag, records)?;
                    changed = true;
                }
                None => debug!("file has no ID3v2 tag, chapters not applied"),
            }
        }

        Ok(changed)
    }
}

/// Encode the descriptor, chapters and lyrics of `file` as one envelope.
pub fn read_tags(file: &MediaFile) -> Result<Vec<u8>> {
    TagSnapshot::capture(file).encode()
}

/// Decode `data` and replace the chapters and lyrics it carries on `file`.
///
/// The caller saves the file afterwards. Returns whether the model changed.
pub fn write_tags(file: &mut MediaFile, data: &[u8], limits: &DecodeLimits) -> Result<bool> {
    TagUpdate::decode(data, limits)?.apply(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FileVariant, Mp4Codec, Mp4Properties, MpegProperties, MpegVersion};
    use crate::wire::{ValueKind, WireReader};
    use id3::Tag;

    fn mpeg_file() -> MediaFile {
        MediaFile::new(
            FileVariant::Mpeg(Some(MpegProperties {
                version: MpegVersion::Version1,
                layer: 3,
            })),
            Some(Tag::new()),
        )
    }

    fn top_level_keys(data: &[u8]) -> Vec<String> {
        let mut r = WireReader::new(data);
        let n = r.read_map_len().unwrap();
        let mut keys = Vec::new();
        for _ in 0..n {
            keys.push(r.read_str(255).unwrap());
            r.skip_value().unwrap();
        }
        assert_eq!(r.remaining(), 0);
        keys
    }

    #[test]
    fn test_read_tags_without_collections() {
        let data = read_tags(&mpeg_file()).unwrap();
        assert_eq!(
            top_level_keys(&data),
            ["codec", "containerFormat", "isLossless", "mpegVersion", "mpegLayer"]
        );
    }

    #[test]
    fn test_read_tags_for_tagless_variant() {
        let file = MediaFile::new(
            FileVariant::Mp4(Some(Mp4Properties {
                bits_per_sample: 16,
                codec: Mp4Codec::Alac,
                encrypted: false,
            })),
            None,
        );
        let data = read_tags(&file).unwrap();
        assert_eq!(top_level_keys(&data).len(), 4);
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let snapshot = TagSnapshot {
            info: ExtendedAudioInfo::default(),
            chapters: vec![ChapterRecord {
                id: "c1".to_string(),
                start_time_ms: 0,
                end_time_ms: 42_000,
                title: Some("Opening".to_string()),
            }],
            lyrics: vec![LyricsRecord {
                text: "hello".to_string(),
                description: "".to_string(),
                language: "eng".to_string(),
            }],
        };
        let data = snapshot.encode().unwrap();

        let mut file = mpeg_file();
        assert!(write_tags(&mut file, &data, &DecodeLimits::default()).unwrap());

        let read_back = TagSnapshot::capture(&file);
        assert_eq!(read_back.chapters, snapshot.chapters);
        assert_eq!(read_back.lyrics, snapshot.lyrics);

        let keys = top_level_keys(&read_tags(&file).unwrap());
        assert!(keys.contains(&"chapters".to_string()));
        assert!(keys.contains(&"lyrics".to_string()));
    }

    #[test]
    fn test_descriptor_keys_in_input_are_ignored() {
        let mut file = mpeg_file();
        let data = read_tags(&file).unwrap();

        assert!(!write_tags(&mut file, &data, &DecodeLimits::default()).unwrap());
        assert!(TagSnapshot::capture(&file).chapters.is_empty());
    }

    #[test]
    fn test_empty_buffer_is_invalid_input() {
        let err = write_tags(&mut mpeg_file(), &[], &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_bad_lyrics_leave_chapters_untouched() {
        let mut file = mpeg_file();
        chapters::commit(
            file.tag_mut().unwrap(),
            vec![ChapterRecord {
                id: "keep".to_string(),
                ..Default::default()
            }],
        )
        .unwrap();

        let mut w = WireWriter::new();
        w.begin_map(2);
        w.write_str("chapters");
        w.begin_array(0);
        w.end_array();
        w.write_str("lyrics");
        w.begin_array(1);
        w.write_uint(3);
        w.end_array();
        w.end_map();

        let result = write_tags(&mut file, &w.finish().unwrap(), &DecodeLimits::default());
        assert!(result.is_err());
        assert_eq!(TagSnapshot::capture(&file).chapters.len(), 1);
    }

    #[test]
    fn test_clashing_lyrics_leave_chapters_untouched() {
        let mut file = mpeg_file();
        chapters::commit(
            file.tag_mut().unwrap(),
            vec![ChapterRecord {
                id: "keep".to_string(),
                ..Default::default()
            }],
        )
        .unwrap();

        let twin = LyricsRecord {
            text: "same slot".to_string(),
            ..Default::default()
        };
        let update = TagUpdate {
            chapters: Some(Vec::new()),
            lyrics: Some(vec![twin.clone(), twin]),
        };

        let err = update.apply(&mut file).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);

        let snapshot = TagSnapshot::capture(&file);
        assert_eq!(snapshot.chapters.len(), 1);
        assert!(snapshot.lyrics.is_empty());
    }

    #[test]
    fn test_clashing_chapter_ids_leave_lyrics_untouched() {
        let mut file = mpeg_file();
        let chapter = ChapterRecord {
            id: "same".to_string(),
            ..Default::default()
        };
        let update = TagUpdate {
            chapters: Some(vec![chapter.clone(), chapter]),
            lyrics: Some(vec![LyricsRecord::default()]),
        };

        assert!(update.apply(&mut file).is_err());
        assert!(TagSnapshot::capture(&file).lyrics.is_empty());
    }

    #[test]
    fn test_chapters_skipped_without_tag() {
        let mut file = MediaFile::new(FileVariant::OggVorbis, None);
        let data = TagSnapshot {
            chapters: vec![ChapterRecord::default()],
            ..Default::default()
        }
        .encode()
        .unwrap();

        assert!(!write_tags(&mut file, &data, &DecodeLimits::default()).unwrap());
    }

    #[test]
    fn test_entry_count_matches_written_entries() {
        let mut file = mpeg_file();
        lyrics::commit(
            &mut file,
            vec![LyricsRecord {
                text: "x".to_string(),
                ..Default::default()
            }],
        )
        .unwrap();
        let snapshot = TagSnapshot::capture(&file);
        let data = snapshot.encode().unwrap();

        let mut r = WireReader::new(&data);
        assert_eq!(r.peek_kind().unwrap(), ValueKind::Map);
        assert_eq!(r.read_map_len().unwrap(), snapshot.entry_count());
    }
}
