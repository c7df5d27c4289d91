//! The opened file handle and the tag storage the codecs mutate.

mod fields;
mod reader;
mod writer;

pub use fields::{ChapterRecord, LyricsRecord, PropertyMap, LYRICS_PROPERTY};
pub use reader::open_media_file;
pub use writer::save_media_file;

use std::collections::HashSet;

use id3::frame::{Content, Lyrics};
use id3::{Tag, TagLike};

use crate::error::{Error, Result};
use crate::format::FileVariant;

/// Named, multi-valued structured properties on a file.
pub trait ComplexProperties {
    /// All values stored under `key`, in storage order.
    fn complex_properties(&self, key: &str) -> Vec<PropertyMap>;

    /// Replace every value stored under `key`. Returns `Ok(false)` when the
    /// storage cannot hold that property, and an error when it cannot hold
    /// `values` as given. Nothing is changed in either case.
    fn set_complex_properties(&mut self, key: &str, values: Vec<PropertyMap>) -> Result<bool>;
}

/// USLT stores the language as three bytes, space padded.
const USLT_LANGUAGE_LEN: usize = 3;

/// The language as it reads back from a USLT frame.
fn stored_language(lang: &str) -> String {
    let bytes: Vec<u8> = lang.bytes().take(USLT_LANGUAGE_LEN).collect();
    String::from_utf8_lossy(&bytes)
        .trim_end_matches([' ', '\0'])
        .to_string()
}

/// ID3v2 stores lyrics as USLT frames, one per language and description.
impl ComplexProperties for Tag {
    fn complex_properties(&self, key: &str) -> Vec<PropertyMap> {
        if key != LYRICS_PROPERTY {
            return Vec::new();
        }
        self.frames()
            .filter_map(|frame| match frame.content() {
                Content::Lyrics(lyrics) => Some(
                    LyricsRecord {
                        text: lyrics.text.clone(),
                        description: lyrics.description.clone(),
                        language: lyrics.lang.trim_end_matches([' ', '\0']).to_string(),
                    }
                    .into_property_map(),
                ),
                _ => None,
            })
            .collect()
    }

    fn set_complex_properties(&mut self, key: &str, values: Vec<PropertyMap>) -> Result<bool> {
        if key != LYRICS_PROPERTY {
            return Ok(false);
        }

        let records: Vec<LyricsRecord> =
            values.iter().map(LyricsRecord::from_property_map).collect();
        let mut seen = HashSet::new();
        for record in &records {
            let identity = (stored_language(&record.language), record.description.as_str());
            if !seen.insert(identity) {
                return Err(Error::InvalidInput(format!(
                    "more than one lyrics entry with language {:?} and description {:?}",
                    record.language, record.description
                )));
            }
        }

        let _ = self.remove("USLT");
        for record in records {
            let replaced = self.add_frame(Lyrics {
                lang: record.language,
                description: record.description,
                text: record.text,
            });
            debug_assert!(replaced.is_none(), "lyrics identities were checked above");
        }
        Ok(true)
    }
}

/// An opened audio file: its classified variant plus, for formats that have
/// one, the ID3v2 tag holding chapters and lyrics.
#[derive(Debug, Clone)]
pub struct MediaFile {
    variant: FileVariant,
    tag: Option<Tag>,
}

impl MediaFile {
    pub fn new(variant: FileVariant, tag: Option<Tag>) -> Self {
        Self { variant, tag }
    }

    pub fn variant(&self) -> &FileVariant {
        &self.variant
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    pub fn tag_mut(&mut self) -> Option<&mut Tag> {
        self.tag.as_mut()
    }
}

impl ComplexProperties for MediaFile {
    fn complex_properties(&self, key: &str) -> Vec<PropertyMap> {
        self.tag
            .as_ref()
            .map(|tag| tag.complex_properties(key))
            .unwrap_or_default()
    }

    fn set_complex_properties(&mut self, key: &str, values: Vec<PropertyMap>) -> Result<bool> {
        match self.tag.as_mut() {
            Some(tag) => tag.set_complex_properties(key, values),
            None => Ok(false),
        }
    }
}
