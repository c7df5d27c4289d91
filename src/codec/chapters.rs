//! Chapters, stored as ID3v2 `CHAP` frames.

use std::collections::HashSet;

use id3::frame::{Chapter, Content};
use id3::{Frame, Tag, TagLike};
use tracing::{debug, warn};

use super::{DecodeLimits, CHAPTERS_KEY};
use crate::error::{Error, ParseError, Result};
use crate::metadata::ChapterRecord;
use crate::wire::{ValueKind, WireReader, WireWriter};

const FIELD_ID: &str = "id";
const FIELD_START: &str = "startTimeMs";
const FIELD_END: &str = "endTimeMs";
const FIELD_TITLE: &str = "title";

/// CHAP frames do not point into the audio stream by byte offset.
const NO_OFFSET: u32 = 0xFFFF_FFFF;

/// Well-formed chapters in storage order. `CHAP` frames whose payload did
/// not parse as a chapter are left out.
pub fn collect(tag: &Tag) -> Vec<ChapterRecord> {
    tag.frames()
        .filter(|frame| frame.id() == "CHAP")
        .filter_map(|frame| match frame.content() {
            Content::Chapter(chapter) => Some(ChapterRecord {
                id: chapter.element_id.clone(),
                start_time_ms: chapter.start_time,
                end_time_ms: chapter.end_time,
                title: embedded_title(chapter),
            }),
            _ => {
                warn!("skipping CHAP frame without a chapter payload");
                None
            }
        })
        .collect()
}

fn embedded_title(chapter: &Chapter) -> Option<String> {
    chapter
        .frames
        .iter()
        .find(|frame| frame.id() == "TIT2")
        .and_then(|frame| frame.content().text())
        .filter(|title| !title.is_empty())
        .map(str::to_string)
}

/// Write the `chapters` key and its array into an open map.
///
/// The caller declares the key only when `records` is non-empty.
pub fn encode(writer: &mut WireWriter, records: &[ChapterRecord]) {
    writer.write_str(CHAPTERS_KEY);
    writer.begin_array(records.len() as u32);
    for record in records {
        writer.begin_map(record.field_count());
        writer.write_str(FIELD_ID);
        writer.write_str(&record.id);
        writer.write_str(FIELD_START);
        writer.write_uint(u64::from(record.start_time_ms));
        writer.write_str(FIELD_END);
        writer.write_uint(u64::from(record.end_time_ms));
        if record.has_title() {
            writer.write_str(FIELD_TITLE);
            writer.write_str(record.title.as_deref().unwrap_or_default());
        }
        writer.end_map();
    }
    writer.end_array();
}

/// Find and decode the `chapters` section of an envelope.
///
/// `Ok(None)` means there is nothing to apply: the key is absent, or its
/// value is not an array. Any structural problem inside the section fails
/// the whole decode, and so does an id given to more than one chapter.
pub fn decode(data: &[u8], limits: &DecodeLimits) -> Result<Option<Vec<ChapterRecord>>> {
    let mut reader = WireReader::new(data);
    let entries = reader.read_map_len()?;
    let mut found = None;

    for _ in 0..entries {
        let key = reader.read_str(limits.max_key_len)?;
        if key != CHAPTERS_KEY {
            reader.skip_value()?;
            continue;
        }
        if reader.peek_kind()? != ValueKind::Array {
            warn!("chapters value is not an array, ignoring it");
            reader.skip_value()?;
            continue;
        }

        let len = reader.read_array_len()?;
        let mut records = Vec::new();
        for _ in 0..len {
            records.push(decode_record(&mut reader, limits)?);
        }
        assign_missing_ids(&mut records)?;
        found = Some(records);
    }

    if found.is_none() {
        debug!("no chapters in envelope");
    }
    Ok(found)
}

fn decode_record(reader: &mut WireReader<'_>, limits: &DecodeLimits) -> Result<ChapterRecord> {
    let fields = reader.read_map_len()?;
    let mut record = ChapterRecord::default();

    for _ in 0..fields {
        let key = reader.read_str(limits.max_field_key_len)?;
        match key.as_str() {
            FIELD_ID => record.id = reader.read_str(limits.max_value_len)?,
            FIELD_START => record.start_time_ms = reader.read_u32()?,
            FIELD_END => record.end_time_ms = reader.read_u32()?,
            FIELD_TITLE => {
                let title = reader.read_str(limits.max_value_len)?;
                record.title = (!title.is_empty()).then_some(title);
            }
            _ => reader.skip_value()?,
        }
    }

    Ok(record)
}

/// Name every chapter that arrived without an id `chap<N>`, N being its
/// position in the array. When an explicit id already holds that name the
/// first free `chap<N>_<k>`, k = 1, 2, ..., is used instead.
fn assign_missing_ids(records: &mut [ChapterRecord]) -> Result<()> {
    let mut taken = HashSet::new();
    for record in records.iter().filter(|r| !r.id.is_empty()) {
        if !taken.insert(record.id.clone()) {
            return Err(ParseError::DuplicateChapterId(record.id.clone()).into());
        }
    }

    for (index, record) in records.iter_mut().enumerate() {
        if !record.id.is_empty() {
            continue;
        }
        let base = format!("chap{index}");
        let mut id = base.clone();
        let mut k = 1;
        while taken.contains(&id) {
            id = format!("{base}_{k}");
            k += 1;
        }
        debug!(index, id = %id, "synthesized chapter id");
        taken.insert(id.clone());
        record.id = id;
    }
    Ok(())
}

/// Fail unless every chapter has its own element id. A tag keeps one
/// `CHAP` frame per id.
pub fn check_ids(records: &[ChapterRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(Error::InvalidInput(format!(
                "chapter id {:?} appears more than once",
                record.id
            )));
        }
    }
    Ok(())
}

/// Replace every chapter in `tag` with `records`. The tag is untouched if
/// two records share an id.
pub fn commit(tag: &mut Tag, records: Vec<ChapterRecord>) -> Result<()> {
    check_ids(&records)?;

    let removed = tag.remove("CHAP").len();
    debug!(removed, added = records.len(), "replacing chapters");

    for record in records {
        let mut frames = Vec::new();
        if let Some(title) = record.title.filter(|t| !t.is_empty()) {
            frames.push(Frame::text("TIT2", title));
        }
        let replaced = tag.add_frame(Chapter {
            element_id: record.id,
            start_time: record.start_time_ms,
            end_time: record.end_time_ms,
            start_offset: NO_OFFSET,
            end_offset: NO_OFFSET,
            frames,
        });
        debug_assert!(replaced.is_none(), "chapter ids were checked above");
    }
    Ok(())
}

/// Decode the chapters section and, if present, commit it to `tag`.
/// Returns whether the tag was changed.
pub fn apply(tag: &mut Tag, data: &[u8], limits: &DecodeLimits) -> Result<bool> {
    match decode(data, limits)? {
        Some(records) => {
            commit(tag, records)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
