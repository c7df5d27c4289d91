//! Lyrics, stored as the `LYRICS` complex property.

use tracing::{debug, warn};

use super::{DecodeLimits, LYRICS_KEY};
use crate::error::Result;
use crate::metadata::{ComplexProperties, LyricsRecord, LYRICS_PROPERTY};
use crate::wire::{ValueKind, WireReader, WireWriter};

const FIELD_TEXT: &str = "text";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_LANGUAGE: &str = "language";

pub fn collect<P: ComplexProperties + ?Sized>(props: &P) -> Vec<LyricsRecord> {
    props
        .complex_properties(LYRICS_PROPERTY)
        .iter()
        .map(LyricsRecord::from_property_map)
        .collect()
}

/// Write the `lyrics` key and its array into an open map.
pub fn encode(writer: &mut WireWriter, records: &[LyricsRecord]) {
    writer.write_str(LYRICS_KEY);
    writer.begin_array(records.len() as u32);
    for record in records {
        writer.begin_map(3);
        writer.write_str(FIELD_TEXT);
        writer.write_str(&record.text);
        writer.write_str(FIELD_DESCRIPTION);
        writer.write_str(&record.description);
        writer.write_str(FIELD_LANGUAGE);
        writer.write_str(&record.language);
        writer.end_map();
    }
    writer.end_array();
}

/// Find and decode the `lyrics` section. Same contract as
/// [`chapters::decode`](super::chapters::decode).
pub fn decode(data: &[u8], limits: &DecodeLimits) -> Result<Option<Vec<LyricsRecord>>> {
    let mut reader = WireReader::new(data);
    let entries = reader.read_map_len()?;
    let mut found = None;

    for _ in 0..entries {
        let key = reader.read_str(limits.max_key_len)?;
        if key != LYRICS_KEY {
            reader.skip_value()?;
            continue;
        }
        if reader.peek_kind()? != ValueKind::Array {
            warn!("lyrics value is not an array, ignoring it");
            reader.skip_value()?;
            continue;
        }

        let len = reader.read_array_len()?;
        let mut records = Vec::new();
        for _ in 0..len {
            records.push(decode_record(&mut reader, limits)?);
        }
        found = Some(records);
    }

    if found.is_none() {
        debug!("no lyrics in envelope");
    }
    Ok(found)
}

fn decode_record(reader: &mut WireReader<'_>, limits: &DecodeLimits) -> Result<LyricsRecord> {
    let fields = reader.read_map_len()?;
    let mut record = LyricsRecord::default();

    for _ in 0..fields {
        let key = reader.read_str(limits.max_field_key_len)?;
        match key.as_str() {
            FIELD_TEXT => record.text = reader.read_str(limits.max_value_len)?,
            FIELD_DESCRIPTION => record.description = reader.read_str(limits.max_description_len)?,
            FIELD_LANGUAGE => record.language = reader.read_str(limits.max_language_len)?,
            _ => reader.skip_value()?,
        }
    }
    Ok(record)
}

/// Replace all lyrics on `props` with `records` in one call.
///
/// Storage that cannot hold lyrics is left alone. Records the storage would
/// have to merge are an error, and nothing is replaced.
pub fn commit<P: ComplexProperties + ?Sized>(
    props: &mut P,
    records: Vec<LyricsRecord>,
) -> Result<bool> {
    let count = records.len();
    let values = records
        .into_iter()
        .map(LyricsRecord::into_property_map)
        .collect();

    let stored = props.set_complex_properties(LYRICS_PROPERTY, values)?;
    if stored {
        debug!(count, "replaced lyrics");
    } else {
        warn!("file cannot store lyrics, leaving them unchanged");
    }
    Ok(stored)
}

/// Decode the lyrics section and, if present, commit it.
/// Returns whether the stored lyrics changed.
pub fn apply<P: ComplexProperties + ?Sized>(
    props: &mut P,
    data: &[u8],
    limits: &DecodeLimits,
) -> Result<bool> {
    match decode(data, limits)? {
        Some(records) => commit(props, records),
        None => Ok(false),
    }
}
