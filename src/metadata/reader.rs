use std::io::Cursor;
use std::path::Path;

use id3::Tag;
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{detect_format, probe};
use crate::metadata::MediaFile;

/// Open an audio file: sniff its format, probe properties, and load the tag
/// container for formats that store chapters and lyrics in ID3v2.
///
/// MPEG keeps the tag in front of the stream; WAV and AIFF keep it in an
/// `ID3 ` chunk. `id3` picks the layout from the leading bytes.
pub fn open_media_file(path: &Path) -> Result<MediaFile> {
    let bytes = std::fs::read(path).map_err(Error::Read)?;
    let kind = detect_format(&bytes).ok_or(Error::UnsupportedFormat)?;
    debug!(path = %path.display(), format = kind.name(), "detected format");

    let variant = probe(kind, &bytes);

    let tag = if kind.carries_id3v2() {
        match Tag::read_from2(Cursor::new(&bytes)) {
            Ok(tag) => Some(tag),
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => {
                debug!(path = %path.display(), "no ID3v2 tag, starting empty");
                Some(Tag::new())
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        None
    };

    Ok(MediaFile::new(variant, tag))
}
