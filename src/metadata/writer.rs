use std::path::Path;

use id3::Version;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metadata::MediaFile;

/// Write the file's tag container back to disk as ID3v2.4. WAV and AIFF
/// files get an `ID3 ` chunk, everything else a leading tag.
///
/// Files without a tag container have nothing this crate can persist, so
/// this is a no-op for them.
pub fn save_media_file(path: &Path, file: &MediaFile) -> Result<()> {
    let Some(tag) = file.tag() else {
        debug!(path = %path.display(), "no tag container to save");
        return Ok(());
    };

    tag.write_to_path(path, Version::Id3v24).map_err(Error::Save)?;
    debug!(path = %path.display(), "saved tag");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FileVariant;
    use id3::Tag;

    #[test]
    fn test_write_to_nonexistent_fails() {
        let file = MediaFile::new(FileVariant::Mpeg(None), Some(Tag::new()));
        let err = save_media_file(Path::new("/nonexistent/dir/file.mp3"), &file).unwrap_err();
        assert!(matches!(err, Error::Save(_)));
        assert_eq!(err.code(), crate::error::ErrorCode::IoWrite);
    }

    #[test]
    fn test_without_tag_is_noop() {
        let file = MediaFile::new(FileVariant::Flac(None), None);
        assert!(save_media_file(Path::new("/nonexistent/file.flac"), &file).is_ok());
    }
}
