//! Build a [`FileVariant`] from file bytes.
//!
//! Stream parameters come from symphonia's demuxers. MPEG version and layer
//! are not among them, so those two are read from the first frame header.

use std::io::Cursor;

use symphonia::core::codecs::{CodecParameters, CodecType, CODEC_TYPE_AAC, CODEC_TYPE_ALAC};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::{
    FileVariant, FlacProperties, FormatKind, Mp4Codec, Mp4Properties, MpegProperties, MpegVersion,
    PcmProperties,
};

/// Stop looking for an MPEG frame sync after this many bytes past the tag.
const MPEG_SYNC_SCAN_LIMIT: usize = 64 * 1024;

/// Build the variant for `kind`, with properties when they can be read.
pub fn probe(kind: FormatKind, buf: &[u8]) -> FileVariant {
    let variant = match kind {
        FormatKind::Mpeg => FileVariant::Mpeg(mpeg_properties(buf)),
        FormatKind::Flac => FileVariant::Flac(stream_params(kind, buf).and_then(flac_properties)),
        FormatKind::OggFlac => {
            FileVariant::OggFlac(stream_params(kind, buf).and_then(flac_properties))
        }
        FormatKind::Mp4 => FileVariant::Mp4(stream_params(kind, buf).map(mp4_properties)),
        FormatKind::Wav => FileVariant::Wav(stream_params(kind, buf).and_then(pcm_properties)),
        FormatKind::Aiff => FileVariant::Aiff(stream_params(kind, buf).and_then(pcm_properties)),
        other => FileVariant::without_properties(other),
    };

    if !variant.has_properties() {
        debug!(format = kind.name(), "no audio properties available");
    }
    variant
}

fn hint_extension(kind: FormatKind) -> Option<&'static str> {
    match kind {
        FormatKind::Flac => Some("flac"),
        FormatKind::OggFlac => Some("oga"),
        FormatKind::Mp4 => Some("m4a"),
        FormatKind::Wav => Some("wav"),
        FormatKind::Aiff => Some("aiff"),
        _ => None,
    }
}

/// Codec parameters of the default track, if a demuxer accepts the bytes.
fn stream_params(kind: FormatKind, buf: &[u8]) -> Option<CodecParameters> {
    let source = Cursor::new(buf.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = hint_extension(kind) {
        hint.with_extension(ext);
    }

    let probed = match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed,
        Err(e) => {
            debug!(format = kind.name(), error = %e, "demuxer rejected the stream");
            return None;
        }
    };

    let format = probed.format;
    let track = format.default_track()?;
    Some(track.codec_params.clone())
}

fn flac_properties(params: CodecParameters) -> Option<FlacProperties> {
    Some(FlacProperties {
        bits_per_sample: params.bits_per_sample?,
    })
}

fn pcm_properties(params: CodecParameters) -> Option<PcmProperties> {
    Some(PcmProperties {
        bits_per_sample: params.bits_per_sample?,
    })
}

fn mp4_codec(codec: CodecType) -> Mp4Codec {
    if codec == CODEC_TYPE_ALAC {
        Mp4Codec::Alac
    } else if codec == CODEC_TYPE_AAC {
        Mp4Codec::Aac
    } else {
        Mp4Codec::Unknown
    }
}

/// The demuxer does not report protected sample entries, so `encrypted`
/// is always false.
fn mp4_properties(params: CodecParameters) -> Mp4Properties {
    Mp4Properties {
        bits_per_sample: params
            .bits_per_sample
            .or(params.bits_per_coded_sample)
            .unwrap_or(0),
        codec: mp4_codec(params.codec),
        encrypted: false,
    }
}

/// Size of a leading ID3v2 tag including header and optional footer.
fn id3v2_len(buf: &[u8]) -> usize {
    if buf.len() < 10 || !buf.starts_with(b"ID3") {
        return 0;
    }
    let size = buf[6..10]
        .iter()
        .fold(0usize, |acc, b| (acc << 7) | usize::from(b & 0x7f));
    let footer = if buf[5] & 0x10 != 0 { 10 } else { 0 };
    10 + size + footer
}

fn mpeg_properties(buf: &[u8]) -> Option<MpegProperties> {
    let start = id3v2_len(buf);
    let end = buf.len().min(start.saturating_add(MPEG_SYNC_SCAN_LIMIT));
    let frames = buf.get(start..end)?;

    frames.windows(2).find_map(|w| {
        if w[0] != 0xFF || w[1] & 0xE0 != 0xE0 {
            return None;
        }
        let version = match (w[1] >> 3) & 0x03 {
            0 => MpegVersion::Version2_5,
            2 => MpegVersion::Version2,
            3 => MpegVersion::Version1,
            _ => return None,
        };
        let layer = match (w[1] >> 1) & 0x03 {
            1 => 3,
            2 => 2,
            3 => 1,
            _ => return None,
        };
        Some(MpegProperties { version, layer })
    })
}
