//! Container/codec variants and their audio properties.
//!
//! A file handle is one [`FileVariant`]. Variants are disjoint, so
//! classification is a single match. Each variant carries its own properties
//! payload, which is `None` when the container parsed but its properties
//! could not be read.

mod detect;
mod probe;

pub use detect::detect_format;
pub use probe::probe;

use serde::Serialize;

/// Fieldless tag for each known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    Mpeg,
    Flac,
    Mp4,
    OggVorbis,
    OggOpus,
    OggFlac,
    OggSpeex,
    Wav,
    Aiff,
    Asf,
    Ape,
    Dsf,
    Dsdiff,
    WavPack,
    Mpc,
    TrueAudio,
    Shorten,
    Mod,
    S3m,
    It,
    Xm,
}

impl FormatKind {
    pub const ALL: [FormatKind; 21] = [
        FormatKind::Mpeg,
        FormatKind::Flac,
        FormatKind::Mp4,
        FormatKind::OggVorbis,
        FormatKind::OggOpus,
        FormatKind::OggFlac,
        FormatKind::OggSpeex,
        FormatKind::Wav,
        FormatKind::Aiff,
        FormatKind::Asf,
        FormatKind::Ape,
        FormatKind::Dsf,
        FormatKind::Dsdiff,
        FormatKind::WavPack,
        FormatKind::Mpc,
        FormatKind::TrueAudio,
        FormatKind::Shorten,
        FormatKind::Mod,
        FormatKind::S3m,
        FormatKind::It,
        FormatKind::Xm,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Mpeg => "MP3",
            FormatKind::Flac => "FLAC",
            FormatKind::Mp4 => "M4A/MP4",
            FormatKind::OggVorbis => "Ogg Vorbis",
            FormatKind::OggOpus => "Opus",
            FormatKind::OggFlac => "Ogg FLAC",
            FormatKind::OggSpeex => "Speex",
            FormatKind::Wav => "WAV",
            FormatKind::Aiff => "AIFF",
            FormatKind::Asf => "ASF/WMA",
            FormatKind::Ape => "Monkey's Audio",
            FormatKind::Dsf => "DSF (DSD)",
            FormatKind::Dsdiff => "DSDIFF (DSD)",
            FormatKind::WavPack => "WavPack",
            FormatKind::Mpc => "Musepack",
            FormatKind::TrueAudio => "TrueAudio",
            FormatKind::Shorten => "Shorten",
            FormatKind::Mod => "ProTracker Module",
            FormatKind::S3m => "Scream Tracker",
            FormatKind::It => "Impulse Tracker",
            FormatKind::Xm => "Extended Module",
        }
    }

    /// Whether the variant stores an ID3v2 tag that chapters and lyrics live
    /// in: in front of the stream for MPEG, as an `ID3 ` chunk for WAV and AIFF.
    pub fn carries_id3v2(self) -> bool {
        matches!(self, FormatKind::Mpeg | FormatKind::Wav | FormatKind::Aiff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Version1,
    Version2,
    Version2_5,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpegProperties {
    pub version: MpegVersion,
    /// 1, 2 or 3
    pub layer: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacProperties {
    pub bits_per_sample: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mp4Codec {
    Unknown,
    Aac,
    Alac,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp4Properties {
    pub bits_per_sample: u32,
    pub codec: Mp4Codec,
    pub encrypted: bool,
}

/// Uncompressed PCM in a RIFF or IFF container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmProperties {
    pub bits_per_sample: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsfCodec {
    Unknown,
    Wma1,
    Wma2,
    Wma9Pro,
    Wma9Lossless,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfProperties {
    pub bits_per_sample: u32,
    pub codec: AsfCodec,
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApeProperties {
    pub bits_per_sample: u32,
    /// Encoder version, e.g. 3990
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsdProperties {
    pub bits_per_sample: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavPackProperties {
    pub bits_per_sample: u32,
    pub lossless: bool,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrueAudioProperties {
    pub bits_per_sample: u32,
    pub tta_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenProperties {
    pub bits_per_sample: u32,
    pub version: u32,
}

/// An opened file, classified into exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileVariant {
    Mpeg(Option<MpegProperties>),
    Flac(Option<FlacProperties>),
    Mp4(Option<Mp4Properties>),
    OggVorbis,
    OggOpus,
    OggFlac(Option<FlacProperties>),
    OggSpeex,
    Wav(Option<PcmProperties>),
    Aiff(Option<PcmProperties>),
    Asf(Option<AsfProperties>),
    Ape(Option<ApeProperties>),
    Dsf(Option<DsdProperties>),
    Dsdiff(Option<DsdProperties>),
    WavPack(Option<WavPackProperties>),
    Mpc,
    TrueAudio(Option<TrueAudioProperties>),
    Shorten(Option<ShortenProperties>),
    Mod,
    S3m,
    It,
    Xm,
    #[default]
    Unrecognized,
}

impl FileVariant {
    /// The variant for `kind` with no properties available.
    pub fn without_properties(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Mpeg => FileVariant::Mpeg(None),
            FormatKind::Flac => FileVariant::Flac(None),
            FormatKind::Mp4 => FileVariant::Mp4(None),
            FormatKind::OggVorbis => FileVariant::OggVorbis,
            FormatKind::OggOpus => FileVariant::OggOpus,
            FormatKind::OggFlac => FileVariant::OggFlac(None),
            FormatKind::OggSpeex => FileVariant::OggSpeex,
            FormatKind::Wav => FileVariant::Wav(None),
            FormatKind::Aiff => FileVariant::Aiff(None),
            FormatKind::Asf => FileVariant::Asf(None),
            FormatKind::Ape => FileVariant::Ape(None),
            FormatKind::Dsf => FileVariant::Dsf(None),
            FormatKind::Dsdiff => FileVariant::Dsdiff(None),
            FormatKind::WavPack => FileVariant::WavPack(None),
            FormatKind::Mpc => FileVariant::Mpc,
            FormatKind::TrueAudio => FileVariant::TrueAudio(None),
            FormatKind::Shorten => FileVariant::Shorten(None),
            FormatKind::Mod => FileVariant::Mod,
            FormatKind::S3m => FileVariant::S3m,
            FormatKind::It => FileVariant::It,
            FormatKind::Xm => FileVariant::Xm,
        }
    }

    /// Classify the handle. `None` means no known variant matched.
    pub fn kind(&self) -> Option<FormatKind> {
        let kind = match self {
            FileVariant::Mpeg(_) => FormatKind::Mpeg,
            FileVariant::Flac(_) => FormatKind::Flac,
            FileVariant::Mp4(_) => FormatKind::Mp4,
            FileVariant::OggVorbis => FormatKind::OggVorbis,
            FileVariant::OggOpus => FormatKind::OggOpus,
            FileVariant::OggFlac(_) => FormatKind::OggFlac,
            FileVariant::OggSpeex => FormatKind::OggSpeex,
            FileVariant::Wav(_) => FormatKind::Wav,
            FileVariant::Aiff(_) => FormatKind::Aiff,
            FileVariant::Asf(_) => FormatKind::Asf,
            FileVariant::Ape(_) => FormatKind::Ape,
            FileVariant::Dsf(_) => FormatKind::Dsf,
            FileVariant::Dsdiff(_) => FormatKind::Dsdiff,
            FileVariant::WavPack(_) => FormatKind::WavPack,
            FileVariant::Mpc => FormatKind::Mpc,
            FileVariant::TrueAudio(_) => FormatKind::TrueAudio,
            FileVariant::Shorten(_) => FormatKind::Shorten,
            FileVariant::Mod => FormatKind::Mod,
            FileVariant::S3m => FormatKind::S3m,
            FileVariant::It => FormatKind::It,
            FileVariant::Xm => FormatKind::Xm,
            FileVariant::Unrecognized => return None,
        };
        Some(kind)
    }

    /// Whether a properties payload is present. Always false for variants
    /// that never carry one.
    pub fn has_properties(&self) -> bool {
        match self {
            FileVariant::Mpeg(p) => p.is_some(),
            FileVariant::Flac(p) | FileVariant::OggFlac(p) => p.is_some(),
            FileVariant::Mp4(p) => p.is_some(),
            FileVariant::Wav(p) | FileVariant::Aiff(p) => p.is_some(),
            FileVariant::Asf(p) => p.is_some(),
            FileVariant::Ape(p) => p.is_some(),
            FileVariant::Dsf(p) | FileVariant::Dsdiff(p) => p.is_some(),
            FileVariant::WavPack(p) => p.is_some(),
            FileVariant::TrueAudio(p) => p.is_some(),
            FileVariant::Shorten(p) => p.is_some(),
            _ => false,
        }
    }
}
