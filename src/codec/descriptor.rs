//! Extended audio descriptor: derived per call from the file variant and
//! emitted as a map whose entry count is declared up front.

use serde::Serialize;

use crate::format::{AsfCodec, FileVariant, Mp4Codec, MpegVersion};
use crate::wire::WireWriter;

pub const KEY_BITS_PER_SAMPLE: &str = "bitsPerSample";
pub const KEY_CODEC: &str = "codec";
pub const KEY_CONTAINER: &str = "containerFormat";
pub const KEY_IS_LOSSLESS: &str = "isLossless";
pub const KEY_MPEG_VERSION: &str = "mpegVersion";
pub const KEY_MPEG_LAYER: &str = "mpegLayer";
pub const KEY_IS_ENCRYPTED: &str = "isEncrypted";
pub const KEY_FORMAT_VERSION: &str = "formatVersion";

/// Format-specific properties. Zero and empty mean "not applicable".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedAudioInfo {
    pub bits_per_sample: u32,
    pub codec: &'static str,
    pub container: &'static str,
    pub is_lossless: bool,
    pub mpeg_version: u32,
    pub mpeg_layer: u32,
    pub is_encrypted: bool,
    pub format_version: u32,
}

/// A descriptor value as it goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Uint(u32),
    Str(&'static str),
    Bool(bool),
}

impl ExtendedAudioInfo {
    /// Apply the per-variant rule table. A missing properties payload leaves
    /// the property-derived fields at zero; it is not an error.
    pub fn from_variant(variant: &FileVariant) -> Self {
        let mut info = Self::default();

        match variant {
            FileVariant::Mpeg(props) => {
                if let Some(p) = props {
                    info.mpeg_version = match p.version {
                        MpegVersion::Version1 => 1,
                        MpegVersion::Version2 | MpegVersion::Version2_5 => 2,
                    };
                    info.mpeg_layer = u32::from(p.layer);
                }
                info.set_format("MP3", "MP3");
            }
            FileVariant::Flac(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                }
                info.set_format("FLAC", "FLAC");
                info.is_lossless = true;
            }
            FileVariant::Mp4(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                    info.is_encrypted = p.encrypted;
                    if p.codec == Mp4Codec::Alac {
                        info.codec = "ALAC";
                        info.is_lossless = true;
                    } else {
                        info.codec = "AAC";
                    }
                }
                info.container = "MP4";
            }
            FileVariant::OggVorbis => info.set_format("Vorbis", "OGG"),
            FileVariant::OggOpus => info.set_format("Opus", "OGG"),
            FileVariant::OggFlac(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                }
                info.set_format("FLAC", "OGG");
                info.is_lossless = true;
            }
            FileVariant::OggSpeex => info.set_format("Speex", "OGG"),
            FileVariant::Wav(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                }
                info.set_format("PCM", "WAV");
                info.is_lossless = true;
            }
            FileVariant::Aiff(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                }
                info.set_format("PCM", "AIFF");
                info.is_lossless = true;
            }
            FileVariant::Asf(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                    info.is_encrypted = p.encrypted;
                    if p.codec == AsfCodec::Wma9Lossless {
                        info.codec = "WMA Lossless";
                        info.is_lossless = true;
                    } else {
                        info.codec = "WMA";
                    }
                }
                info.container = "ASF";
            }
            FileVariant::Ape(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                    info.format_version = p.version;
                }
                info.set_format("APE", "APE");
                info.is_lossless = true;
            }
            FileVariant::Dsf(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                }
                info.set_format("DSD", "DSF");
                info.is_lossless = true;
            }
            FileVariant::Dsdiff(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                }
                info.set_format("DSD", "DSDIFF");
                info.is_lossless = true;
            }
            FileVariant::WavPack(props) => {
                // the only variant whose losslessness depends on the stream
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                    info.is_lossless = p.lossless;
                    info.format_version = p.version;
                }
                info.set_format("WavPack", "WavPack");
            }
            FileVariant::Mpc => info.set_format("MPC", "MPC"),
            FileVariant::TrueAudio(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                    info.format_version = p.tta_version;
                }
                info.set_format("TTA", "TTA");
                info.is_lossless = true;
            }
            FileVariant::Shorten(props) => {
                if let Some(p) = props {
                    info.bits_per_sample = p.bits_per_sample;
                    info.format_version = p.version;
                }
                info.set_format("Shorten", "Shorten");
                info.is_lossless = true;
            }
            FileVariant::Mod => info.set_format("MOD", "MOD"),
            FileVariant::S3m => info.set_format("S3M", "S3M"),
            FileVariant::It => info.set_format("IT", "IT"),
            FileVariant::Xm => info.set_format("XM", "XM"),
            FileVariant::Unrecognized => {}
        }

        info
    }

    fn set_format(&mut self, codec: &'static str, container: &'static str) {
        self.codec = codec;
        self.container = container;
    }

    /// The fields that go on the wire, in wire order.
    ///
    /// Both [`count`](Self::count) and [`encode_entries`] consume this, so the
    /// declared map length and the written entries cannot disagree.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldValue)> {
        [
            (self.bits_per_sample > 0)
                .then_some((KEY_BITS_PER_SAMPLE, FieldValue::Uint(self.bits_per_sample))),
            (!self.codec.is_empty()).then_some((KEY_CODEC, FieldValue::Str(self.codec))),
            (!self.container.is_empty())
                .then_some((KEY_CONTAINER, FieldValue::Str(self.container))),
            Some((KEY_IS_LOSSLESS, FieldValue::Bool(self.is_lossless))),
            (self.mpeg_version > 0)
                .then_some((KEY_MPEG_VERSION, FieldValue::Uint(self.mpeg_version))),
            (self.mpeg_layer > 0).then_some((KEY_MPEG_LAYER, FieldValue::Uint(self.mpeg_layer))),
            self.is_encrypted
                .then_some((KEY_IS_ENCRYPTED, FieldValue::Bool(true))),
            (self.format_version > 0)
                .then_some((KEY_FORMAT_VERSION, FieldValue::Uint(self.format_version))),
        ]
        .into_iter()
        .flatten()
    }

    /// Number of map entries the descriptor occupies.
    pub fn count(&self) -> u32 {
        self.fields().count() as u32
    }
}

/// Write the descriptor as its own map.
pub fn encode(writer: &mut WireWriter, info: &ExtendedAudioInfo) {
    writer.begin_map(info.count());
    encode_entries(writer, info);
    writer.end_map();
}

/// Write the descriptor's key/value pairs into an already open map and
/// return how many were written.
pub fn encode_entries(writer: &mut WireWriter, info: &ExtendedAudioInfo) -> u32 {
    let mut written = 0;
    for (key, value) in info.fields() {
        writer.write_str(key);
        match value {
            FieldValue::Uint(v) => writer.write_uint(u64::from(v)),
            FieldValue::Str(s) => writer.write_str(s),
            FieldValue::Bool(b) => writer.write_bool(b),
        }
        written += 1;
    }
    written
}
