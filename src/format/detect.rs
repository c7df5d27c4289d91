use super::FormatKind;

const MOD_SIGNATURES: [&[u8; 4]; 7] = [b"M.K.", b"M!K!", b"FLT4", b"FLT8", b"4CHN", b"6CHN", b"8CHN"];

const ASF_GUID_PREFIX: [u8; 8] = [0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11];

/// How far into an Ogg stream to look for the codec identification header.
const OGG_SCAN_LIMIT: usize = 200;

/// Sniff the format from leading bytes. Inputs under 12 bytes are never
/// recognized.
pub fn detect_format(buf: &[u8]) -> Option<FormatKind> {
    if buf.len() < 12 {
        return None;
    }

    if buf.starts_with(b"ID3") || (buf[0] == 0xFF && buf[1] & 0xE0 == 0xE0) {
        return Some(FormatKind::Mpeg);
    }
    if buf.starts_with(b"fLaC") {
        return Some(FormatKind::Flac);
    }
    if &buf[4..8] == b"ftyp" {
        return Some(FormatKind::Mp4);
    }
    if buf.starts_with(b"OggS") {
        return Some(detect_ogg_codec(buf));
    }
    if buf.starts_with(b"RIFF") && &buf[8..12] == b"WAVE" {
        return Some(FormatKind::Wav);
    }
    if buf.starts_with(b"FORM") && (&buf[8..12] == b"AIFF" || &buf[8..12] == b"AIFC") {
        return Some(FormatKind::Aiff);
    }
    if buf.len() >= 16 && buf.starts_with(&ASF_GUID_PREFIX) {
        return Some(FormatKind::Asf);
    }
    if buf.starts_with(b"DSD ") {
        return Some(FormatKind::Dsf);
    }
    if buf.len() >= 16 && buf.starts_with(b"FRM8") && &buf[12..16] == b"DSD " {
        return Some(FormatKind::Dsdiff);
    }
    if buf.starts_with(b"MAC ") {
        return Some(FormatKind::Ape);
    }
    if buf.starts_with(b"wvpk") {
        return Some(FormatKind::WavPack);
    }
    if buf.starts_with(b"MP+") || buf.starts_with(b"MPCK") {
        return Some(FormatKind::Mpc);
    }
    if buf.starts_with(b"TTA1") {
        return Some(FormatKind::TrueAudio);
    }
    if buf.starts_with(b"ajkg") {
        return Some(FormatKind::Shorten);
    }
    if buf.starts_with(b"IMPM") {
        return Some(FormatKind::It);
    }
    if buf.len() >= 17 && buf.starts_with(b"Extended Module:") {
        return Some(FormatKind::Xm);
    }
    if buf.len() >= 48 && buf[44] == 0x1C && buf[45] == 0x10 {
        return Some(FormatKind::S3m);
    }
    if buf.len() >= 1084 && MOD_SIGNATURES.iter().any(|sig| &buf[1080..1084] == *sig) {
        return Some(FormatKind::Mod);
    }

    None
}

/// Ogg pages all start with `OggS`; the codec is named by the first packet.
fn detect_ogg_codec(buf: &[u8]) -> FormatKind {
    let mut i = 0;
    while i + 8 < buf.len() && i < OGG_SCAN_LIMIT {
        let window = &buf[i..];
        if window.starts_with(b"OpusHead") {
            return FormatKind::OggOpus;
        }
        if i + 9 < buf.len() && window.starts_with(b"\x7fFLAC") {
            return FormatKind::OggFlac;
        }
        if window.starts_with(b"Speex   ") {
            return FormatKind::OggSpeex;
        }
        i += 1;
    }
    FormatKind::OggVorbis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(prefix: &[u8], len: usize) -> Vec<u8> {
        let mut buf = prefix.to_vec();
        buf.resize(len.max(prefix.len()), 0);
        buf
    }

    #[test]
    fn test_short_input_is_unknown() {
        assert_eq!(detect_format(b"ID3"), None);
        assert_eq!(detect_format(&[]), None);
    }

    #[test]
    fn test_mpeg_by_tag_or_sync() {
        assert_eq!(detect_format(&padded(b"ID3\x04", 32)), Some(FormatKind::Mpeg));
        assert_eq!(detect_format(&padded(&[0xFF, 0xFB, 0x90], 32)), Some(FormatKind::Mpeg));
    }

    #[test]
    fn test_simple_signatures() {
        let cases: [(&[u8], FormatKind); 10] = [
            (b"fLaC", FormatKind::Flac),
            (b"RIFF\0\0\0\0WAVE", FormatKind::Wav),
            (b"FORM\0\0\0\0AIFC", FormatKind::Aiff),
            (b"DSD ", FormatKind::Dsf),
            (b"MAC ", FormatKind::Ape),
            (b"wvpk", FormatKind::WavPack),
            (b"MPCK", FormatKind::Mpc),
            (b"TTA1", FormatKind::TrueAudio),
            (b"ajkg", FormatKind::Shorten),
            (b"IMPM", FormatKind::It),
        ];
        for (prefix, kind) in cases {
            assert_eq!(detect_format(&padded(prefix, 32)), Some(kind), "{:?}", kind);
        }
    }

    #[test]
    fn test_mp4_ftyp_at_offset_four() {
        assert_eq!(
            detect_format(&padded(b"\0\0\0\x20ftypM4A ", 32)),
            Some(FormatKind::Mp4)
        );
    }

    #[test]
    fn test_asf_and_dsdiff_need_sixteen_bytes() {
        assert_eq!(detect_format(&padded(&ASF_GUID_PREFIX, 16)), Some(FormatKind::Asf));
        assert_eq!(
            detect_format(&padded(b"FRM8\0\0\0\0\0\0\0\0DSD ", 16)),
            Some(FormatKind::Dsdiff)
        );
    }

    #[test]
    fn test_ogg_codecs() {
        let mut opus = padded(b"OggS", 28);
        opus.extend_from_slice(b"OpusHead");
        opus.resize(64, 0);
        assert_eq!(detect_format(&opus), Some(FormatKind::OggOpus));

        let mut flac = padded(b"OggS", 28);
        flac.extend_from_slice(b"\x7fFLAC\x01\x00");
        flac.resize(64, 0);
        assert_eq!(detect_format(&flac), Some(FormatKind::OggFlac));

        let mut speex = padded(b"OggS", 28);
        speex.extend_from_slice(b"Speex   ");
        speex.resize(64, 0);
        assert_eq!(detect_format(&speex), Some(FormatKind::OggSpeex));

        assert_eq!(detect_format(&padded(b"OggS", 64)), Some(FormatKind::OggVorbis));
    }

    #[test]
    fn test_tracker_formats() {
        assert_eq!(
            detect_format(&padded(b"Extended Module: song", 64)),
            Some(FormatKind::Xm)
        );

        let mut s3m = vec![0u8; 64];
        s3m[44] = 0x1C;
        s3m[45] = 0x10;
        assert_eq!(detect_format(&s3m), Some(FormatKind::S3m));

        let mut module = vec![0u8; 1084];
        module[1080..1084].copy_from_slice(b"M.K.");
        assert_eq!(detect_format(&module), Some(FormatKind::Mod));
    }

    #[test]
    fn test_unknown_bytes() {
        assert_eq!(detect_format(&[0x42; 2048]), None);
    }
}
