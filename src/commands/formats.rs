use anyhow::Result;
use tagwire::codec::ExtendedAudioInfo;
use tagwire::format::{FileVariant, FormatKind};

/// Run the formats command - list detectable formats
pub fn run() -> Result<()> {
    println!("Supported formats:");
    println!();
    println!("  {:<20} {:<14} {:<10} Chapters/Lyrics", "Format", "Codec", "Container");

    for kind in FormatKind::ALL {
        let info = ExtendedAudioInfo::from_variant(&FileVariant::without_properties(kind));
        // MP4 and ASF name their codec only once stream properties are known
        let codec = if info.codec.is_empty() { "-" } else { info.codec };
        let tags = if kind.carries_id3v2() { "yes" } else { "-" };
        println!(
            "  {:<20} {:<14} {:<10} {}",
            kind.name(),
            codec,
            info.container,
            tags
        );
    }

    Ok(())
}
