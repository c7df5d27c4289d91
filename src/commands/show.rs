use crate::editor::format_timestamp;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tagwire::codec::ExtendedAudioInfo;
use tagwire::metadata::{open_media_file, ChapterRecord, LyricsRecord};
use tagwire::TagSnapshot;

#[derive(Serialize)]
struct ShowOutput<'a> {
    format: Option<&'static str>,
    properties: &'a ExtendedAudioInfo,
    chapters: &'a [ChapterRecord],
    lyrics: &'a [LyricsRecord],
}

pub fn run(path: &Path, json: bool, quiet: bool) -> Result<()> {
    let file = open_media_file(path)
        .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
    let snapshot = TagSnapshot::capture(&file);
    let format = file.variant().kind().map(|kind| kind.name());

    if json {
        let output = ShowOutput {
            format,
            properties: &snapshot.info,
            chapters: &snapshot.chapters,
            lyrics: &snapshot.lyrics,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_pretty(&snapshot, format, path, quiet);
    }

    Ok(())
}

fn print_pretty(snapshot: &TagSnapshot, format: Option<&str>, path: &Path, quiet: bool) {
    if !quiet {
        println!("{}", path.display().to_string().bold());
        println!("{}", "─".repeat(40));
    }

    let info = &snapshot.info;
    print_field("Format", format);
    print_field("Codec", non_empty(info.codec));
    print_field("Container", non_empty(info.container));
    if info.bits_per_sample > 0 {
        print_field("Bit depth", Some(&info.bits_per_sample.to_string()));
    }
    print_field("Lossless", Some(if info.is_lossless { "yes" } else { "no" }));
    if info.mpeg_version > 0 && info.mpeg_layer > 0 {
        print_field(
            "MPEG",
            Some(&format!("version {} layer {}", info.mpeg_version, info.mpeg_layer)),
        );
    }
    if info.is_encrypted {
        print_field("Encrypted", Some("yes"));
    }
    if info.format_version > 0 {
        print_field("Version", Some(&info.format_version.to_string()));
    }

    if !snapshot.chapters.is_empty() {
        println!();
        println!("{}", format!("Chapters ({}):", snapshot.chapters.len()).cyan());
        for chapter in &snapshot.chapters {
            println!(
                "  {} {} - {}  {}",
                chapter.id.dimmed(),
                format_timestamp(chapter.start_time_ms),
                format_timestamp(chapter.end_time_ms),
                chapter.title.as_deref().unwrap_or("")
            );
        }
    }

    for lyrics in &snapshot.lyrics {
        println!();
        let mut heading = String::from("Lyrics");
        if !lyrics.language.is_empty() {
            heading.push_str(&format!(" [{}]", lyrics.language));
        }
        if !lyrics.description.is_empty() {
            heading.push_str(&format!(" {}", lyrics.description));
        }
        println!("{}", format!("{}:", heading).cyan());
        for line in lyrics.text.lines() {
            println!("  {}", line);
        }
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("{:>12}: {}", label.cyan(), v);
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
