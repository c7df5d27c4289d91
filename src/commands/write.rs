use crate::config::Config;
use crate::editor::{compute_changes, format_diff};
use crate::safety::{create_backup, format_size};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tagwire::metadata::{open_media_file, save_media_file};
use tagwire::{TagSnapshot, TagUpdate};

pub fn run(
    file: &Path,
    envelope: &Path,
    config: &Config,
    no_dry_run: bool,
    yes: bool,
    no_backup: bool,
) -> Result<()> {
    let data = std::fs::read(envelope)
        .with_context(|| format!("Failed to read envelope: {}", envelope.display()))?;

    let media = open_media_file(file)
        .with_context(|| format!("Failed to read audio file: {}", file.display()))?;

    // Decode everything before showing or touching anything
    let update = TagUpdate::decode(&data, &config.limits)
        .with_context(|| format!("Failed to parse envelope: {}", envelope.display()))?;

    if update.is_empty() {
        println!("Envelope carries no chapters or lyrics.");
        return Ok(());
    }
    if update.chapters.is_some() && media.tag().is_none() {
        println!(
            "Warning: {} has no ID3v2 tag; chapters will not be written.",
            file.display()
        );
    }

    let current = TagSnapshot::capture(&media);
    let changes = compute_changes(&current, &update);

    // Stage on a copy so a rejected update fails before the dry run or backup
    let mut staged = media.clone();
    let stored = update
        .apply(&mut staged)
        .with_context(|| format!("Cannot store envelope in {}", file.display()))?;

    println!("{}", format_diff(&file.display().to_string(), &changes));

    if changes.is_empty() {
        return Ok(());
    }

    if !no_dry_run {
        println!();
        println!("Dry run, nothing written.");
        println!(
            "To apply: tagwire write \"{}\" \"{}\" --no-dry-run",
            file.display(),
            envelope.display()
        );
        return Ok(());
    }

    if !yes && !confirm(file)? {
        println!("Aborted.");
        return Ok(());
    }

    if no_backup || !config.backups.enabled {
        println!("Warning: No backup created. Changes cannot be undone.");
    } else {
        let backup_path = create_backup(file)?;
        let size = std::fs::metadata(&backup_path).map(|m| m.len()).unwrap_or(0);
        println!(
            "Created backup: {} ({})",
            backup_path.display(),
            format_size(size)
        );
    }

    if stored {
        save_media_file(file, &staged)
            .with_context(|| format!("Failed to write tags to {}", file.display()))?;
        println!("Changes applied successfully.");
    } else {
        println!("Nothing could be applied to this file.");
    }

    Ok(())
}

fn confirm(file: &Path) -> Result<bool> {
    print!("Apply these changes to {}? [y/N] ", file.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
