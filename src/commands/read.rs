use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tagwire::metadata::open_media_file;
use tagwire::read_tags;

/// Encode the file's tags and write the envelope to `output` or stdout
pub fn run(path: &Path, output: Option<&Path>, quiet: bool) -> Result<()> {
    let file = open_media_file(path)
        .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
    let envelope = read_tags(&file).context("Failed to serialize tag data")?;

    match output {
        Some(out) => {
            std::fs::write(out, &envelope)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            if !quiet {
                eprintln!("Wrote {} bytes to {}", envelope.len(), out.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&envelope)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
