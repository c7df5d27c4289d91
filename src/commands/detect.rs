use anyhow::{bail, Context, Result};
use std::path::Path;
use tagwire::format::detect_format;

pub fn run(path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match detect_format(&bytes) {
        Some(kind) => println!("{}", kind.name()),
        None => bail!("Unsupported audio format: {}", path.display()),
    }

    Ok(())
}
