use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a backup of a file before modifying it
pub fn create_backup(file_path: &Path) -> Result<PathBuf> {
    let backup_path = backup_path_for(file_path);

    fs::copy(file_path, &backup_path).with_context(|| {
        format!(
            "Failed to create backup: {} -> {}",
            file_path.display(),
            backup_path.display()
        )
    })?;

    Ok(backup_path)
}

/// `song.mp3` is backed up as `song.mp3.bak`
pub fn backup_path_for(file_path: &Path) -> PathBuf {
    let mut backup = file_path.to_path_buf();
    let mut name = backup.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    backup.set_file_name(name);
    backup
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.0} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_for() {
        let path = Path::new("/home/user/song.mp3");
        let backup = backup_path_for(path);
        assert_eq!(backup, PathBuf::from("/home/user/song.mp3.bak"));
    }

    #[test]
    fn test_create_backup_copies_contents() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("track.mp3");
        fs::write(&file, b"ID3 payload").unwrap();

        let backup = create_backup(&file).unwrap();
        assert_eq!(backup, temp.path().join("track.mp3.bak"));
        assert_eq!(fs::read(&backup).unwrap(), b"ID3 payload");
    }

    #[test]
    fn test_create_backup_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = create_backup(&temp.path().join("absent.mp3")).unwrap_err();
        assert!(err.to_string().contains("Failed to create backup"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(format_size(523 * 1024 * 1024), "523 MB");
    }
}
