//! File operations for the goals store.
//!
//! Handles atomic JSON writes (temp file + rename) and timestamped backup
//! copies of the goals file.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `content` to `path` atomically: write a sibling temp file, sync,
/// then rename over the target. A crash mid-write leaves the old file
/// intact.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = sibling(path, ".tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}

/// Backup path for `path` at `at`, named so that lexicographic order of the
/// backup names matches timestamp order.
pub fn backup_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    sibling(path, &format!(".backup-{}", at.format("%Y%m%d-%H%M%S")))
}

/// Copy the current on-disk contents of `path` to a timestamped sibling.
/// Returns the backup path, or None when there is nothing to back up yet.
pub fn backup_current(path: &Path) -> io::Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path, Utc::now());
    fs::copy(path, &backup)?;
    Ok(Some(backup))
}

/// List existing backup files for `path`, oldest first.
pub fn list_backups(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut backups = Vec::new();
    let Some(parent) = path.parent() else {
        return Ok(backups);
    };
    if !parent.exists() {
        return Ok(backups);
    }
    let prefix = format!("{}.backup-", file_name(path));
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            backups.push(entry.path());
        }
    }
    backups.sort();
    Ok(backups)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    path.with_file_name(format!("{}{}", file_name(path), suffix))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
