//! Durable file replacement for the link store.
//!
//! The store file is replaced with the write-to-temp-then-rename pattern:
//! 1. Write to `<path>.tmp`
//! 2. fsync the temp file
//! 3. Rename over `<path>`
//! 4. fsync the parent directory
//!
//! Readers (including a restarted bot) see either the old or the new file,
//! never a partial write. The directory fsync makes the rename itself durable.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Returns the temp path used while replacing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replaces `path` with `bytes`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path);
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp_path, path)?;

    match parent {
        Some(parent) => fsync_dir(parent),
        None => fsync_dir(Path::new(".")),
    }
}

/// Syncs a directory so that entries created or renamed in it survive a crash.
pub fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    File::open(dir_path)?.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_creates_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.json");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("links.json");

        write_atomic(&path, b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("/data/links.json")),
            PathBuf::from("/data/links.json.tmp")
        );
    }

    #[test]
    fn fsync_dir_fails_on_nonexistent() {
        assert!(fsync_dir(Path::new("/nonexistent/path/that/does/not/exist")).is_err());
    }
}
