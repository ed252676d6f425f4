//! Content-comparison writer: the single path every index/render
//! write in this crate goes through, so that an unchanged render never
//! touches a file's mtime. This is the test oracle for idempotency and the
//! mechanism that keeps the staleness oracle honest.

use crate::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// The outcome of a `write_if_changed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Whether new bytes were actually committed to disk.
    pub written: bool,
}

/// Write `bytes` to `path` only if they differ from the existing content.
///
/// On an actual write, the content is staged in a sibling temp file,
/// fsynced, then renamed into place - the rename is the commit point, so
/// readers always observe either the old or the new content, never a torn
/// write.
pub fn write_if_changed(path: &Path, bytes: &[u8]) -> Result<WriteOutcome> {
    if let Ok(existing) = fs::read(path) {
        if existing == bytes {
            return Ok(WriteOutcome { written: false });
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
    }

    let tmp_path = sibling_tmp_path(path);
    {
        let mut tmp = File::create(&tmp_path)
            .map_err(|e| Error::io(format!("creating {}", tmp_path.display()), e))?;
        tmp.write_all(bytes)
            .map_err(|e| Error::io(format!("writing {}", tmp_path.display()), e))?;
        tmp.sync_all()
            .map_err(|e| Error::io(format!("syncing {}", tmp_path.display()), e))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::io(format!("renaming into {}", path.display()), e)
    })?;

    Ok(WriteOutcome { written: true })
}

fn sibling_tmp_path(path: &Path) -> std::path::PathBuf {
    let file_name = path
        .file_name()
        .map(|n| format!(".{}.ligi-tmp", n.to_string_lossy()))
        .unwrap_or_else(|| ".ligi-tmp".to_string());
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_write_reports_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        let outcome = write_if_changed(&path, b"hello").unwrap();
        assert!(outcome.written);
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn identical_rewrite_is_skipped_and_preserves_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        write_if_changed(&path, b"hello").unwrap();
        let mtime_before = fs::metadata(&path).unwrap().modified().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        let outcome = write_if_changed(&path, b"hello").unwrap();
        assert!(!outcome.written);

        let mtime_after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(mtime_before, mtime_after);
    }

    #[test]
    fn differing_content_is_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        write_if_changed(&path, b"hello").unwrap();
        let outcome = write_if_changed(&path, b"world").unwrap();
        assert!(outcome.written);
        assert_eq!(fs::read(&path).unwrap(), b"world");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("a.md");
        let outcome = write_if_changed(&path, b"hi").unwrap();
        assert!(outcome.written);
        assert!(path.exists());
    }

    #[test]
    fn no_temp_file_left_behind_on_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        write_if_changed(&path, b"hello").unwrap();
        let tmp = sibling_tmp_path(&path);
        assert!(!tmp.exists());
    }
}
