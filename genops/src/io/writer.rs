//! Filesystem writer for generated artifacts.
//!
//! Writes are plain overwrites: the parent directory is created if needed and
//! any existing file at the target is replaced (last write wins). There is no
//! temp-file-then-rename step.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// One artifact to put on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub target_path: PathBuf,
    pub content: String,
}

impl WriteRequest {
    pub fn new(target_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            content: content.into(),
        }
    }
}

/// What a completed write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub path: PathBuf,
    pub bytes: usize,
    /// True if a file already existed at `path` and was overwritten.
    pub replaced: bool,
}

impl WriteReceipt {
    /// Confirmation line for the calling agent.
    pub fn describe(&self, artifact: &str) -> String {
        let suffix = if self.replaced {
            " (overwrote existing file)"
        } else {
            ""
        };
        format!(
            "{artifact} written to {} ({} bytes){suffix}",
            self.path.display(),
            self.bytes
        )
    }
}

/// Recursively create `path`. Succeeds if it already exists as a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))?;
    debug!(path = %path.display(), "directory created");
    Ok(())
}

/// Write `request.content` to `request.target_path`, creating parents.
pub fn write_artifact(request: &WriteRequest) -> Result<WriteReceipt> {
    let path = &request.target_path;
    if path.is_dir() {
        bail!("write {}: target is a directory", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let replaced = path.exists();
    fs::write(path, &request.content).with_context(|| format!("write {}", path.display()))?;
    if replaced {
        info!(path = %path.display(), "existing artifact overwritten");
    }
    debug!(path = %path.display(), bytes = request.content.len(), "artifact written");
    Ok(WriteReceipt {
        path: path.clone(),
        bytes: request.content.len(),
        replaced,
    })
}

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_write_replaces_first() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("auth.py");

        let first = write_artifact(&WriteRequest::new(&path, "# TODO")).expect("first");
        assert!(!first.replaced);
        let second =
            write_artifact(&WriteRequest::new(&path, "def login(): pass")).expect("second");
        assert!(second.replaced);

        assert_eq!(fs::read_to_string(&path).expect("read"), "def login(): pass");
        let entries = fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn creates_missing_parents() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("a").join("b").join("c").join("plan.md");

        let receipt = write_artifact(&WriteRequest::new(&path, "plan")).expect("write");
        assert_eq!(receipt.path, path);
        assert_eq!(receipt.bytes, 4);
        assert!(path.is_file());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("demo").join("nested").join("dir");
        ensure_dir(&dir).expect("first");
        ensure_dir(&dir).expect("second");
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_fails_when_a_file_is_in_the_way() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").expect("write blocker");
        let err = ensure_dir(&blocker.join("child")).expect_err("should fail");
        assert!(err.to_string().contains("create directory"));
    }

    #[test]
    fn writing_onto_a_directory_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = write_artifact(&WriteRequest::new(temp.path(), "x")).expect_err("dir");
        assert!(err.to_string().contains("target is a directory"));
    }

    #[test]
    fn describe_mentions_overwrite() {
        let receipt = WriteReceipt {
            path: PathBuf::from("/tmp/demo/auth.py"),
            bytes: 6,
            replaced: true,
        };
        assert_eq!(
            receipt.describe("code module"),
            "code module written to /tmp/demo/auth.py (6 bytes) (overwrote existing file)"
        );
    }
}
