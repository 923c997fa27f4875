//! Output sinks.
//!
//! ## `FileSink` — atomic replace
//!
//! 1. Ensure the destination's parent directory exists.
//! 2. Write the full buffer to `<path>.interpolate.tmp`.
//! 3. Rename over the destination (atomic on POSIX).
//! 4. On rename failure, remove the temp file; the destination is untouched.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for one rendered document. Each invocation calls
/// [`Sink::write_output`] at most once, with the complete buffer.
pub trait Sink {
    /// Identifier used in error messages.
    fn id(&self) -> String;

    fn write_output(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<T: Sink + ?Sized> Sink for &mut T {
    fn id(&self) -> String {
        (**self).id()
    }

    fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_output(bytes)
    }
}

/// In-memory capture.
impl Sink for Vec<u8> {
    fn id(&self) -> String {
        "<memory>".to_string()
    }

    fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StdoutSink
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn id(&self) -> String {
        "<stdout>".to_string()
    }

    fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

// ---------------------------------------------------------------------------
// FileSink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.interpolate.tmp", self.path.display()))
    }
}

impl Sink for FileSink {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        let tmp = self.tmp_path();
        atomic_write_with_tmp(&self.path, bytes, &tmp)
    }
}

fn atomic_write_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(tmp_parent) = tmp.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(tmp_parent)?;
    }

    if let Err(e) = std::fs::write(tmp, content) {
        let _ = std::fs::remove_file(tmp);
        return Err(e);
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(e);
    }

    tracing::debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_sink_writes_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.yaml");
        let mut sink = FileSink::new(&path);
        sink.write_output(b"a: 1\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a: 1\n");
    }

    #[test]
    fn file_sink_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.yaml");
        fs::write(&path, "old content that is longer").unwrap();
        FileSink::new(&path).write_output(b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.json");
        let sink = FileSink::new(&path);
        sink.clone().write_output(b"{}").unwrap();
        assert!(!sink.tmp_path().exists(), ".interpolate.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deploy").join("prod").join("service.yaml");
        FileSink::new(&path).write_output(b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn memory_sink_captures_bytes() {
        let mut buf = Vec::new();
        buf.write_output(b"abc").unwrap();
        assert_eq!(buf, b"abc");
        assert_eq!(Sink::id(&buf), "<memory>");
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("service.yaml");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("service.yaml.interpolate.tmp");

        let result = atomic_write_with_tmp(&path, b"new content", &tmp_path);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; nothing to assert there.
        if result.is_ok() {
            return;
        }
        let current = fs::read_to_string(&path).unwrap();
        assert_eq!(current, "original", "original file should be intact");
        assert!(!tmp_path.exists(), ".interpolate.tmp should be cleaned up");
    }
}
