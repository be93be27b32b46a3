//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Temp file that is removed on drop unless it was renamed over the target.
struct StagedFile {
    path: PathBuf,
    file: Option<File>,
    persisted: bool,
}

impl StagedFile {
    fn create(target: &Path) -> Result<Self> {
        let temp_name = format!(
            ".{}.{}.tmp",
            target
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default(),
            std::process::id()
        );
        let path = target.with_file_name(temp_name);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        Ok(Self {
            path,
            file: Some(file),
            persisted: false,
        })
    }

    fn write_locked(&mut self, target: &Path, content: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Err(Error::LockFailed {
                path: target.to_path_buf(),
            });
        };

        file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: target.to_path_buf(),
        })?;
        file.write_all(content)
            .map_err(|e| Error::io(&self.path, e))?;
        file.sync_all().map_err(|e| Error::io(&self.path, e))?;
        file.unlock().map_err(|_| Error::LockFailed {
            path: target.to_path_buf(),
        })?;
        Ok(())
    }

    fn persist(mut self, target: &Path) -> Result<()> {
        // Close the handle before renaming; Windows refuses to move open files.
        self.file.take();
        fs::rename(&self.path, target).map_err(|e| Error::io(target, e))?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.file.take();
        if !self.persisted && fs::remove_file(&self.path).is_err() {
            tracing::debug!(path = %self.path.display(), "Could not remove staged temp file");
        }
    }
}

/// Write content atomically to a file with locking.
///
/// The content is staged in a temp file next to the target (same
/// filesystem), flushed, then renamed over the target. On any failure the
/// temp file is removed and the existing target is left untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent(path)?;

    let mut staged = StagedFile::create(path)?;
    staged.write_locked(path, content)?;
    staged.persist(path)?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file atomically");
    Ok(())
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Read text content, returning `None` when the file does not exist.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
