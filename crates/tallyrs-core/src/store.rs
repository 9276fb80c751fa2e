//! Where encrypted save data lives.

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// All-or-nothing byte storage for one save file.
pub trait ByteStore {
    /// Read the whole save.
    fn read_all(&self) -> Result<Vec<u8>>;

    /// Replace the whole save. On failure the previous contents are kept.
    fn write_all(&self, bytes: &[u8]) -> Result<()>;

    /// Whether a save exists. `false` means this is a first run.
    fn exists(&self) -> bool;

    /// Delete the save. Deleting a missing save succeeds.
    fn remove(&self) -> Result<()>;
}

/// A save file on disk.
///
/// Writes go to a temporary file next to the target which is then renamed
/// over it, so a crash mid-write never leaves a truncated save behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl ByteStore for FileStore {
    fn read_all(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    fn write_all(&self, bytes: &[u8]) -> Result<()> {
        let dir = self.dir();
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(Error::io(&self.path, e)),
            _ => Ok(()),
        }
    }
}

/// An in-memory save, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: RefCell<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `bytes`.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes)),
        }
    }

    /// A copy of the stored bytes.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }
}

impl ByteStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<u8>> {
        self.bytes.borrow().clone().ok_or_else(|| {
            Error::io(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::NotFound, "nothing saved yet"),
            )
        })
    }

    fn write_all(&self, bytes: &[u8]) -> Result<()> {
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.bytes.borrow().is_some()
    }

    fn remove(&self) -> Result<()> {
        self.bytes.borrow_mut().take();
        Ok(())
    }
}
