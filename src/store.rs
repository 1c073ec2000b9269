//! Backing storage for the files being rewritten.
//!
//! The rewriter only ever lists, reads and overwrites files, so those three
//! operations are all a store has to provide. [`DiskStore`] is the real file
//! system; [`MemoryStore`] is a virtual file map used to exercise the engine
//! without touching disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File access used by the rewriter.
pub trait FileStore {
    /// Lists every file under `root`, depth-first, sorted by file name.
    /// Symbolic links are followed.
    fn list(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Reads a file's full content as UTF-8 text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Overwrites a file with new content.
    fn write(&mut self, path: &Path, content: &str) -> io::Result<()>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn list(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", root.display()),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(error) => {
                    let path = error.path().unwrap_or(root).display().to_string();
                    tracing::warn!(%path, %error, "entry skipped while listing files");
                }
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&mut self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }
}

/// An in-memory file tree keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    files: BTreeMap<PathBuf, Entry>,
    writes: usize,
}

#[derive(Debug, Clone)]
enum Entry {
    Text(String),
    Unreadable,
    ReadOnly(String),
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), Entry::Text(content.into()));
        self
    }

    /// Adds a file whose reads fail.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), Entry::Unreadable);
        self
    }

    /// Adds a file that can be read but whose writes fail.
    pub fn with_read_only(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), Entry::ReadOnly(content.into()));
        self
    }

    /// Returns the current content of a file, if it is readable.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        match self.files.get(path.as_ref())? {
            Entry::Text(s) | Entry::ReadOnly(s) => Some(s.as_str()),
            Entry::Unreadable => None,
        }
    }

    /// Returns how many successful writes the store has received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl FileStore for MemoryStore {
    fn list(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        // BTreeMap order on paths compares component-wise, which is the same
        // order a name-sorted depth-first walk produces.
        Ok(self
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(Entry::Text(s)) | Some(Entry::ReadOnly(s)) => Ok(s.clone()),
            Some(Entry::Unreadable) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }

    fn write(&mut self, path: &Path, content: &str) -> io::Result<()> {
        match self.files.get_mut(path) {
            Some(Entry::ReadOnly(_)) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only file",
            )),
            Some(entry) => {
                *entry = Entry::Text(content.to_string());
                self.writes += 1;
                Ok(())
            }
            None => {
                self.files
                    .insert(path.to_path_buf(), Entry::Text(content.to_string()));
                self.writes += 1;
                Ok(())
            }
        }
    }
}
