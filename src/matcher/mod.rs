//! File selection for batch rewrites.

pub mod file;

pub use file::FileMatcher;

use std::collections::HashSet;
use std::path::PathBuf;

/// An ordered, duplicate-free list of files to visit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSet {
    paths: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FileSet {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path unless it is already present.
    pub fn push(&mut self, path: PathBuf) -> bool {
        if self.seen.insert(path.clone()) {
            self.paths.push(path);
            true
        } else {
            false
        }
    }

    /// Returns the paths in visiting order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Iterates over the paths in visiting order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Extend<PathBuf> for FileSet {
    fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, iter: I) {
        for path in iter {
            self.push(path);
        }
    }
}

impl FromIterator<PathBuf> for FileSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut set = FileSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
