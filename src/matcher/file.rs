//! Glob-based file selection.

use super::FileSet;
use crate::error::{RewriteError, Result};
use crate::store::FileStore;
use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

/// Predicates for selecting the files a rewrite visits.
///
/// Include patterns are relative to the root and matched in declaration
/// order: all files for the first pattern come first, then the files for the
/// second, and so on. `*` stays within one path component and `**` spans any
/// number of directories, including none. Files under a dot-directory, and
/// dot-files themselves, are skipped unless [`FileMatcher::hidden`] is set.
#[derive(Default, Clone, Debug)]
pub struct FileMatcher {
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
    extensions: Vec<String>,
    include_hidden: bool,
}

impl FileMatcher {
    /// Creates a new file matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes files matching the glob pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_globs.push(pattern.into());
        self
    }

    /// Includes files matching any of the glob patterns.
    pub fn includes(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include_globs
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Excludes files matching the glob pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_globs.push(pattern.into());
        self
    }

    /// Excludes files matching any of the glob patterns.
    pub fn excludes(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_globs
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Matches files with the given extension (without dot).
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    /// Whether hidden files and directories are candidates.
    pub fn hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Returns the include patterns.
    pub fn include_patterns(&self) -> &[String] {
        &self.include_globs
    }

    /// Selects the matching files under `root`.
    pub fn select<S: FileStore + ?Sized>(&self, store: &S, root: &Path) -> Result<FileSet> {
        let includes = self
            .include_globs
            .iter()
            .map(|p| Ok(build_glob(p)?.compile_matcher()))
            .collect::<Result<Vec<GlobMatcher>>>()?;
        let exclude_set = self.build_glob_set(&self.exclude_globs)?;

        let candidates: Vec<PathBuf> = store
            .list(root)
            .map_err(|source| RewriteError::FileRead {
                path: root.to_path_buf(),
                source,
            })?
            .into_iter()
            .filter(|path| self.passes_filters(path, root, &exclude_set))
            .collect();

        let mut files = FileSet::new();

        if includes.is_empty() {
            files.extend(candidates);
            return Ok(files);
        }

        for glob in &includes {
            let matched = candidates
                .iter()
                .filter(|path| glob.is_match(relative(path, root)))
                .cloned()
                .collect::<Vec<_>>();
            tracing::debug!(pattern = glob.glob().glob(), count = matched.len(), "glob matched");
            files.extend(matched);
        }

        Ok(files)
    }

    fn passes_filters(&self, path: &Path, root: &Path, exclude_set: &GlobSet) -> bool {
        if !self.include_hidden && is_hidden(relative(path, root)) {
            return false;
        }

        if !self.extensions.is_empty() {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                return false;
            }
        }

        self.exclude_globs.is_empty() || !exclude_set.is_match(relative(path, root))
    }

    fn build_glob_set(&self, patterns: &[String]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(build_glob(pattern)?);
        }
        Ok(builder.build()?)
    }
}

fn build_glob(pattern: &str) -> Result<globset::Glob> {
    Ok(GlobBuilder::new(pattern).literal_separator(true).build()?)
}

fn is_hidden(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
