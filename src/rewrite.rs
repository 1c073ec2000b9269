//! The batch rewriting engine and its fluent entry point.
//!
//! Rewriting is split in two: [`rewrite`] decides what a file's new content
//! is without touching storage, and [`Rewriter`] reads, rewrites and writes
//! back files through a [`FileStore`].

use crate::diff::{DiffSummary, colorized_diff, unified_diff};
use crate::error::{RewriteError, Result};
use crate::matcher::{FileMatcher, FileSet};
use crate::store::{DiskStore, FileStore};
use crate::transform::TransformBuilder;
use std::path::{Path, PathBuf};

/// The outcome of rewriting a single piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub changed: bool,
    /// The new content, present only when it differs from the original.
    pub content: Option<String>,
}

/// Applies `transforms` in order to `content`.
pub fn rewrite(content: &str, transforms: &TransformBuilder, path: &Path) -> Result<RewriteResult> {
    let rewritten = transforms.apply(content, path)?;
    if rewritten == content {
        Ok(RewriteResult {
            changed: false,
            content: None,
        })
    } else {
        Ok(RewriteResult {
            changed: true,
            content: Some(rewritten),
        })
    }
}

/// What happened to one file during a run.
#[derive(Debug)]
pub enum FileOutcome {
    /// The content changed (and was written, unless the run was a dry run).
    Changed {
        path: PathBuf,
        original: String,
        rewritten: String,
    },
    /// No transformation altered the content.
    Unchanged { path: PathBuf },
    /// The file could not be read, transformed or written.
    Failed { path: PathBuf, error: RewriteError },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Changed { path, .. }
            | FileOutcome::Unchanged { path }
            | FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, FileOutcome::Changed { .. })
    }
}

/// The result of a batch run, one outcome per visited file in visiting order.
#[derive(Debug, Default)]
pub struct RewriteReport {
    pub outcomes: Vec<FileOutcome>,
    pub dry_run: bool,
}

impl RewriteReport {
    /// Paths whose content changed, in visiting order.
    pub fn changed_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_changed())
            .map(|o| o.path())
            .collect()
    }

    /// Files that failed, with their errors.
    pub fn failures(&self) -> Vec<(&Path, &RewriteError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { path, error } => Some((path.as_path(), error)),
                _ => None,
            })
            .collect()
    }

    pub fn files_visited(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the number of files that were (or would be) modified.
    pub fn files_modified(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_changed()).count()
    }

    pub fn files_failed(&self) -> usize {
        self.failures().len()
    }

    /// True when every visited file was processed without error.
    pub fn is_success(&self) -> bool {
        self.files_failed() == 0
    }

    /// Line-level totals over all changed files.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for outcome in &self.outcomes {
            if let FileOutcome::Changed {
                original, rewritten, ..
            } = outcome
            {
                summary.merge(&DiffSummary::from_diff(original, rewritten));
            }
        }
        summary
    }

    /// Generates a unified diff of all changes.
    pub fn diff(&self) -> String {
        self.render(unified_diff)
    }

    /// Generates a colorized diff for terminal display.
    pub fn colorized_diff(&self) -> String {
        self.render(colorized_diff)
    }

    fn render(&self, f: fn(&str, &str, &Path) -> String) -> String {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Changed {
                    path,
                    original,
                    rewritten,
                } => Some(f(original, rewritten, path)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reads, rewrites and conditionally writes back a set of files.
pub struct Rewriter {
    transforms: TransformBuilder,
    dry_run: bool,
}

impl Rewriter {
    pub fn new(transforms: TransformBuilder) -> Self {
        Self {
            transforms,
            dry_run: false,
        }
    }

    /// Computes outcomes without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Visits `files` in order. Per-file failures are recorded and the run
    /// moves on to the next file.
    pub fn run<S: FileStore + ?Sized>(&self, store: &mut S, files: &FileSet) -> RewriteReport {
        let mut report = RewriteReport {
            outcomes: Vec::new(),
            dry_run: self.dry_run,
        };

        if self.transforms.is_empty() {
            tracing::debug!("no transformations configured, nothing to do");
            return report;
        }

        for path in files {
            let outcome = self.process(store, path);
            match &outcome {
                FileOutcome::Changed { .. } => {
                    tracing::debug!(path = %path.display(), dry_run = self.dry_run, "rewritten")
                }
                FileOutcome::Unchanged { .. } => {
                    tracing::trace!(path = %path.display(), "unchanged")
                }
                FileOutcome::Failed { error, .. } => {
                    tracing::warn!(path = %path.display(), %error, "file skipped")
                }
            }
            report.outcomes.push(outcome);
        }

        tracing::info!(
            visited = report.files_visited(),
            modified = report.files_modified(),
            failed = report.files_failed(),
            dry_run = self.dry_run,
            "rewrite finished"
        );

        report
    }

    fn process<S: FileStore + ?Sized>(&self, store: &mut S, path: &Path) -> FileOutcome {
        let original = match store.read(path) {
            Ok(content) => content,
            Err(source) => {
                return FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error: RewriteError::FileRead {
                        path: path.to_path_buf(),
                        source,
                    },
                };
            }
        };

        let rewritten = match rewrite(&original, &self.transforms, path) {
            Ok(RewriteResult {
                content: Some(content),
                ..
            }) => content,
            Ok(_) => {
                return FileOutcome::Unchanged {
                    path: path.to_path_buf(),
                };
            }
            Err(error) => {
                return FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error,
                };
            }
        };

        if !self.dry_run
            && let Err(source) = store.write(path, &rewritten)
        {
            return FileOutcome::Failed {
                path: path.to_path_buf(),
                error: RewriteError::FileWrite {
                    path: path.to_path_buf(),
                    source,
                },
            };
        }

        FileOutcome::Changed {
            path: path.to_path_buf(),
            original,
            rewritten,
        }
    }
}

/// The main rewrite DSL builder.
///
/// ```rust,no_run
/// use batch_rewrite::prelude::*;
///
/// let report = Rewrite::in_dir("./web")
///     .files(|f| f.include("src/**/*.tsx").include("src/**/*.ts"))
///     .transform(|t| t.replace_literal("._id", ".id"))
///     .apply()?;
///
/// for path in report.changed_paths() {
///     println!("Fixed IDs in {}", path.display());
/// }
/// # Ok::<(), batch_rewrite::error::RewriteError>(())
/// ```
pub struct Rewrite {
    root: PathBuf,
    matcher: FileMatcher,
    transform: TransformBuilder,
    dry_run: bool,
}

impl Rewrite {
    /// Creates a rewrite rooted at the given directory.
    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            root: path.into(),
            matcher: FileMatcher::new(),
            transform: TransformBuilder::new(),
            dry_run: false,
        }
    }

    /// Creates a rewrite rooted at the current directory.
    pub fn current_dir() -> Result<Self> {
        Ok(Self::in_dir(std::env::current_dir()?))
    }

    /// Sets the file selection.
    pub fn files<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FileMatcher) -> FileMatcher,
    {
        self.matcher = f(FileMatcher::new());
        self
    }

    /// Sets the transformations to apply.
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: FnOnce(TransformBuilder) -> TransformBuilder,
    {
        self.transform = f(TransformBuilder::new());
        self
    }

    /// Uses an already assembled selection and transformation list.
    pub fn with_parts(mut self, matcher: FileMatcher, transform: TransformBuilder) -> Self {
        self.matcher = matcher;
        self.transform = transform;
        self
    }

    /// Enables dry-run mode (report without writing).
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Runs against the real file system.
    pub fn apply(self) -> Result<RewriteReport> {
        self.apply_to(&mut DiskStore)
    }

    /// Runs against the given store.
    ///
    /// Invalid transformations are rejected before any file is read.
    pub fn apply_to<S: FileStore + ?Sized>(self, store: &mut S) -> Result<RewriteReport> {
        self.transform.validate()?;

        let files = self.matcher.select(&*store, &self.root)?;
        tracing::debug!(root = %self.root.display(), files = files.len(), "files selected");

        let rewriter = Rewriter::new(self.transform).dry_run(self.dry_run);
        Ok(rewriter.run(store, &files))
    }

    /// Runs in dry-run mode and returns the diff.
    pub fn preview(self) -> Result<String> {
        Ok(self.dry_run().apply()?.diff())
    }

    /// Returns the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
