//! # Batch Rewrite
//!
//! Batch find-and-replace and regex rewriting across a source tree.
//!
//! This crate provides a fluent API for:
//! - Selecting files with recursive glob patterns
//! - Rewriting them with an ordered list of literal and regex replacements
//! - Writing back only files whose content actually changed
//! - Rejecting rules that would re-match their own output on the next run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_rewrite::prelude::*;
//!
//! let report = Rewrite::in_dir("./web")
//!     .files(|f| f.include("src/components/**/*.tsx"))
//!     .transform(|t| t
//!         .replace_literal("hover:scale-105", "hover:scale-[1.03] duration-500 ease-out")
//!         .when_contains("framer-motion", |m| m
//!             .replace_pattern(
//!                 r"transition=\{\{\s*(delay: [^,]+,\s*)?duration: 0\.5\s*\}\}",
//!                 "transition={{ ${1}duration: 0.6, ease: [0.22, 1, 0.36, 1] }}",
//!             )))
//!     .dry_run()
//!     .apply()?;
//!
//! println!("{}", report.diff());
//! # Ok::<(), batch_rewrite::error::RewriteError>(())
//! ```
//!
//! ## Configuration Files
//!
//! ```rust,no_run
//! use batch_rewrite::prelude::*;
//!
//! let config = RewriteConfig::from_file("rules.yaml")?;
//! let report = config.to_rewrite(".")?.apply()?;
//!
//! for path in report.changed_paths() {
//!     println!("{} {}", config.label, path.display());
//! }
//! println!("{}", config.format_summary(report.files_modified()));
//! # Ok::<(), batch_rewrite::error::RewriteError>(())
//! ```
//!
//! ## Testing Without Disk
//!
//! [`store::MemoryStore`] stands in for the file system, so rule lists can be
//! exercised against a virtual tree.
//!
//! ```rust
//! use batch_rewrite::prelude::*;
//!
//! let mut store = MemoryStore::new().with_file("/web/src/user.ts", "user._id");
//! let report = presets::fix_ids().to_rewrite("/web")?.apply_to(&mut store)?;
//!
//! assert_eq!(report.files_modified(), 1);
//! assert_eq!(store.get("/web/src/user.ts"), Some("user.id"));
//! # Ok::<(), batch_rewrite::error::RewriteError>(())
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod presets;
pub mod rewrite;
pub mod store;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{RewriteConfig, RuleKind, RuleSpec};
    pub use crate::diff::DiffSummary;
    pub use crate::error::{Result, RewriteError};
    pub use crate::matcher::{FileMatcher, FileSet};
    pub use crate::presets;
    pub use crate::rewrite::{
        FileOutcome, Rewrite, RewriteReport, RewriteResult, Rewriter, rewrite,
    };
    pub use crate::store::{DiskStore, FileStore, MemoryStore};
    pub use crate::transform::{Guarded, TextTransform, Transform, TransformBuilder};
}

pub use prelude::*;
