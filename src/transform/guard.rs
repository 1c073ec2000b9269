//! Content guards for transformations.

use super::Transform;
use crate::error::Result;
use std::path::Path;

/// Runs the inner transformation only when the content it receives contains
/// a marker string.
pub struct Guarded {
    marker: String,
    inner: Box<dyn Transform>,
}

impl Guarded {
    /// Wraps `inner` so it only fires on content containing `marker`.
    pub fn new(marker: impl Into<String>, inner: Box<dyn Transform>) -> Self {
        Self {
            marker: marker.into(),
            inner,
        }
    }

    /// Returns the marker this guard requires.
    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Transform for Guarded {
    fn apply(&self, source: &str, path: &Path) -> Result<String> {
        if source.contains(self.marker.as_str()) {
            self.inner.apply(source, path)
        } else {
            Ok(source.to_string())
        }
    }

    fn describe(&self) -> String {
        format!("{} (when file contains '{}')", self.inner.describe(), self.marker)
    }

    fn check_fixed_point(&self) -> Result<()> {
        self.inner.check_fixed_point()
    }
}
