//! Transform DSL for batch text rewriting.

pub mod guard;
pub mod text;

pub use guard::Guarded;
pub use text::TextTransform;

use crate::error::{RewriteError, Result};
use std::path::Path;

/// A text transformation that can be applied to a file's full content.
pub trait Transform: Send + Sync {
    /// Applies the transformation to the given content.
    fn apply(&self, source: &str, path: &Path) -> Result<String>;

    /// Returns a description of the transformation.
    fn describe(&self) -> String;

    /// Rejects transformations whose output would be matched again by
    /// themselves on the next run.
    fn check_fixed_point(&self) -> Result<()> {
        Ok(())
    }
}

/// An ordered sequence of transformations, applied one after the other.
#[derive(Default)]
pub struct TransformBuilder {
    transforms: Vec<Box<dyn Transform>>,
    invalid: Option<RewriteError>,
}

impl TransformBuilder {
    /// Creates a new transform builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a regex replacement. An invalid pattern is reported by
    /// [`TransformBuilder::validate`].
    pub fn replace_pattern(mut self, pattern: &str, replacement: &str) -> Self {
        match TextTransform::replace(pattern, replacement) {
            Ok(transform) => self.transforms.push(Box::new(transform)),
            Err(e) => {
                self.invalid.get_or_insert(e);
            }
        }
        self
    }

    /// Adds a literal string replacement.
    pub fn replace_literal(mut self, needle: &str, replacement: &str) -> Self {
        self.transforms
            .push(Box::new(TextTransform::replace_literal(needle, replacement)));
        self
    }

    /// Adds the transformations built by `f`, each guarded on `marker`.
    pub fn when_contains<F>(mut self, marker: &str, f: F) -> Self
    where
        F: FnOnce(TransformBuilder) -> TransformBuilder,
    {
        let inner = f(TransformBuilder::new());
        if let Some(e) = inner.invalid {
            self.invalid.get_or_insert(e);
        }
        for transform in inner.transforms {
            self.transforms.push(Box::new(Guarded::new(marker, transform)));
        }
        self
    }

    /// Adds a custom transformation.
    pub fn custom<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Adds an already boxed transformation.
    pub fn boxed(mut self, transform: Box<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Checks that every pattern compiled and that no transformation
    /// re-matches its own output.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref e) = self.invalid {
            return Err(RewriteError::InvalidConfig(e.to_string()));
        }
        for transform in &self.transforms {
            transform.check_fixed_point()?;
        }
        Ok(())
    }

    /// Applies all transformations to the content in order.
    pub fn apply(&self, source: &str, path: &Path) -> Result<String> {
        let mut result = source.to_string();
        for transform in &self.transforms {
            result = transform.apply(&result, path)?;
        }
        Ok(result)
    }

    /// Returns descriptions of all transformations.
    pub fn describe(&self) -> Vec<String> {
        self.transforms.iter().map(|t| t.describe()).collect()
    }

    /// Returns the number of transformations.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if there are no transformations.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transforms_compose_in_order() {
        let t = TransformBuilder::new()
            .replace_literal("a", "b")
            .replace_literal("b", "c");
        assert_eq!(t.apply("ab", Path::new("x")).unwrap(), "cc");

        let reversed = TransformBuilder::new()
            .replace_literal("b", "c")
            .replace_literal("a", "b");
        assert_eq!(reversed.apply("ab", Path::new("x")).unwrap(), "bc");
    }

    #[test]
    fn test_invalid_pattern_surfaces_on_validate() {
        let t = TransformBuilder::new()
            .replace_literal("x", "y")
            .replace_pattern("(", "z");
        assert_eq!(t.len(), 1);
        assert!(matches!(t.validate(), Err(RewriteError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_self_rematch() {
        let t = TransformBuilder::new().replace_literal("id", "uid");
        assert!(matches!(t.validate(), Err(RewriteError::SelfRematch { .. })));
    }

    #[test]
    fn test_when_contains_wraps_each_transform() {
        let t = TransformBuilder::new()
            .when_contains("framer-motion", |g| {
                g.replace_literal("0.5", "0.6").replace_literal("0.3", "0.4")
            })
            .replace_literal("duration-300", "duration-500");

        assert_eq!(t.len(), 3);
        assert_eq!(
            t.apply("0.5 0.3 duration-300", Path::new("x")).unwrap(),
            "0.5 0.3 duration-500"
        );
        assert_eq!(
            t.apply("framer-motion 0.5 0.3", Path::new("x")).unwrap(),
            "framer-motion 0.6 0.4"
        );
    }

    #[test]
    fn test_empty_builder_is_identity() {
        let t = TransformBuilder::new();
        assert!(t.is_empty());
        assert!(t.validate().is_ok());
        assert_eq!(t.apply("unchanged", Path::new("x")).unwrap(), "unchanged");
    }
}
