//! Serializable rewrite configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RewriteError, Result};
use crate::matcher::FileMatcher;
use crate::rewrite::Rewrite;
use crate::transform::text::normalize_backrefs;
use crate::transform::{Guarded, TextTransform, Transform, TransformBuilder};

/// How a rule's `match` text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Exact substring search.
    Literal,
    /// Regular expression with a capture-aware replacement template.
    Regex,
}

/// One text transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub kind: RuleKind,

    /// Text or pattern to search for.
    #[serde(rename = "match")]
    pub search: String,

    /// Replacement text, or template for regex rules. Regex templates accept
    /// `$1`, `${1}`, `${name}` and Python-style `\1` / `\g<name>`.
    pub replace: String,

    /// Only apply the rule to content containing this text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_contains: Option<String>,
}

impl RuleSpec {
    /// Creates a literal rule.
    pub fn literal(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Literal,
            search: search.into(),
            replace: replace.into(),
            when_contains: None,
        }
    }

    /// Creates a regex rule.
    pub fn regex(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Regex,
            search: search.into(),
            replace: replace.into(),
            when_contains: None,
        }
    }

    /// Restricts the rule to content containing `marker`.
    pub fn when_contains(mut self, marker: impl Into<String>) -> Self {
        self.when_contains = Some(marker.into());
        self
    }

    /// Compiles the rule into a transformation.
    pub fn to_transform(&self) -> Result<Box<dyn Transform>> {
        let transform = match self.kind {
            RuleKind::Literal => TextTransform::replace_literal(&self.search, &self.replace),
            RuleKind::Regex => {
                TextTransform::replace(&self.search, &normalize_backrefs(&self.replace))?
            }
        };

        let boxed: Box<dyn Transform> = match &self.when_contains {
            Some(marker) => Box::new(Guarded::new(marker.clone(), Box::new(transform))),
            None => Box::new(transform),
        };
        Ok(boxed)
    }
}

/// A serializable batch rewrite: which files to visit and which rules to
/// apply, in order.
///
/// # Example YAML
///
/// ```yaml
/// name: fix-ids
/// patterns:
///   - "src/**/*.tsx"
///   - "src/**/*.ts"
/// label: Fixed IDs in
/// rules:
///   - kind: literal
///     match: "._id"
///     replace: ".id"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Unique name for this rewrite.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Glob patterns, relative to the root, selecting the files to scan.
    pub patterns: Vec<String>,

    /// Glob patterns to skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Transformations, applied in order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,

    /// Report without writing.
    #[serde(default)]
    pub dry_run: bool,

    /// Prefix printed before each changed path.
    #[serde(default = "default_label")]
    pub label: String,

    /// Final summary line; `{count}` is replaced by the number of changed
    /// files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

fn default_label() -> String {
    "Rewrote".to_string()
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            name: "unnamed-rewrite".to_string(),
            description: String::new(),
            patterns: Vec::new(),
            exclude: Vec::new(),
            rules: Vec::new(),
            dry_run: false,
            label: default_label(),
            summary: None,
        }
    }
}

impl RewriteConfig {
    /// Create a new config.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Set the file patterns.
    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the per-file label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the summary template.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builds the file selection.
    pub fn matcher(&self) -> FileMatcher {
        FileMatcher::new()
            .includes(self.patterns.iter().cloned())
            .excludes(self.exclude.iter().cloned())
    }

    /// Compiles and validates the rules, in order.
    pub fn transforms(&self) -> Result<TransformBuilder> {
        let mut builder = TransformBuilder::new();
        for (idx, rule) in self.rules.iter().enumerate() {
            let transform = rule.to_transform().map_err(|e| {
                RewriteError::InvalidConfig(format!("rule {} of '{}': {}", idx + 1, self.name, e))
            })?;
            transform.check_fixed_point()?;
            builder = builder.boxed(transform);
        }
        Ok(builder)
    }

    /// Checks the config without touching any file.
    pub fn validate(&self) -> Result<()> {
        if self.patterns.is_empty() {
            return Err(RewriteError::InvalidConfig(format!(
                "'{}' has no file patterns",
                self.name
            )));
        }
        self.transforms().map(|_| ())
    }

    /// Builds a ready-to-run rewrite rooted at `root`.
    pub fn to_rewrite(&self, root: impl Into<PathBuf>) -> Result<Rewrite> {
        self.validate()?;
        let rewrite = Rewrite::in_dir(root).with_parts(self.matcher(), self.transforms()?);
        Ok(if self.dry_run { rewrite.dry_run() } else { rewrite })
    }

    /// Formats the final summary line.
    pub fn format_summary(&self, count: usize) -> String {
        match &self.summary {
            Some(template) => template.replace("{count}", &count.to_string()),
            None => format!("{} file(s) changed", count),
        }
    }

    /// Load config from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            RewriteError::InvalidConfig(format!("Failed to parse YAML config: {}", e))
        })
    }

    /// Load config from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            RewriteError::InvalidConfig(format!("Failed to parse JSON config: {}", e))
        })
    }

    /// Load config from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml_str(&read_config(path.as_ref())?)
    }

    /// Load config from a JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&read_config(path.as_ref())?)
    }

    /// Load config from a file, choosing the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            _ => Err(RewriteError::InvalidConfig(format!(
                "Unsupported config format: {} (expected .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Serialize config to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        RewriteError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read config file {}: {}", path.display(), e),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_format() {
        let yaml = r#"
name: motion
patterns:
  - "src/components/**/*.tsx"
exclude:
  - "**/node_modules/**"
label: Optimized
summary: "Optimizations completed in {count} files."
rules:
  - kind: literal
    match: "duration-300"
    replace: "duration-500"
  - kind: regex
    match: 'duration: 0\.5\s*\}\}'
    replace: "duration: 0.6 }}"
    when_contains: framer-motion
"#;

        let config = RewriteConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.name, "motion");
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].kind, RuleKind::Regex);
        assert_eq!(config.rules[1].when_contains.as_deref(), Some("framer-motion"));
        assert!(!config.dry_run);
        assert_eq!(config.format_summary(3), "Optimizations completed in 3 files.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_format_with_defaults() {
        let json = r#"{
            "name": "ids",
            "patterns": ["src/**/*.ts"],
            "rules": [{ "kind": "literal", "match": "._id", "replace": ".id" }],
            "dry_run": true
        }"#;

        let config = RewriteConfig::from_json_str(json).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.label, "Rewrote");
        assert_eq!(config.format_summary(2), "2 file(s) changed");
        assert_eq!(config.transforms().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let yaml = "name: x\npatterns: [a]\nrules:\n  - kind: fuzzy\n    match: a\n    replace: b\n";
        assert!(matches!(
            RewriteConfig::from_yaml_str(yaml),
            Err(RewriteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_requires_patterns() {
        let config = RewriteConfig::new("empty", "").with_rule(RuleSpec::literal("a", "b"));
        assert!(matches!(
            config.validate(),
            Err(RewriteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_self_rematch() {
        let config = RewriteConfig::new("hazard", "")
            .with_patterns(["src/**/*.tsx"])
            .with_rule(RuleSpec::literal(
                "hover:-translate-y-2 transition-all",
                "hover:-translate-y-2 transition-all duration-500 ease-out",
            ));

        assert!(matches!(
            config.validate(),
            Err(RewriteError::SelfRematch { .. })
        ));
    }

    #[test]
    fn test_bad_regex_names_rule() {
        let config = RewriteConfig::new("broken", "")
            .with_patterns(["**/*.ts"])
            .with_rule(RuleSpec::literal("a", "b"))
            .with_rule(RuleSpec::regex("(", "x"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rule 2 of 'broken'"));
    }

    #[test]
    fn test_python_backrefs_are_normalized() {
        let rule = RuleSpec::regex(r"duration: (\d)\.5", r"duration: \1.6");
        let out = rule
            .to_transform()
            .unwrap()
            .apply("duration: 0.5", Path::new("a.tsx"))
            .unwrap();
        assert_eq!(out, "duration: 0.6");
    }

    #[test]
    fn test_python_escaped_backslash_is_literal() {
        let rule = RuleSpec::regex(r"(x)", r"\\1");
        let out = rule
            .to_transform()
            .unwrap()
            .apply("x", Path::new("a.ts"))
            .unwrap();
        assert_eq!(out, r"\1");
    }

    #[test]
    fn test_straddling_literal_rejected() {
        let config = RewriteConfig::new("shrink", "")
            .with_patterns(["**/*.ts"])
            .with_rule(RuleSpec::literal("ab", "a"));
        assert!(matches!(
            config.transforms(),
            Err(RewriteError::SelfRematch { .. })
        ));
    }

    #[test]
    fn test_guarded_rule() {
        let rule = RuleSpec::literal("x", "y").when_contains("marker");
        let transform = rule.to_transform().unwrap();
        assert_eq!(transform.apply("x", Path::new("a.ts")).unwrap(), "x");
        assert_eq!(transform.apply("marker x", Path::new("a.ts")).unwrap(), "marker y");
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = TempDir::new().unwrap();
        let config = RewriteConfig::new("roundtrip", "saved")
            .with_patterns(["src/**/*.ts"])
            .with_rule(RuleSpec::literal("._id", ".id"));

        let yaml_path = dir.path().join("rules.yml");
        std::fs::write(&yaml_path, config.to_yaml_string().unwrap()).unwrap();
        assert_eq!(RewriteConfig::from_file(&yaml_path).unwrap(), config);

        let json_path = dir.path().join("rules.json");
        std::fs::write(&json_path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(RewriteConfig::from_file(&json_path).unwrap(), config);

        assert!(RewriteConfig::from_file(dir.path().join("rules.toml")).is_err());
        assert!(matches!(
            RewriteConfig::from_file(dir.path().join("missing.yaml")),
            Err(RewriteError::Io(_))
        ));
    }
}
