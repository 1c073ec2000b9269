//! Text-based transformations: literal and regex replacement.

use super::Transform;
use crate::error::{RewriteError, Result};
use regex::Regex;
use std::path::Path;

/// Text-based transformation applied to a whole file.
pub struct TextTransform {
    kind: TextTransformKind,
}

enum TextTransformKind {
    Replace { pattern: Regex, replacement: String },
    ReplaceLiteral { needle: String, replacement: String },
}

impl TextTransform {
    /// Creates a regex replacement transform.
    ///
    /// The replacement uses the `regex` crate template syntax: `$1`, `${1}`,
    /// `${name}`, with `$$` for a literal dollar sign.
    pub fn replace(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self::replace_regex(Regex::new(pattern)?, replacement))
    }

    /// Creates a replacement transform from a pre-compiled regex.
    pub fn replace_regex(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            kind: TextTransformKind::Replace {
                pattern,
                replacement: replacement.into(),
            },
        }
    }

    /// Creates a literal string replacement transform.
    pub fn replace_literal(needle: &str, replacement: &str) -> Self {
        Self {
            kind: TextTransformKind::ReplaceLiteral {
                needle: needle.to_string(),
                replacement: replacement.to_string(),
            },
        }
    }
}

impl Transform for TextTransform {
    fn apply(&self, source: &str, _path: &Path) -> Result<String> {
        match &self.kind {
            TextTransformKind::Replace { pattern, replacement } => {
                Ok(pattern.replace_all(source, replacement.as_str()).into_owned())
            }
            TextTransformKind::ReplaceLiteral { needle, replacement } => {
                Ok(source.replace(needle, replacement))
            }
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            TextTransformKind::Replace { pattern, replacement } => {
                format!("Replace pattern '{}' with '{}'", pattern.as_str(), replacement)
            }
            TextTransformKind::ReplaceLiteral { needle, replacement } => {
                format!("Replace literal '{}' with '{}'", needle, replacement)
            }
        }
    }

    fn check_fixed_point(&self) -> Result<()> {
        match &self.kind {
            TextTransformKind::ReplaceLiteral { needle, replacement } => {
                if needle.is_empty() {
                    return Err(RewriteError::InvalidConfig(
                        "literal search text must not be empty".to_string(),
                    ));
                }
                if replacement.contains(needle.as_str()) {
                    return Err(RewriteError::SelfRematch {
                        rule: self.describe(),
                        reason: format!("replacement still contains '{}'", needle),
                    });
                }
                if straddles_replacement(needle, replacement) {
                    return Err(RewriteError::SelfRematch {
                        rule: self.describe(),
                        reason: format!(
                            "replacement can form a new '{}' with the text around it",
                            needle
                        ),
                    });
                }
            }
            TextTransformKind::Replace { pattern, replacement } => {
                // Only the fixed text of the template is known up front.
                let fixed = strip_capture_refs(replacement);
                if pattern.is_match(&fixed) {
                    return Err(RewriteError::SelfRematch {
                        rule: self.describe(),
                        reason: format!("pattern matches its own replacement '{}'", fixed),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Whether a fresh occurrence of `needle` can overlap an inserted
/// `replacement` and the untouched text on either side of it.
fn straddles_replacement(needle: &str, replacement: &str) -> bool {
    // Starts inside the replacement and runs into the following text.
    let runs_past_end = replacement
        .char_indices()
        .map(|(i, _)| &replacement[i..])
        .any(|tail| tail.len() < needle.len() && needle.starts_with(tail));

    // Starts in the preceding text and ends inside the replacement.
    let starts_before = replacement
        .char_indices()
        .map(|(i, c)| &replacement[..i + c.len_utf8()])
        .any(|head| head.len() < needle.len() && needle.ends_with(head));

    // Covers the whole replacement with text on both sides.
    let encloses = needle
        .match_indices(replacement)
        .any(|(i, _)| i > 0 && i + replacement.len() < needle.len());

    runs_past_end || starts_before || encloses
}

/// Removes capture references from a replacement template, leaving the text
/// that every expansion of the template contains.
fn strip_capture_refs(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => rest = &braced[end + 1..],
                None => {
                    out.push('$');
                    rest = after;
                }
            }
        } else {
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if name_len == 0 {
                out.push('$');
            }
            rest = &after[name_len..];
        }
    }

    out.push_str(rest);
    out
}

/// Rewrites Python-style backreferences (`\1`, `\g<name>`) into the
/// `${1}` / `${name}` form understood by the `regex` crate.
pub fn normalize_backrefs(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let rest = &template[idx + 1..];
        if rest.starts_with('\\') {
            out.push('\\');
            chars.next();
            continue;
        }

        let digits: String = rest.chars().take_while(|d| d.is_ascii_digit()).collect();
        if !digits.is_empty() {
            out.push_str(&format!("${{{}}}", digits));
            for _ in 0..digits.len() {
                chars.next();
            }
        } else if let Some(named) = rest.strip_prefix("g<")
            && let Some(end) = named.find('>')
        {
            out.push_str(&format!("${{{}}}", &named[..end]));
            // Skip `g<`, the name and `>`.
            for _ in 0..named[..end].chars().count() + 3 {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }

    out
}
