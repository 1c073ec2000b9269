//! Built-in rewrite configurations for a Next.js / framer-motion front end.

use crate::config::{RewriteConfig, RuleSpec};
use crate::error::{RewriteError, Result};

/// Marker a file must mention before its motion props are touched.
const FRAMER_MOTION: &str = "framer-motion";

const EASE_OUT_QUINT: &str = "ease: [0.22, 1, 0.36, 1]";

/// Names of the built-in presets, in display order.
pub const PRESET_NAMES: &[&str] = &["fix-ids", "smooth-motion"];

/// Looks up a preset by name.
pub fn preset(name: &str) -> Result<RewriteConfig> {
    match name {
        "fix-ids" => Ok(fix_ids()),
        "smooth-motion" => Ok(smooth_motion()),
        other => Err(RewriteError::UnknownPreset(other.to_string())),
    }
}

/// Every built-in preset.
pub fn all() -> Vec<RewriteConfig> {
    vec![fix_ids(), smooth_motion()]
}

/// Collapses `._id` field accesses into `.id` across TypeScript sources.
pub fn fix_ids() -> RewriteConfig {
    RewriteConfig::new("fix-ids", "Rename `._id` field accesses to `.id`")
        .with_patterns(["src/**/*.tsx", "src/**/*.ts"])
        .with_label("Fixed IDs in")
        .with_rule(RuleSpec::literal("._id", ".id"))
}

/// Softens scroll-triggered and hover animations in React components.
///
/// The viewport and transition rules only run on files importing
/// framer-motion; the Tailwind class rules run everywhere.
pub fn smooth_motion() -> RewriteConfig {
    let mut config = RewriteConfig::new(
        "smooth-motion",
        "Ease framer-motion transitions, trigger viewport animations early, soften hover classes",
    )
    .with_patterns(["src/components/**/*.tsx", "src/app/**/*.tsx"])
    .with_label("Optimized")
    .with_summary("Optimizations completed in {count} files.");

    let motion = [
        RuleSpec::literal(
            "viewport={{ once: true }}",
            r#"viewport={{ once: true, margin: "-50px" }}"#,
        ),
        RuleSpec::literal(
            "viewport={{ once: true, amount: 0.2 }}",
            r#"viewport={{ once: true, margin: "-50px", amount: 0.2 }}"#,
        ),
        RuleSpec::literal(
            "viewport={{ once: true, amount: 0.3 }}",
            r#"viewport={{ once: true, margin: "-50px", amount: 0.3 }}"#,
        ),
        eased_duration("0.5", "0.6"),
        eased_duration("0.6", "0.8"),
        eased_duration("0.8", "1.0"),
        eased_duration_then_delay("0.5", "0.6"),
        eased_duration_then_delay("0.6", "0.8"),
    ];
    for rule in motion {
        config = config.with_rule(rule.when_contains(FRAMER_MOTION));
    }

    config
        .with_rule(RuleSpec::literal(
            "hover:scale-105 transition-all",
            "hover:-translate-y-2 hover:shadow-xl transition-all duration-500 ease-out will-change-transform",
        ))
        .with_rule(RuleSpec::literal(
            "hover:scale-105",
            "hover:scale-[1.03] duration-500 ease-out will-change-transform",
        ))
        // Word-bounded, so the `t` ending `ease-out` cannot start a new match.
        .with_rule(RuleSpec::regex(
            r"\btransition-all duration-300\b",
            "transition-all duration-500 ease-out",
        ))
        // Only a class list ending right after `transition-all` is extended,
        // so the extended form never matches again.
        .with_rule(RuleSpec::regex(
            r#"hover:-translate-y-2 transition-all(\s*["'`}])"#,
            "hover:-translate-y-2 transition-all duration-500 ease-out will-change-transform${1}",
        ))
}

/// `transition={{ [delay: x, ]duration: <from> }}` gains the new duration
/// and an ease-out curve.
fn eased_duration(from: &str, to: &str) -> RuleSpec {
    RuleSpec::regex(
        format!(
            r"transition=\{{\{{\s*(delay: [^,]+,\s*)?duration: {}\s*\}}\}}",
            regex::escape(from)
        ),
        format!("transition={{{{ ${{1}}duration: {}, {} }}}}", to, EASE_OUT_QUINT),
    )
}

/// `transition={{ duration: <from>, delay: x }}` gains the new duration and
/// an ease-out curve. The delay may not contain a comma, so an already eased
/// transition is never matched.
fn eased_duration_then_delay(from: &str, to: &str) -> RuleSpec {
    RuleSpec::regex(
        format!(
            r"transition=\{{\{{\s*duration: {},\s*delay: ([^,]+?)\s*\}}\}}",
            regex::escape(from)
        ),
        format!(
            "transition={{{{ duration: {}, delay: ${{1}}, {} }}}}",
            to, EASE_OUT_QUINT
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn run(config: &RewriteConfig, source: &str) -> String {
        config
            .transforms()
            .unwrap()
            .apply(source, Path::new("src/components/Hero.tsx"))
            .unwrap()
    }

    const MOTION_IMPORT: &str = "import { motion } from \"framer-motion\";\n";

    #[test]
    fn test_presets_validate() {
        for config in all() {
            assert!(config.validate().is_ok(), "{} should validate", config.name);
        }
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset("fix-ids").unwrap().name, "fix-ids");
        assert_eq!(preset("smooth-motion").unwrap().name, "smooth-motion");
        assert!(matches!(
            preset("nope"),
            Err(RewriteError::UnknownPreset(_))
        ));
        assert_eq!(
            PRESET_NAMES,
            all().iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_eased_duration_rule_text() {
        let rule = eased_duration("0.5", "0.6");
        assert_eq!(
            rule.search,
            r"transition=\{\{\s*(delay: [^,]+,\s*)?duration: 0\.5\s*\}\}"
        );
        assert_eq!(
            rule.replace,
            "transition={{ ${1}duration: 0.6, ease: [0.22, 1, 0.36, 1] }}"
        );

        let rule = eased_duration_then_delay("0.6", "0.8");
        assert_eq!(
            rule.search,
            r"transition=\{\{\s*duration: 0\.6,\s*delay: ([^,]+?)\s*\}\}"
        );
        assert_eq!(
            rule.replace,
            "transition={{ duration: 0.8, delay: ${1}, ease: [0.22, 1, 0.36, 1] }}"
        );
    }

    #[test]
    fn test_duration_with_delay_prefix() {
        let source = format!("{MOTION_IMPORT}transition={{{{ delay: 0.2, duration: 0.5 }}}}");
        let expected = format!(
            "{MOTION_IMPORT}transition={{{{ delay: 0.2, duration: 0.6, ease: [0.22, 1, 0.36, 1] }}}}"
        );
        assert_eq!(run(&smooth_motion(), &source), expected);
    }

    #[test]
    fn test_duration_without_delay() {
        let source = format!("{MOTION_IMPORT}transition={{{{ duration: 0.5 }}}}");
        let expected =
            format!("{MOTION_IMPORT}transition={{{{ duration: 0.6, ease: [0.22, 1, 0.36, 1] }}}}");
        assert_eq!(run(&smooth_motion(), &source), expected);
    }

    #[test]
    fn test_durations_step_once() {
        let source = format!(
            "{MOTION_IMPORT}a transition={{{{ duration: 0.6 }}}}\nb transition={{{{ duration: 0.8 }}}}"
        );
        let expected = format!(
            "{MOTION_IMPORT}a transition={{{{ duration: 0.8, {EASE_OUT_QUINT} }}}}\nb transition={{{{ duration: 1.0, {EASE_OUT_QUINT} }}}}"
        );
        assert_eq!(run(&smooth_motion(), &source), expected);
    }

    #[test]
    fn test_duration_then_delay_is_not_bumped_twice() {
        let source = format!("{MOTION_IMPORT}transition={{{{ duration: 0.5, delay: index * 0.1 }}}}");
        let expected = format!(
            "{MOTION_IMPORT}transition={{{{ duration: 0.6, delay: index * 0.1, {EASE_OUT_QUINT} }}}}"
        );
        let once = run(&smooth_motion(), &source);
        assert_eq!(once, expected);
        assert_eq!(run(&smooth_motion(), &once), once);
    }

    #[test]
    fn test_viewport_margin() {
        let source = format!(
            "{MOTION_IMPORT}viewport={{{{ once: true }}}} viewport={{{{ once: true, amount: 0.3 }}}}"
        );
        let expected = format!(
            "{MOTION_IMPORT}viewport={{{{ once: true, margin: \"-50px\" }}}} viewport={{{{ once: true, margin: \"-50px\", amount: 0.3 }}}}"
        );
        assert_eq!(run(&smooth_motion(), &source), expected);
    }

    #[test]
    fn test_motion_rules_need_framer_import() {
        let source = "transition={{ duration: 0.5 }} viewport={{ once: true }}";
        assert_eq!(run(&smooth_motion(), source), source);
    }

    #[test]
    fn test_tailwind_rules_apply_without_framer() {
        let source = concat!(
            "<a className=\"card hover:scale-105 transition-all\">\n",
            "<b className=\"hover:scale-105\">\n",
            "<c className=\"transition-all duration-300\">\n",
            "<d className=\"hover:-translate-y-2 transition-all\">\n",
        );
        let expected = concat!(
            "<a className=\"card hover:-translate-y-2 hover:shadow-xl transition-all duration-500 ease-out will-change-transform\">\n",
            "<b className=\"hover:scale-[1.03] duration-500 ease-out will-change-transform\">\n",
            "<c className=\"transition-all duration-500 ease-out\">\n",
            "<d className=\"hover:-translate-y-2 transition-all duration-500 ease-out will-change-transform\">\n",
        );

        let once = run(&smooth_motion(), source);
        assert_eq!(once, expected);
        assert_eq!(run(&smooth_motion(), &once), once);
    }

    #[test]
    fn test_fix_ids() {
        assert_eq!(run(&fix_ids(), "foo._id"), "foo.id");
        assert_eq!(run(&fix_ids(), "foo.id"), "foo.id");
        assert_eq!(run(&fix_ids(), "const { _id } = doc"), "const { _id } = doc");
    }
}
