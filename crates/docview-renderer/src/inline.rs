//! Inline transformation of block text.
//!
//! Text extracted from a block (heading text, table cell, list item,
//! paragraph body) is escaped and then run through [`INLINE_RULES`] in order.
//! Each rule is a global regex replacement over the output of the previous
//! one, so the table order is part of the output format: escaping after a
//! rule would mangle the tags that rule inserted.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;

/// A single inline substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineRule {
    /// Short name used in logs and tests.
    pub name: &'static str,
    /// Regex matched against the already-escaped text.
    pub pattern: &'static str,
    /// Replacement in `regex` expansion syntax.
    pub replacement: &'static str,
}

/// Inline rules in application order.
///
/// HTML escaping always runs before the first rule.
pub const INLINE_RULES: [InlineRule; 3] = [
    InlineRule {
        name: "code",
        pattern: r"`([^`]+)`",
        replacement: "<code>${1}</code>",
    },
    InlineRule {
        name: "strong",
        pattern: r"\*\*([^*]+)\*\*",
        replacement: "<strong>${1}</strong>",
    },
    // The target is inserted as captured; a `"` in it is not escaped.
    InlineRule {
        name: "link",
        pattern: r"\[([^\]]+)\]\(([^)]+)\)",
        replacement: r#"<a href="${2}">${1}</a>"#,
    },
];

static COMPILED_RULES: LazyLock<Vec<(InlineRule, Regex)>> = LazyLock::new(|| {
    INLINE_RULES
        .iter()
        .map(|rule| (*rule, Regex::new(rule.pattern).unwrap()))
        .collect()
});

/// Escape `text` and apply every inline rule in order.
///
/// # Examples
///
/// ```
/// use docview_renderer::transform_inline;
///
/// assert_eq!(
///     transform_inline("**bold** and [x](http://e)"),
///     r#"<strong>bold</strong> and <a href="http://e">x</a>"#
/// );
/// ```
#[must_use]
pub fn transform_inline(text: &str) -> String {
    COMPILED_RULES
        .iter()
        .fold(escape_html(text).into_owned(), |acc, (rule, re)| {
            if re.is_match(&acc) {
                re.replace_all(&acc, rule.replacement).into_owned()
            } else {
                acc
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = INLINE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["code", "strong", "link"]);
    }

    #[test]
    fn test_rules_compile() {
        assert_eq!(COMPILED_RULES.len(), INLINE_RULES.len());
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(transform_inline("just words"), "just words");
    }

    #[test]
    fn test_escapes_before_markup() {
        assert_eq!(transform_inline("a <b> & c"), "a &lt;b&gt; &amp; c");
    }

    #[test]
    fn test_code_span() {
        assert_eq!(
            transform_inline("run `cargo test` now"),
            "run <code>cargo test</code> now"
        );
    }

    #[test]
    fn test_code_span_content_is_escaped() {
        assert_eq!(
            transform_inline("`Vec<u8>`"),
            "<code>Vec&lt;u8&gt;</code>"
        );
    }

    #[test]
    fn test_multiple_code_spans_non_greedy() {
        assert_eq!(
            transform_inline("`a` and `b`"),
            "<code>a</code> and <code>b</code>"
        );
    }

    #[test]
    fn test_unmatched_backtick_left_alone() {
        assert_eq!(transform_inline("a ` b"), "a ` b");
    }

    #[test]
    fn test_empty_code_span_not_matched() {
        assert_eq!(transform_inline("``"), "``");
    }

    #[test]
    fn test_strong() {
        assert_eq!(
            transform_inline("**one** and **two**"),
            "<strong>one</strong> and <strong>two</strong>"
        );
    }

    #[test]
    fn test_single_asterisk_is_not_italic() {
        assert_eq!(transform_inline("*not italic*"), "*not italic*");
    }

    #[test]
    fn test_underscore_is_not_italic() {
        assert_eq!(transform_inline("_not italic_"), "_not italic_");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            transform_inline("see [docs](/docs/api)"),
            r#"see <a href="/docs/api">docs</a>"#
        );
    }

    #[test]
    fn test_link_target_keeps_escaped_ampersand() {
        assert_eq!(
            transform_inline("[q](/search?a=1&b=2)"),
            r#"<a href="/search?a=1&amp;b=2">q</a>"#
        );
    }

    #[test]
    fn test_image_syntax_not_supported() {
        // `!` stays as text in front of an ordinary link
        assert_eq!(
            transform_inline("![alt](img.png)"),
            r#"!<a href="img.png">alt</a>"#
        );
    }

    #[test]
    fn test_link_target_quote_is_not_escaped() {
        // Known gap: a `"` in the target closes the attribute early.
        assert_eq!(
            transform_inline(r#"[x](a"b)"#),
            r#"<a href="a"b">x</a>"#
        );
    }

    #[test]
    fn test_bold_and_link_compose() {
        assert_eq!(
            transform_inline("**bold** and [x](http://e)"),
            r#"<strong>bold</strong> and <a href="http://e">x</a>"#
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(transform_inline(""), "");
    }
}
