//! HTML text escaping.

use std::borrow::Cow;

/// Escape the HTML metacharacters `&`, `<` and `>`.
///
/// `&` is replaced first so the entities produced for `<` and `>` are never
/// escaped a second time. Quotes are left alone: the output is meant for text
/// content, not attribute values.
///
/// Escaping is not idempotent. `escape_html("&amp;")` yields `&amp;amp;`, so
/// callers must not feed already-escaped text back in.
///
/// # Examples
///
/// ```
/// use docview_renderer::escape_html;
///
/// assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
