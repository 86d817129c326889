//! Top-level render loop.

use crate::block::parse_block;

/// Render markdown source to an HTML fragment.
///
/// The result is a concatenation of block elements with no document
/// wrapper. Rendering never fails: unrecognized syntax becomes paragraph
/// text and an unterminated code fence closes at end of input. Empty input
/// gives empty output.
///
/// The function is pure, so pages can be rendered concurrently without any
/// coordination.
///
/// # Examples
///
/// ```
/// use docview_renderer::render_markdown;
///
/// let html = render_markdown("# Title\n\n- one\n- two");
/// assert_eq!(html, "<h1>Title</h1><ul><li>one</li><li>two</li></ul>");
/// ```
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut html = String::with_capacity(source.len() + source.len() / 2);

    let mut at = 0;
    while at < lines.len() {
        let (block, next) = parse_block(&lines, at);
        debug_assert!(next > at, "block parser must advance the cursor");

        if let Some(block) = block {
            tracing::trace!(
                kind = block.kind().as_str(),
                start = at,
                end = next,
                "Parsed block"
            );
            block.write_html(&mut html);
        }
        at = next;
    }

    tracing::debug!(
        lines = lines.len(),
        bytes = html.len(),
        "Rendered markdown"
    );
    html
}
