//! Markdown to HTML renderer for the documentation viewer.
//!
//! Renders a restricted markdown dialect in a single forward pass over the
//! source lines:
//!
//! - fenced code blocks (escaped, never inline-transformed)
//! - headings `#` to `####`
//! - pipe tables, with `---`/`:--:` divider rows dropped
//! - unordered lists with `-` or `*` markers
//! - paragraphs
//!
//! Inline text supports `code`, `**strong**` and `[label](target)` links,
//! applied in the fixed order given by [`INLINE_RULES`] after HTML escaping.
//!
//! This is not a CommonMark implementation and not a sanitizer: the output is
//! meant for trusted, author-controlled documentation.
//!
//! # Example
//!
//! ```
//! use docview_renderer::render_markdown;
//!
//! let html = render_markdown("## Setup\n\nRun `make` **once**.");
//! assert_eq!(html, "<h2>Setup</h2><p>Run <code>make</code> <strong>once</strong>.</p>");
//! ```

mod block;
mod escape;
mod inline;
mod renderer;

pub use block::{Block, BlockKind, parse_block};
pub use escape::escape_html;
pub use inline::{INLINE_RULES, InlineRule, transform_inline};
pub use renderer::render_markdown;
