//! Block segmentation.
//!
//! [`parse_block`] classifies the line at a cursor position, consumes every
//! line belonging to that block, and returns the parsed block together with
//! the index of the first unconsumed line. It never looks behind the cursor
//! and always moves it forward, so folding it from index 0 visits each line
//! exactly once.
//!
//! Classification precedence (first match wins):
//!
//! 1. fenced code (line starts with three backticks)
//! 2. heading (`#` to `####`, whitespace, text)
//! 3. table (trimmed line starts with `|`)
//! 4. unordered list item (`-` or `*`, whitespace)
//! 5. blank line (skipped)
//! 6. paragraph (everything else)

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;
use crate::inline::transform_inline;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,4})\s+(.+)").unwrap());

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s").unwrap());

const FENCE: &str = "```";

/// Block type without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Code,
    Heading,
    Table,
    List,
    Paragraph,
}

impl BlockKind {
    /// Lowercase name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Heading => "heading",
            Self::Table => "table",
            Self::List => "list",
            Self::Paragraph => "paragraph",
        }
    }
}

/// A parsed block, borrowing its text from the source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// Fenced code lines, excluding both fences.
    Code(Vec<&'a str>),
    /// Heading with level 1 to 4.
    Heading { level: usize, text: &'a str },
    /// Table rows with divider rows already removed.
    Table {
        header: Vec<&'a str>,
        body: Vec<Vec<&'a str>>,
    },
    /// List item texts with their markers stripped.
    List(Vec<&'a str>),
    /// Paragraph lines, joined with a space on output.
    Paragraph(Vec<&'a str>),
}

impl Block<'_> {
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Code(_) => BlockKind::Code,
            Self::Heading { .. } => BlockKind::Heading,
            Self::Table { .. } => BlockKind::Table,
            Self::List(_) => BlockKind::List,
            Self::Paragraph(_) => BlockKind::Paragraph,
        }
    }

    /// Append the HTML for this block to `out`.
    ///
    /// Code content is escaped only; every other text unit goes through
    /// [`transform_inline`].
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::Code(lines) => {
                let mut code = String::new();
                for line in lines {
                    code.push_str(&escape_html(line));
                    code.push('\n');
                }
                out.push_str("<pre>");
                out.push_str(code.trim_end());
                out.push_str("</pre>");
            }
            Self::Heading { level, text } => {
                write!(out, "<h{level}>{}</h{level}>", transform_inline(text)).unwrap();
            }
            Self::Table { header, body } => {
                out.push_str("<table>");
                write_row(out, header, "th");
                for row in body {
                    write_row(out, row, "td");
                }
                out.push_str("</table>");
            }
            Self::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&transform_inline(item));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Self::Paragraph(lines) => {
                out.push_str("<p>");
                out.push_str(&transform_inline(&lines.join(" ")));
                out.push_str("</p>");
            }
        }
    }
}

fn write_row(out: &mut String, cells: &[&str], tag: &str) {
    out.push_str("<tr>");
    for cell in cells {
        write!(out, "<{tag}>{}</{tag}>", transform_inline(cell)).unwrap();
    }
    out.push_str("</tr>");
}

/// Parse the block starting at `lines[at]`.
///
/// Returns the block (or `None` when the consumed lines emit nothing: a
/// blank line, or a table made only of divider rows) and the index of the
/// next line to classify. The returned index is always greater than `at`
/// and never greater than `lines.len()`.
///
/// # Panics
///
/// Panics if `at` is out of bounds.
#[must_use]
pub fn parse_block<'a>(lines: &[&'a str], at: usize) -> (Option<Block<'a>>, usize) {
    let line = lines[at];

    if is_fence(line) {
        return parse_code(lines, at + 1);
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        let level = caps[1].len();
        let text = caps.get(2).map_or("", |m| m.as_str());
        return (Some(Block::Heading { level, text }), at + 1);
    }

    if is_table_line(line) {
        return parse_table(lines, at);
    }

    if list_item_text(line).is_some() {
        return parse_list(lines, at);
    }

    if is_blank(line) {
        return (None, at + 1);
    }

    parse_paragraph(lines, at)
}

/// Consume code lines from `start` up to and including the closing fence.
///
/// A missing closing fence closes the block at end of input.
fn parse_code<'a>(lines: &[&'a str], start: usize) -> (Option<Block<'a>>, usize) {
    let end = lines[start..]
        .iter()
        .position(|&line| is_fence(line))
        .map_or(lines.len(), |offset| start + offset);

    let next = (end + 1).min(lines.len());
    (Some(Block::Code(lines[start..end].to_vec())), next)
}

fn parse_table<'a>(lines: &[&'a str], at: usize) -> (Option<Block<'a>>, usize) {
    let end = run_end(lines, at, is_table_line);

    let mut rows = lines[at..end]
        .iter()
        .map(|&line| split_cells(line))
        .filter(|cells| !is_divider_row(cells));

    let block = rows.next().map(|header| Block::Table {
        header,
        body: rows.collect(),
    });
    (block, end)
}

fn parse_list<'a>(lines: &[&'a str], at: usize) -> (Option<Block<'a>>, usize) {
    let items: Vec<&str> = lines[at..]
        .iter()
        .map_while(|&line| list_item_text(line))
        .collect();

    let next = at + items.len();
    (Some(Block::List(items)), next)
}

/// The first line is always taken, so text that merely resembles a block
/// starter (such as `##### E`) still makes progress.
fn parse_paragraph<'a>(lines: &[&'a str], at: usize) -> (Option<Block<'a>>, usize) {
    let end = run_end(lines, at + 1, |line| !is_blank(line) && !is_block_start(line));
    (Some(Block::Paragraph(lines[at..end].to_vec())), end)
}

/// Index of the first line at or after `start` that fails `pred`.
fn run_end(lines: &[&str], start: usize, pred: impl Fn(&str) -> bool) -> usize {
    lines[start..]
        .iter()
        .position(|&line| !pred(line))
        .map_or(lines.len(), |offset| start + offset)
}

fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_table_line(line: &str) -> bool {
    line.contains('|') && line.trim().starts_with('|')
}

fn is_block_start(line: &str) -> bool {
    is_fence(line)
        || HEADING_RE.is_match(line)
        || is_table_line(line)
        || LIST_ITEM_RE.is_match(line)
}

/// Text of a list item line after its marker and one whitespace character.
fn list_item_text(line: &str) -> Option<&str> {
    LIST_ITEM_RE.find(line).map(|m| &line[m.end()..])
}

/// Split a table line on `|`, dropping the segments before the first and
/// after the last pipe.
fn split_cells(line: &str) -> Vec<&str> {
    let segments: Vec<&str> = line.split('|').collect();
    match segments.len() {
        0..=2 => Vec::new(),
        n => segments[1..n - 1].iter().map(|cell| cell.trim()).collect(),
    }
}

/// A row is a divider when every cell is made of `-` and `:` only.
///
/// A row without cells counts as a divider; an empty cell does not.
fn is_divider_row(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(src: &str) -> Vec<&str> {
        src.lines().collect()
    }

    fn html(block: &Block<'_>) -> String {
        let mut out = String::new();
        block.write_html(&mut out);
        out
    }

    #[test]
    fn test_block_kind_names() {
        assert_eq!(BlockKind::Code.as_str(), "code");
        assert_eq!(BlockKind::Paragraph.as_str(), "paragraph");
    }

    #[test]
    fn test_parse_code_block() {
        let src = lines("```rust\nfn main() {}\n```\nafter");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, Some(Block::Code(vec!["fn main() {}"])));
        assert_eq!(next, 3);
    }

    #[test]
    fn test_parse_unterminated_code_block() {
        let src = lines("```\na\nb");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, Some(Block::Code(vec!["a", "b"])));
        assert_eq!(next, 3);
    }

    #[test]
    fn test_parse_fence_only() {
        let src = lines("```");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, Some(Block::Code(Vec::new())));
        assert_eq!(next, 1);
    }

    #[test]
    fn test_code_html_escapes_and_trims() {
        let block = Block::Code(vec!["  <b>&</b>", "", "  "]);
        assert_eq!(html(&block), "<pre>  &lt;b&gt;&amp;&lt;/b&gt;</pre>");
    }

    #[test]
    fn test_empty_code_html() {
        assert_eq!(html(&Block::Code(Vec::new())), "<pre></pre>");
    }

    #[test]
    fn test_parse_heading_levels() {
        for (src, level) in [("# A", 1), ("## A", 2), ("### A", 3), ("#### A", 4)] {
            let src = lines(src);
            let (block, next) = parse_block(&src, 0);
            assert_eq!(block, Some(Block::Heading { level, text: "A" }));
            assert_eq!(next, 1);
        }
    }

    #[test]
    fn test_five_hashes_is_paragraph() {
        let src = lines("##### E");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, Some(Block::Paragraph(vec!["##### E"])));
        assert_eq!(next, 1);
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        let src = lines("#tag");
        let (block, _) = parse_block(&src, 0);
        assert_eq!(block.map(|b| b.kind()), Some(BlockKind::Paragraph));
    }

    #[test]
    fn test_heading_html() {
        let block = Block::Heading {
            level: 2,
            text: "Use `cfg`",
        };
        assert_eq!(html(&block), "<h2>Use <code>cfg</code></h2>");
    }

    #[test]
    fn test_parse_table_drops_divider() {
        let src = lines("| A | B |\n|---|:--:|\n| 1 | 2 |\nnext");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(
            block,
            Some(Block::Table {
                header: vec!["A", "B"],
                body: vec![vec!["1", "2"]],
            })
        );
        assert_eq!(next, 3);
    }

    #[test]
    fn test_parse_table_divider_only() {
        let src = lines("|---|---|\n| :-: |\npara");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, None);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_table_with_indented_pipe() {
        let src = lines("  | x |");
        let (block, _) = parse_block(&src, 0);
        assert_eq!(
            block,
            Some(Block::Table {
                header: vec!["x"],
                body: Vec::new(),
            })
        );
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_cells("| a | b"), vec!["a"]);
        assert_eq!(split_cells("|"), Vec::<&str>::new());
        assert_eq!(split_cells("| |"), vec![""]);
    }

    #[test]
    fn test_divider_rows() {
        assert!(is_divider_row(&["---", ":--", "--:"]));
        assert!(is_divider_row(&[]));
        assert!(!is_divider_row(&[""]));
        assert!(!is_divider_row(&["---", "x"]));
    }

    #[test]
    fn test_table_html() {
        let block = Block::Table {
            header: vec!["Name", "Type"],
            body: vec![vec!["`id`", "**int**"]],
        };
        assert_eq!(
            html(&block),
            "<table><tr><th>Name</th><th>Type</th></tr>\
             <tr><td><code>id</code></td><td><strong>int</strong></td></tr></table>"
        );
    }

    #[test]
    fn test_table_ends_at_list_item() {
        let src = lines("| a |\n- item");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block.map(|b| b.kind()), Some(BlockKind::Table));
        assert_eq!(next, 1);
        let (block, next) = parse_block(&src, next);
        assert_eq!(block, Some(Block::List(vec!["item"])));
        assert_eq!(next, 2);
    }

    #[test]
    fn test_parse_list() {
        let src = lines("- a\n* b\n-c\n");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, Some(Block::List(vec!["a", "b"])));
        assert_eq!(next, 2);
    }

    #[test]
    fn test_list_strips_one_whitespace() {
        assert_eq!(list_item_text("-  two"), Some(" two"));
        assert_eq!(list_item_text("*\ttab"), Some("tab"));
        assert_eq!(list_item_text("-none"), None);
    }

    #[test]
    fn test_list_html() {
        let block = Block::List(vec!["one", "[two](/2)"]);
        assert_eq!(
            html(&block),
            r#"<ul><li>one</li><li><a href="/2">two</a></li></ul>"#
        );
    }

    #[test]
    fn test_blank_line_skipped() {
        let src = lines("   \nx");
        assert_eq!(parse_block(&src, 0), (None, 1));
    }

    #[test]
    fn test_paragraph_joins_lines() {
        let src = lines("one\ntwo\n\nthree");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(block, Some(Block::Paragraph(vec!["one", "two"])));
        assert_eq!(next, 2);
    }

    #[test]
    fn test_paragraph_stops_at_block_start() {
        for starter in ["```", "# h", "| t |", "- l", "* l"] {
            let src = format!("text\n{starter}");
            let src = lines(&src);
            let (_, next) = parse_block(&src, 0);
            assert_eq!(next, 1, "paragraph should stop before {starter:?}");
        }
    }

    #[test]
    fn test_paragraph_continues_over_non_starters() {
        let src = lines("text\n##### five\n#nospace");
        let (block, next) = parse_block(&src, 0);
        assert_eq!(
            block,
            Some(Block::Paragraph(vec!["text", "##### five", "#nospace"]))
        );
        assert_eq!(next, 3);
    }

    #[test]
    fn test_paragraph_html() {
        let block = Block::Paragraph(vec!["a", "b"]);
        assert_eq!(html(&block), "<p>a b</p>");
    }

    #[test]
    fn test_parse_block_from_middle() {
        let src = lines("# T\n\nbody");
        assert_eq!(parse_block(&src, 1), (None, 2));
        assert_eq!(
            parse_block(&src, 2),
            (Some(Block::Paragraph(vec!["body"])), 3)
        );
    }
}
