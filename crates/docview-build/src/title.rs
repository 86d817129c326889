//! Page title extraction.

use std::sync::LazyLock;

use regex::Regex;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[ \t]+(.+)$").unwrap());

/// Title of a page: the first level-1 heading outside code fences, or a
/// title-cased form of the last slug segment when there is none.
pub(crate) fn page_title(markdown: &str, slug: &str) -> String {
    extract_title(markdown).unwrap_or_else(|| title_from_slug(slug))
}

fn extract_title(markdown: &str) -> Option<String> {
    let mut in_fence = false;
    for line in markdown.lines() {
        if line.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = H1_RE.captures(line) {
            let title = caps[1].trim();
            if !title.is_empty() {
                return Some(title.to_owned());
            }
        }
    }
    None
}

/// "guide/self-hosting" -> "Self Hosting".
fn title_from_slug(slug: &str) -> String {
    let name = slug.rsplit('/').next().unwrap_or(slug);
    let words: Vec<String> = name
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize_first)
        .collect();
    if words.is_empty() {
        "Untitled".to_owned()
    } else {
        words.join(" ")
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
