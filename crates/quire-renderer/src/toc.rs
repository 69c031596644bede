//! Table-of-contents extraction from raw markdown.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,4})\s+(.+)$").unwrap());

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Anchor id, usable as a URL fragment.
    pub id: String,
    /// Heading text with emoji and backticks removed.
    pub text: String,
    /// Heading level (2-4).
    pub level: u8,
}

/// Extract level 2-4 ATX headings, in document order.
///
/// Scans every line of the raw markdown, fenced code included, so a
/// `## comment` in a shell snippet is listed too. Duplicate ids are kept as-is.
///
/// # Example
///
/// ```
/// use quire_renderer::extract_headings;
///
/// let toc = extract_headings("# Title\n## Getting Started 🚀\n### `cargo` usage");
/// assert_eq!(toc.len(), 2);
/// assert_eq!(toc[0].id, "getting-started");
/// assert_eq!(toc[1].text, "cargo usage");
/// ```
#[must_use]
pub fn extract_headings(markdown: &str) -> Vec<TocEntry> {
    markdown.lines().filter_map(parse_heading_line).collect()
}

/// Parse one line as a table-of-contents heading.
///
/// Returns `None` for anything but `##` to `####` headings.
pub(crate) fn parse_heading_line(line: &str) -> Option<TocEntry> {
    let caps = HEADING_LINE.captures(line)?;
    let level = u8::try_from(caps[1].len()).ok()?;
    let text = clean_heading_text(&caps[2]);
    let id = heading_id(&text);
    Some(TocEntry { id, text, level })
}

fn is_stripped(c: char) -> bool {
    c == '`' || ('\u{1F300}'..='\u{1F9FF}').contains(&c)
}

fn clean_heading_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !is_stripped(*c))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Build an anchor id from cleaned heading text.
///
/// Lowercases, keeps ASCII word characters, whitespace and hyphens, turns
/// whitespace runs into single hyphens, collapses hyphen runs and trims one
/// hyphen from each end.
#[must_use]
pub fn heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            continue;
        }
        if in_space {
            push_hyphen(&mut id);
            in_space = false;
        }
        if c == '-' {
            push_hyphen(&mut id);
        } else {
            id.push(c);
        }
    }
    if in_space {
        push_hyphen(&mut id);
    }

    let id = id.strip_prefix('-').unwrap_or(&id);
    id.strip_suffix('-').unwrap_or(id).to_owned()
}

fn push_hyphen(id: &mut String) {
    if !id.ends_with('-') {
        id.push('-');
    }
}
