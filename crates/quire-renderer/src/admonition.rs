//! MkDocs-style admonition preprocessing.
//!
//! Rewrites
//!
//! ```text
//! !!! note "Title"
//!     Body text
//! ```
//!
//! into a raw HTML `<div>` wrapper whose body stays markdown. Blank lines
//! around the body make `CommonMark` end the HTML blocks, so the body is
//! parsed as regular markdown by the renderer.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;

static OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!!!\s+([A-Za-z0-9_]+)\s*(?:"([^"]*)")?\s*$"#).unwrap()
});

static INDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{4}").unwrap());

/// Convert `!!! type "title"` blocks into admonition `<div>`s.
///
/// Body lines are the following lines indented by four whitespace
/// characters, with the indent removed. A blank line stays in the body only
/// when the line after it is indented. Bodies are processed recursively, so
/// admonitions nest. Lines inside fenced code are left alone.
///
/// # Example
///
/// ```
/// use quire_renderer::preprocess_admonitions;
///
/// let output = preprocess_admonitions("!!! tip\n    Use a fence.");
/// assert_eq!(
///     output,
///     "<div class=\"admonition admonition-tip\">\n\
///      <p class=\"admonition-title\">Tip</p>\n\
///      \n\
///      Use a fence.\n\
///      \n\
///      </div>\n"
/// );
/// ```
#[must_use]
pub fn preprocess_admonitions(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut fence = FenceTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if fence.is_code(line) {
            output.push(line.to_owned());
            continue;
        }
        let Some(caps) = OPENING.captures(line) else {
            output.push(line.to_owned());
            continue;
        };

        let kind = &caps[1];
        let title = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|t| !t.is_empty())
            .map_or_else(|| capitalize(kind), ToOwned::to_owned);

        let mut body: Vec<&str> = Vec::new();
        while i < lines.len() {
            if let Some(m) = INDENT.find(lines[i]) {
                body.push(&lines[i][m.end()..]);
            } else if lines[i].trim().is_empty()
                && lines.get(i + 1).is_some_and(|next| INDENT.is_match(next))
            {
                body.push("");
            } else {
                break;
            }
            i += 1;
        }

        output.push(format!("<div class=\"admonition admonition-{kind}\">"));
        output.push(format!("<p class=\"admonition-title\">{title}</p>"));
        output.push(String::new());
        output.push(preprocess_admonitions(&body.join("\n")));
        output.push(String::new());
        output.push("</div>".to_owned());
        output.push(String::new());
    }

    output.join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
