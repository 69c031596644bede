//! Code block syntax highlighting with `syntect`.
//!
//! Output uses CSS class spans (`<span class="source rust">`), so themes are
//! plain stylesheets and rendered HTML stays theme-independent.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::util::escape_html;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Pick a syntect token from the shape of unlabeled code.
fn heuristic_token(code: &str) -> Option<&'static str> {
    let token = if looks_like_json(code) {
        "json"
    } else if code.starts_with("<?xml") {
        "xml"
    } else if code.starts_with('<') && code.contains("</") {
        "html"
    } else if code.contains("fn ") && (code.contains("let ") || code.contains("->")) {
        "rs"
    } else if code.contains("def ") && code.contains("):") {
        "py"
    } else if code.contains("#include") {
        "c"
    } else if looks_like_sql(code) {
        "sql"
    } else if code.contains("function ") || code.contains("=> {") || code.contains("const ") {
        "js"
    } else if code.starts_with("$ ") {
        "sh"
    } else {
        return None;
    };
    Some(token)
}

fn looks_like_json(code: &str) -> bool {
    (code.starts_with('{') && code.ends_with('}')) || (code.starts_with('[') && code.ends_with(']'))
}

fn looks_like_sql(code: &str) -> bool {
    let upper = code.to_ascii_uppercase();
    ["SELECT ", "INSERT INTO ", "CREATE TABLE ", "UPDATE "]
        .iter()
        .any(|kw| upper.starts_with(kw))
}

/// Find a syntax for a fence language hint such as `rust`, `py` or `Bash`.
fn syntax_for_hint(hint: &str) -> Option<&'static SyntaxReference> {
    let set = &*SYNTAX_SET;
    set.find_syntax_by_token(hint)
        .or_else(|| set.find_syntax_by_token(&hint.to_ascii_lowercase()))
}

/// Guess the syntax of unlabeled code.
///
/// First-line detection handles shebangs, XML declarations and editor
/// modelines; content heuristics cover the common cases without them.
pub(crate) fn detect_syntax(code: &str) -> Option<&'static SyntaxReference> {
    let set = &*SYNTAX_SET;
    let first_line = code.lines().next().unwrap_or_default();
    if let Some(syntax) = set.find_syntax_by_first_line(first_line) {
        return Some(syntax);
    }
    heuristic_token(code.trim()).and_then(|token| set.find_syntax_by_token(token))
}

/// CSS class suffix for a detected syntax: its first file extension, or its
/// lowercased name.
fn language_class(syntax: &SyntaxReference) -> String {
    syntax
        .file_extensions
        .first()
        .cloned()
        .unwrap_or_else(|| syntax.name.to_lowercase().replace(' ', "-"))
}

/// Render a code block to `<pre><code>` HTML.
///
/// With a `hint`, the hint selects the syntax and names the `language-*`
/// class; an unknown hint falls back to escaped plain code. Without a hint,
/// the language is detected; undetected code is escaped plain code without a
/// language class.
pub(crate) fn highlight_block(code: &str, hint: Option<&str>) -> Result<String, syntect::Error> {
    let (syntax, class) = match hint {
        Some(hint) => (syntax_for_hint(hint), Some(hint.to_owned())),
        None => {
            let syntax = detect_syntax(code);
            (syntax, syntax.map(language_class))
        }
    };

    let body = match syntax {
        Some(syntax) => highlight_lines(code, syntax)?,
        None => {
            tracing::debug!(?hint, "No syntax found, rendering plain code");
            escape_html(code)
        }
    };

    Ok(match class {
        Some(class) => format!(
            "<pre><code class=\"language-{}\">{body}</code></pre>\n",
            escape_html(&class)
        ),
        None => format!("<pre><code>{body}</code></pre>\n"),
    })
}

fn highlight_lines(code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hinted_block_is_highlighted() {
        let html = highlight_block("fn main() {}\n", Some("rust")).unwrap();

        assert!(html.starts_with("<pre><code class=\"language-rust\">"));
        assert!(html.contains("<span class=\""));
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn test_hint_is_case_insensitive() {
        let html = highlight_block("echo hi\n", Some("Bash")).unwrap();

        assert!(html.contains("class=\"language-Bash\""));
        assert!(html.contains("<span class=\""));
    }

    #[test]
    fn test_unknown_hint_escapes_plain_code() {
        let html = highlight_block("<b>&</b>\n", Some("klingon")).unwrap();

        assert_eq!(
            html,
            "<pre><code class=\"language-klingon\">&lt;b&gt;&amp;&lt;/b&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_shebang_is_detected() {
        let syntax = detect_syntax("#!/usr/bin/env python\nprint('hi')\n").unwrap();
        assert_eq!(syntax.name, "Python");
    }

    #[test]
    fn test_json_heuristic() {
        let syntax = detect_syntax("{\n  \"key\": 1\n}\n").unwrap();
        assert_eq!(syntax.name, "JSON");
    }

    #[test]
    fn test_rust_heuristic() {
        let syntax = detect_syntax("fn add(a: i32) -> i32 {\n    a\n}\n").unwrap();
        assert_eq!(syntax.name, "Rust");
    }

    #[test]
    fn test_undetected_plain_text() {
        assert!(detect_syntax("just some words\n").is_none());
        let html = highlight_block("just some words\n", None).unwrap();
        assert_eq!(html, "<pre><code>just some words\n</code></pre>\n");
    }

    #[test]
    fn test_detected_block_gets_class() {
        let html = highlight_block("SELECT * FROM users;\n", None).unwrap();
        assert!(html.starts_with("<pre><code class=\"language-sql\">"));
    }

    #[test]
    fn test_highlighting_is_deterministic() {
        let code = "let x = vec![1, 2, 3];\n";
        assert_eq!(
            highlight_block(code, Some("rust")).unwrap(),
            highlight_block(code, Some("rust")).unwrap()
        );
    }
}
