//! Markdown to HTML rendering.

use std::collections::HashSet;
use std::marker::PhantomData;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::admonition::preprocess_admonitions;
use crate::highlight::highlight_block;
use crate::toc::{TocEntry, extract_headings, parse_heading_line};

/// Result of rendering markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Table of contents entries (levels 2-4).
    pub toc: Vec<TocEntry>,
}

/// Rendering failure. No partial HTML is produced.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Syntax highlighting of a code block failed.
    #[error("Syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Markdown renderer producing HTML fragments.
///
/// Runs admonition preprocessing, then renders with pulldown-cmark. Raw HTML
/// passes through untouched: sources are trusted.
///
/// # Example
///
/// ```
/// use quire_renderer::MarkdownRenderer;
///
/// let result = MarkdownRenderer::new()
///     .with_highlighting(false)
///     .render("## Setup\n\n~~old~~ new")
///     .unwrap();
///
/// assert_eq!(result.html, "<h2 id=\"setup\">Setup</h2>\n<p><del>old</del> new</p>\n");
/// assert_eq!(result.toc[0].id, "setup");
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    gfm: bool,
    highlight: bool,
    heading_ids: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with GFM, highlighting and heading ids enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            highlight: true,
            heading_ids: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled, the parser supports tables, strikethrough, task lists,
    /// footnotes and blockquote alerts (`> [!NOTE]`).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable code block syntax highlighting.
    #[must_use]
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Enable or disable `id` attributes on table-of-contents headings.
    #[must_use]
    pub fn with_heading_ids(mut self, enabled: bool) -> Self {
        self.heading_ids = enabled;
        self
    }

    /// Parser options for the configured feature set.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown to HTML and extract its table of contents.
    ///
    /// The table of contents is taken from the raw markdown, before admonition
    /// preprocessing.
    pub fn render(&self, markdown: &str) -> Result<RenderResult, RenderError> {
        let toc = extract_headings(markdown);
        let source = preprocess_admonitions(markdown);

        let anchors: HashSet<&str> = toc
            .iter()
            .map(|entry| entry.id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        let heading_ids = self.heading_ids;
        let events = Parser::new_ext(&source, self.parser_options())
            .into_offset_iter()
            .map(|(event, range)| match event {
                Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes,
                    attrs,
                }) if heading_ids => Event::Start(Tag::Heading {
                    level,
                    id: heading_anchor(&source[range], &anchors).map(CowStr::from),
                    classes,
                    attrs,
                }),
                other => other,
            });

        let mut output = String::with_capacity(source.len() * 3 / 2);
        if self.highlight {
            let mut highlighter = CodeHighlighter::new(events);
            html::push_html(&mut output, &mut highlighter);
            if let Some(err) = highlighter.error {
                return Err(err.into());
            }
        } else {
            html::push_html(&mut output, events);
        }

        Ok(RenderResult { html: output, toc })
    }
}

/// Anchor id for a heading whose source starts at `heading_source`.
///
/// Only headings the table of contents lists get an id, so every TOC link
/// resolves and nothing else is touched.
fn heading_anchor(heading_source: &str, anchors: &HashSet<&str>) -> Option<String> {
    let line = heading_source.lines().next()?;
    parse_heading_line(line)
        .map(|entry| entry.id)
        .filter(|id| anchors.contains(id.as_str()))
}

/// Language hint from a fence info string: its first word.
fn fence_hint(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .filter(|hint| !hint.is_empty())
            .map(ToOwned::to_owned),
        CodeBlockKind::Indented => None,
    }
}

/// Code block being collected.
#[derive(Debug)]
struct PendingBlock {
    hint: Option<String>,
    code: String,
}

/// Iterator adapter that replaces code blocks with highlighted HTML.
///
/// Collects the text of each code block and emits a single `Event::Html`
/// in its place. On highlighter failure the stream ends early and the error
/// is kept in `error`.
struct CodeHighlighter<'a, I: Iterator<Item = Event<'a>>> {
    iter: I,
    block: Option<PendingBlock>,
    error: Option<syntect::Error>,
    _events: PhantomData<Event<'a>>,
}

impl<'a, I: Iterator<Item = Event<'a>>> CodeHighlighter<'a, I> {
    fn new(iter: I) -> Self {
        Self {
            iter,
            block: None,
            error: None,
            _events: PhantomData,
        }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for CodeHighlighter<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }
        loop {
            match (self.block.as_mut(), self.iter.next()?) {
                (None, Event::Start(Tag::CodeBlock(kind))) => {
                    self.block = Some(PendingBlock {
                        hint: fence_hint(&kind),
                        code: String::new(),
                    });
                }
                (Some(block), Event::Text(text)) => block.code.push_str(&text),
                (Some(_), Event::End(TagEnd::CodeBlock)) => {
                    let block = self.block.take()?;
                    match highlight_block(&block.code, block.hint.as_deref()) {
                        Ok(html) => return Some(Event::Html(CowStr::from(html))),
                        Err(err) => {
                            tracing::warn!(hint = ?block.hint, error = %err, "Highlighting failed");
                            self.error = Some(err);
                            return None;
                        }
                    }
                }
                (Some(_), _) => {}
                (None, event) => return Some(event),
            }
        }
    }
}
