//! Markdown to HTML rendering for Quire.
//!
//! The pipeline has two phases:
//!
//! 1. [`preprocess_admonitions`] rewrites MkDocs-style `!!!` blocks into
//!    `<div class="admonition ...">` wrappers around markdown bodies.
//! 2. [`MarkdownRenderer`] renders the result with pulldown-cmark (GFM
//!    extensions, raw HTML passthrough), highlights code blocks with syntect
//!    and adds `id`s to headings listed in the table of contents.
//!
//! [`extract_headings`] builds the table of contents from the raw markdown
//! and is usable on its own.
//!
//! # Example
//!
//! ```
//! use quire_renderer::MarkdownRenderer;
//!
//! let markdown = "# Guide\n\n!!! note\n    Read this first.\n\n## Install\n";
//! let result = MarkdownRenderer::new().render(markdown).unwrap();
//!
//! assert!(result.html.contains("admonition-note"));
//! assert_eq!(result.toc[0].text, "Install");
//! ```

mod admonition;
mod fence;
mod highlight;
mod renderer;
mod toc;
mod util;

pub use admonition::preprocess_admonitions;
pub use renderer::{MarkdownRenderer, RenderError, RenderResult};
pub use toc::{TocEntry, extract_headings, heading_id};
pub use util::escape_html;
