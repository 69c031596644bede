//! Navigation, document resolution and page rendering for Quire.
//!
//! The pieces compose into [`Site`]:
//!
//! - [`Manifest`] parses the `nav` key of an MkDocs `mkdocs.yml` into a
//!   [`NavigationNode`] tree with hrefs under a base path.
//! - [`linearize`] flattens the tree into reading order and
//!   [`Pagination::locate`] finds a page's neighbours.
//! - [`SlugResolver`] maps URL slugs to markdown files in a
//!   [`Storage`](quire_storage::Storage).
//! - [`Site::render`] runs the markdown through
//!   [`MarkdownRenderer`](quire_renderer::MarkdownRenderer) and caches the
//!   result per source mtime.
//!
//! # Example
//!
//! ```
//! use quire_site::{Manifest, Pagination, linearize};
//!
//! let manifest = Manifest::parse("nav:\n  - home.md\n  - Setup: guides/setup.md\n")?;
//! let entries = linearize(&manifest.navigation("/docs"));
//!
//! let pagination = Pagination::locate(&entries, "/docs");
//! assert_eq!(pagination.next.unwrap().href, "/docs/guides/setup");
//! # Ok::<(), quire_site::ManifestError>(())
//! ```

mod manifest;
mod navigation;
mod resolver;
mod site;

pub use manifest::{Manifest, ManifestEntry, ManifestError, path_to_href, title_from_path};
pub use navigation::{NavEntry, NavTarget, NavigationNode, Pagination, linearize, static_slugs};
pub use resolver::{Document, SlugResolver, document_title, heading_title};
pub use site::{RenderedPage, Site, SiteConfig, SiteError};
