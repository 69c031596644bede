//! Site facade tying navigation, resolution and rendering together.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use quire_cache::NullCache;
//! use quire_site::{Site, SiteConfig};
//! use quire_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let site = Site::new(storage, &NullCache, SiteConfig::default());
//!
//! let page = site.render(&["guides".to_owned(), "setup".to_owned()])?;
//! # Ok::<(), quire_site::SiteError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use quire_cache::{Cache, CacheBucket, CacheBucketExt};
use quire_renderer::{MarkdownRenderer, RenderError, TocEntry};
use quire_storage::{Storage, StorageError};
use serde::{Deserialize, Serialize};

use crate::manifest::{Manifest, ManifestError, path_to_href};
use crate::navigation::{self, NavEntry, NavigationNode, Pagination};
use crate::resolver::{Document, SlugResolver, fallback_title, heading_title};

/// Cache bucket holding rendered pages.
const PAGES_BUCKET: &str = "pages";

/// Error returned by [`Site`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Navigation manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// Document could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Markdown transform failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Path to `mkdocs.yml`.
    pub manifest_path: PathBuf,
    /// URL prefix for every href.
    pub base_path: String,
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Highlight fenced code blocks.
    pub highlight: bool,
    /// Add `id` attributes to table-of-contents headings.
    pub heading_ids: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("mkdocs.yml"),
            base_path: "/docs".to_owned(),
            gfm: true,
            highlight: true,
            heading_ids: true,
        }
    }
}

/// A rendered page with its navigation context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    /// Slug segments as requested.
    pub slug: Vec<String>,
    /// Canonical href of the page.
    pub href: String,
    /// Document title.
    pub title: String,
    /// Rendered HTML fragment.
    pub html: String,
    /// Headings of level 2 to 4.
    pub toc: Vec<TocEntry>,
    /// Neighbouring pages in reading order.
    pub pagination: Pagination,
    /// Whether the HTML came from the page cache.
    pub from_cache: bool,
}

/// Page cache payload.
///
/// Only the heading title is stored: the fallback depends on the requested
/// slug, and `home` and the root share `home.md`.
#[derive(Serialize, Deserialize)]
struct CachedPage {
    heading_title: Option<String>,
    html: String,
    toc: Vec<TocEntry>,
}

struct NavigationSnapshot {
    mtime: SystemTime,
    nodes: Arc<Vec<NavigationNode>>,
}

/// Documentation site over a content root and navigation manifest.
///
/// # Thread Safety
///
/// `Site` is `Send + Sync`. Navigation is memoized behind an `RwLock` and
/// reloaded when the manifest mtime changes; rendered pages live in a
/// [`CacheBucket`] keyed by storage path with the source mtime as etag.
pub struct Site {
    resolver: SlugResolver,
    renderer: MarkdownRenderer,
    manifest_path: PathBuf,
    base_path: String,
    options_tag: String,
    navigation: RwLock<Option<NavigationSnapshot>>,
    pages: Box<dyn CacheBucket>,
}

impl Site {
    /// Create a site reading documents from `storage` and caching pages in
    /// `cache`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, cache: &dyn Cache, config: SiteConfig) -> Self {
        let renderer = MarkdownRenderer::new()
            .with_gfm(config.gfm)
            .with_highlighting(config.highlight)
            .with_heading_ids(config.heading_ids);
        let options_tag = format!(
            "gfm={},highlight={},ids={}",
            u8::from(config.gfm),
            u8::from(config.highlight),
            u8::from(config.heading_ids)
        );

        Self {
            resolver: SlugResolver::new(storage),
            renderer,
            manifest_path: config.manifest_path,
            base_path: config.base_path,
            options_tag,
            navigation: RwLock::new(None),
            pages: cache.bucket(PAGES_BUCKET),
        }
    }

    /// URL prefix for hrefs.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Manifest file this site reads navigation from.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Navigation tree from the manifest.
    ///
    /// The parsed tree is reused until the manifest mtime changes. The
    /// manifest is read from the filesystem, not through [`Storage`]:
    /// `mkdocs.yml` sits beside the content root, outside the tree storage
    /// paths may address.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Manifest`] if the manifest cannot be read or is
    /// not valid YAML.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn navigation(&self) -> Result<Arc<Vec<NavigationNode>>, SiteError> {
        let mtime = std::fs::metadata(&self.manifest_path)
            .and_then(|meta| meta.modified())
            .ok();

        if let Some(mtime) = mtime
            && let Some(snapshot) = self.navigation.read().unwrap().as_ref()
            && snapshot.mtime == mtime
        {
            tracing::debug!("Navigation cache hit");
            return Ok(Arc::clone(&snapshot.nodes));
        }

        let manifest = Manifest::load(&self.manifest_path)?;
        let nodes = Arc::new(manifest.navigation(&self.base_path));
        tracing::debug!(
            path = %self.manifest_path.display(),
            entries = nodes.len(),
            "Loaded navigation"
        );

        if let Some(mtime) = mtime {
            *self.navigation.write().unwrap() = Some(NavigationSnapshot {
                mtime,
                nodes: Arc::clone(&nodes),
            });
        }
        Ok(nodes)
    }

    /// Drop the memoized navigation tree.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn invalidate(&self) {
        *self.navigation.write().unwrap() = None;
    }

    /// Navigation in reading order.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Manifest`] if navigation cannot be loaded.
    pub fn docs_list(&self) -> Result<Vec<NavEntry>, SiteError> {
        Ok(navigation::linearize(&self.navigation()?))
    }

    /// Slugs to pre-render: every navigation page plus the root and `home`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Manifest`] if navigation cannot be loaded.
    pub fn static_slugs(&self) -> Result<Vec<Vec<String>>, SiteError> {
        Ok(navigation::static_slugs(
            &self.navigation()?,
            &self.base_path,
        ))
    }

    /// Resolve `slug` to its markdown document.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if a matched file cannot be read.
    pub fn resolve(&self, slug: &[String]) -> Result<Option<Document>, SiteError> {
        Ok(self.resolver.resolve(slug)?)
    }

    /// Canonical href for `slug`.
    ///
    /// The root slug maps to the base path. Other slugs go through the same
    /// mapping as manifest paths, so `["home"]` is the base path too.
    #[must_use]
    pub fn href_for(&self, slug: &[String]) -> String {
        let joined = slug
            .iter()
            .map(String::as_str)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        if joined.is_empty() {
            self.base_path.clone()
        } else {
            path_to_href(&joined, &self.base_path)
        }
    }

    /// Previous and next pages around `slug`.
    ///
    /// Degrades to no neighbours if navigation cannot be loaded.
    pub fn pagination(&self, slug: &[String]) -> Pagination {
        match self.docs_list() {
            Ok(entries) => Pagination::locate(&entries, &self.href_for(slug)),
            Err(e) => {
                tracing::warn!(error = %e, "Navigation unavailable, rendering without pagination");
                Pagination::default()
            }
        }
    }

    /// Render the page for `slug`.
    ///
    /// Returns `Ok(None)` when no document exists for the slug.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the document cannot be read, or
    /// [`SiteError::Render`] if the markdown transform fails.
    pub fn render(&self, slug: &[String]) -> Result<Option<RenderedPage>, SiteError> {
        let Some(path) = self.resolver.locate(slug) else {
            tracing::debug!(?slug, "No document for slug");
            return Ok(None);
        };
        let storage = self.resolver.storage();
        let key = path.to_string_lossy().replace('\\', "/");

        let etag = match storage.mtime(&path) {
            Ok(mtime) => Some(format!("{mtime}:{}", self.options_tag)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No mtime, bypassing page cache");
                None
            }
        };

        let cached = etag
            .as_deref()
            .and_then(|etag| self.pages.get_json::<CachedPage>(&key, etag));
        let from_cache = cached.is_some();

        let page = if let Some(page) = cached {
            tracing::debug!(path = %key, "Page cache hit");
            page
        } else {
            let content = match storage.read(&path) {
                Ok(content) => content,
                Err(e) if e.is_not_found() => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let result = self.renderer.render(&content)?;
            let page = CachedPage {
                heading_title: heading_title(&content),
                html: result.html,
                toc: result.toc,
            };
            if let Some(etag) = &etag {
                self.pages.set_json(&key, etag, &page);
            }
            page
        };

        Ok(Some(RenderedPage {
            slug: slug.to_vec(),
            href: self.href_for(slug),
            title: page.heading_title.unwrap_or_else(|| fallback_title(slug)),
            html: page.html,
            toc: page.toc,
            pagination: self.pagination(slug),
            from_cache,
        }))
    }
}
