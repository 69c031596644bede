//! Slug to document resolution.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use quire_storage::{Storage, StorageError};
use regex::Regex;
use serde::Serialize;

static TITLE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// Title used for the root page when it has no heading.
const FALLBACK_TITLE: &str = "Documentation";

/// A resolved markdown document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Raw markdown.
    pub content: String,
    /// First level-1 heading, or a slug-derived fallback.
    pub title: String,
    /// Slug segments as requested.
    pub slug: Vec<String>,
    /// Storage-relative path of the matched file.
    pub path: PathBuf,
}

/// Resolves URL slugs to markdown files in storage.
///
/// The root slug tries `home.md`, then `index.md`. Any other slug tries
/// `<slug>.md`, then `<slug>/index.md`. The first existing file wins.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use std::sync::Arc;
/// use quire_site::SlugResolver;
/// use quire_storage::FsStorage;
///
/// let resolver = SlugResolver::new(Arc::new(FsStorage::new(PathBuf::from("docs"))));
/// let doc = resolver.resolve(&["guides".to_owned(), "setup".to_owned()])?;
/// # Ok::<(), quire_storage::StorageError>(())
/// ```
#[derive(Clone)]
pub struct SlugResolver {
    storage: Arc<dyn Storage>,
}

impl SlugResolver {
    /// Create a resolver over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Candidate file paths for `slug`, in lookup order.
    ///
    /// Empty segments are ignored, so `[]`, `[""]` and `["", ""]` are all the
    /// root slug.
    #[must_use]
    pub fn candidates(slug: &[String]) -> [PathBuf; 2] {
        let segments: Vec<&str> = slug
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return [PathBuf::from("home.md"), PathBuf::from("index.md")];
        }
        let joined = segments.join("/");
        [
            PathBuf::from(format!("{joined}.md")),
            Path::new(&joined).join("index.md"),
        ]
    }

    /// First candidate path that exists in storage.
    #[must_use]
    pub fn locate(&self, slug: &[String]) -> Option<PathBuf> {
        Self::candidates(slug)
            .into_iter()
            .find(|path| self.storage.exists(path))
    }

    /// Resolve `slug` to a document.
    ///
    /// Returns `Ok(None)` when no candidate exists, including slugs that try
    /// to escape the content root.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if a matched file cannot be read.
    pub fn resolve(&self, slug: &[String]) -> Result<Option<Document>, StorageError> {
        let Some(path) = self.locate(slug) else {
            tracing::debug!(?slug, "No document for slug");
            return Ok(None);
        };
        let content = self.storage.read(&path)?;
        tracing::debug!(?slug, path = %path.display(), "Resolved document");
        Ok(Some(Document {
            title: document_title(&content, slug),
            content,
            slug: slug.to_vec(),
            path,
        }))
    }

    /// Storage backing this resolver.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

/// Document title: the first `# ` heading, else a slug-derived fallback.
#[must_use]
pub fn document_title(content: &str, slug: &[String]) -> String {
    heading_title(content).unwrap_or_else(|| fallback_title(slug))
}

/// Text of the first `# ` heading with emoji in U+1F300-U+1F9FF removed and
/// whitespace trimmed.
#[must_use]
pub fn heading_title(content: &str) -> Option<String> {
    let caps = TITLE_HEADING.captures(content)?;
    Some(
        caps[1]
            .chars()
            .filter(|c| !('\u{1F300}'..='\u{1F9FF}').contains(c))
            .collect::<String>()
            .trim()
            .to_owned(),
    )
}

/// Title for documents without a heading: the last slug segment, or
/// `"Documentation"` for the root.
pub(crate) fn fallback_title(slug: &[String]) -> String {
    slug.last()
        .filter(|segment| !segment.is_empty())
        .map_or_else(|| FALLBACK_TITLE.to_owned(), Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quire_storage::{MockStorage, StorageErrorKind};

    fn slug(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| (*p).to_owned()).collect()
    }

    fn resolver(storage: MockStorage) -> SlugResolver {
        SlugResolver::new(Arc::new(storage))
    }

    #[test]
    fn test_candidates() {
        assert_eq!(
            SlugResolver::candidates(&[]),
            [PathBuf::from("home.md"), PathBuf::from("index.md")]
        );
        assert_eq!(
            SlugResolver::candidates(&slug(&[""])),
            [PathBuf::from("home.md"), PathBuf::from("index.md")]
        );
        assert_eq!(
            SlugResolver::candidates(&slug(&["guides", "setup"])),
            [
                PathBuf::from("guides/setup.md"),
                PathBuf::from("guides/setup/index.md")
            ]
        );
    }

    #[test]
    fn test_root_prefers_home_over_index() {
        let resolver = resolver(
            MockStorage::new()
                .with_file("home.md", "# Home")
                .with_file("index.md", "# Index"),
        );

        let doc = resolver.resolve(&[]).unwrap().unwrap();

        assert_eq!(doc.path, PathBuf::from("home.md"));
        assert_eq!(doc.title, "Home");
    }

    #[test]
    fn test_root_falls_back_to_index() {
        let resolver = resolver(MockStorage::new().with_file("index.md", "# Index"));

        let doc = resolver.resolve(&slug(&[""])).unwrap().unwrap();

        assert_eq!(doc.path, PathBuf::from("index.md"));
        assert_eq!(doc.slug, slug(&[""]));
    }

    #[test]
    fn test_file_preferred_over_directory_index() {
        let resolver = resolver(
            MockStorage::new()
                .with_file("guides.md", "file")
                .with_file("guides/index.md", "index"),
        );

        let doc = resolver.resolve(&slug(&["guides"])).unwrap().unwrap();

        assert_eq!(doc.content, "file");
    }

    #[test]
    fn test_directory_index() {
        let resolver = resolver(MockStorage::new().with_file("guides/index.md", "# Guides 📚"));

        let doc = resolver.resolve(&slug(&["guides"])).unwrap().unwrap();

        assert_eq!(doc.path, PathBuf::from("guides/index.md"));
        assert_eq!(doc.title, "Guides");
    }

    #[test]
    fn test_missing_is_none() {
        let resolver = resolver(MockStorage::new());
        assert_eq!(resolver.resolve(&slug(&["missing"])).unwrap(), None);
    }

    #[test]
    fn test_traversal_is_none() {
        let resolver = resolver(MockStorage::new().with_file("../secret.md", "x"));
        assert_eq!(resolver.resolve(&slug(&["..", "secret"])).unwrap(), None);
    }

    #[test]
    fn test_read_failure_is_error() {
        let resolver = resolver(MockStorage::new().with_unreadable("locked.md"));

        let err = resolver.resolve(&slug(&["locked"])).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_title_fallbacks() {
        assert_eq!(document_title("no heading", &slug(&["guides", "setup"])), "setup");
        assert_eq!(document_title("no heading", &[]), "Documentation");
        assert_eq!(document_title("no heading", &slug(&[""])), "Documentation");
    }

    #[test]
    fn test_title_uses_first_h1_anywhere() {
        let content = "Intro\n\n## Sub\n\n# Real Title 🚀 \n\n# Second";
        assert_eq!(document_title(content, &[]), "Real Title");
    }

    #[test]
    fn test_title_ignores_h2() {
        assert_eq!(document_title("## Only sub", &slug(&["page"])), "page");
    }
}
