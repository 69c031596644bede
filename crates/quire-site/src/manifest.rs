//! MkDocs manifest (`mkdocs.yml`) parsing.
//!
//! Only the `nav` key is read. Entries come in three shapes:
//!
//! ```yaml
//! nav:
//!   - home.md                    # bare path, title inferred
//!   - Setup: guides/setup.md     # titled page
//!   - Guides:                    # section
//!       - guides/index.md
//! ```

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use crate::navigation::NavigationNode;

/// Python object tags (`!!python/name:...`) used by MkDocs plugins.
static PYTHON_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!!python/\S+").unwrap());

/// Manifest failure affecting the whole file.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest could not be read.
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Manifest is not valid YAML.
    #[error("Invalid manifest YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One `nav` entry, resolved to its shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestEntry {
    /// Bare markdown path.
    Page(String),
    /// `Title: path.md`.
    TitledPage {
        /// Display title.
        title: String,
        /// Markdown path relative to the content root.
        path: String,
    },
    /// `Title: [entries...]`.
    Section {
        /// Display title.
        title: String,
        /// Nested entries.
        entries: Vec<ManifestEntry>,
    },
}

/// Parsed navigation manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// Python tags are blanked before parsing. A missing or non-sequence `nav`
    /// key yields an empty manifest; malformed entries are dropped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Yaml`] if the text is not valid YAML.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let sanitized = sanitize(text);
        let document: Value = serde_yaml::from_str(&sanitized)?;

        let Some(Value::Sequence(nav)) = document.get("nav") else {
            tracing::warn!("Manifest has no `nav` sequence, navigation is empty");
            return Ok(Self::default());
        };

        Ok(Self {
            entries: parse_entries(nav),
        })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read, or
    /// [`ManifestError::Yaml`] if it is not valid YAML.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Parsing manifest");
        Self::parse(&text)
    }

    /// Top-level entries in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Build the navigation tree with hrefs under `base_path`.
    #[must_use]
    pub fn navigation(&self, base_path: &str) -> Vec<NavigationNode> {
        build_nodes(&self.entries, base_path)
    }
}

/// Blank Python object tags so the YAML parses.
fn sanitize(text: &str) -> Cow<'_, str> {
    PYTHON_TAG.replace_all(text, "\"\"")
}

fn parse_entries(values: &[Value]) -> Vec<ManifestEntry> {
    values.iter().filter_map(parse_entry).collect()
}

fn parse_entry(value: &Value) -> Option<ManifestEntry> {
    let map = match value {
        Value::String(path) => return Some(ManifestEntry::Page(path.clone())),
        Value::Mapping(map) => map,
        other => {
            tracing::warn!(entry = ?other, "Dropping nav entry that is neither a path nor a mapping");
            return None;
        }
    };

    let Some((key, inner)) = map.iter().next() else {
        tracing::warn!("Dropping empty nav mapping");
        return None;
    };
    if map.len() > 1 {
        tracing::warn!(key = ?key, keys = map.len(), "Nav mapping has several keys, using the first");
    }
    let Some(title) = key_title(key) else {
        tracing::warn!(key = ?key, "Dropping nav entry with non-scalar title");
        return None;
    };

    match inner {
        Value::String(path) => Some(ManifestEntry::TitledPage {
            title,
            path: path.clone(),
        }),
        Value::Sequence(children) => Some(ManifestEntry::Section {
            title,
            entries: parse_entries(children),
        }),
        other => {
            tracing::warn!(%title, value = ?other, "Dropping nav entry with unsupported value");
            None
        }
    }
}

/// Title for a mapping key. Scalar keys read as their YAML text, so
/// `- 2024: changelog.md` is titled "2024".
fn key_title(key: &Value) -> Option<String> {
    match key {
        Value::String(title) => Some(title.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some("null".to_owned()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn build_nodes(entries: &[ManifestEntry], base_path: &str) -> Vec<NavigationNode> {
    entries
        .iter()
        .map(|entry| match entry {
            ManifestEntry::Page(path) => {
                NavigationNode::page(title_from_path(path), path_to_href(path, base_path))
            }
            ManifestEntry::TitledPage { title, path } => {
                NavigationNode::page(title.clone(), path_to_href(path, base_path))
            }
            ManifestEntry::Section { title, entries } => {
                NavigationNode::section(title.clone(), build_nodes(entries, base_path))
            }
        })
        .collect()
}

/// Map a markdown path to its canonical href.
///
/// Strips `.md` and a trailing `/index`; `home` maps to `base_path` itself.
///
/// # Example
///
/// ```
/// use quire_site::path_to_href;
///
/// assert_eq!(path_to_href("home.md", "/docs"), "/docs");
/// assert_eq!(path_to_href("guides/setup.md", "/docs"), "/docs/guides/setup");
/// assert_eq!(path_to_href("guides/index.md", "/docs"), "/docs/guides");
/// ```
#[must_use]
pub fn path_to_href(path: &str, base_path: &str) -> String {
    let slug = path.strip_suffix(".md").unwrap_or(path);
    let slug = slug.strip_suffix("/index").unwrap_or(slug);
    if slug == "home" {
        return base_path.to_owned();
    }
    join_href(base_path, slug)
}

/// Join a slug onto the base path without doubling the root slash.
fn join_href(base_path: &str, slug: &str) -> String {
    if base_path.ends_with('/') {
        format!("{base_path}{slug}")
    } else {
        format!("{base_path}/{slug}")
    }
}

/// Infer a display title from a markdown path.
///
/// Takes the file name without `.md`, turns hyphens into spaces and
/// uppercases every ASCII word character that starts a word.
///
/// # Example
///
/// ```
/// use quire_site::title_from_path;
///
/// assert_eq!(title_from_path("guides/getting-started.md"), "Getting Started");
/// ```
#[must_use]
pub fn title_from_path(path: &str) -> String {
    let stem = path.strip_suffix(".md").unwrap_or(path);
    let name = stem.rsplit('/').next().unwrap_or_default();

    let mut title = String::with_capacity(name.len());
    let mut prev_is_word = false;
    for c in name.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            title.push(c.to_ascii_uppercase());
        } else {
            title.push(c);
        }
        prev_is_word = is_word;
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavTarget;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_all_entry_shapes() {
        let manifest = Manifest::parse(
            "site_name: Demo\nnav:\n  - home.md\n  - Setup: guides/setup.md\n  - Guides:\n      - guides/index.md\n",
        )
        .unwrap();

        assert_eq!(
            manifest.entries(),
            &[
                ManifestEntry::Page("home.md".to_owned()),
                ManifestEntry::TitledPage {
                    title: "Setup".to_owned(),
                    path: "guides/setup.md".to_owned(),
                },
                ManifestEntry::Section {
                    title: "Guides".to_owned(),
                    entries: vec![ManifestEntry::Page("guides/index.md".to_owned())],
                },
            ]
        );
    }

    #[test]
    fn test_navigation_hrefs_and_titles() {
        let manifest = Manifest::parse(
            "nav:\n  - home.md\n  - Reference:\n      - api/index.md\n      - api/error-codes.md\n",
        )
        .unwrap();

        let nav = manifest.navigation("/docs");

        assert_eq!(
            nav,
            vec![
                NavigationNode::page("Home", "/docs"),
                NavigationNode::section(
                    "Reference",
                    vec![
                        NavigationNode::page("Index", "/docs/api"),
                        NavigationNode::page("Error Codes", "/docs/api/error-codes"),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_python_tags_are_sanitized() {
        let text = "markdown_extensions:\n  - pymdownx.emoji:\n      emoji_index: !!python/name:material.extensions.emoji.twemoji\nnav:\n  - home.md\n";

        let manifest = Manifest::parse(text).unwrap();

        assert_eq!(manifest.entries().len(), 1);
    }

    #[test]
    fn test_missing_nav_is_empty() {
        assert!(Manifest::parse("site_name: Demo\n").unwrap().entries().is_empty());
        assert!(Manifest::parse("").unwrap().entries().is_empty());
        assert!(Manifest::parse("nav: home.md\n").unwrap().entries().is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let err = Manifest::parse("nav: [unclosed\n").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml(_)));
    }

    #[test]
    fn test_malformed_entries_dropped() {
        let manifest = Manifest::parse(
            "nav:\n  - 42\n  - ~\n  - {}\n  - Broken: 7\n  - ? [a, b]\n    : list.md\n  - ok.md\n",
        )
        .unwrap();

        assert_eq!(manifest.entries(), &[ManifestEntry::Page("ok.md".to_owned())]);
    }

    #[test]
    fn test_scalar_keys_become_titles() {
        let manifest =
            Manifest::parse("nav:\n  - 1: numeric.md\n  - 2024:\n      - changelog.md\n  - true: yes.md\n")
                .unwrap();

        assert_eq!(
            manifest.entries(),
            &[
                ManifestEntry::TitledPage {
                    title: "1".to_owned(),
                    path: "numeric.md".to_owned(),
                },
                ManifestEntry::Section {
                    title: "2024".to_owned(),
                    entries: vec![ManifestEntry::Page("changelog.md".to_owned())],
                },
                ManifestEntry::TitledPage {
                    title: "true".to_owned(),
                    path: "yes.md".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_multi_key_mapping_uses_first_key() {
        let manifest = Manifest::parse("nav:\n  - First: a.md\n    Second: b.md\n").unwrap();

        assert_eq!(
            manifest.entries(),
            &[ManifestEntry::TitledPage {
                title: "First".to_owned(),
                path: "a.md".to_owned(),
            }]
        );
    }

    #[test]
    fn test_empty_section_kept() {
        let manifest = Manifest::parse("nav:\n  - Later: []\n").unwrap();
        let nav = manifest.navigation("/docs");

        assert_eq!(nav[0].target, NavTarget::Children(vec![]));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/mkdocs.yml")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn test_path_to_href() {
        assert_eq!(path_to_href("home.md", "/docs"), "/docs");
        assert_eq!(path_to_href("guides/setup.md", "/docs"), "/docs/guides/setup");
        assert_eq!(path_to_href("guides/index.md", "/docs"), "/docs/guides");
        assert_eq!(path_to_href("index.md", "/docs"), "/docs/index");
        assert_eq!(path_to_href("notes", "/docs"), "/docs/notes");
        assert_eq!(path_to_href("setup.md", "/"), "/setup");
        assert_eq!(path_to_href("home.md", "/"), "/");
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path("home.md"), "Home");
        assert_eq!(title_from_path("guides/getting-started.md"), "Getting Started");
        assert_eq!(title_from_path("api/v2_notes.md"), "V2_notes");
        assert_eq!(title_from_path("faq.v2.md"), "Faq.V2");
        assert_eq!(title_from_path("éa-b"), "éA B");
    }
}
