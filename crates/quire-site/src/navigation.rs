//! Navigation tree, linearization and pagination.

use serde::{Deserialize, Serialize};

/// One table-of-contents entry: a page link or a group of entries.
///
/// Serializes as `{"title", "href"}` or `{"title", "children"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    /// Display title.
    pub title: String,
    /// Link target or child entries.
    #[serde(flatten)]
    pub target: NavTarget,
}

/// What a [`NavigationNode`] points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTarget {
    /// Canonical URL path of a page.
    Href(String),
    /// Ordered child entries. May be empty (label-only group).
    Children(Vec<NavigationNode>),
}

impl NavigationNode {
    /// Create a page link.
    #[must_use]
    pub fn page(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: NavTarget::Href(href.into()),
        }
    }

    /// Create a group of entries.
    #[must_use]
    pub fn section(title: impl Into<String>, children: Vec<NavigationNode>) -> Self {
        Self {
            title: title.into(),
            target: NavTarget::Children(children),
        }
    }

    /// Link target, for page entries.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match &self.target {
            NavTarget::Href(href) => Some(href),
            NavTarget::Children(_) => None,
        }
    }

    /// Child entries; empty for page entries.
    #[must_use]
    pub fn children(&self) -> &[NavigationNode] {
        match &self.target {
            NavTarget::Href(_) => &[],
            NavTarget::Children(children) => children,
        }
    }
}

/// Linearized navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Display title.
    pub title: String,
    /// Canonical URL path.
    pub href: String,
}

/// Flatten a navigation tree into reading order.
///
/// Pre-order: a page entry is emitted, group entries contribute their
/// children in order.
#[must_use]
pub fn linearize(nodes: &[NavigationNode]) -> Vec<NavEntry> {
    let mut entries = Vec::new();
    collect_entries(nodes, &mut entries);
    entries
}

fn collect_entries(nodes: &[NavigationNode], entries: &mut Vec<NavEntry>) {
    for node in nodes {
        if let Some(href) = node.href() {
            entries.push(NavEntry {
                title: node.title.clone(),
                href: href.to_owned(),
            });
        }
        collect_entries(node.children(), entries);
    }
}

/// Previous and next pages around the current one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page before the current one in reading order.
    pub previous: Option<NavEntry>,
    /// Page after the current one in reading order.
    pub next: Option<NavEntry>,
}

impl Pagination {
    /// Find neighbours of the first entry whose href equals `href`.
    ///
    /// No wraparound at either end. An href missing from `entries` has no
    /// neighbours.
    ///
    /// # Example
    ///
    /// ```
    /// use quire_site::{NavEntry, Pagination};
    ///
    /// let entries = vec![
    ///     NavEntry { title: "Home".into(), href: "/docs".into() },
    ///     NavEntry { title: "Setup".into(), href: "/docs/setup".into() },
    /// ];
    ///
    /// let pagination = Pagination::locate(&entries, "/docs");
    /// assert_eq!(pagination.previous, None);
    /// assert_eq!(pagination.next.unwrap().title, "Setup");
    /// ```
    #[must_use]
    pub fn locate(entries: &[NavEntry], href: &str) -> Self {
        let Some(index) = entries.iter().position(|entry| entry.href == href) else {
            return Self::default();
        };
        Self {
            previous: index.checked_sub(1).map(|i| entries[i].clone()),
            next: entries.get(index + 1).cloned(),
        }
    }
}

/// Slug segments for every page, for static generation.
///
/// Each href has the base path prefix removed and is split on `/` with empty
/// parts dropped. The root slug `[]` is prepended if absent and `["home"]`
/// appended if absent.
#[must_use]
pub fn static_slugs(nodes: &[NavigationNode], base_path: &str) -> Vec<Vec<String>> {
    let mut slugs: Vec<Vec<String>> = linearize(nodes)
        .iter()
        .map(|entry| href_to_slug(&entry.href, base_path))
        .collect();

    if !slugs.iter().any(Vec::is_empty) {
        slugs.insert(0, Vec::new());
    }
    if !slugs.iter().any(|slug| slug.len() == 1 && slug[0] == "home") {
        slugs.push(vec!["home".to_owned()]);
    }
    slugs
}

fn href_to_slug(href: &str, base_path: &str) -> Vec<String> {
    let rest = href.strip_prefix(base_path).unwrap_or(href);
    rest.split('/')
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Vec<NavigationNode> {
        vec![
            NavigationNode::page("Home", "/docs"),
            NavigationNode::section(
                "Guides",
                vec![
                    NavigationNode::page("Overview", "/docs/guides"),
                    NavigationNode::page("Setup", "/docs/guides/setup"),
                    NavigationNode::section("Empty", vec![]),
                ],
            ),
            NavigationNode::page("FAQ", "/docs/faq"),
        ]
    }

    fn hrefs(entries: &[NavEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.href.as_str()).collect()
    }

    #[test]
    fn test_linearize_pre_order() {
        let entries = linearize(&sample_tree());

        assert_eq!(
            hrefs(&entries),
            vec!["/docs", "/docs/guides", "/docs/guides/setup", "/docs/faq"]
        );
        assert_eq!(entries[2].title, "Setup");
    }

    #[test]
    fn test_linearize_empty() {
        assert!(linearize(&[]).is_empty());
    }

    #[test]
    fn test_pagination_middle() {
        let entries = linearize(&sample_tree());

        let pagination = Pagination::locate(&entries, "/docs/guides/setup");

        assert_eq!(pagination.previous.unwrap().href, "/docs/guides");
        assert_eq!(pagination.next.unwrap().href, "/docs/faq");
    }

    #[test]
    fn test_pagination_edges_do_not_wrap() {
        let entries = linearize(&sample_tree());

        let first = Pagination::locate(&entries, "/docs");
        let last = Pagination::locate(&entries, "/docs/faq");

        assert_eq!(first.previous, None);
        assert_eq!(first.next.unwrap().href, "/docs/guides");
        assert_eq!(last.previous.unwrap().href, "/docs/guides/setup");
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_pagination_unknown_href() {
        let entries = linearize(&sample_tree());
        assert_eq!(Pagination::locate(&entries, "/docs/nope"), Pagination::default());
    }

    #[test]
    fn test_pagination_uses_first_duplicate() {
        let entries = vec![
            NavEntry { title: "A".to_owned(), href: "/docs/a".to_owned() },
            NavEntry { title: "B".to_owned(), href: "/docs/b".to_owned() },
            NavEntry { title: "A again".to_owned(), href: "/docs/a".to_owned() },
        ];

        let pagination = Pagination::locate(&entries, "/docs/a");

        assert_eq!(pagination.previous, None);
        assert_eq!(pagination.next.unwrap().title, "B");
    }

    #[test]
    fn test_static_slugs_include_root_and_home_once() {
        let slugs = static_slugs(&sample_tree(), "/docs");

        assert_eq!(
            slugs,
            vec![
                vec![],
                vec!["guides".to_owned()],
                vec!["guides".to_owned(), "setup".to_owned()],
                vec!["faq".to_owned()],
                vec!["home".to_owned()],
            ]
        );
    }

    #[test]
    fn test_static_slugs_prepend_root_when_missing() {
        let tree = vec![NavigationNode::page("Setup", "/docs/setup")];

        let slugs = static_slugs(&tree, "/docs");

        assert_eq!(slugs.first(), Some(&Vec::new()));
        assert_eq!(slugs.last(), Some(&vec!["home".to_owned()]));
        assert_eq!(slugs.len(), 3);
    }

    #[test]
    fn test_static_slugs_empty_navigation() {
        assert_eq!(static_slugs(&[], "/docs"), vec![vec![], vec!["home".to_owned()]]);
    }

    #[test]
    fn test_static_slugs_root_base_path() {
        let tree = vec![NavigationNode::page("Setup", "/setup")];
        let slugs = static_slugs(&tree, "/");
        assert!(slugs.contains(&vec!["setup".to_owned()]));
    }

    #[test]
    fn test_node_serializes_tagged_shape() {
        let json = serde_json::to_value(&sample_tree()[1]).unwrap();

        assert_eq!(json["title"], "Guides");
        assert_eq!(json["children"][1]["href"], "/docs/guides/setup");
        assert!(json.get("href").is_none());
        assert_eq!(json["children"][2]["children"], serde_json::json!([]));
    }
}
