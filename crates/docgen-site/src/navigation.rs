//! Navigation tree for the sidebar.
//!
//! The tree mirrors the slug hierarchy. It is built in two passes over an
//! index-addressed arena:
//!
//! 1. Walk every document's slug prefixes, creating one arena node per unseen
//!    prefix and linking it to its parent by index. The node for the final
//!    segment takes the document's title, order and href.
//! 2. Sort every level by `(order, title)`, then resolve hrefs bottom-up so a
//!    group without its own document links to its first child.
//!
//! The root document is not part of the forest.

use std::cmp::Ordering;
use std::collections::HashMap;

use docgen_content::{DEFAULT_ORDER, Document, format_segment_title};
use serde::Serialize;

/// Error building the navigation tree.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Two documents resolve to the same tree path.
    #[error("Duplicate navigation path: /{path}")]
    DuplicatePath { path: String },
}

/// One entry of the navigation forest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    /// Display title.
    pub title: String,
    /// Link target. Only absent for groups with no reachable document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Sort key among siblings.
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Child nodes, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationNode>,
}

/// Arena node used while building.
#[derive(Debug)]
struct ArenaNode {
    title: String,
    href: Option<String>,
    order: i64,
    icon: Option<String>,
    /// True once a document has claimed this node.
    has_document: bool,
}

/// Index-addressed arena of navigation nodes.
#[derive(Debug, Default)]
struct NavTreeBuilder {
    nodes: Vec<ArenaNode>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
}

impl NavTreeBuilder {
    /// Get or create the node for `path`, attaching new nodes under `parent`.
    fn node_for(&mut self, path: &str, segment: &str, parent: Option<usize>) -> usize {
        if let Some(&idx) = self.path_index.get(path) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(ArenaNode {
            title: format_segment_title(segment),
            href: None,
            order: DEFAULT_ORDER,
            icon: None,
            has_document: false,
        });
        self.children.push(Vec::new());
        self.path_index.insert(path.to_owned(), idx);

        match parent {
            Some(parent) => self.children[parent].push(idx),
            None => self.roots.push(idx),
        }

        idx
    }

    /// Pass 1: add a document's slug path to the arena.
    fn add_document(&mut self, doc: &Document) -> Result<(), NavigationError> {
        let segments = doc.slug.segments();
        let Some(last) = segments.len().checked_sub(1) else {
            return Ok(());
        };

        let mut path = String::new();
        let mut parent = None;
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                path.push('/');
            }
            path.push_str(segment);

            let idx = self.node_for(&path, segment, parent);

            if i == last {
                let node = &mut self.nodes[idx];
                if node.has_document {
                    return Err(NavigationError::DuplicatePath { path });
                }
                node.title = doc.title().to_owned();
                node.order = doc.order();
                node.href = Some(doc.href());
                node.icon.clone_from(&doc.frontmatter.icon);
                node.has_document = true;
            }

            parent = Some(idx);
        }

        Ok(())
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title))
    }

    /// Pass 2: sort every level, resolve hrefs bottom-up, and materialise.
    fn build(mut self) -> Vec<NavigationNode> {
        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by(|&a, &b| self.compare(a, b));
        for idx in 0..self.children.len() {
            let mut siblings = std::mem::take(&mut self.children[idx]);
            siblings.sort_by(|&a, &b| self.compare(a, b));
            self.children[idx] = siblings;
        }

        roots.iter().map(|&idx| self.materialize(idx)).collect()
    }

    fn materialize(&self, idx: usize) -> NavigationNode {
        // Post-order: children resolve their hrefs first.
        let children: Vec<NavigationNode> = self.children[idx]
            .iter()
            .map(|&child| self.materialize(child))
            .collect();

        let node = &self.nodes[idx];
        let href = if node.has_document {
            node.href.clone()
        } else {
            children.first().and_then(|child| child.href.clone())
        };

        NavigationNode {
            title: node.title.clone(),
            href,
            order: node.order,
            icon: node.icon.clone(),
            children,
        }
    }
}

/// Build the sorted navigation forest for a set of documents.
///
/// # Errors
///
/// Returns [`NavigationError::DuplicatePath`] if two documents share a slug.
pub fn build_navigation_tree<'a, I>(documents: I) -> Result<Vec<NavigationNode>, NavigationError>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut builder = NavTreeBuilder::default();
    for doc in documents {
        builder.add_document(doc)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use docgen_content::Slug;
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(key: &str, source: &str) -> Document {
        Document::parse(Slug::parse(key), Path::new("x.md"), source).unwrap()
    }

    fn titled(key: &str, title: &str, order: Option<i64>) -> Document {
        let source = match order {
            Some(order) => format!("---\ntitle: {title}\norder: {order}\n---\n"),
            None => format!("---\ntitle: {title}\n---\n"),
        };
        doc(key, &source)
    }

    fn leaf(title: &str, href: &str, order: i64) -> NavigationNode {
        NavigationNode {
            title: title.to_owned(),
            href: Some(href.to_owned()),
            order,
            icon: None,
            children: Vec::new(),
        }
    }

    fn assert_all_groups_have_href(nodes: &[NavigationNode]) {
        for node in nodes {
            if !node.children.is_empty() {
                assert!(node.href.is_some(), "{} has no href", node.title);
            }
            assert_all_groups_have_href(&node.children);
        }
    }

    #[test]
    fn test_empty_collection() {
        assert!(build_navigation_tree(&Vec::<Document>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_root_document_excluded() {
        let docs = vec![doc("", "Home")];

        assert!(build_navigation_tree(&docs).unwrap().is_empty());
    }

    #[test]
    fn test_scenario_tree() {
        let docs = vec![
            doc("", "Home"),
            titled("getting-started", "Getting Started", Some(1)),
            titled("guides/intro", "Intro", Some(1)),
            titled("guides/advanced", "Advanced", Some(2)),
        ];

        let tree = build_navigation_tree(&docs).unwrap();

        assert_eq!(
            tree,
            vec![
                leaf("Getting Started", "/getting-started", 1),
                NavigationNode {
                    title: "Guides".to_owned(),
                    href: Some("/guides/intro".to_owned()),
                    order: DEFAULT_ORDER,
                    icon: None,
                    children: vec![
                        leaf("Intro", "/guides/intro", 1),
                        leaf("Advanced", "/guides/advanced", 2),
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_directory_index_provides_group_title_and_href() {
        let docs = vec![
            titled("guides", "All Guides", Some(5)),
            titled("guides/intro", "Intro", None),
        ];

        let tree = build_navigation_tree(&docs).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].title, "All Guides");
        assert_eq!(tree[0].href.as_deref(), Some("/guides"));
        assert_eq!(tree[0].order, 5);
        assert_eq!(tree[0].children, vec![leaf("Intro", "/guides/intro", DEFAULT_ORDER)]);
    }

    #[test]
    fn test_child_before_parent_document_order() {
        let docs = vec![
            titled("guides/intro", "Intro", None),
            titled("guides", "Guides Index", Some(1)),
        ];

        let tree = build_navigation_tree(&docs).unwrap();

        assert_eq!(tree[0].title, "Guides Index");
        assert_eq!(tree[0].href.as_deref(), Some("/guides"));
    }

    #[test]
    fn test_ties_break_on_case_sensitive_title() {
        let docs = vec![
            titled("b", "beta", None),
            titled("a", "Zeta", None),
            titled("c", "Alpha", None),
        ];

        let tree = build_navigation_tree(&docs).unwrap();
        let titles: Vec<&str> = tree.iter().map(|n| n.title.as_str()).collect();

        assert_eq!(titles, vec!["Alpha", "Zeta", "beta"]);
    }

    #[test]
    fn test_order_before_title() {
        let docs = vec![
            titled("a", "A", Some(3)),
            titled("b", "B", Some(-1)),
            titled("c", "C", None),
        ];

        let tree = build_navigation_tree(&docs).unwrap();
        let titles: Vec<&str> = tree.iter().map(|n| n.title.as_str()).collect();

        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_href_inherited_bottom_up_through_empty_groups() {
        let docs = vec![
            titled("api/v2/users", "Users", Some(2)),
            titled("api/v2/auth", "Auth", Some(1)),
        ];

        let tree = build_navigation_tree(&docs).unwrap();

        let api = &tree[0];
        assert_eq!(api.title, "Api");
        assert_eq!(api.children[0].title, "V2");
        assert_eq!(api.children[0].href.as_deref(), Some("/api/v2/auth"));
        assert_eq!(api.href.as_deref(), Some("/api/v2/auth"));
        assert_all_groups_have_href(&tree);
    }

    #[test]
    fn test_group_title_formats_segment() {
        let docs = vec![titled("user-guide/setup", "Setup", None)];

        let tree = build_navigation_tree(&docs).unwrap();

        assert_eq!(tree[0].title, "User Guide");
        assert_eq!(tree[0].order, DEFAULT_ORDER);
    }

    #[test]
    fn test_icon_carried_from_frontmatter() {
        let docs = vec![doc("cli", "---\ntitle: CLI\nicon: terminal\n---\n")];

        let tree = build_navigation_tree(&docs).unwrap();

        assert_eq!(tree[0].icon.as_deref(), Some("terminal"));
    }

    #[test]
    fn test_duplicate_path_fails_fast() {
        let docs = vec![titled("a", "One", None), titled("a", "Two", None)];

        let err = build_navigation_tree(&docs).unwrap_err();

        assert_eq!(
            err,
            NavigationError::DuplicatePath {
                path: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let docs = vec![titled("a", "A", Some(1))];

        let tree = build_navigation_tree(&docs).unwrap();
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{"title": "A", "href": "/a", "order": 1}])
        );
    }
}
