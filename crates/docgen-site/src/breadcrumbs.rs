//! Breadcrumb trail for a page.

use docgen_content::{DocumentCollection, HOME_TITLE, Slug};
use serde::Serialize;

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub title: String,
    pub href: String,
}

impl Breadcrumb {
    fn home() -> Self {
        Self {
            title: HOME_TITLE.to_owned(),
            href: "/".to_owned(),
        }
    }
}

/// Build breadcrumbs for `slug`.
///
/// Starts with "Home", then every prefix of the slug that is itself a
/// document, ending with the page when it exists. Prefixes without a
/// document are skipped.
#[must_use]
pub fn build_breadcrumbs(documents: &DocumentCollection, slug: &Slug) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb::home()];
    crumbs.extend(slug.prefixes().filter_map(|prefix| {
        documents.get(&prefix).map(|doc| Breadcrumb {
            title: doc.title().to_owned(),
            href: doc.href(),
        })
    }));
    crumbs
}
