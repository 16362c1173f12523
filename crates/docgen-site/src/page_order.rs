//! Sequential previous/next reading order.
//!
//! Documents are grouped by section (first slug segment). Sections listed in
//! the preferred order come first, in that order; remaining sections follow
//! in discovery order. Within a section documents are stably sorted by
//! `order`. Drafts, unpublished documents and the home document are left out.

use std::collections::HashMap;

use docgen_content::{Document, Slug};
use serde::Serialize;

/// Link to a neighbouring page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageNavEntry {
    pub title: String,
    /// Slug key (`"guides/intro"`).
    pub slug: String,
    /// Absolute route.
    pub href: String,
}

/// Previous and next pages around a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageNeighbors {
    pub prev: Option<PageNavEntry>,
    pub next: Option<PageNavEntry>,
}

/// Flattened reading order of a collection.
#[derive(Clone, Debug, Default)]
pub struct PageOrder {
    entries: Vec<PageNavEntry>,
    positions: HashMap<String, usize>,
}

impl PageOrder {
    /// Flatten `documents` using `section_order` as the preferred section
    /// sequence.
    pub fn new<'a, I>(documents: I, section_order: &[String]) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut sections: Vec<(&str, Vec<&Document>)> = Vec::new();
        for doc in documents {
            if doc.is_draft() || !doc.is_published() {
                continue;
            }
            let Some(section) = doc.slug.section() else {
                continue;
            };
            match sections.iter_mut().find(|(name, _)| *name == section) {
                Some((_, docs)) => docs.push(doc),
                None => sections.push((section, vec![doc])),
            }
        }

        for (_, docs) in &mut sections {
            docs.sort_by_key(|doc| doc.order());
        }

        let rank = |name: &str| {
            section_order
                .iter()
                .position(|preferred| preferred == name)
                .unwrap_or(section_order.len())
        };
        sections.sort_by_key(|(name, _)| rank(name));

        let entries: Vec<PageNavEntry> = sections
            .into_iter()
            .flat_map(|(_, docs)| docs)
            .map(|doc| PageNavEntry {
                title: doc.title().to_owned(),
                slug: doc.slug.key(),
                href: doc.href(),
            })
            .collect();

        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.slug.clone(), i))
            .collect();

        Self { entries, positions }
    }

    /// Neighbours of `slug`; both absent when it is not in the sequence.
    #[must_use]
    pub fn resolve(&self, slug: &Slug) -> PageNeighbors {
        let Some(&idx) = self.positions.get(&slug.key()) else {
            return PageNeighbors::default();
        };

        PageNeighbors {
            prev: idx
                .checked_sub(1)
                .and_then(|i| self.entries.get(i))
                .cloned(),
            next: self.entries.get(idx + 1).cloned(),
        }
    }

    /// The flattened sequence.
    #[must_use]
    pub fn entries(&self) -> &[PageNavEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
