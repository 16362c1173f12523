//! Site structure for docgen.
//!
//! This crate provides:
//! - [`Site`]: process-scoped cache of the loaded documents and everything
//!   derived from them
//! - [`build_navigation_tree`]: sorted sidebar forest
//! - [`PageOrder`]: previous/next reading order
//! - [`build_breadcrumbs`]: ancestor trail for a page
//! - [`render_sitemap`] / [`render_feed`]: `sitemap.xml` and RSS output
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docgen_content::{FsContentStore, Slug};
//! use docgen_site::{Site, SiteConfig};
//!
//! let store = Arc::new(FsContentStore::new(PathBuf::from("docs")));
//! let site = Site::new(store, SiteConfig::default());
//! site.init()?;
//!
//! let nav = site.navigation()?;
//! let page = site.page(&Slug::parse("guides/intro"))?;
//! let hits = site.search("install", 10)?;
//! # Ok(())
//! # }
//! ```

mod breadcrumbs;
mod feed;
mod navigation;
mod page_order;
mod site;

pub use breadcrumbs::{Breadcrumb, build_breadcrumbs};
pub use feed::{FeedError, SiteInfo, parse_date, render_feed, render_sitemap};
pub use navigation::{NavigationError, NavigationNode, build_navigation_tree};
pub use page_order::{PageNavEntry, PageNeighbors, PageOrder};
pub use site::{PageView, Site, SiteConfig, SiteError, SiteState};
