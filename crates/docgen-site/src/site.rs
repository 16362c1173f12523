//! Process-scoped site cache.
//!
//! [`Site`] loads the document collection from a [`ContentStore`] and derives
//! everything a page view needs from it: navigation tree, reading order,
//! breadcrumbs and, lazily, the search index.
//!
//! # Thread Safety
//!
//! `Site` is designed for concurrent access:
//! - `state()` hands out `Arc<SiteState>` snapshots; readers never block
//!   each other
//! - reloads use double-checked locking, so concurrent callers after an
//!   `invalidate()` trigger a single rebuild
//! - `invalidate()` is lock-free (atomic flag)
//! - the search index is built at most once per snapshot, on first query

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use docgen_config::Config;
use docgen_content::{
    ContentError, ContentLoader, ContentStore, Document, DocumentCollection, ExecutionMode,
    LoaderConfig, ReadingTime, Slug, TocEntry,
};
use docgen_search::{IndexOptions, SearchIndex, SearchResult};

use crate::breadcrumbs::{Breadcrumb, build_breadcrumbs};
use crate::feed::{FeedError, SiteInfo, render_feed, render_sitemap};
use crate::navigation::{NavigationError, NavigationNode, build_navigation_tree};
use crate::page_order::{PageNeighbors, PageOrder};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Error returned by [`Site`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl SiteError {
    /// True when the requested page does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Content(e) if e.is_not_found())
    }
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub loader: LoaderConfig,
    pub index: IndexOptions,
    /// Preferred section sequence for prev/next links.
    pub section_order: Vec<String>,
    pub info: SiteInfo,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            index: IndexOptions::default(),
            section_order: docgen_config::DEFAULT_SECTION_ORDER
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            info: SiteInfo::default(),
        }
    }
}

impl SiteConfig {
    /// Derive site settings from the loaded application config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            loader: LoaderConfig {
                mode: ExecutionMode::from_production(config.docs_resolved.production),
                reserved_prefix: config.docs_resolved.reserved_prefix.clone(),
            },
            index: IndexOptions {
                snippet_length: config.search.snippet_length,
                max_document_bytes: config.search.max_document_bytes,
            },
            section_order: config.navigation.section_order.clone(),
            info: SiteInfo {
                name: config.site.name.clone(),
                description: config.site.description.clone(),
                url: config.site.url.clone(),
                language: config.site.language.clone(),
            },
        }
    }
}

/// Immutable snapshot of the loaded site.
#[derive(Debug)]
pub struct SiteState {
    documents: DocumentCollection,
    navigation: Vec<NavigationNode>,
    page_order: PageOrder,
    search: OnceLock<SearchIndex>,
    index_options: IndexOptions,
    loaded_at: DateTime<Utc>,
}

impl SiteState {
    fn empty(index_options: IndexOptions) -> Self {
        Self {
            documents: DocumentCollection::default(),
            navigation: Vec::new(),
            page_order: PageOrder::default(),
            search: OnceLock::new(),
            index_options,
            loaded_at: Utc::now(),
        }
    }

    fn build(documents: DocumentCollection, config: &SiteConfig) -> Result<Self, SiteError> {
        let navigation = build_navigation_tree(&documents)?;
        let page_order = PageOrder::new(&documents, &config.section_order);

        Ok(Self {
            documents,
            navigation,
            page_order,
            search: OnceLock::new(),
            index_options: config.index.clone(),
            loaded_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn documents(&self) -> &DocumentCollection {
        &self.documents
    }

    /// Sorted navigation forest (root document excluded).
    #[must_use]
    pub fn navigation(&self) -> &[NavigationNode] {
        &self.navigation
    }

    #[must_use]
    pub fn page_order(&self) -> &PageOrder {
        &self.page_order
    }

    /// When this snapshot was built.
    #[must_use]
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    #[must_use]
    pub fn breadcrumbs(&self, slug: &Slug) -> Vec<Breadcrumb> {
        build_breadcrumbs(&self.documents, slug)
    }

    /// Search index for this snapshot, built on first use.
    ///
    /// Concurrent first callers block until the single build finishes.
    pub fn search_index(&self) -> &SearchIndex {
        self.search
            .get_or_init(|| SearchIndex::build(&self.documents, &self.index_options))
    }
}

/// Everything needed to render one page.
#[derive(Clone, Debug)]
pub struct PageView {
    pub document: Document,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub toc: Vec<TocEntry>,
    pub neighbors: PageNeighbors,
    pub reading_time: ReadingTime,
}

/// Loaded documentation site.
///
/// # Thread Safety
///
/// - `RwLock<Arc<SiteState>>` holds the current snapshot
/// - `Mutex<()>` serializes reloads
/// - `AtomicBool` tracks snapshot validity
pub struct Site {
    loader: ContentLoader,
    config: SiteConfig,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current site state snapshot (atomically swappable).
    current_state: RwLock<Arc<SiteState>>,
    state_valid: AtomicBool,
}

impl Site {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, config: SiteConfig) -> Self {
        let loader = ContentLoader::new(store, config.loader.clone());
        let initial_state = Arc::new(SiteState::empty(config.index.clone()));

        Self {
            loader,
            config,
            reload_lock: Mutex::new(()),
            current_state: RwLock::new(initial_state),
            state_valid: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Load the site eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ContentMissing`] (wrapped) if the content
    /// root has no index document.
    pub fn init(&self) -> Result<Arc<SiteState>, SiteError> {
        self.invalidate();
        self.state()
    }

    /// Current snapshot, reloading first if it was invalidated.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return the current snapshot if still valid
    /// 2. Slow path: acquire `reload_lock`, recheck, then reload
    ///
    /// A failed reload leaves the previous snapshot in place and the site
    /// invalid, so the next call retries.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if loading content or building navigation fails.
    pub fn state(&self) -> Result<Arc<SiteState>, SiteError> {
        if self.state_valid.load(Ordering::Acquire) {
            return Ok(self.snapshot());
        }

        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.state_valid.load(Ordering::Acquire) {
            return Ok(self.snapshot());
        }

        let start = Instant::now();
        let documents = self.loader.load()?;
        let state = Arc::new(SiteState::build(documents, &self.config)?);

        tracing::info!(
            document_count = state.documents.len(),
            elapsed_ms = elapsed_ms(start),
            "Site loaded"
        );

        *self
            .current_state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&state);
        self.state_valid.store(true, Ordering::Release);

        Ok(state)
    }

    fn snapshot(&self) -> Arc<SiteState> {
        Arc::clone(
            &self
                .current_state
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Mark the snapshot stale. The next access reloads from the store;
    /// readers holding the old snapshot keep using it.
    pub fn invalidate(&self) {
        self.state_valid.store(false, Ordering::Release);
    }

    /// Sorted navigation forest.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the site cannot be loaded.
    pub fn navigation(&self) -> Result<Vec<NavigationNode>, SiteError> {
        Ok(self.state()?.navigation.clone())
    }

    /// Run a search query against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the site cannot be loaded.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SiteError> {
        Ok(self.state()?.search_index().query(query, limit))
    }

    /// Resolve a single document, falling back to the store on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DocumentNotFound`] (wrapped) for unknown slugs
    /// and [`ContentError::Frontmatter`] for documents that fail to parse.
    pub fn lookup(&self, slug: &Slug) -> Result<Document, SiteError> {
        let state = self.state()?;
        self.resolve(&state, slug)
    }

    fn resolve(&self, state: &SiteState, slug: &Slug) -> Result<Document, SiteError> {
        match state.documents.get(slug) {
            Some(doc) => Ok(doc.clone()),
            None => Ok(self.loader.lookup(slug)?),
        }
    }

    /// Assemble the view of one page.
    ///
    /// # Errors
    ///
    /// Same as [`Site::lookup`].
    pub fn page(&self, slug: &Slug) -> Result<PageView, SiteError> {
        let state = self.state()?;
        let document = self.resolve(&state, slug)?;

        Ok(PageView {
            breadcrumbs: state.breadcrumbs(slug),
            toc: document.toc(),
            neighbors: state.page_order.resolve(slug),
            reading_time: document.reading_time(),
            document,
        })
    }

    /// Render `sitemap.xml` for the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if loading or XML serialisation fails.
    pub fn sitemap(&self) -> Result<String, SiteError> {
        let state = self.state()?;
        Ok(render_sitemap(
            &self.config.info,
            state.documents.as_slice(),
            state.loaded_at,
        )?)
    }

    /// Render the RSS feed for the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if loading or XML serialisation fails.
    pub fn feed(&self) -> Result<String, SiteError> {
        let state = self.state()?;
        Ok(render_feed(
            &self.config.info,
            state.documents.as_slice(),
            state.loaded_at,
        )?)
    }
}

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::Site: Send, Sync);
    static_assertions::assert_impl_all!(super::SiteState: Send, Sync);

    use std::fs;
    use std::path::PathBuf;
    use std::thread;

    use docgen_content::{FsContentStore, MockContentStore};
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    fn scenario_store() -> MockContentStore {
        MockContentStore::new()
            .with_file("index.md", "---\ntitle: Home\n---\nWelcome to the docs.")
            .with_file(
                "getting-started.md",
                "---\ntitle: Getting Started\norder: 1\n---\nInstall the CLI.",
            )
            .with_file(
                "guides/intro.md",
                "---\ntitle: Intro\norder: 1\n---\n## Setup\n\nConfigure the project.",
            )
            .with_file(
                "guides/advanced.md",
                "---\ntitle: Advanced\norder: 2\n---\nDeep dive into plugins.",
            )
    }

    fn create_site(store: MockContentStore) -> (Arc<MockContentStore>, Site) {
        let store = Arc::new(store);
        let site = Site::new(
            Arc::clone(&store) as Arc<dyn ContentStore>,
            SiteConfig::default(),
        );
        (store, site)
    }

    /// Counts "Search index built" events.
    #[derive(Clone, Default)]
    struct IndexBuildCounter(Arc<std::sync::atomic::AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for IndexBuildCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            struct IsIndexBuilt(bool);

            impl tracing::field::Visit for IsIndexBuilt {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" && format!("{value:?}") == "Search index built" {
                        self.0 = true;
                    }
                }
            }

            let mut visitor = IsIndexBuilt(false);
            event.record(&mut visitor);
            if visitor.0 {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn nav_titles(nodes: &[NavigationNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_init_loads_scenario() {
        let (_, site) = create_site(scenario_store());

        let state = site.init().unwrap();

        assert_eq!(state.documents().len(), 4);
        assert_eq!(nav_titles(state.navigation()), vec!["Getting Started", "Guides"]);
        assert_eq!(
            nav_titles(&state.navigation()[1].children),
            vec!["Intro", "Advanced"]
        );
        assert_eq!(
            state.navigation()[1].href.as_deref(),
            Some("/guides/intro")
        );
    }

    #[test]
    fn test_init_fails_without_root_index() {
        let (_, site) = create_site(MockContentStore::new().with_file("guide.md", "# Guide"));

        let err = site.init().unwrap_err();

        assert!(matches!(
            err,
            SiteError::Content(ContentError::ContentMissing { .. })
        ));
    }

    #[test]
    fn test_page_view() {
        let (_, site) = create_site(scenario_store());

        let view = site.page(&Slug::parse("guides/intro")).unwrap();

        assert_eq!(view.document.title(), "Intro");
        assert_eq!(
            view.breadcrumbs.iter().map(|b| b.href.as_str()).collect::<Vec<_>>(),
            vec!["/", "/guides/intro"]
        );
        assert_eq!(view.toc.len(), 1);
        assert_eq!(view.toc[0].id, "setup");
        assert_eq!(
            view.neighbors.prev.map(|e| e.slug),
            Some("getting-started".to_owned())
        );
        assert_eq!(
            view.neighbors.next.map(|e| e.slug),
            Some("guides/advanced".to_owned())
        );
        assert_eq!(view.reading_time.minutes, 1);
    }

    #[test]
    fn test_page_not_found() {
        let (_, site) = create_site(scenario_store());

        let err = site.page(&Slug::parse("missing")).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_page_with_broken_frontmatter_surfaces_error() {
        let store = scenario_store().with_file("broken.md", "---\ntitle: [unclosed\n---\nBody");
        let (_, site) = create_site(store);

        let state = site.init().unwrap();
        assert!(state.documents().get(&Slug::parse("broken")).is_none());

        let err = site.page(&Slug::parse("broken")).unwrap_err();

        assert!(matches!(
            err,
            SiteError::Content(ContentError::Frontmatter { .. })
        ));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_search_ranks_title_matches_first() {
        let (_, site) = create_site(scenario_store());

        let results = site.search("intro", 10).unwrap();

        assert_eq!(results.first().map(|r| r.id.as_str()), Some("guides/intro"));
    }

    #[test]
    fn test_state_returns_same_arc_until_invalidated() {
        let (_, site) = create_site(scenario_store());

        let first = site.state().unwrap();
        let second = site.state().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        site.invalidate();
        let third = site.state().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_invalidate_picks_up_store_changes() {
        let (store, site) = create_site(scenario_store());
        let before = site.state().unwrap();
        assert_eq!(site.search("plugins", 10).unwrap().len(), 1);

        store.insert("guides/plugins.md", "---\ntitle: Plugins\n---\nWriting plugins.");
        store.remove("guides/advanced.md");

        // Snapshot is unchanged until invalidated.
        assert_eq!(site.state().unwrap().documents().len(), 4);

        site.invalidate();
        let after = site.state().unwrap();

        assert!(after.documents().get(&Slug::parse("guides/plugins")).is_some());
        assert!(after.documents().get(&Slug::parse("guides/advanced")).is_none());
        assert_eq!(before.documents().len(), 4);
        assert_eq!(
            site.search("plugins", 10)
                .unwrap()
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>(),
            vec!["guides/plugins"]
        );
    }

    #[test]
    fn test_failed_reload_keeps_site_invalid() {
        let (store, site) = create_site(scenario_store());
        site.init().unwrap();

        store.remove("index.md");
        site.invalidate();
        assert!(site.state().is_err());

        store.insert("index.md", "---\ntitle: Home\n---\n");
        assert_eq!(site.state().unwrap().documents().len(), 4);
    }

    #[test]
    fn test_search_index_built_once_under_concurrency() {
        let (_, site) = create_site(scenario_store());
        let state = site.state().unwrap();

        let state = &*state;
        let indexes: Vec<&SearchIndex> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || state.search_index()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(indexes.windows(2).all(|w| std::ptr::eq(w[0], w[1])));
        assert_eq!(state.search_index().len(), 4);
    }

    #[test]
    fn test_concurrent_invalidate_and_reload() {
        let (_, site) = create_site(scenario_store());
        let site = Arc::new(site);
        site.init().unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let site = Arc::clone(&site);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        site.invalidate();
                    } else {
                        let state = site.state().unwrap();
                        assert!(state.documents().get(&Slug::parse("guides/intro")).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(site.state().unwrap().documents().len(), 4);
    }

    #[test]
    fn test_sitemap_and_feed() {
        let (_, site) = create_site(scenario_store());

        let sitemap = site.sitemap().unwrap();
        let feed = site.feed().unwrap();

        assert_eq!(sitemap.matches("<url>").count(), 4);
        assert!(sitemap.contains("<loc>http://localhost:3000/guides/advanced</loc>"));
        assert_eq!(feed.matches("<item>").count(), 4);
    }

    #[test]
    fn test_filesystem_site() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source_dir: PathBuf = temp_dir.path().join("docs");
        fs::create_dir_all(source_dir.join("guides")).unwrap();
        fs::write(source_dir.join("index.md"), "# Home").unwrap();
        fs::write(source_dir.join("guides/index.md"), "---\ntitle: Guides\n---\n").unwrap();
        fs::write(source_dir.join("guides/setup.md"), "---\ntitle: Setup\n---\n").unwrap();

        let site = Site::new(
            Arc::new(FsContentStore::new(source_dir)),
            SiteConfig::default(),
        );
        let state = site.init().unwrap();

        assert_eq!(nav_titles(state.navigation()), vec!["Guides"]);
        assert_eq!(state.navigation()[0].href.as_deref(), Some("/guides"));
        assert_eq!(
            state
                .breadcrumbs(&Slug::parse("guides/setup"))
                .into_iter()
                .map(|b| b.title)
                .collect::<Vec<_>>(),
            vec!["Home", "Guides", "Setup"]
        );
    }

    #[test]
    fn test_production_hides_drafts() {
        let store = scenario_store().with_file("guides/wip.md", "---\ntitle: WIP\ndraft: true\n---\n");
        let config = SiteConfig {
            loader: LoaderConfig {
                mode: ExecutionMode::Production,
                ..LoaderConfig::default()
            },
            ..SiteConfig::default()
        };
        let site = Site::new(Arc::new(store), config);

        let state = site.init().unwrap();

        assert!(state.documents().get(&Slug::parse("guides/wip")).is_none());
        assert!(site.page(&Slug::parse("guides/wip")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_search_index_build_logged_once() {
        let (_, site) = create_site(scenario_store());
        let counter = IndexBuildCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            site.search("intro", 5).unwrap();
            site.search("plugins", 5).unwrap();
        });

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
