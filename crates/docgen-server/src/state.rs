//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use docgen_config::FeaturesConfig;
use docgen_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Loaded site (navigation, pages, search).
    pub(crate) site: Arc<Site>,
    /// Feature flags reported to clients.
    pub(crate) features: FeaturesConfig,
    /// Result count when a search request gives none.
    pub(crate) search_limit: usize,
    /// Application version, mixed into `ETag`s.
    pub(crate) version: String,
}
