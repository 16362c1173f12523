//! `sitemap.xml` and `feed.xml`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /sitemap.xml.
pub(crate) async fn get_sitemap(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let xml = state.site.sitemap()?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

/// Handle GET /feed.xml.
pub(crate) async fn get_feed(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let xml = state.site.feed()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/rss+xml; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        xml,
    ))
}
