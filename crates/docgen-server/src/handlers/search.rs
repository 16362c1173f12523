//! Search API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use docgen_search::SearchResult;
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Upper bound on the `limit` parameter.
const MAX_LIMIT: usize = 100;

/// Query string for GET /api/search.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

/// Handle GET /api/search?q=&limit=.
///
/// Blank queries return an empty list.
pub(crate) async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ServerError> {
    let limit = params.limit.unwrap_or(state.search_limit).min(MAX_LIMIT);
    let results = state.site.search(&params.q, limit)?;
    Ok(Json(results))
}
