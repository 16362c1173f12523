//! Configuration API endpoint.
//!
//! Returns client-side configuration for the frontend.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/config.
#[derive(Serialize)]
pub(crate) struct ConfigResponse {
    name: String,
    description: String,
    url: String,
    features: FeaturesResponse,
}

#[derive(Serialize)]
#[allow(clippy::struct_excessive_bools)]
struct FeaturesResponse {
    search: bool,
    toc: bool,
    breadcrumbs: bool,
}

/// Handle GET /api/config.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let info = &state.site.config().info;
    Json(ConfigResponse {
        name: info.name.clone(),
        description: info.description.clone(),
        url: info.url.clone(),
        features: FeaturesResponse {
            search: state.features.search,
            toc: state.features.toc,
            breadcrumbs: state.features.breadcrumbs,
        },
    })
}
