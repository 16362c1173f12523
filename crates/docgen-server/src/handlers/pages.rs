//! Pages API endpoint.
//!
//! Returns one document as JSON: metadata, breadcrumbs, table of contents,
//! previous/next links and the raw markdown body.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use docgen_content::{Slug, TocEntry};
use docgen_site::{Breadcrumb, PageNavEntry, PageView};
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    meta: PageMeta,
    breadcrumbs: Vec<Breadcrumb>,
    toc: Vec<TocEntry>,
    prev: Option<PageNavEntry>,
    next: Option<PageNavEntry>,
    /// Markdown body without frontmatter.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// URL path.
    path: String,
    /// Source file path relative to the content root.
    source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    /// e.g. "3 min read".
    reading_time: String,
}

impl PageResponse {
    fn new(view: PageView, state: &AppState) -> Self {
        let PageView {
            document,
            breadcrumbs,
            toc,
            neighbors,
            reading_time,
        } = view;
        let title = document.title().to_owned();
        let fm = document.frontmatter;

        Self {
            meta: PageMeta {
                title,
                description: fm.description,
                path: document.slug.href(),
                source_file: document.source_path.display().to_string(),
                date: fm.date,
                author: fm.author,
                tags: fm.tags,
                image: fm.image,
                reading_time: reading_time.to_string(),
            },
            breadcrumbs: if state.features.breadcrumbs {
                breadcrumbs
            } else {
                Vec::new()
            },
            toc: if state.features.toc { toc } else { Vec::new() },
            prev: neighbors.prev,
            next: neighbors.next,
            content: document.content,
        }
    }
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&Slug::root(), &state, &headers)
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&Slug::parse(&path), &state, &headers)
}

fn get_page_impl(
    slug: &Slug,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let view = state.site.page(slug)?;
    let body = serde_json::to_string(&PageResponse::new(view, state))?;

    let etag = compute_etag(&state.version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Compute `ETag` from version and response body.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
