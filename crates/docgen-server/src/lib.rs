//! HTTP API server for docgen.
//!
//! Serves the loaded [`Site`] over axum:
//! - `GET /api/config` site information and feature flags
//! - `GET /api/navigation` sidebar tree
//! - `GET /api/pages/{*path}` one page, with `ETag` revalidation
//! - `GET /api/search?q=&limit=` ranked search results
//! - `GET /sitemap.xml` and `GET /feed.xml`
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use docgen_config::Config;
//! use docgen_content::FsContentStore;
//! use docgen_server::{ServerConfig, run_server};
//! use docgen_site::{Site, SiteConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None, None).unwrap();
//!     let store = Arc::new(FsContentStore::new(config.docs_resolved.source_dir.clone()));
//!     let site = Arc::new(Site::new(store, SiteConfig::from_config(&config)));
//!     site.init().unwrap();
//!
//!     let server = ServerConfig::from_config(&config, "1.0.0".to_owned());
//!     run_server(server, site).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use docgen_config::{Config, FeaturesConfig};
use docgen_site::Site;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Default search result count.
    pub search_limit: usize,
    pub features: FeaturesConfig,
    /// Application version (mixed into `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            search_limit: docgen_search::DEFAULT_LIMIT,
            features: FeaturesConfig::default(),
            version: String::new(),
        }
    }
}

impl ServerConfig {
    /// Create server configuration from the application config.
    #[must_use]
    pub fn from_config(config: &Config, version: String) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            search_limit: config.search.limit,
            features: config.features.clone(),
            version,
        }
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Address`] if host and port do not form a valid
    /// address.
    pub fn address(&self) -> Result<SocketAddr, ServerError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|source| ServerError::Address { address, source })
    }
}

/// Run the server until Ctrl-C.
///
/// The site should already be initialised so that missing content fails
/// before the listener is bound.
///
/// # Errors
///
/// Returns an error if the address is invalid or binding fails.
pub async fn run_server(config: ServerConfig, site: Arc<Site>) -> Result<(), ServerError> {
    let addr = config.address()?;

    let state = Arc::new(AppState {
        site,
        features: config.features,
        search_limit: config.search_limit,
        version: config.version,
    });
    let app = app::create_router(state);

    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
