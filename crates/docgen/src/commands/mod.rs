//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod search;
pub(crate) mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use docgen_config::{CliSettings, Config};
use docgen_content::FsContentStore;
use docgen_site::{Site, SiteConfig};

pub(crate) use check::CheckArgs;
pub(crate) use search::SearchArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Options shared by every command that loads content.
#[derive(Args, Default)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover docgen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Hide draft documents (overrides config).
    #[arg(long)]
    production: bool,
}

impl ContentArgs {
    /// Load the configuration, applying these arguments over `settings`.
    pub(crate) fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir.clone(),
            production: self.production.then_some(true),
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Create a site over the configured source directory and load it.
///
/// Fails when the content root has no index document.
pub(crate) fn open_site(config: &Config) -> Result<Arc<Site>, CliError> {
    let store = Arc::new(FsContentStore::new(config.docs_resolved.source_dir.clone()));
    let site = Arc::new(Site::new(store, SiteConfig::from_config(config)));
    site.init()?;
    Ok(site)
}
