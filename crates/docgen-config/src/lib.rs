//! Configuration management for docgen.
//!
//! Parses `docgen.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Clone, Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override production mode (drafts hidden when `true`).
    pub production: Option<bool>,
    /// Override public site URL.
    pub site_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docgen.toml";

/// Default order for sequential page navigation sections.
pub const DEFAULT_SECTION_ORDER: [&str; 5] =
    ["getting-started", "guides", "api", "reference", "examples"];

/// Application configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration (paths are relative strings from TOML).
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Public site information.
    pub site: SiteConfig,
    /// Search configuration.
    pub search: SearchConfig,
    /// Navigation configuration.
    pub navigation: NavigationConfig,
    /// Frontend feature flags.
    pub features: FeaturesConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    #[allow(clippy::derivable_impls)]
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    reserved_prefix: Option<String>,
    production: Option<bool>,
}

/// Resolved content configuration with absolute paths.
#[derive(Clone, Debug, Default)]
pub struct DocsConfig {
    /// Content directory containing markdown files.
    pub source_dir: PathBuf,
    /// Directories starting with this prefix are not published.
    pub reserved_prefix: String,
    /// Production mode hides draft documents.
    pub production: bool,
}

/// Public site information used by the sitemap, the feed and `/api/config`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name.
    pub name: String,
    /// Site description.
    pub description: String,
    /// Absolute base URL (e.g., `https://docs.example.com`).
    pub url: String,
    /// Content language code.
    pub language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Documentation".to_owned(),
            description: String::new(),
            url: "http://localhost:3000".to_owned(),
            language: "en".to_owned(),
        }
    }
}

/// Search configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default maximum number of results.
    pub limit: usize,
    /// Snippet length in characters.
    pub snippet_length: usize,
    /// Documents with a larger body are left out of the index.
    pub max_document_bytes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            snippet_length: 150,
            max_document_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Navigation configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Preferred section order for previous/next links.
    pub section_order: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            section_order: DEFAULT_SECTION_ORDER
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Frontend feature flags.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FeaturesConfig {
    /// Show the search dialog.
    pub search: bool,
    /// Show the table of contents.
    pub toc: bool,
    /// Show breadcrumbs.
    pub breadcrumbs: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            search: true,
            toc: true,
            breadcrumbs: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docgen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(production) = settings.production {
            self.docs_resolved.production = production;
        }
        if let Some(site_url) = &settings.site_url {
            self.site.url.clone_from(site_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            search: SearchConfig::default(),
            navigation: NavigationConfig::default(),
            features: FeaturesConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("content"),
                reserved_prefix: "_".to_owned(),
                production: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_site()?;
        self.validate_search()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate content configuration.
    fn validate_docs(&self) -> Result<(), ConfigError> {
        let prefix = &self.docs_resolved.reserved_prefix;
        require_non_empty(prefix, "docs.reserved_prefix")?;
        if prefix.contains('/') || prefix.contains('\\') {
            return Err(ConfigError::Validation(
                "docs.reserved_prefix cannot contain path separators".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.name, "site.name")?;
        require_non_empty(&self.site.url, "site.url")?;
        require_http_url(&self.site.url, "site.url")?;
        Ok(())
    }

    /// Validate search configuration.
    fn validate_search(&self) -> Result<(), ConfigError> {
        const MAX_LIMIT: usize = 100;

        if self.search.limit == 0 {
            return Err(ConfigError::Validation(
                "search.limit must be greater than 0".to_owned(),
            ));
        }
        if self.search.limit > MAX_LIMIT {
            return Err(ConfigError::Validation(format!(
                "search.limit cannot exceed {MAX_LIMIT}"
            )));
        }
        // The snippet keeps 50 characters before the match
        if self.search.snippet_length <= 50 {
            return Err(ConfigError::Validation(
                "search.snippet_length must be greater than 50".to_owned(),
            ));
        }
        if self.search.max_document_bytes == 0 {
            return Err(ConfigError::Validation(
                "search.max_document_bytes must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.site.url = expand::expand_env(&self.site.url, "site.url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = config_dir.join(self.docs.source_dir.as_deref().unwrap_or("content"));

        self.docs_resolved = DocsConfig {
            source_dir,
            reserved_prefix: self
                .docs
                .reserved_prefix
                .clone()
                .unwrap_or_else(|| "_".to_owned()),
            production: self.docs.production.unwrap_or(false),
        };
    }
}
