//! `docgen serve` command implementation.

use clap::Args;
use docgen_config::CliSettings;
use docgen_server::{ServerConfig, run_server};

use crate::commands::{ContentArgs, open_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Public site URL used in the sitemap and feed (overrides config).
    #[arg(long, env = "DOCGEN_SITE_URL")]
    site_url: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// Content is loaded before the listener is bound, so a missing root
    /// index fails startup.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.content.load_config(CliSettings {
            host: self.host,
            port: self.port,
            site_url: self.site_url,
            ..CliSettings::default()
        })?;

        output.info(&format!(
            "Source directory: {}",
            config.docs_resolved.source_dir.display()
        ));
        let site = open_site(&config)?;
        if config.docs_resolved.production {
            output.info("Mode: production (drafts hidden)");
        } else {
            output.info("Mode: development");
        }

        output.highlight(&format!(
            "Serving on http://{}:{}",
            config.server.host, config.server.port
        ));

        let server_config = ServerConfig::from_config(&config, version.to_owned());
        run_server(server_config, site).await?;

        Ok(())
    }
}
