//! `docgen search` command implementation.

use clap::Args;
use docgen_config::CliSettings;

use crate::commands::{ContentArgs, open_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Search query.
    query: String,

    /// Maximum number of results (default: from config).
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print results as JSON on stdout.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    content: ContentArgs,
}

impl SearchArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.content.load_config(CliSettings::default())?;
        let site = open_site(&config)?;

        let limit = self.limit.unwrap_or(config.search.limit);
        let results = site.search(&self.query, limit)?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            output.warning(&format!("No results for \"{}\"", self.query));
            return Ok(());
        }

        for result in &results {
            output.highlight(&result.title);
            output.detail(&result.href);
            if let Some(heading) = &result.matched_heading {
                output.detail(&format!("  # {heading}"));
            }
            if !result.snippet.is_empty() {
                output.info(&format!("  {}", result.snippet));
            }
        }
        output.success(&format!("{} result(s)", results.len()));

        Ok(())
    }
}
