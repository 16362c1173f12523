//! `docgen check` command implementation.

use clap::Args;
use docgen_config::CliSettings;

use crate::commands::{ContentArgs, open_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    content: ContentArgs,
}

impl CheckArgs {
    /// Load everything the server would load and report counts.
    ///
    /// Fails when the content root has no index document. Documents left
    /// out of the search index are reported as warnings.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.content.load_config(CliSettings::default())?;

        output.info(&format!(
            "Checking {}",
            config.docs_resolved.source_dir.display()
        ));

        let site = open_site(&config)?;
        let state = site.state()?;
        let index = state.search_index();

        for skipped in index.skipped() {
            output.warning(&format!("Not searchable: {skipped}"));
        }

        output.info(&format!("Documents:          {}", state.documents().len()));
        output.info(&format!("Navigation roots:   {}", state.navigation().len()));
        output.info(&format!("Sequential pages:   {}", state.page_order().len()));
        output.info(&format!("Searchable entries: {}", index.len()));

        if index.skipped().is_empty() {
            output.success("Content OK");
        } else {
            output.warning(&format!(
                "Content OK with {} unsearchable document(s)",
                index.skipped().len()
            ));
        }

        Ok(())
    }
}
