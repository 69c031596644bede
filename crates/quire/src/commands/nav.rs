//! `quire nav` command implementation.

use clap::Args;

use super::{SiteArgs, open_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Print the linearized reading order instead of the tree.
    #[arg(long)]
    flat: bool,
}

impl NavArgs {
    pub(crate) fn execute(self, site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
        let config = site_args.load_config(None)?;
        let site = open_site(&config)?;

        let json = if self.flat {
            serde_json::to_string_pretty(&site.docs_list()?)?
        } else {
            serde_json::to_string_pretty(site.navigation()?.as_slice())?
        };
        output.data(&json)?;
        Ok(())
    }
}
