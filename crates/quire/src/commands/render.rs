//! `quire render` command implementation.

use clap::Args;

use super::{SiteArgs, open_site, parse_slug, slug_label};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Slug segments (`guides setup` or `guides/setup`); empty for the root.
    slug: Vec<String>,

    /// Print only the HTML fragment instead of JSON.
    #[arg(long)]
    html: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self, site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
        let config = site_args.load_config(None)?;
        let site = open_site(&config)?;
        let slug = parse_slug(&self.slug);

        let page = site
            .render(&slug)?
            .ok_or_else(|| CliError::NotFound(slug_label(&slug)))?;

        if self.html {
            output.data(&page.html)?;
        } else {
            output.data(&serde_json::to_string_pretty(&page)?)?;
        }
        Ok(())
    }
}
