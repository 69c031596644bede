//! `quire slugs` command implementation.

use super::{SiteArgs, open_site, slug_label};
use crate::error::CliError;
use crate::output::Output;

/// Print every static slug, one per line.
pub(crate) fn execute(site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
    let config = site_args.load_config(None)?;
    let site = open_site(&config)?;

    for slug in site.static_slugs()? {
        output.data(&slug_label(&slug))?;
    }
    Ok(())
}
