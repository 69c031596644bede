//! `quire build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use quire_site::Site;

use super::{SiteArgs, open_site, slug_label};
use crate::error::CliError;
use crate::output::Output;

/// Navigation tree written next to the rendered pages.
const NAV_FILENAME: &str = "nav.json";

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for rendered pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// Pages written and skipped by a build.
#[derive(Debug, Default, PartialEq, Eq)]
struct BuildSummary {
    written: usize,
    skipped: usize,
}

impl BuildArgs {
    pub(crate) fn execute(self, site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
        let config = site_args.load_config(self.output_dir)?;
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let site = open_site(&config)?;
        let summary = write_site(&site, output_dir, output)?;

        if summary.skipped > 0 {
            output.warning(&format!("Skipped {} missing pages", summary.skipped));
        }
        output.success(&format!(
            "Built {} pages to {}",
            summary.written,
            output_dir.display()
        ));
        Ok(())
    }
}

/// Render every static slug into `output_dir` and write the navigation tree.
fn write_site(site: &Site, output_dir: &Path, output: &Output) -> Result<BuildSummary, CliError> {
    let mut summary = BuildSummary::default();

    for slug in site.static_slugs()? {
        let Some(page) = site.render(&slug)? else {
            output.warning(&format!("No document for {}, skipping", slug_label(&slug)));
            summary.skipped += 1;
            continue;
        };

        let path = page_path(output_dir, &slug);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &page.html)?;
        tracing::debug!(path = %path.display(), "Wrote page");
        summary.written += 1;
    }

    fs::create_dir_all(output_dir)?;
    let nav = serde_json::to_string_pretty(site.navigation()?.as_slice())?;
    fs::write(output_dir.join(NAV_FILENAME), nav)?;

    Ok(summary)
}

/// `<output_dir>/<slug>/index.html`; the root page is `<output_dir>/index.html`.
fn page_path(output_dir: &Path, slug: &[String]) -> PathBuf {
    slug.iter()
        .fold(output_dir.to_path_buf(), |path, segment| path.join(segment))
        .join("index.html")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pretty_assertions::assert_eq;
    use quire_cache::NullCache;
    use quire_site::SiteConfig;
    use quire_storage::FsStorage;

    fn create_site(dir: &Path, manifest: &str) -> Site {
        let docs = dir.join("docs");
        fs::create_dir_all(docs.join("guides")).unwrap();
        fs::write(docs.join("home.md"), "# Home\n").unwrap();
        fs::write(docs.join("guides/setup.md"), "# Setup\n\n## Install\n").unwrap();
        fs::write(dir.join("mkdocs.yml"), manifest).unwrap();

        let config = SiteConfig {
            manifest_path: dir.join("mkdocs.yml"),
            ..SiteConfig::default()
        };
        Site::new(Arc::new(FsStorage::new(docs)), &NullCache, config)
    }

    #[test]
    fn test_page_path() {
        let out = Path::new("site");

        assert_eq!(page_path(out, &[]), PathBuf::from("site/index.html"));
        assert_eq!(
            page_path(out, &["guides".to_owned(), "setup".to_owned()]),
            PathBuf::from("site/guides/setup/index.html")
        );
    }

    #[test]
    fn test_write_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = create_site(dir.path(), "nav:\n  - home.md\n  - Setup: guides/setup.md\n");
        let out = dir.path().join("site");

        let summary = write_site(&site, &out, &Output::new()).unwrap();

        assert_eq!(summary, BuildSummary { written: 3, skipped: 0 });
        assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("<h1>Home</h1>"));
        assert!(out.join("home/index.html").exists());
        let setup = fs::read_to_string(out.join("guides/setup/index.html")).unwrap();
        assert!(setup.contains(r#"<h2 id="install">Install</h2>"#));

        let nav: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("nav.json")).unwrap()).unwrap();
        assert_eq!(nav[1]["href"], "/docs/guides/setup");
    }

    #[test]
    fn test_write_site_skips_missing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let site = create_site(dir.path(), "nav:\n  - home.md\n  - Gone: gone.md\n");
        let out = dir.path().join("site");

        let summary = write_site(&site, &out, &Output::new()).unwrap();

        assert_eq!(summary, BuildSummary { written: 2, skipped: 1 });
        assert!(!out.join("gone").exists());
    }

    #[test]
    fn test_write_site_missing_manifest_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let site = create_site(dir.path(), "");
        fs::remove_file(dir.path().join("mkdocs.yml")).unwrap();

        let err = write_site(&site, &dir.path().join("site"), &Output::new()).unwrap_err();

        assert!(matches!(err, CliError::Site(_)));
    }
}
