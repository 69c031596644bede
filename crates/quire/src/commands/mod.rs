//! CLI command implementations.

mod build;
mod nav;
mod render;
pub(crate) mod slugs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use quire_cache::{Cache, FileCache, NullCache};
use quire_config::{CliSettings, Config};
use quire_site::{Site, SiteConfig};
use quire_storage::{FsStorage, Storage};

use crate::VERSION;
use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use nav::NavArgs;
pub(crate) use render::RenderArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Markdown content root (overrides config).
    #[arg(short, long, global = true)]
    source_dir: Option<PathBuf>,

    /// Navigation manifest (overrides config).
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Disable the page cache.
    #[arg(long, global = true)]
    pub no_cache: bool,
}

impl SiteArgs {
    /// Load configuration with CLI overrides applied.
    fn load_config(&self, output_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            manifest: self.manifest.clone(),
            output_dir,
            cache_enabled: self.no_cache.then_some(false),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build a [`Site`] from resolved configuration.
fn open_site(config: &Config) -> Result<Site, CliError> {
    let docs = &config.docs_resolved;
    tracing::info!(
        source_dir = %docs.source_dir.display(),
        manifest = %docs.manifest.display(),
        base_path = %docs.base_path,
        "Opening site"
    );

    let cache: Box<dyn Cache> = if docs.cache_enabled {
        ensure_project_dir(&docs.project_dir)?;
        Box::new(FileCache::new(docs.cache_dir(), VERSION))
    } else {
        Box::new(NullCache)
    };

    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(docs.source_dir.clone()));
    let site_config = SiteConfig {
        manifest_path: docs.manifest.clone(),
        base_path: docs.base_path.clone(),
        gfm: config.render.gfm,
        highlight: config.render.highlight,
        heading_ids: config.render.heading_ids,
    };
    Ok(Site::new(storage, cache.as_ref(), site_config))
}

/// Ensure the `.quire/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by quire\n*\n");
    }

    Ok(())
}

/// Split slug arguments on `/`, dropping empty segments.
///
/// `["guides/setup"]` and `["guides", "setup"]` name the same page; no
/// arguments, `""` or `"/"` name the root.
fn parse_slug(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split('/'))
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Display form of a slug: `/` for the root, `/guides/setup` otherwise.
fn slug_label(slug: &[String]) -> String {
    format!("/{}", slug.join("/"))
}
