//! Configuration management for Quire.
//!
//! Parses `quire.toml` with serde and discovers it in the current directory
//! or any parent. Relative paths resolve against the directory holding the
//! config file. CLI settings are applied on top via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.base_path`
//! - `build.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Default URL prefix for page hrefs.
pub const DEFAULT_BASE_PATH: &str = "/docs";

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content root.
    pub source_dir: Option<PathBuf>,
    /// Override navigation manifest path.
    pub manifest: Option<PathBuf>,
    /// Override static build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Markdown rendering options.
    pub render: RenderConfig,
    #[serde(default)]
    cache: CacheConfigRaw,
    #[serde(default)]
    build: BuildConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file, if one was loaded.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    manifest: Option<String>,
    base_path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocsConfig {
    /// Content root holding the markdown files.
    pub source_dir: PathBuf,
    /// Navigation manifest (`mkdocs.yml`).
    pub manifest: PathBuf,
    /// URL prefix for hrefs, always starting with `/`.
    pub base_path: String,
    /// Project data directory (`.quire/`).
    pub project_dir: PathBuf,
    /// Whether render results are cached on disk.
    pub cache_enabled: bool,
}

impl DocsConfig {
    /// Cache directory path (`.quire/cache/`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }
}

/// Markdown rendering options.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable GitHub-flavored extensions (tables, strikethrough, task lists,
    /// footnotes, alerts).
    pub gfm: bool,
    /// Highlight code blocks.
    pub highlight: bool,
    /// Add `id` attributes to table-of-contents headings.
    pub heading_ids: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            highlight: true,
            heading_ids: true,
        }
    }
}

/// Resolved static build configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildConfig {
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
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
        /// Config field path (e.g., "`docs.base_path`").
        field: String,
        /// Error message (e.g., "${`DOCS_PREFIX`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `quire.toml` in the current directory and its parents, falling back
    /// to defaults rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if reading,
    /// parsing, env expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(manifest) = &settings.manifest {
            self.docs_resolved.manifest.clone_from(manifest);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.docs_resolved.cache_enabled = cache_enabled;
        }
    }

    /// Search for `quire.toml` in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            docs: DocsConfigRaw::default(),
            render: RenderConfig::default(),
            cache: CacheConfigRaw::default(),
            build: BuildConfigRaw::default(),
            docs_resolved: DocsConfig::default(),
            build_resolved: BuildConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `docs.base_path` is empty, does
    /// not start with `/`, or ends with `/` while not being `/` itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_path = &self.docs_resolved.base_path;
        require_non_empty(base_path, "docs.base_path")?;
        if !base_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "docs.base_path must start with '/', got '{base_path}'"
            )));
        }
        if base_path.len() > 1 && base_path.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "docs.base_path must not end with '/', got '{base_path}'"
            )));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref base_path) = self.docs.base_path {
            self.docs.base_path = Some(expand::expand_env(base_path, "docs.base_path")?);
        }
        if let Some(ref output_dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(output_dir, "build.output_dir")?);
        }
        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            manifest: resolve(self.docs.manifest.as_deref(), "mkdocs.yml"),
            base_path: self
                .docs
                .base_path
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_owned()),
            project_dir: config_dir.join(".quire"),
            cache_enabled: self.cache.enabled.unwrap_or(true),
        };
        self.build_resolved = BuildConfig {
            output_dir: resolve(self.build.output_dir.as_deref(), "site"),
        };
    }
}
