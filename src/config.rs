//! # Configuration
//!
//! Settings for the `vui-source` CLI, stored as JSON.
//!
//! ## File Location
//!
//! The first of these that is given or exists is used:
//!
//! ```text
//! --config <FILE>
//! <root>/vui-source.json
//! ~/.config/vui-source/config.json
//! ```
//!
//! A missing file yields [`Config::default()`]. The `directories` crate is
//! used to resolve the platform-appropriate config directory.
//!
//! ## Environment
//!
//! `VUI_SOURCE_ENV` (`production` / `development`) overrides [`Config::mode`].
//! `NODE_ENV` is consulted when `VUI_SOURCE_ENV` is unset.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::source::registry::DEFAULT_REGISTRY_PATH;
use crate::source::resolver::{ResolverOptions, DEFAULT_SEARCH_DIRS};
use crate::source::source_map::DEFAULT_SOURCE_MAP_PATH;
use crate::source::usage::DEFAULT_IMPORT_PREFIX;

/// Name of the per-project config file
pub const PROJECT_CONFIG_FILE: &str = "vui-source.json";

/// Environment variables consulted for the execution mode, in order
pub const MODE_ENV_VARS: &[&str] = &["VUI_SOURCE_ENV", "NODE_ENV"];

/// Whether the filesystem strategies are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Development,
    Production,
}

impl ExecutionMode {
    /// Parse an environment value. Anything other than `production` /
    /// `development` (case-insensitive) is ignored.
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Persisted CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project root; defaults to the directory the CLI runs in
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Registry file, relative to the root
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// Generated source map, relative to the root
    #[serde(default = "default_source_map_path")]
    pub source_map_path: PathBuf,

    /// Candidate directories for the directory scan, in search order
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<String>,

    #[serde(default)]
    pub mode: ExecutionMode,

    /// Prefix of the import line in usage snippets
    #[serde(default = "default_import_prefix")]
    pub usage_import_prefix: String,
}

fn default_registry_path() -> PathBuf {
    PathBuf::from(DEFAULT_REGISTRY_PATH)
}

fn default_source_map_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_MAP_PATH)
}

fn default_search_dirs() -> Vec<String> {
    DEFAULT_SEARCH_DIRS.iter().map(|d| d.to_string()).collect()
}

fn default_import_prefix() -> String {
    DEFAULT_IMPORT_PREFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            registry_path: default_registry_path(),
            source_map_path: default_source_map_path(),
            search_dirs: default_search_dirs(),
            mode: ExecutionMode::default(),
            usage_import_prefix: default_import_prefix(),
        }
    }
}

impl Config {
    /// Load the configuration for a CLI run.
    ///
    /// An explicit path must be readable; the project and user files are
    /// optional.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::load_from(path);
        }

        let project = root.join(PROJECT_CONFIG_FILE);
        if project.exists() {
            return Self::load_from(&project);
        }

        match Self::user_config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Apply the mode override from the environment.
    ///
    /// `lookup` is `std::env::var` in the CLI and a closure in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = MODE_ENV_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find_map(|value| ExecutionMode::from_env_value(&value))
        {
            self.mode = mode;
        }
    }

    /// Resolve the project root against the directory the CLI runs in.
    pub fn resolve_root(&self, cwd: &Path) -> PathBuf {
        match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        }
    }

    pub fn to_resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            registry_path: self.registry_path.clone(),
            search_dirs: self.search_dirs.clone(),
            allow_filesystem_fallback: self.mode == ExecutionMode::Development,
        }
    }

    /// Path to the user-level config file.
    pub fn user_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "vui-source")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
