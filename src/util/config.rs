//! Configuration file support for shimpack.
//!
//! shimpack supports two configuration file locations:
//! - Global: `~/.shimpack/config.toml` - User-wide defaults
//! - Project: `shimpack.toml` in the working directory - Build-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::layout::PackageLayout;
use crate::core::rules::ExclusionRuleSet;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "shimpack.toml";

/// shimpack configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package settings
    pub package: PackageConfig,

    /// Shim module settings
    pub shim: ShimConfig,

    /// Symbol exclusion settings
    pub exclude: ExcludeConfig,
}

/// Package-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package directory name
    pub name: Option<String>,

    /// Docstring at the top of the facade
    pub docstring: Option<String>,

    /// Facade file name
    pub facade_file: Option<String>,
}

/// Shim-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Shim module name (e.g., gpstk_pylib)
    pub module: Option<String>,

    /// Substring identifying compiled extension files
    pub artifact_id: Option<String>,

    /// Compiled-cache suffix (e.g., "c" for .pyc)
    pub cache_suffix: Option<String>,

    /// Python interpreter used for introspection
    pub python: Option<PathBuf>,

    /// Symbol manifest to read instead of introspecting
    pub manifest: Option<PathBuf>,
}

/// Exclusion-related configuration.
///
/// Entries are added to the built-in rules unless `use_defaults` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// Start from the built-in rules
    #[serde(default = "default_true")]
    pub use_defaults: bool,

    /// Additional exact names
    pub exact: Vec<String>,

    /// Additional substring patterns
    pub patterns: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        ExcludeConfig {
            use_defaults: true,
            exact: Vec::new(),
            patterns: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Exclusion lists accumulate rather than replace.
    pub fn merge(&mut self, other: Config) {
        // Package settings
        if other.package.name.is_some() {
            self.package.name = other.package.name;
        }
        if other.package.docstring.is_some() {
            self.package.docstring = other.package.docstring;
        }
        if other.package.facade_file.is_some() {
            self.package.facade_file = other.package.facade_file;
        }

        // Shim settings
        if other.shim.module.is_some() {
            self.shim.module = other.shim.module;
        }
        if other.shim.artifact_id.is_some() {
            self.shim.artifact_id = other.shim.artifact_id;
        }
        if other.shim.cache_suffix.is_some() {
            self.shim.cache_suffix = other.shim.cache_suffix;
        }
        if other.shim.python.is_some() {
            self.shim.python = other.shim.python;
        }
        if other.shim.manifest.is_some() {
            self.shim.manifest = other.shim.manifest;
        }

        // Exclusion settings
        if !other.exclude.use_defaults {
            self.exclude.use_defaults = false;
        }
        self.exclude.exact.extend(other.exclude.exact);
        self.exclude.patterns.extend(other.exclude.patterns);
    }

    /// Build the package layout described by this config.
    pub fn layout(&self) -> PackageLayout {
        let defaults = PackageLayout::default();
        let package_name = self
            .package
            .name
            .clone()
            .unwrap_or(defaults.package_name);
        let shim_module = self.shim.module.clone().unwrap_or(defaults.shim_module);

        let mut layout = PackageLayout::new(package_name, shim_module);
        if let Some(ref artifact_id) = self.shim.artifact_id {
            layout = layout.with_artifact_id(artifact_id);
        }
        if let Some(ref suffix) = self.shim.cache_suffix {
            layout = layout.with_cache_suffix(suffix);
        }
        if let Some(ref facade_file) = self.package.facade_file {
            layout = layout.with_facade_file(facade_file);
        }
        if let Some(ref docstring) = self.package.docstring {
            layout = layout.with_docstring(docstring);
        }
        layout
    }

    /// Build the exclusion rules described by this config.
    pub fn rules(&self) -> ExclusionRuleSet {
        let base = if self.exclude.use_defaults {
            ExclusionRuleSet::default()
        } else {
            ExclusionRuleSet::empty()
        };
        base.extend(
            self.exclude.exact.iter().cloned(),
            self.exclude.patterns.iter().cloned(),
        )
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (shimpack.toml or an explicit path)
/// 2. Global config (~/.shimpack/config.toml)
/// 3. Defaults
///
/// An explicit project path must load; implicit files that fail to parse
/// are reported and skipped.
pub fn load_config(
    global_path: Option<&Path>,
    project_path: &Path,
    explicit: bool,
) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    let project = if explicit {
        Config::load(project_path)?
    } else {
        Config::load_or_default(project_path)
    };
    config.merge(project);

    Ok(config)
}

/// Get the global shimpack config directory (~/.shimpack).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".shimpack"))
}

/// Get the global config path (~/.shimpack/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (shimpack.toml in the working directory).
pub fn project_config_path(working_dir: &Path) -> PathBuf {
    working_dir.join(PROJECT_CONFIG_FILE)
}
