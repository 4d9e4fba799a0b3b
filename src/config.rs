//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/seltree/seltree.toml`
//! 3. Local config: `<browsed_dir>/.seltree.toml`
//! 4. Environment variables: `SELTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Which leaves start out checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreselectConfig {
    /// File extensions preselected on build (e.g., [".mp4", ".pdf"])
    pub extensions: Vec<String>,
}

impl Default for PreselectConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".mp4".into(), ".mkv".into(), ".pdf".into(), ".html".into()],
        }
    }
}

/// Raw preselect config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPreselectConfig {
    pub extensions: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_dir: Option<PathBuf>,
    pub follow_links: Option<bool>,
    pub include_hidden: Option<bool>,
    #[serde(default)]
    pub preselect: RawPreselectConfig,
}

impl PreselectConfig {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&[".mp4"], &[".srt"])          // → [".mp4", ".srt"]
    /// merge_array(&[".mp4", ".pdf"], &["!.pdf"]) // → [".mp4"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Union-merge overlay onto self; unspecified arrays keep the base.
    pub fn merge(&self, overlay: &RawPreselectConfig) -> Self {
        Self {
            extensions: overlay
                .extensions
                .as_ref()
                .map(|o| Self::merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
        }
    }

    /// Apply global config onto defaults: a specified array REPLACES the default.
    pub fn apply_global(&self, global: &RawPreselectConfig) -> Self {
        Self {
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
        }
    }
}

/// Unified configuration for seltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory browsed when none is given on the command line
    pub root_dir: Option<PathBuf>,
    /// Descend into symlinked directories
    pub follow_links: bool,
    /// Show entries whose name starts with a dot
    pub include_hidden: bool,
    /// Initial selection rules
    pub preselect: PreselectConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: None,
            follow_links: false,
            include_hidden: true,
            preselect: PreselectConfig::default(),
        }
    }
}

/// Get the XDG config directory for seltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "seltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("seltree.toml"))
}

/// Get the path to the local config file in a browsed directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".seltree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched when expansion fails.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.root_dir = self.root_dir.as_deref().map(expand_path);
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_dir: overlay.root_dir.clone().or_else(|| self.root_dir.clone()),
            follow_links: overlay.follow_links.unwrap_or(self.follow_links),
            include_hidden: overlay.include_hidden.unwrap_or(self.include_hidden),
            preselect: self.preselect.merge(&overlay.preselect),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            root_dir: global.root_dir.clone().or_else(|| self.root_dir.clone()),
            follow_links: global.follow_links.unwrap_or(self.follow_links),
            include_hidden: global.include_hidden.unwrap_or(self.include_hidden),
            preselect: self.preselect.apply_global(&global.preselect),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional browsed directory whose `.seltree.toml` applies
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply SELTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SELTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_dir") {
            settings.root_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("follow_links") {
            settings.follow_links = val;
        }
        if let Ok(val) = config.get_bool("include_hidden") {
            settings.include_hidden = val;
        }
        if let Ok(val) = config.get_string("preselect.extensions") {
            settings.preselect.extensions = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# seltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/seltree/seltree.toml  (defines your baseline)
#   Local:  <browsed_dir>/.seltree.toml     (directory-specific additions)
#   Env:    SELTREE_* environment variables  (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global. Use "!item" to REMOVE an inherited item:
#     extensions = [".srt", "!.html"]  # adds .srt, removes .html

# Directory browsed when none is given
# root_dir = "~/Videos/courses"

# Descend into symlinked directories
# follow_links = false

# Show dot files and dot directories
# include_hidden = true

[preselect]
# Files with these extensions start out checked
# extensions = [".mp4", ".mkv", ".pdf", ".html"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
