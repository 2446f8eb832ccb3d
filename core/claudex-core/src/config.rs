//! Project configuration (`.claudex/config.toml`).
//!
//! Every field defaults independently, so a partial `[features]` table keeps
//! the defaults for whatever it leaves out. A missing file yields
//! [`ClaudexConfig::default`].

use crate::env::{Environment, DOC_PATHS_VAR};
use crate::error::{ClaudexError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Written by the migrator when no configuration exists yet.
pub const DEFAULT_CONFIG_CONTENT: &str = "# Claudex Configuration
# See documentation for all available options

[features]
autodoc_session_progress = true
autodoc_session_end = true
autodoc_frequency = 5
";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClaudexConfig {
    /// Documentation paths handed to the assistant as context hints.
    #[serde(default)]
    pub doc: Vec<String>,
    /// Suppresses overwriting of generated files that already exist.
    #[serde(default)]
    pub no_overwrite: bool,
    #[serde(default)]
    pub features: Features,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default = "default_true")]
    pub autodoc_session_progress: bool,
    #[serde(default = "default_true")]
    pub autodoc_session_end: bool,
    /// Documentation refresh cadence, in counted updates. Taken as written.
    #[serde(default = "default_autodoc_frequency")]
    pub autodoc_frequency: i64,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            autodoc_session_progress: default_true(),
            autodoc_session_end: default_true(),
            autodoc_frequency: default_autodoc_frequency(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_autodoc_frequency() -> i64 {
    5
}

/// Loads the configuration at `path`, defaulting when the file is absent.
pub fn load_config(path: &Path) -> Result<ClaudexConfig> {
    if !path.exists() {
        return Ok(ClaudexConfig::default());
    }

    let content = fs_err::read_to_string(path)
        .map_err(|e| ClaudexError::io(format!("read config {}", path.display()), e))?;
    parse_config(&content, path)
}

/// Parses configuration text; `path` is only used in the error.
pub fn parse_config(content: &str, path: &Path) -> Result<ClaudexConfig> {
    toml::from_str::<ClaudexConfig>(content).map_err(|e| ClaudexError::ConfigMalformed {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Documentation Path Hints
// ─────────────────────────────────────────────────────────────────────────────

/// Makes each path absolute against `base` and joins them with `:`.
pub fn resolve_doc_paths(paths: &[String], base: &Path) -> String {
    paths
        .iter()
        .map(|p| {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        })
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// Publishes the configured doc paths as `CLAUDEX_DOC_PATHS`.
/// Leaves the variable alone when no paths are configured.
pub fn export_doc_paths(config: &ClaudexConfig, base: &Path, env: &dyn Environment) {
    if config.doc.is_empty() {
        return;
    }
    env.set_var(DOC_PATHS_VAR, &resolve_doc_paths(&config.doc, base));
}

/// Reads `CLAUDEX_DOC_PATHS` back into individual paths.
pub fn doc_paths_from_env(env: &dyn Environment) -> Vec<PathBuf> {
    env.get_var(DOC_PATHS_VAR)
        .map(|value| {
            value
                .split(':')
                .filter(|part| !part.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}
