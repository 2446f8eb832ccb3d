//! Storage configuration and path management for claudex.
//!
//! Every path the engine touches is derived from a `StorageConfig`:
//!
//! - the project directory the tool was launched in,
//! - the canonical `.claudex/` root beneath it,
//! - the legacy flat layout that predates `.claudex/`,
//! - the per-user config directory holding the generated settings template.
//!
//! Tests use `StorageConfig::with_root(temp_dir)` for isolation.

use crate::error::{ClaudexError, Result};
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the canonical root directory inside a project.
pub const CLAUDEX_DIR: &str = ".claudex";

/// Central configuration for all claudex storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project directory (the canonical root lives at `<project>/.claudex`)
    project_dir: PathBuf,
    /// Per-user claudex config directory (default: ~/.config/claudex)
    user_config_dir: PathBuf,
}

impl StorageConfig {
    /// Creates a StorageConfig for a project, resolving the per-user config
    /// directory from the platform config location.
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let user_config_dir = dirs::config_dir()
            .unwrap_or_else(|| project_dir.join(".config"))
            .join("claudex");
        Self {
            project_dir,
            user_config_dir,
        }
    }

    /// Creates a StorageConfig rooted at the current working directory.
    pub fn current() -> std::io::Result<Self> {
        Ok(Self::for_project(std::env::current_dir()?))
    }

    /// Creates a StorageConfig with a custom project directory whose user
    /// config directory also lives inside it.
    /// Used for testing with temp directories.
    pub fn with_root(project_dir: PathBuf) -> Self {
        let user_config_dir = project_dir.join(".config").join("claudex");
        Self {
            project_dir,
            user_config_dir,
        }
    }

    /// Creates a StorageConfig with both custom project and user config dirs.
    pub fn with_roots(project_dir: PathBuf, user_config_dir: PathBuf) -> Self {
        Self {
            project_dir,
            user_config_dir,
        }
    }

    /// Returns the project directory.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the per-user claudex config directory.
    pub fn user_config_dir(&self) -> &Path {
        &self.user_config_dir
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Canonical Layout
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to the canonical root (`<project>/.claudex`).
    pub fn root(&self) -> PathBuf {
        self.project_dir.join(CLAUDEX_DIR)
    }

    /// Path to config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.root().join("config.toml")
    }

    /// Path to sessions/ directory (one subdirectory per session).
    pub fn sessions_dir(&self) -> PathBuf {
        self.root().join("sessions")
    }

    /// Path to logs/ directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root().join("logs")
    }

    /// Path to preferences.json (remembered answers to setup prompts).
    pub fn preferences_file(&self) -> PathBuf {
        self.root().join("preferences.json")
    }

    /// Path to a named session directory.
    pub fn session_dir(&self, name: &str) -> PathBuf {
        self.sessions_dir().join(name)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Legacy Layout (migration sources)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Legacy top-level sessions/ directory.
    pub fn legacy_sessions_dir(&self) -> PathBuf {
        self.project_dir.join("sessions")
    }

    /// Legacy top-level logs/ directory.
    pub fn legacy_logs_dir(&self) -> PathBuf {
        self.project_dir.join("logs")
    }

    /// Legacy flat config file.
    pub fn legacy_config_file(&self) -> PathBuf {
        self.project_dir.join(".claudex.toml")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Tool Integration
    // ─────────────────────────────────────────────────────────────────────────────

    /// Project settings file the assistant reads its hooks from.
    pub fn settings_file(&self) -> PathBuf {
        self.claude_dir().join("settings.local.json")
    }

    /// Generated settings template installed alongside the hook scripts.
    pub fn settings_template_file(&self) -> PathBuf {
        self.user_config_dir.join("settings.local.json")
    }

    /// The assistant's per-project directory (`<project>/.claude`).
    pub fn claude_dir(&self) -> PathBuf {
        self.project_dir.join(".claude")
    }

    pub fn claude_hooks_dir(&self) -> PathBuf {
        self.claude_dir().join("hooks")
    }

    pub fn claude_agents_dir(&self) -> PathBuf {
        self.claude_dir().join("agents")
    }

    /// Agent profiles exposed as slash commands.
    pub fn claude_command_agents_dir(&self) -> PathBuf {
        self.claude_dir().join("commands").join("agents")
    }

    /// Hook scripts installed in the user config directory.
    pub fn user_hooks_dir(&self) -> PathBuf {
        self.user_config_dir.join("hooks")
    }

    /// Agent profiles installed in the user config directory.
    pub fn user_agent_profiles_dir(&self) -> PathBuf {
        self.user_config_dir.join("profiles").join("agents")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directory Creation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Ensures the canonical root and its standard subdirectories exist.
    ///
    /// Call this after migration: creating `sessions/` first would make the
    /// migrator skip a legacy `sessions/` tree.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(self.root())?;
        fs::create_dir_all(self.sessions_dir())?;
        fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

/// Writes `contents` to `path` through a temp file in the same directory
/// and an atomic rename, creating the parent directory if needed.
pub(crate) fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .map_err(|e| ClaudexError::io(format!("creating {}", dir.display()), e))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| ClaudexError::io(format!("creating temp file in {}", dir.display()), e))?;

    tmp.write_all(contents.as_bytes())
        .map_err(|e| ClaudexError::io(format!("writing temp file for {}", path.display()), e))?;

    tmp.flush()
        .map_err(|e| ClaudexError::io(format!("flushing temp file for {}", path.display()), e))?;

    tmp.persist(path).map_err(|e| {
        ClaudexError::io(format!("persisting temp file to {}", path.display()), e.error)
    })?;

    Ok(())
}
