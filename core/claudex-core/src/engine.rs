//! ClaudexEngine - the entry point for callers of claudex-core.
//!
//! Opening an engine brings the project onto the current layout, loads the
//! configuration and hands out a [`SessionStore`] wired to the project's
//! sessions directory.
//!
//! ```rust,ignore
//! use claudex_core::{ClaudexEngine, OsEnvironment, StorageConfig};
//! use std::sync::Arc;
//!
//! let engine = ClaudexEngine::open(StorageConfig::current()?, Arc::new(OsEnvironment))?;
//! for session in engine.sessions().discover()? {
//!     println!("{}", session.name);
//! }
//! ```

use crate::assets::{install_claude_assets, AssetReport};
use crate::config::{export_doc_paths, load_config, ClaudexConfig};
use crate::context::{inject_session_context, HookOutput, PreToolUseInput};
use crate::env::Environment;
use crate::error::{ClaudexError, Result};
use crate::logs::{adopt_session_log, log_file_name};
use crate::migrate::{MigrationReport, Migrator};
use crate::preferences::{load_preferences, save_preferences, Preferences};
use crate::providers::{Clock, IdGenerator};
use crate::sessions::{Session, SessionStore};
use crate::settings::{install_settings, SettingsInstall};
use crate::slug::SlugGenerator;
use crate::storage::StorageConfig;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct ClaudexEngine {
    storage: StorageConfig,
    env: Arc<dyn Environment>,
    config: ClaudexConfig,
    migration: MigrationReport,
    sessions: SessionStore,
}

impl ClaudexEngine {
    /// Migrates the project layout, creates the standard directories and
    /// loads the configuration.
    pub fn open(storage: StorageConfig, env: Arc<dyn Environment>) -> Result<Self> {
        let migration = Migrator::new(storage.clone()).run()?;

        // After migration, so a legacy tree still has somewhere to go.
        storage
            .ensure_dirs()
            .map_err(|e| ClaudexError::io("create claudex directories", e))?;

        let config = load_config(&storage.config_file())?;
        let sessions = SessionStore::new(storage.sessions_dir(), env.clone());

        Ok(Self {
            storage,
            env,
            config,
            migration,
            sessions,
        })
    }

    pub fn with_slug_generator(mut self, slugs: Arc<dyn SlugGenerator>) -> Self {
        self.sessions = self.sessions.with_slug_generator(slugs);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.sessions = self.sessions.with_id_generator(ids);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.sessions = self.sessions.with_clock(clock);
        self
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn config(&self) -> &ClaudexConfig {
        &self.config
    }

    /// Report from the migration run performed by [`ClaudexEngine::open`].
    pub fn migration(&self) -> &MigrationReport {
        &self.migration
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Tool Integration
    // ─────────────────────────────────────────────────────────────────────────────

    /// Publishes configured documentation paths, resolved against the project.
    pub fn export_doc_paths(&self) {
        export_doc_paths(&self.config, self.storage.project_dir(), self.env.as_ref());
    }

    /// Merges `template` into the project's settings file.
    pub fn install_settings(&self, template: &str) -> Result<SettingsInstall> {
        install_settings(&self.storage.settings_file(), template)
    }

    /// Merges the generated template from the user config directory into the
    /// project's settings file.
    pub fn install_default_settings(&self) -> Result<SettingsInstall> {
        let template_path = self.storage.settings_template_file();
        let template = fs_err::read_to_string(&template_path)
            .map_err(|e| ClaudexError::io("read settings template", e))?;
        self.install_settings(&template)
    }

    /// Installs hook scripts, agent profiles and hook settings into
    /// `.claude/`, keeping existing files when `no_overwrite` is configured.
    pub fn setup_claude_dir(&self) -> Result<AssetReport> {
        install_claude_assets(&self.storage, self.config.no_overwrite)
    }

    /// Answers a `PreToolUse` hook for the project's sessions.
    pub fn session_context(&self, input: &PreToolUseInput) -> HookOutput {
        inject_session_context(&self.sessions, self.env.as_ref(), input)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Preferences
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn preferences(&self) -> Result<Preferences> {
        load_preferences(&self.storage.preferences_file())
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        save_preferences(&self.storage.preferences_file(), preferences)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Logs
    // ─────────────────────────────────────────────────────────────────────────────

    /// Log file for a run started at `at`.
    pub fn run_log_path(&self, at: &DateTime<Local>) -> PathBuf {
        self.storage.logs_dir().join(log_file_name(at))
    }

    /// Moves the run log to the session's log. See [`adopt_session_log`].
    pub fn adopt_log(&self, current_log: &Path, session: &Session) -> Option<PathBuf> {
        adopt_session_log(current_log, &session.name, &session.path, self.env.as_ref())
    }
}
