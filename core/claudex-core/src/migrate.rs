//! Normalizes a project onto the `.claudex/` layout.
//!
//! Creating the root and the default config are hard requirements. Moving
//! legacy `sessions/`, `logs/` and `.claudex.toml` into place is best-effort:
//! each failure is logged, recorded in the [`MigrationReport`] with the
//! operation and path, and the run continues.
//!
//! Running the migrator again with nothing changed is a no-op.

use crate::config::DEFAULT_CONFIG_CONTENT;
use crate::error::{ClaudexError, Result};
use crate::sessions::{move_dir, MoveOutcome};
use crate::storage::{atomic_write, StorageConfig};
use fs_err as fs;
use std::fmt;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A recoverable failure during migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationWarning {
    pub operation: String,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for MigrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.operation, self.path.display(), self.message)
    }
}

/// A legacy directory moved into the canonical layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
    pub outcome: MoveOutcome,
}

/// What a migration run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub created_root: bool,
    pub created_config: bool,
    pub relocated: Vec<Relocation>,
    pub legacy_config_migrated: bool,
    pub warnings: Vec<MigrationWarning>,
}

impl MigrationReport {
    /// True if the run touched nothing on disk.
    pub fn is_noop(&self) -> bool {
        !self.created_root
            && !self.created_config
            && self.relocated.is_empty()
            && !self.legacy_config_migrated
    }

    fn warn(&mut self, operation: &str, path: &Path, message: impl Into<String>) {
        let warning = MigrationWarning {
            operation: operation.to_string(),
            path: path.to_path_buf(),
            message: message.into(),
        };
        tracing::warn!(
            operation = %warning.operation,
            path = %warning.path.display(),
            "Migration step skipped: {}",
            warning.message
        );
        self.warnings.push(warning);
    }
}

pub struct Migrator {
    storage: StorageConfig,
}

impl Migrator {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    /// Runs every migration step in order.
    pub fn run(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport {
            created_root: self.ensure_root()?,
            created_config: self.ensure_default_config()?,
            ..MigrationReport::default()
        };

        self.relocate_dir(
            "relocate sessions",
            &self.storage.legacy_sessions_dir(),
            &self.storage.sessions_dir(),
            &mut report,
        );
        self.relocate_dir(
            "relocate logs",
            &self.storage.legacy_logs_dir(),
            &self.storage.logs_dir(),
            &mut report,
        );
        self.migrate_legacy_config(&mut report);

        if !report.is_noop() {
            tracing::info!(
                relocated = report.relocated.len(),
                warnings = report.warnings.len(),
                "Migrated project layout"
            );
        }
        Ok(report)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Required Steps
    // ─────────────────────────────────────────────────────────────────────────────

    fn ensure_root(&self) -> Result<bool> {
        let root = self.storage.root();
        if root.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&root)
            .map_err(|e| ClaudexError::io("create .claudex directory", e))?;
        tracing::info!(path = %root.display(), "Created claudex directory");
        Ok(true)
    }

    /// Writes the default config unless a file is already there.
    fn ensure_default_config(&self) -> Result<bool> {
        let path = self.storage.config_file();
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path);

        let mut file = match file {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(ClaudexError::io("create default config", e)),
        };
        file.write_all(DEFAULT_CONFIG_CONTENT.as_bytes())
            .map_err(|e| ClaudexError::io("write default config", e))?;

        tracing::info!(path = %path.display(), "Created default config");
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Legacy Steps
    // ─────────────────────────────────────────────────────────────────────────────

    fn relocate_dir(&self, operation: &str, source: &Path, dest: &Path, report: &mut MigrationReport) {
        if !source.is_dir() {
            return;
        }
        if dest.exists() {
            report.warn(
                operation,
                source,
                format!("{} already exists, leaving legacy directory in place", dest.display()),
            );
            return;
        }

        match move_dir(source, dest) {
            Ok(outcome) => {
                tracing::info!(from = %source.display(), to = %dest.display(), ?outcome, "Relocated legacy directory");
                report.relocated.push(Relocation {
                    from: source.to_path_buf(),
                    to: dest.to_path_buf(),
                    outcome,
                });
            }
            Err(e) => report.warn(operation, source, e.to_string()),
        }
    }

    fn migrate_legacy_config(&self, report: &mut MigrationReport) {
        const OPERATION: &str = "migrate legacy config";
        let legacy = self.storage.legacy_config_file();
        if !legacy.is_file() {
            return;
        }

        let content = match fs::read_to_string(&legacy) {
            Ok(content) => content,
            Err(e) => return report.warn(OPERATION, &legacy, e.to_string()),
        };

        let target = self.storage.config_file();
        if let Err(e) = atomic_write(&target, &content) {
            return report.warn(OPERATION, &target, e.to_string());
        }
        report.legacy_config_migrated = true;

        if let Err(e) = fs::remove_file(&legacy) {
            return report.warn(OPERATION, &legacy, e.to_string());
        }
        tracing::info!(from = %legacy.display(), to = %target.display(), "Migrated legacy config");
    }
}
