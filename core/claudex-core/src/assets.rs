//! Installs claudex hook scripts, agent profiles and hook settings into a
//! project's `.claude/` directory.
//!
//! Sources live in the user config directory:
//!
//! ```text
//! ~/.config/claudex/
//! ├── hooks/              → .claude/hooks/
//! ├── profiles/agents/*   → .claude/agents/<name>.md
//! │                         .claude/commands/agents/<name>.md
//! └── settings.local.json → merged into .claude/settings.local.json
//! ```
//!
//! With `no_overwrite` set, files already in `.claude/` are kept as they are
//! and an existing settings file is not touched. A missing user config
//! directory is an error; every other failure is recorded as a warning and
//! the remaining steps still run.

use crate::error::{ClaudexError, Result};
use crate::migrate::MigrationWarning;
use crate::sessions::{copy_dir_with, ExistingFiles};
use crate::settings::{install_settings, SettingsInstall};
use crate::storage::StorageConfig;
use fs_err as fs;
use std::path::Path;

/// What [`install_claude_assets`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    pub hooks_copied: usize,
    pub agents_written: usize,
    pub agents_kept: usize,
    /// `None` when the settings step was skipped.
    pub settings: Option<SettingsInstall>,
    pub warnings: Vec<MigrationWarning>,
}

impl AssetReport {
    fn warn(&mut self, operation: &str, path: &Path, message: impl Into<String>) {
        let warning = MigrationWarning {
            operation: operation.to_string(),
            path: path.to_path_buf(),
            message: message.into(),
        };
        tracing::warn!(
            operation = %warning.operation,
            path = %warning.path.display(),
            "Setup step skipped: {}",
            warning.message
        );
        self.warnings.push(warning);
    }
}

pub fn install_claude_assets(storage: &StorageConfig, no_overwrite: bool) -> Result<AssetReport> {
    let user_dir = storage.user_config_dir();
    if !user_dir.is_dir() {
        return Err(ClaudexError::UserConfigMissing(user_dir.to_path_buf()));
    }

    for dir in [
        storage.claude_hooks_dir(),
        storage.claude_agents_dir(),
        storage.claude_command_agents_dir(),
    ] {
        fs::create_dir_all(&dir).map_err(|e| ClaudexError::io("create .claude directories", e))?;
    }

    let existing = if no_overwrite {
        ExistingFiles::Keep
    } else {
        ExistingFiles::Overwrite
    };

    let mut report = AssetReport::default();
    copy_hooks(storage, existing, &mut report);
    copy_agent_profiles(storage, existing, &mut report);
    install_hook_settings(storage, no_overwrite, &mut report);

    tracing::info!(
        hooks = report.hooks_copied,
        agents = report.agents_written,
        kept = report.agents_kept,
        warnings = report.warnings.len(),
        "Installed claude assets"
    );
    Ok(report)
}

// ─────────────────────────────────────────────────────────────────────────────
// Steps
// ─────────────────────────────────────────────────────────────────────────────

fn copy_hooks(storage: &StorageConfig, existing: ExistingFiles, report: &mut AssetReport) {
    let source = storage.user_hooks_dir();
    if !source.is_dir() {
        report.warn("copy hooks", &source, "hooks directory not found");
        return;
    }

    let target = storage.claude_hooks_dir();
    match copy_dir_with(&source, &target, existing) {
        Ok(copied) => report.hooks_copied = copied,
        Err(e) => {
            report.warn("copy hooks", &source, e.to_string());
            return;
        }
    }

    if let Err(e) = make_scripts_executable(&target) {
        report.warn("mark hook scripts executable", &target, e.to_string());
    }
}

fn copy_agent_profiles(storage: &StorageConfig, existing: ExistingFiles, report: &mut AssetReport) {
    let source = storage.user_agent_profiles_dir();
    let entries = match fs::read_dir(&source) {
        Ok(entries) => entries,
        Err(e) => {
            report.warn("copy agent profiles", &source, e.to_string());
            return;
        }
    };

    let targets = [storage.claude_agents_dir(), storage.claude_command_agents_dir()];

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || path.is_dir() {
            continue;
        }

        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                report.warn("read agent profile", &path, e.to_string());
                continue;
            }
        };

        let file_name = profile_file_name(&name);
        for dir in &targets {
            let target = dir.join(&file_name);
            if existing == ExistingFiles::Keep && target.exists() {
                report.agents_kept += 1;
                continue;
            }
            match fs::write(&target, &content) {
                Ok(()) => report.agents_written += 1,
                Err(e) => report.warn("write agent profile", &target, e.to_string()),
            }
        }
    }
}

fn install_hook_settings(storage: &StorageConfig, no_overwrite: bool, report: &mut AssetReport) {
    let settings = storage.settings_file();
    if no_overwrite && settings.exists() {
        tracing::debug!(path = %settings.display(), "Keeping existing settings");
        return;
    }

    let template_path = storage.settings_template_file();
    let template = match fs::read_to_string(&template_path) {
        Ok(template) => template,
        Err(e) => {
            report.warn("read settings template", &template_path, e.to_string());
            return;
        }
    };

    match install_settings(&settings, &template) {
        Ok(outcome) => report.settings = Some(outcome),
        Err(e) => report.warn("install settings", &settings, e.to_string()),
    }
}

/// Profiles are stored without an extension; the assistant wants `.md`.
fn profile_file_name(name: &str) -> String {
    if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{}.md", name)
    }
}

#[cfg(unix)]
fn make_scripts_executable(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let is_script = entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == "sh");
        if is_script {
            fs::set_permissions(entry.path(), std::fs::Permissions::from_mode(0o755))?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_scripts_executable(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
