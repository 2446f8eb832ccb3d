//! Subcommand implementations.
//!
//! Each command writes its human-readable result to `out` and returns
//! errors as strings for `main` to log.

use claudex_core::config::resolve_doc_paths;
use claudex_core::counter::{increment_counter, read_counter, read_last_processed_line, reset_counter};
use claudex_core::metadata::format_timestamp;
use claudex_core::{ClaudexEngine, MigrationReport, PreToolUseInput, Session, SettingsInstall};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

fn write_line(out: &mut dyn Write, line: impl AsRef<str>) -> Result<(), String> {
    writeln!(out, "{}", line.as_ref()).map_err(|e| format!("Failed to write output: {}", e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

pub fn migrate(report: &MigrationReport, out: &mut dyn Write) -> Result<(), String> {
    if report.is_noop() && report.warnings.is_empty() {
        return write_line(out, "Layout is up to date");
    }
    if report.created_root {
        write_line(out, "Created .claudex directory")?;
    }
    if report.created_config {
        write_line(out, "Created default config.toml")?;
    }
    for relocation in &report.relocated {
        write_line(
            out,
            format!(
                "Moved {} -> {}",
                relocation.from.display(),
                relocation.to.display()
            ),
        )?;
    }
    if report.legacy_config_migrated {
        write_line(out, "Migrated .claudex.toml into .claudex/config.toml")?;
    }
    for warning in &report.warnings {
        write_line(out, format!("warning: {}", warning))?;
    }
    Ok(())
}

pub fn config(engine: &ClaudexEngine, out: &mut dyn Write) -> Result<(), String> {
    let rendered = toml::to_string_pretty(engine.config())
        .map_err(|e| format!("Failed to render config: {}", e))?;
    write!(out, "{}", rendered).map_err(|e| format!("Failed to write output: {}", e))?;

    let doc_paths = resolve_doc_paths(&engine.config().doc, engine.storage().project_dir());
    if !doc_paths.is_empty() {
        write_line(out, format!("# CLAUDEX_DOC_PATHS={}", doc_paths))?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

pub fn list(engine: &ClaudexEngine, json: bool, out: &mut dyn Write) -> Result<(), String> {
    let sessions = engine.sessions().discover()?;

    if json {
        let rendered = serde_json::to_string_pretty(&sessions)
            .map_err(|e| format!("Failed to render sessions: {}", e))?;
        return write_line(out, rendered);
    }

    if sessions.is_empty() {
        return write_line(out, "No sessions");
    }
    for session in sessions {
        let when = session
            .last_used_at
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        write_line(
            out,
            format!("{:<20}  {}  {}", when, session.name, session.description),
        )?;
    }
    Ok(())
}

pub fn new(
    engine: &ClaudexEngine,
    description: &str,
    log_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let session = engine.sessions().create(description)?;
    report_session(engine, "Created", &session, log_file, out)
}

pub fn resume(
    engine: &ClaudexEngine,
    name: &str,
    log_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let session = engine.sessions().resume(name)?;
    report_session(engine, "Resumed", &session, log_file, out)
}

pub fn fork(
    engine: &ClaudexEngine,
    name: &str,
    description: Option<&str>,
    log_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let session = match description {
        Some(description) => engine.sessions().fork_with_description(name, description)?,
        None => engine.sessions().fork(name)?,
    };
    report_session(engine, "Forked", &session, log_file, out)
}

pub fn fresh(
    engine: &ClaudexEngine,
    name: &str,
    log_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let session = engine.sessions().fresh_memory(name)?;
    report_session(engine, "Started fresh", &session, log_file, out)
}

pub fn locate(engine: &ClaudexEngine, id: &str, out: &mut dyn Write) -> Result<(), String> {
    let path = engine.sessions().locate(id)?;
    write_line(out, path.display().to_string())
}

fn report_session(
    engine: &ClaudexEngine,
    verb: &str,
    session: &Session,
    log_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), String> {
    if let Some(log) = log_file {
        engine.adopt_log(log, session);
    }
    write_line(out, format!("{}: {}", verb, session.name))?;
    write_line(out, session.path.display().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Counters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Show,
    Increment,
    Reset,
}

pub fn counter(
    engine: &ClaudexEngine,
    id: &str,
    action: CounterAction,
    out: &mut dyn Write,
) -> Result<(), String> {
    let path = engine.sessions().locate(id)?;
    match action {
        CounterAction::Show => {
            let count = read_counter(&path)?;
            let line = read_last_processed_line(&path)?;
            write_line(out, format!("counter={} last_processed_line={}", count, line))
        }
        CounterAction::Increment => {
            let count = increment_counter(&path)?;
            write_line(out, format!("counter={}", count))
        }
        CounterAction::Reset => {
            reset_counter(&path)?;
            write_line(out, "counter=0")
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub fn merge_settings(
    engine: &ClaudexEngine,
    template: Option<PathBuf>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let outcome = match template {
        Some(path) => {
            let content = fs_err::read_to_string(&path).map_err(|e| e.to_string())?;
            engine.install_settings(&content)?
        }
        None => engine.install_default_settings()?,
    };

    let settings = engine.storage().settings_file();
    write_line(out, format!("{}: {}", install_verb(outcome), settings.display()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Project Setup
// ─────────────────────────────────────────────────────────────────────────────

pub fn setup(engine: &ClaudexEngine, decline: bool, out: &mut dyn Write) -> Result<(), String> {
    let mut preferences = engine.preferences()?;

    if decline {
        preferences.hook_setup_declined = true;
        preferences.hook_setup_declined_at = Some(format_timestamp(chrono::Utc::now()));
        engine.save_preferences(&preferences)?;
        return write_line(out, "Hook setup declined; run `setup` to install later");
    }

    let report = engine.setup_claude_dir()?;
    if preferences.hook_setup_declined {
        preferences.hook_setup_declined = false;
        preferences.hook_setup_declined_at = None;
        engine.save_preferences(&preferences)?;
    }

    write_line(out, format!("Hooks copied: {}", report.hooks_copied))?;
    write_line(
        out,
        format!(
            "Agent profiles written: {} (kept {})",
            report.agents_written, report.agents_kept
        ),
    )?;
    if let Some(outcome) = report.settings {
        write_line(out, format!("Settings: {}", install_verb(outcome)))?;
    }
    for warning in &report.warnings {
        write_line(out, format!("warning: {}", warning))?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// Answers a `PreToolUse` hook: reads its JSON payload, writes the response.
pub fn pre_tool_use(
    engine: &ClaudexEngine,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut payload = String::new();
    input
        .read_to_string(&mut payload)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;

    if payload.trim().is_empty() {
        return Ok(());
    }

    let hook_input: PreToolUseInput = serde_json::from_str(&payload)
        .map_err(|e| format!("Failed to parse hook input: {}", e))?;
    let output = engine.session_context(&hook_input);

    let rendered = serde_json::to_string(&output)
        .map_err(|e| format!("Failed to render hook output: {}", e))?;
    write_line(out, rendered)
}

fn install_verb(outcome: SettingsInstall) -> &'static str {
    match outcome {
        SettingsInstall::Created => "Created",
        SettingsInstall::Updated => "Updated",
        SettingsInstall::Unchanged => "Unchanged",
    }
}
