//! Session context for subagent prompts.
//!
//! Handles the assistant's `PreToolUse` hook. When the tool is `Task`, the
//! subagent prompt is prefixed with the active session folder, what it
//! already holds and the configured documentation paths, so subagents write
//! their output into the session instead of the project tree. Every other
//! case, including any failure, lets the tool call through unchanged.

use crate::config::doc_paths_from_env;
use crate::env::Environment;
use crate::error::Result;
use crate::sessions::SessionStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Tool whose prompts receive session context.
pub const TASK_TOOL: &str = "Task";
/// Written by the documentation hooks; listed instead of the folder contents.
pub const SESSION_OVERVIEW_FILE: &str = "session-overview.md";

/// Hook payload the assistant sends on stdin before running a tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreToolUseInput {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Map<String, Value>,
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Hook response written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub permission_decision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<Map<String, Value>>,
}

impl HookOutput {
    /// Allow the tool call as requested.
    pub fn allow() -> Self {
        Self::allow_with(None)
    }

    fn allow_with(updated_input: Option<Map<String, Value>>) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: "PreToolUse".to_string(),
                permission_decision: "allow".to_string(),
                updated_input,
            },
        }
    }
}

/// Injects session context into a `Task` prompt; allows everything else as is.
pub fn inject_session_context(
    store: &SessionStore,
    env: &dyn Environment,
    input: &PreToolUseInput,
) -> HookOutput {
    if input.tool_name != TASK_TOOL {
        tracing::debug!(tool = %input.tool_name, "Not a Task tool, passing through");
        return HookOutput::allow();
    }

    let session_path = match store.locate(&input.session_id) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "No session folder, passing through");
            return HookOutput::allow();
        }
    };

    let prompt = match input.tool_input.get("prompt").and_then(Value::as_str) {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            tracing::debug!("Task input has no prompt, passing through");
            return HookOutput::allow();
        }
    };

    let doc_paths = doc_paths_from_env(env);
    let project_root = input.cwd.as_deref().filter(|cwd| !cwd.is_empty()).map(Path::new);

    let context = match build_session_context(store, &session_path, &doc_paths, project_root) {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, session = %session_path.display(), "Failed to build session context");
            return HookOutput::allow();
        }
    };

    let mut updated = input.tool_input.clone();
    updated.insert(
        "prompt".to_string(),
        Value::String(format!("{}\n\n---\n\n## ORIGINAL REQUEST\n\n{}", context, prompt)),
    );

    tracing::info!(session = %session_path.display(), "Injected session context into Task prompt");
    HookOutput::allow_with(Some(updated))
}

/// Markdown block describing the session folder to a subagent.
pub fn build_session_context(
    store: &SessionStore,
    session_path: &Path,
    doc_paths: &[PathBuf],
    project_root: Option<&Path>,
) -> Result<String> {
    let mut out = String::new();

    out.push_str("## SESSION CONTEXT (CRITICAL)\n\n");
    out.push_str(
        "You are working within an active Claudex session. \
         ALL documentation, plans, and artifacts MUST be created in the session folder.\n\n",
    );
    let _ = write!(
        out,
        "**Session Folder (Absolute Path)**: `{}`\n\n",
        session_path.display()
    );

    out.push_str("### MANDATORY RULES for Documentation:\n");
    out.push_str("1. ✅ ALWAYS save documentation to the session folder above\n");
    out.push_str("2. ✅ Use absolute paths when creating files (Write/Edit tools)\n");
    out.push_str("3. ✅ Before exploring the codebase, check the session folder for existing context\n");
    out.push_str("4. ❌ NEVER save documentation to project root or arbitrary locations\n");
    out.push_str("5. ❌ NEVER use relative paths for documentation files\n\n");

    out.push_str("### Session Folder Contents:\n");
    let overview = session_path.join(SESSION_OVERVIEW_FILE);
    if overview.is_file() {
        let _ = writeln!(out, "- {}", overview.display());
    } else {
        let files = store.list_artifacts(session_path)?;
        if files.is_empty() {
            out.push_str("(empty)\n");
        }
        for file in files {
            let _ = writeln!(out, "- {}", file);
        }
    }

    if project_root.map_or(false, has_index_files) {
        out.push_str("\n### Codebase Navigation:\n");
        out.push_str(
            "This project contains index.md files. Use them for quick codebase understanding \
             instead of extensive Glob/Grep searches.\n",
        );
    }

    if !doc_paths.is_empty() {
        out.push_str("\n### Recommended File Names:\n");
        for path in doc_paths {
            let _ = writeln!(out, "- {}", path.display());
        }
    }

    Ok(out)
}

/// True if any `index.md` exists under `root`, skipping hidden directories.
fn has_index_files(root: &Path) -> bool {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_type().is_file() && entry.file_name() == "index.md")
}
