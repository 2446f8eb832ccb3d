//! Remembered answers to setup prompts, stored in `.claudex/preferences.json`.

use crate::error::{ClaudexError, Result};
use crate::storage::atomic_write;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// The user declined installing hooks into `.claude/`.
    #[serde(default)]
    pub hook_setup_declined: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_setup_declined_at: Option<String>,
    /// The user declined registering MCP servers.
    #[serde(default)]
    pub mcp_setup_declined: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_setup_declined_at: Option<String>,
    /// Keys written by other versions.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Reads preferences, returning defaults when the file does not exist.
pub fn load_preferences(path: &Path) -> Result<Preferences> {
    let content = match fs_err::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Preferences::default()),
        Err(e) => return Err(ClaudexError::io("read preferences", e)),
    };

    serde_json::from_str(&content).map_err(|source| ClaudexError::PreferencesMalformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes preferences as indented JSON through a temp file and rename.
pub fn save_preferences(path: &Path, preferences: &Preferences) -> Result<()> {
    let content = serde_json::to_string_pretty(preferences).map_err(|source| {
        ClaudexError::PreferencesMalformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    atomic_write(path, &content)?;
    tracing::debug!(path = %path.display(), "Saved preferences");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let prefs = load_preferences(&temp.path().join("preferences.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_save_creates_dir_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".claudex").join("preferences.json");
        let prefs = Preferences {
            hook_setup_declined: true,
            hook_setup_declined_at: Some("2024-01-15T14:00:00Z".to_string()),
            ..Default::default()
        };

        save_preferences(&path, &prefs).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"hookSetupDeclined\": true"));
        assert_eq!(load_preferences(&path).unwrap(), prefs);
        // No temp files left next to it
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        std::fs::write(&path, r#"{"mcpSetupDeclined": true, "theme": "dark"}"#).unwrap();

        let prefs = load_preferences(&path).unwrap();
        save_preferences(&path, &prefs).unwrap();

        let reloaded = load_preferences(&path).unwrap();
        assert!(reloaded.mcp_setup_declined);
        assert_eq!(reloaded.other["theme"], "dark");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        std::fs::write(&path, "{ nope").unwrap();

        let result = load_preferences(&path);

        assert!(matches!(result, Err(ClaudexError::PreferencesMalformed { .. })));
    }
}
