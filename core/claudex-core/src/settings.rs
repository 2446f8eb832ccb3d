//! Reconciling generated hook settings with a user's `settings.local.json`.
//!
//! The merge only ever adds hooks. Permissions, unknown keys at any level
//! and any hook the user wrote are carried through untouched. Hooks are keyed by
//! command string within one event type, so re-running the merge with the
//! same template is a fixed point.

use crate::error::{ClaudexError, Result};
use crate::storage::atomic_write;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::Path;

/// Top-level settings document.
///
/// Only `hooks` is interpreted. `permissions` and every other key live in
/// `other` and are written back exactly as read, explicit nulls included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<BTreeMap<String, Vec<HookGroup>>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Hooks sharing one matcher under an event type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookGroup {
    #[serde(default)]
    pub hooks: Vec<HookEntry>,
    /// `matcher` and any other keys of the group.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl HookGroup {
    pub fn matcher(&self) -> Option<&str> {
        self.other.get("matcher").and_then(Value::as_str)
    }

    /// Matcher text; an absent or null matcher compares equal to `""`.
    fn matcher_key(&self) -> &str {
        self.matcher().unwrap_or("")
    }

    /// An empty group carrying `template`'s matcher value, if it has one.
    fn with_matcher_of(template: &HookGroup) -> Self {
        let mut other = BTreeMap::new();
        if let Some(matcher) = template.other.get("matcher") {
            other.insert("matcher".to_string(), matcher.clone());
        }
        Self {
            hooks: Vec::new(),
            other,
        }
    }
}

/// One hook entry, kept as the raw JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookEntry {
    pub fields: BTreeMap<String, Value>,
}

impl HookEntry {
    pub fn hook_type(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }

    pub fn command(&self) -> Option<&str> {
        self.fields.get("command").and_then(Value::as_str)
    }

    fn command_key(&self) -> &str {
        self.command().unwrap_or("")
    }
}

/// What [`install_settings`] did to the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsInstall {
    Created,
    Updated,
    Unchanged,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Merge
// ═══════════════════════════════════════════════════════════════════════════════

/// Adds every template hook missing from `existing` and returns the result
/// as pretty-printed JSON.
///
/// The template is always validated. A blank `existing` returns the template
/// text unchanged.
pub fn merge_settings(template: &str, existing: &str) -> Result<String> {
    let template_doc = parse_document(template, "parse template settings")?;

    if existing.trim().is_empty() {
        return Ok(template.to_string());
    }

    let mut result = parse_document(existing, "parse existing settings")?;
    merge_hooks(&mut result, &template_doc);

    serde_json::to_string_pretty(&result).map_err(|source| ClaudexError::SettingsMalformed {
        context: "serialize merged settings".to_string(),
        source,
    })
}

fn parse_document(content: &str, context: &str) -> Result<SettingsDocument> {
    serde_json::from_str(content).map_err(|source| ClaudexError::SettingsMalformed {
        context: context.to_string(),
        source,
    })
}

fn merge_hooks(result: &mut SettingsDocument, template: &SettingsDocument) {
    let template_hooks = match &template.hooks {
        Some(hooks) if !hooks.is_empty() => hooks,
        _ => return,
    };
    let hooks = result.hooks.get_or_insert_with(BTreeMap::new);

    for (hook_type, template_groups) in template_hooks {
        let groups = hooks.entry(hook_type.clone()).or_default();

        let mut present: HashSet<String> = groups
            .iter()
            .flat_map(|group| group.hooks.iter())
            .map(|hook| hook.command_key().to_string())
            .collect();

        for template_group in template_groups {
            for template_hook in &template_group.hooks {
                if present.contains(template_hook.command_key()) {
                    continue;
                }

                match groups.first_mut() {
                    Some(first) if first.matcher_key() == template_group.matcher_key() => {
                        first.hooks.push(template_hook.clone());
                    }
                    _ => {
                        let mut group = HookGroup::with_matcher_of(template_group);
                        group.hooks.push(template_hook.clone());
                        groups.push(group);
                    }
                }

                present.insert(template_hook.command_key().to_string());
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Installation
// ═══════════════════════════════════════════════════════════════════════════════

/// Merges `template` into the settings file at `path` and writes the result
/// atomically. A corrupt existing file is reported and left as it is.
pub fn install_settings(path: &Path, template: &str) -> Result<SettingsInstall> {
    let existing = match fs_err::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(ClaudexError::io("read settings", e)),
    };

    let merged = merge_settings(template, existing.as_deref().unwrap_or(""))?;

    let outcome = match &existing {
        Some(current) if *current == merged => return Ok(SettingsInstall::Unchanged),
        Some(_) => SettingsInstall::Updated,
        None => SettingsInstall::Created,
    };

    atomic_write(path, &merged)?;
    tracing::info!(path = %path.display(), outcome = ?outcome, "Installed settings");
    Ok(outcome)
}

/// Number of hook entries per event type.
pub fn hook_counts(content: &str) -> Result<BTreeMap<String, usize>> {
    let doc = parse_document(content, "parse settings")?;
    Ok(doc
        .hooks
        .unwrap_or_default()
        .into_iter()
        .map(|(hook_type, groups)| {
            let count = groups.iter().map(|group| group.hooks.len()).sum();
            (hook_type, count)
        })
        .collect())
}
