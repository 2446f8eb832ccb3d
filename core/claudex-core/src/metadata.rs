//! Per-session metadata files.
//!
//! Each field lives in its own dotfile inside the session directory. A
//! missing file reads as an empty string; values are trimmed on read and
//! written verbatim.
//!
//! An empty session path denotes an ephemeral session. Reads return empty
//! metadata and writes succeed without touching the filesystem.

use crate::error::{ClaudexError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use fs_err as fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DESCRIPTION_FILE: &str = ".description";
pub const CREATED_FILE: &str = ".created";
pub const LAST_USED_FILE: &str = ".last_used";

/// The three metadata fields of a session, as stored (trimmed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    pub description: String,
    pub created: String,
    pub last_used: String,
}

impl SessionMetadata {
    /// `last_used`, falling back to `created` when absent.
    pub fn last_used_or_created(&self) -> &str {
        if self.last_used.is_empty() {
            &self.created
        } else {
            &self.last_used
        }
    }

    /// Parsed effective last-used instant, if either timestamp is valid.
    pub fn effective_last_used(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_used).or_else(|| parse_timestamp(&self.created))
    }
}

/// Formats an instant the way metadata files store it (`2024-01-15T14:00:00Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an RFC 3339 timestamp; empty or invalid text yields `None`.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ─────────────────────────────────────────────────────────────────────────────
// Reading
// ─────────────────────────────────────────────────────────────────────────────

/// Reads all metadata fields of a session directory.
pub fn read_metadata(session_path: &Path) -> Result<SessionMetadata> {
    Ok(SessionMetadata {
        description: read_description(session_path)?,
        created: read_created(session_path)?,
        last_used: read_last_used(session_path)?,
    })
}

pub fn read_description(session_path: &Path) -> Result<String> {
    read_field(session_path, DESCRIPTION_FILE)
}

pub fn read_created(session_path: &Path) -> Result<String> {
    read_field(session_path, CREATED_FILE)
}

pub fn read_last_used(session_path: &Path) -> Result<String> {
    read_field(session_path, LAST_USED_FILE)
}

/// Reads a trimmed text file from the session directory.
/// Absence (of the directory or the file) is an empty value.
pub(crate) fn read_field(session_path: &Path, file_name: &str) -> Result<String> {
    if is_ephemeral(session_path) {
        return Ok(String::new());
    }
    let path = session_path.join(file_name);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(content.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ClaudexError::io("read session metadata", e)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Writing
// ─────────────────────────────────────────────────────────────────────────────

/// Records `now` as the session's last-used instant.
pub fn touch(session_path: &Path, now: DateTime<Utc>) -> Result<()> {
    write_field(session_path, LAST_USED_FILE, &format_timestamp(now))
}

/// Stores the description verbatim.
pub fn write_description(session_path: &Path, description: &str) -> Result<()> {
    write_field(session_path, DESCRIPTION_FILE, description)
}

/// Stores the creation instant.
pub fn write_created(session_path: &Path, at: DateTime<Utc>) -> Result<()> {
    write_field(session_path, CREATED_FILE, &format_timestamp(at))
}

pub(crate) fn write_field(session_path: &Path, file_name: &str, content: &str) -> Result<()> {
    if is_ephemeral(session_path) {
        return Ok(());
    }
    fs::write(session_path.join(file_name), content)
        .map_err(|e| ClaudexError::io("write session metadata", e))
}

/// An empty path denotes a session that is never persisted.
pub fn is_ephemeral(session_path: &Path) -> bool {
    session_path.as_os_str().is_empty()
}
