//! Session values returned by the store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A persisted session directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Directory name, `<slug>-<uuid>` (possibly with a collision suffix).
    pub name: String,
    pub path: PathBuf,
    /// Identifier minted for this session.
    pub id: String,
    pub description: String,
}

/// One entry of [`super::SessionStore::discover`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub path: PathBuf,
    pub description: String,
    /// Raw `.created` content (trimmed), empty when absent.
    pub created: String,
    /// Raw `.last_used` content, falling back to `.created`.
    pub last_used: String,
    /// Parsed form of `last_used`, `None` when neither timestamp parses.
    pub last_used_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Embedded identifier, empty when the name carries none.
    pub fn id(&self) -> String {
        crate::identity::extract_id(&self.name)
    }
}
