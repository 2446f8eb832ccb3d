//! Error types for claudex-core operations.
//!
//! Absence of a metadata or counter file is never an error; only content
//! that is present but unusable is.

use std::num::ParseIntError;
use std::path::PathBuf;

/// All errors that can occur in claudex-core operations.
#[derive(Debug, thiserror::Error)]
pub enum ClaudexError {
    // ─────────────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("{var} is set but directory does not exist: {}", path.display())]
    OverrideMissing { var: String, path: PathBuf },

    #[error("Session description cannot be empty")]
    EmptyDescription,

    #[error("Slug generation failed: {0}")]
    SlugGeneration(String),

    // ─────────────────────────────────────────────────────────────────────
    // Content Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("invalid integer in {}: {content:?}: {source}", path.display())]
    MalformedContent {
        path: PathBuf,
        content: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Configuration file malformed: {}: {details}", path.display())]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Preferences malformed: {}: {source}", path.display())]
    PreferencesMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Settings malformed: {context}: {source}")]
    SettingsMalformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Setup Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("claudex config directory not found at {} (run the installer first)", .0.display())]
    UserConfigMissing(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClaudexError {
    /// Wraps an I/O error with the operation that triggered it.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ClaudexError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using ClaudexError.
pub type Result<T> = std::result::Result<T, ClaudexError>;

impl From<ClaudexError> for String {
    fn from(err: ClaudexError) -> String {
        err.to_string()
    }
}
