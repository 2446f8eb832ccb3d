//! Environment variable access.
//!
//! The session store and log adoption read and write a handful of
//! `CLAUDEX_*` variables. They go through [`Environment`] so callers can pass
//! an in-memory map instead of touching process-global state.

use std::collections::HashMap;
use std::sync::Mutex;

/// Override location for the active session directory.
pub const SESSION_PATH_VAR: &str = "CLAUDEX_SESSION_PATH";
/// Colon-separated documentation path hints.
pub const DOC_PATHS_VAR: &str = "CLAUDEX_DOC_PATHS";
/// Path of the log file for the current invocation.
pub const LOG_FILE_VAR: &str = "CLAUDEX_LOG_FILE";

/// Key-value access to environment-style configuration.
pub trait Environment: Send + Sync {
    /// Returns the value of a variable, or `None` if it is not set.
    fn get_var(&self, name: &str) -> Option<String>;

    /// Sets a variable.
    fn set_var(&self, name: &str, value: &str);

    /// Removes a variable.
    fn remove_var(&self, name: &str);
}

/// Process environment backed by [`std::env`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEnvironment;

impl Environment for OsEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_var(&self, name: &str, value: &str) {
        // Only called from the single-threaded CLI front end.
        std::env::set_var(name, value);
    }

    fn remove_var(&self, name: &str) {
        std::env::remove_var(name);
    }
}

/// In-memory environment for tests and embedding.
#[derive(Debug, Default)]
pub struct MapEnvironment {
    vars: Mutex<HashMap<String, String>>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for seeding a variable.
    pub fn with_var(self, name: &str, value: &str) -> Self {
        self.set_var(name, value);
        self
    }
}

impl Environment for MapEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        self.vars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    fn set_var(&self, name: &str, value: &str) {
        self.vars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), value.to_string());
    }

    fn remove_var(&self, name: &str) {
        self.vars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name);
    }
}
