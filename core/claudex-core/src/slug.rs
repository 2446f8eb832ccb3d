//! Slug generation for new session names.
//!
//! A [`SlugGenerator`] turns a free-text description into a short
//! hyphenated token. The production generator asks the assistant CLI for
//! one; when that fails the session store falls back to [`manual_slug`].

use crate::error::{ClaudexError, Result};
use crate::patterns::{RE_NON_SLUG_RUN, RE_SLUG_TOKEN};
use std::io::Write;
use std::process::{Command, Stdio};

/// Longest slug [`manual_slug`] will produce.
pub const MAX_SLUG_LEN: usize = 50;
/// Shortest token accepted from generator output.
pub const MIN_GENERATED_LEN: usize = 3;
/// Used when a description contains nothing slug-worthy.
pub const FALLBACK_SLUG: &str = "session";

/// Produces a slug for a session description.
pub trait SlugGenerator: Send + Sync {
    fn generate(&self, description: &str) -> Result<String>;
}

/// Lowercases, collapses every run of non-alphanumerics into one hyphen,
/// trims hyphens at both ends and caps the length.
pub fn manual_slug(description: &str) -> String {
    let lowered = description.to_lowercase();
    let collapsed = RE_NON_SLUG_RUN.replace_all(&lowered, "-");
    let mut slug = collapsed.trim_matches('-').to_string();

    // Only ASCII survives the replacement, so byte truncation is safe.
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Picks the first slug-shaped token out of generator output.
pub fn extract_slug(output: &str) -> Option<String> {
    RE_SLUG_TOKEN
        .find(output)
        .map(|m| m.as_str().to_string())
        .filter(|slug| slug.len() >= MIN_GENERATED_LEN)
}

/// Slug from the generator, or [`manual_slug`] when it fails.
pub fn slug_or_fallback(generator: &dyn SlugGenerator, description: &str) -> String {
    match generator.generate(description) {
        Ok(slug) => slug,
        Err(e) => {
            tracing::debug!(error = %e, "Slug generator failed, using manual slug");
            manual_slug(description)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command-backed Generator
// ─────────────────────────────────────────────────────────────────────────────

/// Runs an external command with a prompt on stdin and reads the slug from
/// its stdout. Defaults to `claude -p`.
#[derive(Debug, Clone)]
pub struct CommandSlugGenerator {
    program: String,
    args: Vec<String>,
}

impl Default for CommandSlugGenerator {
    fn default() -> Self {
        Self::new("claude", ["-p"])
    }
}

impl CommandSlugGenerator {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn prompt(description: &str) -> String {
        format!(
            "Generate a short, descriptive slug (2-4 words max, lowercase, hyphen-separated) \
             for a work session based on this description: '{}'. Reply with ONLY the slug, \
             nothing else. Examples: 'auth-refactor', 'api-performance-fix', 'user-dashboard-ui'",
            description
        )
    }
}

impl SlugGenerator for CommandSlugGenerator {
    fn generate(&self, description: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ClaudexError::SlugGeneration(format!("spawn {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(Self::prompt(description).as_bytes())
                .map_err(|e| ClaudexError::SlugGeneration(format!("write prompt: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| ClaudexError::SlugGeneration(format!("wait for {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(ClaudexError::SlugGeneration(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        extract_slug(&stdout)
            .ok_or_else(|| ClaudexError::SlugGeneration("no valid slug in output".to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixed Generators (test helpers)
// ─────────────────────────────────────────────────────────────────────────────

/// Always returns the same slug.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone)]
pub struct StaticSlugGenerator(pub String);

#[cfg(any(test, feature = "test-helpers"))]
impl SlugGenerator for StaticSlugGenerator {
    fn generate(&self, _description: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Always fails, forcing the manual fallback.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSlugGenerator;

#[cfg(any(test, feature = "test-helpers"))]
impl SlugGenerator for FailingSlugGenerator {
    fn generate(&self, _description: &str) -> Result<String> {
        Err(ClaudexError::SlugGeneration("generator unavailable".to_string()))
    }
}
