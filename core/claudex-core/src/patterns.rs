//! Compiled regex patterns for session names and slugs.
//!
//! Compiled once on first use and shared by the identity codec and the slug
//! helpers.

use once_cell::sync::Lazy;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// Session Identity
// ═══════════════════════════════════════════════════════════════════════════════

/// Trailing `-<uuid>` with exact 8-4-4-4-12 lowercase hex groups.
pub static RE_EMBEDDED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})$").unwrap()
});

/// A name segment made only of digits (fork and collision counters).
pub static RE_NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// ═══════════════════════════════════════════════════════════════════════════════
// Slugs
// ═══════════════════════════════════════════════════════════════════════════════

/// First slug-shaped token in generator output.
pub static RE_SLUG_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9-]+").unwrap());

/// Runs of characters that may not appear in a slug.
pub static RE_NON_SLUG_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
