//! Session name codec.
//!
//! A persisted session directory is named `<slug>-<uuid>`. The identifier is
//! recognized purely by a trailing pattern, so a slug that itself ends in
//! five hex groups of the right lengths will be read as carrying an id.

use crate::patterns::{RE_EMBEDDED_ID, RE_NUMERIC_SEGMENT};

/// Returns true if `name` ends in `-<uuid>`.
pub fn has_embedded_id(name: &str) -> bool {
    RE_EMBEDDED_ID.is_match(name)
}

/// Returns the embedded identifier without its leading hyphen, or `""`.
pub fn extract_id(name: &str) -> String {
    RE_EMBEDDED_ID
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Returns `name` without its trailing `-<uuid>`; unchanged when absent.
pub fn strip_id(name: &str) -> String {
    match RE_EMBEDDED_ID.find(name) {
        Some(m) => name[..m.start()].to_string(),
        None => name.to_string(),
    }
}

/// Builds a session directory name from a slug and an identifier.
pub fn compose_name(slug: &str, id: &str) -> String {
    format!("{}-{}", slug, id)
}

/// Recovers the human slug from a session name for forking.
///
/// Handles `slug-<uuid>`, collision-suffixed `slug-<uuid>-2` and
/// counter-suffixed `slug-3-<uuid>` forms.
pub fn base_slug(name: &str) -> String {
    let mut base = name;
    if !has_embedded_id(base) {
        let trimmed = strip_numeric_segment(base);
        if has_embedded_id(trimmed) {
            base = trimmed;
        }
    }
    let stripped = strip_id(base);
    strip_numeric_segment(&stripped).to_string()
}

fn strip_numeric_segment(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((head, tail)) if !head.is_empty() && RE_NUMERIC_SEGMENT.is_match(tail) => head,
        _ => name,
    }
}
