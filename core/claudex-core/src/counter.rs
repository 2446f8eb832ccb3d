//! Progress counters stored as integer text files in a session directory.
//!
//! `.doc-update-counter` counts documentation refreshes since the last
//! reset; `.last-processed-line-overview` records how far the transcript has
//! been consumed. Absent or blank files read as 0. Any other content that
//! does not parse as a non-negative integer is an error.
//!
//! Read-modify-write is not synchronized; two processes incrementing the same
//! counter can lose an update.

use crate::error::{ClaudexError, Result};
use crate::metadata::is_ephemeral;
use fs_err as fs;
use std::io::ErrorKind;
use std::path::Path;

pub const COUNTER_FILE: &str = ".doc-update-counter";
pub const LAST_PROCESSED_LINE_FILE: &str = ".last-processed-line-overview";
/// Marker written by older releases; removed alongside the current one.
pub const LEGACY_LAST_PROCESSED_LINE_FILE: &str = ".last-processed-line";

// ─────────────────────────────────────────────────────────────────────────────
// Documentation Update Counter
// ─────────────────────────────────────────────────────────────────────────────

pub fn read_counter(session_path: &Path) -> Result<u64> {
    read_number(session_path, COUNTER_FILE)
}

pub fn write_counter(session_path: &Path, value: u64) -> Result<()> {
    write_number(session_path, COUNTER_FILE, value)
}

/// Reads, adds one, writes back. Returns the new value.
pub fn increment_counter(session_path: &Path) -> Result<u64> {
    if is_ephemeral(session_path) {
        return Ok(0);
    }
    let next = read_counter(session_path)?.saturating_add(1);
    write_counter(session_path, next)?;
    Ok(next)
}

pub fn reset_counter(session_path: &Path) -> Result<()> {
    write_counter(session_path, 0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Last Processed Line
// ─────────────────────────────────────────────────────────────────────────────

pub fn read_last_processed_line(session_path: &Path) -> Result<u64> {
    read_number(session_path, LAST_PROCESSED_LINE_FILE)
}

pub fn write_last_processed_line(session_path: &Path, line: u64) -> Result<()> {
    write_number(session_path, LAST_PROCESSED_LINE_FILE, line)
}

/// Resets the session's progress: counter to 0, line markers removed.
pub fn clear_progress_markers(session_path: &Path) -> Result<()> {
    if is_ephemeral(session_path) {
        return Ok(());
    }
    for marker in [LAST_PROCESSED_LINE_FILE, LEGACY_LAST_PROCESSED_LINE_FILE] {
        match fs::remove_file(session_path.join(marker)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ClaudexError::io("remove progress marker", e)),
        }
    }
    reset_counter(session_path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn read_number(session_path: &Path, file_name: &str) -> Result<u64> {
    if is_ephemeral(session_path) {
        return Ok(0);
    }
    let path = session_path.join(file_name);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(ClaudexError::io("read counter", e)),
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|source| ClaudexError::MalformedContent {
            path,
            content: trimmed.to_string(),
            source,
        })
}

fn write_number(session_path: &Path, file_name: &str, value: u64) -> Result<()> {
    if is_ephemeral(session_path) {
        return Ok(());
    }
    fs::write(session_path.join(file_name), value.to_string())
        .map_err(|e| ClaudexError::io("write counter", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn seed(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_read_counter_absent_is_zero() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_counter(temp.path()).unwrap(), 0);
    }

    #[test]
    fn test_read_counter_blank_is_zero() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), COUNTER_FILE, "");
        assert_eq!(read_counter(temp.path()).unwrap(), 0);

        seed(temp.path(), COUNTER_FILE, "  \n\t ");
        assert_eq!(read_counter(temp.path()).unwrap(), 0);
    }

    #[test]
    fn test_read_counter_parses_trimmed_value() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), COUNTER_FILE, "7");
        assert_eq!(read_counter(temp.path()).unwrap(), 7);

        seed(temp.path(), COUNTER_FILE, " 12\n");
        assert_eq!(read_counter(temp.path()).unwrap(), 12);
    }

    #[test]
    fn test_read_counter_rejects_non_numeric() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), COUNTER_FILE, "abc");

        let err = read_counter(temp.path()).unwrap_err();

        assert!(err.to_string().contains("invalid integer"));
        assert!(matches!(err, ClaudexError::MalformedContent { .. }));
    }

    #[test]
    fn test_read_counter_rejects_partial_numbers() {
        let temp = TempDir::new().unwrap();
        for content in ["5abc", "-3", "1.5", "1 2"] {
            seed(temp.path(), COUNTER_FILE, content);
            assert!(read_counter(temp.path()).is_err(), "accepted {:?}", content);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Write and Increment Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_write_counter_overwrites() {
        let temp = TempDir::new().unwrap();
        write_counter(temp.path(), 10).unwrap();
        write_counter(temp.path(), 20).unwrap();

        assert_eq!(read_counter(temp.path()).unwrap(), 20);
        let raw = std::fs::read_to_string(temp.path().join(COUNTER_FILE)).unwrap();
        assert_eq!(raw, "20");
    }

    #[test]
    fn test_increment_from_absent_yields_one() {
        let temp = TempDir::new().unwrap();
        assert_eq!(increment_counter(temp.path()).unwrap(), 1);
        assert_eq!(read_counter(temp.path()).unwrap(), 1);
    }

    #[test]
    fn test_increment_sequence_from_five() {
        let temp = TempDir::new().unwrap();
        write_counter(temp.path(), 5).unwrap();

        assert_eq!(increment_counter(temp.path()).unwrap(), 6);
        assert_eq!(increment_counter(temp.path()).unwrap(), 7);
        assert_eq!(increment_counter(temp.path()).unwrap(), 8);
    }

    #[test]
    fn test_increment_propagates_malformed_content() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), COUNTER_FILE, "oops");

        assert!(increment_counter(temp.path()).is_err());
        let raw = std::fs::read_to_string(temp.path().join(COUNTER_FILE)).unwrap();
        assert_eq!(raw, "oops");
    }

    #[test]
    fn test_reset_counter() {
        let temp = TempDir::new().unwrap();
        write_counter(temp.path(), 9).unwrap();
        reset_counter(temp.path()).unwrap();
        assert_eq!(read_counter(temp.path()).unwrap(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Last Processed Line Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_last_processed_line_is_independent_of_counter() {
        let temp = TempDir::new().unwrap();
        write_last_processed_line(temp.path(), 120).unwrap();
        write_counter(temp.path(), 3).unwrap();

        assert_eq!(read_last_processed_line(temp.path()).unwrap(), 120);
        assert_eq!(read_counter(temp.path()).unwrap(), 3);
    }

    #[test]
    fn test_clear_progress_markers() {
        let temp = TempDir::new().unwrap();
        write_counter(temp.path(), 4).unwrap();
        write_last_processed_line(temp.path(), 88).unwrap();
        seed(temp.path(), LEGACY_LAST_PROCESSED_LINE_FILE, "40");

        clear_progress_markers(temp.path()).unwrap();

        assert_eq!(read_counter(temp.path()).unwrap(), 0);
        assert_eq!(read_last_processed_line(temp.path()).unwrap(), 0);
        assert!(!temp.path().join(LAST_PROCESSED_LINE_FILE).exists());
        assert!(!temp.path().join(LEGACY_LAST_PROCESSED_LINE_FILE).exists());
    }

    #[test]
    fn test_clear_progress_markers_when_nothing_exists() {
        let temp = TempDir::new().unwrap();
        clear_progress_markers(temp.path()).unwrap();
        assert_eq!(read_counter(temp.path()).unwrap(), 0);
    }

    #[test]
    fn test_ephemeral_path_is_noop() {
        let empty = PathBuf::new();
        assert_eq!(read_counter(&empty).unwrap(), 0);
        assert_eq!(increment_counter(&empty).unwrap(), 0);
        assert!(write_counter(&empty, 3).is_ok());
        assert!(clear_progress_markers(&empty).is_ok());
    }
}
