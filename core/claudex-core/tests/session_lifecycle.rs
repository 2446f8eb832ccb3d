//! Integration tests for session naming, discovery and lifecycle transitions.

use chrono::{DateTime, TimeZone, Utc};
use claudex_core::counter::{increment_counter, read_counter, write_last_processed_line};
use claudex_core::identity::{extract_id, has_embedded_id, strip_id};
use claudex_core::metadata::{read_description, read_last_used};
use claudex_core::{
    ClaudexEngine, ClaudexError, Clock, MapEnvironment, SlugGenerator, StorageConfig,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Always 2024-03-01T08:30:00Z.
struct MarchClock;

impl Clock for MarchClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }
}

/// No slug command available; names fall back to the manual slug.
struct NoSlugCommand;

impl SlugGenerator for NoSlugCommand {
    fn generate(&self, _description: &str) -> claudex_core::Result<String> {
        Err(ClaudexError::SlugGeneration("not installed".to_string()))
    }
}

fn open_engine(temp: &TempDir) -> ClaudexEngine {
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    ClaudexEngine::open(storage, Arc::new(MapEnvironment::new()))
        .unwrap()
        .with_slug_generator(Arc::new(NoSlugCommand))
        .with_clock(Arc::new(MarchClock))
}

#[test]
fn test_identity_round_trip_for_generated_names() {
    let temp = TempDir::new().unwrap();
    let engine = open_engine(&temp);

    let session = engine.sessions().create("Wire up billing").unwrap();

    assert!(has_embedded_id(&session.name));
    assert_eq!(extract_id(&session.name), session.id);
    assert_eq!(
        format!("{}-{}", strip_id(&session.name), extract_id(&session.name)),
        session.name
    );
}

#[test]
fn test_discover_orders_by_last_used() {
    let temp = TempDir::new().unwrap();
    let engine = open_engine(&temp);
    let sessions_dir = engine.storage().sessions_dir();

    for (name, last_used) in [
        ("first", "2024-01-15T14:00:00Z"),
        ("second", "2024-01-10T09:00:00Z"),
    ] {
        std::fs::create_dir_all(sessions_dir.join(name)).unwrap();
        std::fs::write(sessions_dir.join(name).join(".last_used"), last_used).unwrap();
    }

    let sessions = engine.sessions().discover().unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].name, "first");
    assert_eq!(sessions[1].name, "second");
}

#[test]
fn test_new_resume_fork_fresh_flow() {
    let temp = TempDir::new().unwrap();
    let engine = open_engine(&temp);
    let store = engine.sessions();

    let created = store.create("Refactor the parser").unwrap();
    assert!(created.name.starts_with("refactor-the-parser-"));
    std::fs::write(created.path.join("plan.md"), "# Plan").unwrap();
    increment_counter(&created.path).unwrap();

    let resumed = store.resume(&created.name).unwrap();
    assert_eq!(read_last_used(&resumed.path).unwrap(), "2024-03-01T08:30:00Z");
    assert_eq!(store.locate(&created.id).unwrap(), created.path);

    let forked = store.fork(&created.name).unwrap();
    assert_ne!(forked.id, created.id);
    assert!(forked.name.starts_with("refactor-the-parser-"));
    assert_eq!(read_counter(&forked.path).unwrap(), 1);
    assert!(created.path.is_dir());

    write_last_processed_line(&forked.path, 42).unwrap();
    let fresh = store.fresh_memory(&forked.name).unwrap();
    assert!(!forked.path.exists());
    assert_eq!(read_counter(&fresh.path).unwrap(), 0);
    assert_eq!(
        std::fs::read_to_string(fresh.path.join("plan.md")).unwrap(),
        "# Plan"
    );
    assert_eq!(read_description(&fresh.path).unwrap(), "Refactor the parser");

    let names: Vec<_> = store
        .discover()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&created.name));
    assert!(names.contains(&fresh.name));
}

#[test]
fn test_fork_with_description_then_list_artifacts() {
    let temp = TempDir::new().unwrap();
    let engine = open_engine(&temp);
    let store = engine.sessions();

    let source = store.create("Original work").unwrap();
    std::fs::write(source.path.join("notes.md"), "n").unwrap();

    let forked = store
        .fork_with_description(&source.name, "Spin off experiment")
        .unwrap();

    assert!(forked.name.starts_with("spin-off-experiment-"));
    assert_eq!(read_description(&forked.path).unwrap(), "Spin off experiment");
    assert_eq!(read_description(&source.path).unwrap(), "Original work");
    assert_eq!(store.list_artifacts(&forked.path).unwrap(), vec!["notes.md"]);
}

#[test]
fn test_rename_with_identity_keeps_contents() {
    let temp = TempDir::new().unwrap();
    let engine = open_engine(&temp);
    let store = engine.sessions();

    let session = store.create("Adopt id").unwrap();
    let assigned = "aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee";

    let renamed = store
        .rename_with_identity(&session.path, assigned)
        .unwrap()
        .unwrap();

    assert_eq!(extract_id(&renamed.to_string_lossy()), assigned);
    assert_eq!(read_description(&renamed).unwrap(), "Adopt id");
    assert_eq!(store.locate(assigned).unwrap(), renamed);
}
