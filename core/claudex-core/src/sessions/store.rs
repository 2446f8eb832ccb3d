//! Session discovery, lookup and lifecycle transitions.
//!
//! Every transition that changes a session's identity produces a new
//! directory under a freshly minted id. Nothing renames a directory to a
//! different id in place except [`SessionStore::rename_with_identity`],
//! which exists for adopting the id the assistant assigned to a session that
//! was created before one was known.

use super::copy::copy_dir;
use super::types::{Session, SessionSummary};
use crate::counter::clear_progress_markers;
use crate::env::{Environment, SESSION_PATH_VAR};
use crate::error::{ClaudexError, Result};
use crate::identity::{base_slug, compose_name, extract_id, strip_id};
use crate::metadata::{self, is_ephemeral, read_metadata, SessionMetadata};
use crate::providers::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::slug::{slug_or_fallback, CommandSlugGenerator, SlugGenerator, FALLBACK_SLUG};
use fs_err as fs;
use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sessions rooted at one directory, with injected collaborators.
#[derive(Clone)]
pub struct SessionStore {
    root: PathBuf,
    env: Arc<dyn Environment>,
    slugs: Arc<dyn SlugGenerator>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates a store with the production slug generator, UUIDs and wall clock.
    pub fn new(root: impl Into<PathBuf>, env: Arc<dyn Environment>) -> Self {
        Self {
            root: root.into(),
            env,
            slugs: Arc::new(CommandSlugGenerator::default()),
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_slug_generator(mut self, slugs: Arc<dyn SlugGenerator>) -> Self {
        self.slugs = slugs;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The sessions root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a session of the given name would occupy.
    pub fn session_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Discovery
    // ═══════════════════════════════════════════════════════════════════════════

    /// Lists every session directory, most recently used first.
    ///
    /// Sessions with no parseable timestamp sort last; ties are broken by
    /// name. A missing root yields an empty list.
    pub fn discover(&self) -> Result<Vec<SessionSummary>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ClaudexError::io("list sessions", e)),
        };

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ClaudexError::io("list sessions", e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();

            let metadata = read_metadata(&path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, session = %name, "Unreadable session metadata");
                SessionMetadata::default()
            });

            summaries.push(SessionSummary {
                last_used: metadata.last_used_or_created().to_string(),
                last_used_at: metadata.effective_last_used(),
                created: metadata.created,
                description: metadata.description,
                name,
                path,
            });
        }

        summaries.sort_by(by_recency);
        Ok(summaries)
    }

    /// Finds the directory of the session carrying `id`.
    ///
    /// A non-empty `CLAUDEX_SESSION_PATH` takes priority and must name an
    /// existing directory. Otherwise the lexically-first directory whose name
    /// ends in `-<id>` wins.
    pub fn locate(&self, id: &str) -> Result<PathBuf> {
        if let Some(override_path) = self.env.get_var(SESSION_PATH_VAR).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(override_path);
            if path.is_dir() {
                return Ok(path);
            }
            return Err(ClaudexError::OverrideMissing {
                var: SESSION_PATH_VAR.to_string(),
                path,
            });
        }

        if id.is_empty() {
            return Err(ClaudexError::SessionNotFound(id.to_string()));
        }

        let suffix = format!("-{}", id);
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ClaudexError::SessionNotFound(id.to_string()))
            }
            Err(e) => return Err(ClaudexError::io("locate session", e)),
        };

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        matches.sort();

        matches
            .into_iter()
            .next()
            .ok_or_else(|| ClaudexError::SessionNotFound(id.to_string()))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Transitions
    // ═══════════════════════════════════════════════════════════════════════════

    /// Creates a new session directory for a description.
    pub fn create(&self, description: &str) -> Result<Session> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ClaudexError::EmptyDescription);
        }

        let id = self.ids.new_id();
        let slug = slug_or_fallback(self.slugs.as_ref(), description);
        let (name, path) = self.unique_path(&compose_name(&slug, &id));

        fs::create_dir_all(&path).map_err(|e| ClaudexError::io("create session", e))?;
        metadata::write_description(&path, description)?;
        metadata::write_created(&path, self.clock.now())?;

        tracing::info!(session = %name, "Created session");
        Ok(Session {
            name,
            path,
            id,
            description: description.to_string(),
        })
    }

    /// Copies a session under a new id, keeping its slug. The source stays.
    pub fn fork(&self, source_name: &str) -> Result<Session> {
        let source = self.existing_session(source_name)?;
        let session = self.copy_to_new_identity(&source, &fork_slug(source_name))?;
        tracing::info!(source = %source_name, session = %session.name, "Forked session");
        Ok(session)
    }

    /// Copies a session under a new id and a slug derived from a new description.
    pub fn fork_with_description(&self, source_name: &str, description: &str) -> Result<Session> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ClaudexError::EmptyDescription);
        }
        let source = self.existing_session(source_name)?;
        let slug = slug_or_fallback(self.slugs.as_ref(), description);

        let mut session = self.copy_to_new_identity(&source, &slug)?;
        metadata::write_description(&session.path, description)?;
        session.description = description.to_string();

        tracing::info!(source = %source_name, session = %session.name, "Forked session with new description");
        Ok(session)
    }

    /// Moves a session to a new id with its progress markers reset.
    ///
    /// The source directory is removed only after the copy and reset both
    /// succeeded.
    pub fn fresh_memory(&self, source_name: &str) -> Result<Session> {
        let source = self.existing_session(source_name)?;
        let slug = strip_id(source_name);
        let slug = if slug.is_empty() { FALLBACK_SLUG.to_string() } else { slug };

        let session = self.copy_to_new_identity(&source, &slug)?;
        clear_progress_markers(&session.path)?;

        fs::remove_dir_all(&source)
            .map_err(|e| ClaudexError::io(format!("remove session {}", source_name), e))?;

        tracing::info!(source = %source_name, session = %session.name, "Started fresh-memory session");
        Ok(session)
    }

    /// Renames a session directory so its name carries `new_id`.
    ///
    /// Returns `Ok(None)` for an ephemeral session.
    pub fn rename_with_identity(&self, old_path: &Path, new_id: &str) -> Result<Option<PathBuf>> {
        if is_ephemeral(old_path) {
            return Ok(None);
        }

        let base_name = old_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let new_name = compose_name(&strip_id(&base_name), new_id);
        let new_path = match old_path.parent() {
            Some(parent) => parent.join(&new_name),
            None => PathBuf::from(&new_name),
        };

        if new_path != old_path {
            fs::rename(old_path, &new_path)
                .map_err(|e| ClaudexError::io("rename session directory", e))?;
            tracing::info!(from = %base_name, to = %new_name, "Renamed session with identity");
        }
        Ok(Some(new_path))
    }

    /// Marks an existing session as used now and returns it.
    pub fn resume(&self, name: &str) -> Result<Session> {
        let path = self.existing_session(name)?;
        metadata::touch(&path, self.clock.now())?;
        let description = metadata::read_description(&path)?;

        tracing::info!(session = %name, "Resumed session");
        Ok(Session {
            name: name.to_string(),
            id: extract_id(name),
            path,
            description,
        })
    }

    /// Visible regular files in a session directory, sorted by name.
    pub fn list_artifacts(&self, session_path: &Path) -> Result<Vec<String>> {
        if is_ephemeral(session_path) {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(session_path).map_err(|e| ClaudexError::io("list session artifacts", e))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────────

    fn existing_session(&self, name: &str) -> Result<PathBuf> {
        let path = self.session_path(name);
        if name.is_empty() || !path.is_dir() {
            return Err(ClaudexError::SessionNotFound(name.to_string()));
        }
        Ok(path)
    }

    /// First free name among `name`, `name-1`, `name-2`, ...
    fn unique_path(&self, name: &str) -> (String, PathBuf) {
        let mut candidate = name.to_string();
        let mut counter = 1;
        loop {
            let path = self.session_path(&candidate);
            if !path.exists() {
                return (candidate, path);
            }
            candidate = format!("{}-{}", name, counter);
            counter += 1;
        }
    }

    fn copy_to_new_identity(&self, source: &Path, slug: &str) -> Result<Session> {
        let id = self.ids.new_id();
        let (name, path) = self.unique_path(&compose_name(slug, &id));

        if let Err(e) = copy_dir(source, &path) {
            if path.exists() {
                if let Err(cleanup) = fs::remove_dir_all(&path) {
                    tracing::warn!(error = %cleanup, path = %path.display(), "Could not remove partial copy");
                }
            }
            return Err(e);
        }

        let description = metadata::read_description(&path)?;
        Ok(Session {
            name,
            path,
            id,
            description,
        })
    }
}

fn fork_slug(source_name: &str) -> String {
    let slug = base_slug(source_name);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn by_recency(a: &SessionSummary, b: &SessionSummary) -> Ordering {
    match (a.last_used_at, b.last_used_at) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{read_counter, read_last_processed_line, write_counter, write_last_processed_line};
    use crate::env::MapEnvironment;
    use crate::identity::has_embedded_id;
    use crate::metadata::{read_created, read_description, read_last_used};
    use crate::providers::{FixedClock, SequentialIds};
    use crate::slug::{FailingSlugGenerator, StaticSlugGenerator};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    const ID: &str = "33342657-73dc-407d-9aa6-a28f2e619268";

    fn store_with_env(temp: &TempDir, env: MapEnvironment) -> SessionStore {
        SessionStore::new(temp.path().join("sessions"), Arc::new(env))
            .with_slug_generator(Arc::new(StaticSlugGenerator("auth-fix".to_string())))
            .with_id_generator(Arc::new(SequentialIds::new()))
            .with_clock(Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap(),
            )))
    }

    fn test_store(temp: &TempDir) -> SessionStore {
        store_with_env(temp, MapEnvironment::new())
    }

    fn seed_session(store: &SessionStore, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let path = store.session_path(name);
        std::fs::create_dir_all(&path).unwrap();
        for (file, content) in files {
            std::fs::write(path.join(file), content).unwrap();
        }
        path
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Discovery Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_discover_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(test_store(&temp).discover().unwrap().is_empty());
    }

    #[test]
    fn test_discover_sorts_by_last_used_descending() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        seed_session(&store, "older", &[(".last_used", "2024-01-10T09:00:00Z")]);
        seed_session(&store, "newer", &[(".last_used", "2024-01-15T14:00:00Z")]);

        let names: Vec<_> = store.discover().unwrap().into_iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["newer", "older"]);
    }

    #[test]
    fn test_discover_falls_back_to_created() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        seed_session(&store, "used", &[(".last_used", "2024-01-10T09:00:00Z")]);
        seed_session(&store, "created-only", &[(".created", "2024-01-12T09:00:00Z")]);

        let sessions = store.discover().unwrap();

        assert_eq!(sessions[0].name, "created-only");
        assert_eq!(sessions[0].last_used, "2024-01-12T09:00:00Z");
        assert_eq!(sessions[1].name, "used");
    }

    #[test]
    fn test_discover_keeps_sessions_without_metadata_last() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        seed_session(&store, "b-bare", &[]);
        seed_session(&store, "a-bare", &[]);
        seed_session(&store, "dated", &[(".created", "2024-01-01T00:00:00Z")]);
        std::fs::write(store.root().join("stray-file"), "x").unwrap();

        let names: Vec<_> = store.discover().unwrap().into_iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["dated", "a-bare", "b-bare"]);
    }

    #[test]
    fn test_discover_reads_description() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        seed_session(&store, &format!("x-{}", ID), &[(".description", " Fix login \n")]);

        let sessions = store.discover().unwrap();

        assert_eq!(sessions[0].description, "Fix login");
        assert_eq!(sessions[0].id(), ID);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Locate Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_locate_by_suffix() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let path = seed_session(&store, &format!("auth-fix-{}", ID), &[]);

        assert_eq!(store.locate(ID).unwrap(), path);
    }

    #[test]
    fn test_locate_picks_lexically_first_match() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        seed_session(&store, &format!("zeta-{}", ID), &[]);
        let first = seed_session(&store, &format!("alpha-{}", ID), &[]);

        assert_eq!(store.locate(ID).unwrap(), first);
    }

    #[test]
    fn test_locate_not_found() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        seed_session(&store, "other-session", &[]);

        assert!(matches!(store.locate(ID), Err(ClaudexError::SessionNotFound(_))));
        assert!(matches!(store.locate(""), Err(ClaudexError::SessionNotFound(_))));
    }

    #[test]
    fn test_locate_override_wins() {
        let temp = TempDir::new().unwrap();
        let elsewhere = temp.path().join("elsewhere");
        std::fs::create_dir_all(&elsewhere).unwrap();
        let env = MapEnvironment::new().with_var(SESSION_PATH_VAR, &elsewhere.to_string_lossy());
        let store = store_with_env(&temp, env);
        seed_session(&store, &format!("auth-fix-{}", ID), &[]);

        assert_eq!(store.locate(ID).unwrap(), elsewhere);
    }

    #[test]
    fn test_locate_override_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let env = MapEnvironment::new().with_var(SESSION_PATH_VAR, &missing.to_string_lossy());
        let store = store_with_env(&temp, env);
        seed_session(&store, &format!("auth-fix-{}", ID), &[]);

        let err = store.locate(ID).unwrap_err();

        assert!(matches!(err, ClaudexError::OverrideMissing { .. }));
        assert!(err.to_string().contains(SESSION_PATH_VAR));
    }

    #[test]
    fn test_locate_empty_override_is_ignored() {
        let temp = TempDir::new().unwrap();
        let env = MapEnvironment::new().with_var(SESSION_PATH_VAR, "");
        let store = store_with_env(&temp, env);
        let path = seed_session(&store, &format!("auth-fix-{}", ID), &[]);

        assert_eq!(store.locate(ID).unwrap(), path);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Create Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_create_writes_metadata() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let session = store.create("  Fix the auth flow  ").unwrap();

        assert_eq!(session.name, "auth-fix-00000000-0000-4000-8000-000000000001");
        assert_eq!(session.id, "00000000-0000-4000-8000-000000000001");
        assert!(has_embedded_id(&session.name));
        assert_eq!(read_description(&session.path).unwrap(), "Fix the auth flow");
        assert_eq!(read_created(&session.path).unwrap(), "2024-02-01T12:00:00Z");
    }

    #[test]
    fn test_create_rejects_empty_description() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        assert!(matches!(store.create("   "), Err(ClaudexError::EmptyDescription)));
        assert!(!store.root().exists());
    }

    #[test]
    fn test_create_falls_back_to_manual_slug() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp).with_slug_generator(Arc::new(FailingSlugGenerator));

        let session = store.create("Refactor Login Flow!").unwrap();

        assert!(session.name.starts_with("refactor-login-flow-"));
        assert!(has_embedded_id(&session.name));
    }

    #[test]
    fn test_create_appends_collision_suffix() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let taken = "auth-fix-00000000-0000-4000-8000-000000000001";
        seed_session(&store, taken, &[]);
        seed_session(&store, &format!("{}-1", taken), &[]);

        let session = store.create("Fix auth").unwrap();

        assert_eq!(session.name, format!("{}-2", taken));
        assert!(session.path.is_dir());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Fork Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fork_copies_under_new_id() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let source_name = format!("my-task-{}", ID);
        let source = seed_session(
            &store,
            &source_name,
            &[(".description", "Task"), ("transcript.md", "hello")],
        );

        let forked = store.fork(&source_name).unwrap();

        assert_eq!(forked.name, "my-task-00000000-0000-4000-8000-000000000001");
        assert_eq!(forked.description, "Task");
        assert_eq!(
            std::fs::read_to_string(forked.path.join("transcript.md")).unwrap(),
            "hello"
        );
        assert!(source.is_dir());
    }

    #[test]
    fn test_fork_strips_numeric_counter() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let source_name = format!("my-task-2-{}", ID);
        seed_session(&store, &source_name, &[]);

        let forked = store.fork(&source_name).unwrap();

        assert!(forked.name.starts_with("my-task-0000"));
    }

    #[test]
    fn test_fork_unknown_source() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert!(matches!(store.fork("nope"), Err(ClaudexError::SessionNotFound(_))));
    }

    #[test]
    fn test_fork_with_description_overwrites_description() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp).with_slug_generator(Arc::new(FailingSlugGenerator));
        let source_name = format!("my-task-{}", ID);
        let source = seed_session(&store, &source_name, &[(".description", "Old")]);

        let forked = store.fork_with_description(&source_name, "New Direction").unwrap();

        assert!(forked.name.starts_with("new-direction-"));
        assert_eq!(read_description(&forked.path).unwrap(), "New Direction");
        assert_eq!(forked.description, "New Direction");
        assert_eq!(read_description(&source).unwrap(), "Old");
    }

    #[test]
    fn test_fork_with_empty_description_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let source_name = format!("my-task-{}", ID);
        seed_session(&store, &source_name, &[]);

        assert!(matches!(
            store.fork_with_description(&source_name, " "),
            Err(ClaudexError::EmptyDescription)
        ));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Fresh Memory Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fresh_memory_resets_and_deletes_source() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let source_name = format!("my-task-3-{}", ID);
        let source = seed_session(
            &store,
            &source_name,
            &[(".description", "Task"), ("notes.md", "keep me"), (".last-processed-line", "9")],
        );
        write_counter(&source, 4).unwrap();
        write_last_processed_line(&source, 300).unwrap();

        let fresh = store.fresh_memory(&source_name).unwrap();

        assert!(!source.exists());
        // Slug is kept as-is, numeric segment included
        assert_eq!(fresh.name, "my-task-3-00000000-0000-4000-8000-000000000001");
        assert_eq!(read_counter(&fresh.path).unwrap(), 0);
        assert_eq!(read_last_processed_line(&fresh.path).unwrap(), 0);
        assert!(!fresh.path.join(".last-processed-line").exists());
        assert_eq!(
            std::fs::read_to_string(fresh.path.join("notes.md")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_fresh_memory_unknown_source_keeps_everything() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let other = seed_session(&store, "other", &[]);

        assert!(store.fresh_memory("missing").is_err());
        assert!(other.is_dir());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rename, Resume and Artifact Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_rename_with_identity_replaces_suffix() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let old = seed_session(&store, &format!("auth-fix-{}", ID), &[(".description", "d")]);
        let new_id = "11111111-2222-4333-8444-555555555555";

        let renamed = store.rename_with_identity(&old, new_id).unwrap().unwrap();

        assert_eq!(renamed, store.session_path(&format!("auth-fix-{}", new_id)));
        assert!(!old.exists());
        assert_eq!(read_description(&renamed).unwrap(), "d");
    }

    #[test]
    fn test_rename_with_identity_adds_suffix_to_plain_name() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let old = seed_session(&store, "draft", &[]);

        let renamed = store.rename_with_identity(&old, ID).unwrap().unwrap();

        assert_eq!(renamed, store.session_path(&format!("draft-{}", ID)));
    }

    #[test]
    fn test_rename_with_identity_ephemeral_is_noop() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert_eq!(store.rename_with_identity(Path::new(""), ID).unwrap(), None);
    }

    #[test]
    fn test_resume_touches_last_used() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let name = format!("auth-fix-{}", ID);
        seed_session(&store, &name, &[(".description", "Auth")]);

        let session = store.resume(&name).unwrap();

        assert_eq!(session.id, ID);
        assert_eq!(session.description, "Auth");
        assert_eq!(read_last_used(&session.path).unwrap(), "2024-02-01T12:00:00Z");
    }

    #[test]
    fn test_resume_unknown_session() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            test_store(&temp).resume("ghost"),
            Err(ClaudexError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_list_artifacts_skips_hidden_and_dirs() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let path = seed_session(
            &store,
            "s",
            &[(".description", "d"), ("b.md", ""), ("a.md", "")],
        );
        std::fs::create_dir_all(path.join("subdir")).unwrap();

        assert_eq!(store.list_artifacts(&path).unwrap(), vec!["a.md", "b.md"]);
        assert!(store.list_artifacts(Path::new("")).unwrap().is_empty());
    }
}
