//! # claudex-core
//!
//! Session identity and storage lifecycle for claudex.
//!
//! A session is a directory named `<slug>-<uuid>` under
//! `<project>/.claudex/sessions/`, holding conversation artifacts, small
//! metadata files and progress counters. This crate names, discovers and
//! transitions those directories, migrates older project layouts, and merges
//! generated hook settings into a user's settings file. It also installs
//! hook assets into `.claude/` and feeds session context to subagent prompts.
//!
//! ## Design Principles
//!
//! - **Synchronous**: Plain blocking filesystem I/O, no async runtime.
//! - **Graceful degradation**: Missing metadata reads as empty, missing
//!   counters as zero. Only present-but-unusable content is an error.
//! - **Identity is immutable**: Fork-style transitions copy into a new
//!   directory under a new id; nothing rewrites an id in place.
//! - **Injected collaborators**: Environment, clock, id and slug sources are
//!   traits so every operation is testable against a temp directory.

pub mod assets;
pub mod config;
pub mod context;
pub mod counter;
pub mod engine;
pub mod env;
pub mod error;
pub mod identity;
pub mod logs;
pub mod metadata;
pub mod migrate;
pub mod patterns;
pub mod preferences;
pub mod providers;
pub mod sessions;
pub mod settings;
pub mod slug;
pub mod storage;

pub use assets::AssetReport;
pub use config::{ClaudexConfig, Features};
pub use context::{HookOutput, PreToolUseInput};
pub use engine::ClaudexEngine;
pub use env::{Environment, MapEnvironment, OsEnvironment};
pub use error::{ClaudexError, Result};
pub use migrate::{MigrationReport, MigrationWarning, Migrator};
pub use preferences::Preferences;
pub use providers::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use sessions::{Session, SessionStore, SessionSummary};
pub use settings::{merge_settings, SettingsInstall};
pub use slug::{CommandSlugGenerator, SlugGenerator};
pub use storage::StorageConfig;

#[cfg(any(test, feature = "test-helpers"))]
pub use providers::{FixedClock, SequentialIds};
#[cfg(any(test, feature = "test-helpers"))]
pub use slug::{FailingSlugGenerator, StaticSlugGenerator};
