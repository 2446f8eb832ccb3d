//! Time and identifier sources injected into the session store.
//!
//! Production code uses [`SystemClock`] and [`UuidGenerator`]. Tests (and
//! dependents enabling `test-helpers`) swap in `FixedClock` and
//! `SequentialIds` so directory names and timestamps are predictable.

use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "test-helpers"))]
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(any(test, feature = "test-helpers"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of new session identifiers.
///
/// Implementations must return lowercase 8-4-4-4-12 hex identifiers so the
/// composed directory name is recognized by [`crate::identity`].
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic identifiers: `00000000-0000-4000-8000-000000000001`, `...02`, ...
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

#[cfg(any(test, feature = "test-helpers"))]
impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("00000000-0000-4000-8000-{:012x}", n)
    }
}
