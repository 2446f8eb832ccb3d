//! Session directories: naming, discovery and lifecycle transitions.
//!
//! ```text
//! unidentified-new ──assign id──▶ identified
//! identified ──fork / fork-with-description──▶ identified (new dir, source kept)
//! identified ──fresh-memory──▶ identified (new dir, source removed)
//! ```

mod copy;
mod store;
mod types;

pub use copy::{copy_dir, copy_dir_with, move_dir, ExistingFiles, MoveOutcome};
pub use store::SessionStore;
pub use types::{Session, SessionSummary};
