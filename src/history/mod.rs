//! Undo/redo history for annotation objects.
//!
//! Two independent layers:
//! - [`Timeline`]: the scene-wide operation log with a cursor. Undo, redo
//!   and entry deletion rebuild the live objects by replaying the log up to
//!   the cursor, so entries can be deleted from the middle of history.
//! - [`ObjectLog`]: per-object snapshot logs, each with its own cursor.
//!   Stepping through one of them overwrites only that object.

mod object_log;
mod op;
mod timeline;

pub use object_log::{ObjectChangeEntry, ObjectLog};
pub use op::{ArrowChanges, ChangeOp, EntryId, HistoryEntry};
pub use timeline::Timeline;

/// Label for an entry recording a newly created object.
pub const LABEL_CREATED: &str = "Created";

/// Label for an entry recording an edited object.
pub const LABEL_MODIFIED: &str = "Modified";

/// Label for an entry recording a removed object.
pub const LABEL_REMOVED: &str = "Removed";

/// Current wall-clock time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
