//! Stable display ordering for conflicts.

use crate::models::Conflict;

/// Establishes the deterministic display order of a conflict list.
pub struct ConflictOrderer;

impl ConflictOrderer {
    /// Order conflicts by `(start_line, end_line)` ascending.
    ///
    /// The sort is stable: conflicts with equal spans keep their arrival
    /// order. Degenerate conflicts (no events) sort with line 0 — no
    /// validation happens here, that is the location resolver's job.
    pub fn order(mut conflicts: Vec<Conflict>) -> Vec<Conflict> {
        conflicts.sort_by_key(|c| (c.start_line(), c.end_line()));
        conflicts
    }
}
