//! Domain model types used throughout mergelens.
//!
//! These types mirror the analysis backend's wire schema for a code review
//! record and carry the in-memory representations the conflict components
//! operate on. Conflicts and modified-line records are produced once per
//! analysis fetch and are read-only thereafter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel file name marking a synthetic conflict location that must be
/// resolved through the captured stack trace.
pub const UNKNOWN_FILE: &str = "UNKNOWN";

// ---------------------------------------------------------------------------
// Analysis record
// ---------------------------------------------------------------------------

/// One analysis result for a `(owner, repository, pull_number)` key.
///
/// Carries the three unified-diff texts of a three-way merge (base vs
/// branch A, base vs branch B, base vs merge result), the detected
/// conflicts, and the per-file modified-line classification. The
/// `conflicts` and `modified_lines` fields are optional on the wire;
/// absent means empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub uuid: String,
    pub owner: String,
    pub repository: String,
    pub pull_number: u64,

    /// Display name of branch A.
    pub branch_a: String,
    /// Display name of branch B.
    pub branch_b: String,

    /// Unified diff, base vs branch A.
    pub base_a: String,
    /// Unified diff, base vs branch B.
    pub base_b: String,
    /// Unified diff, base vs merge result.
    pub base_merge: String,

    /// When the analysis ran, if the backend reports it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Detected conflicts ("dependencies" in the backend's vocabulary).
    #[serde(default, alias = "dependencies")]
    pub conflicts: Vec<Conflict>,

    /// Per-file modified-line classification for the merge diff.
    #[serde(default, alias = "modifiedLines")]
    pub modified_lines: Vec<ModifiedLine>,
}

impl AnalysisRecord {
    /// True when the backend sent no diff text at all — the "no analysis
    /// run yet" display state, as opposed to "no conflicts found".
    pub fn has_diffs(&self) -> bool {
        !(self.base_a.is_empty() && self.base_b.is_empty() && self.base_merge.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

/// A detected interference between the two branches' changes.
///
/// The event sequence is ordered: the first event is the earliest code
/// location of the conflict, the last is the latest. The pair defines the
/// conflict's logical span. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// Backend classification label, e.g. `OA` or `DEFAULT`.
    #[serde(default, alias = "type")]
    pub kind: Option<String>,

    /// Human-readable description from the analysis backend.
    #[serde(default)]
    pub label: Option<String>,

    /// Ordered, non-empty interference event sequence.
    #[serde(alias = "interference")]
    pub events: Vec<InterferenceEvent>,
}

impl Conflict {
    /// Line of the first interference event, or 0 when the event list is
    /// degenerate. Used only for display ordering; validation happens in
    /// the location resolver.
    pub fn start_line(&self) -> u32 {
        self.events.first().map(|e| e.location.line).unwrap_or(0)
    }

    /// Line of the last interference event, or 0 when degenerate.
    pub fn end_line(&self) -> u32 {
        self.events.last().map(|e| e.location.line).unwrap_or(0)
    }
}

/// One point (start or end) of a conflict's location span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterferenceEvent {
    pub location: Location,

    /// Captured call stack, innermost frame first. Required when the
    /// location's file is [`UNKNOWN_FILE`], optional otherwise.
    #[serde(default, alias = "stackTrace")]
    pub stack_trace: Option<Vec<StackFrame>>,
}

impl InterferenceEvent {
    /// The innermost stack frame, if a non-empty trace was captured.
    pub fn first_frame(&self) -> Option<&StackFrame> {
        self.stack_trace.as_deref().and_then(|t| t.first())
    }
}

/// A source location reported by the analysis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// One frame of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Dotted qualified class name, e.g. `com.acme.Bar`.
    pub class: String,
    pub line: u32,
}

// ---------------------------------------------------------------------------
// Modified lines
// ---------------------------------------------------------------------------

/// Which lines of one file were contributed by branch A (the left side).
///
/// The complement is implicitly branch B and is not recorded; only the
/// left side is tagged explicitly. `left_added` and `left_removed` are
/// disjoint within a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifiedLine {
    pub file: String,

    /// Added lines attributable to branch A, merge-side numbering.
    #[serde(default, alias = "leftAdded")]
    pub left_added: Vec<u32>,

    /// Removed lines attributable to branch A.
    #[serde(default, alias = "leftRemoved")]
    pub left_removed: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Resolved span & side
// ---------------------------------------------------------------------------

/// A concrete (file, from, to) span derived from a conflict, after
/// stack-trace fallback if needed. Lines are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub file: String,
    pub from_line: u32,
    pub to_line: u32,
}

/// The merge side responsible for a changed diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Branch A.
    Left,
    /// Branch B.
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tolerates_absent_optional_fields() {
        let json = r#"{
            "uuid": "abc",
            "owner": "acme",
            "repository": "widgets",
            "pull_number": 7,
            "branch_a": "feature-a",
            "branch_b": "feature-b",
            "base_a": "",
            "base_b": "",
            "base_merge": ""
        }"#;
        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert!(record.conflicts.is_empty());
        assert!(record.modified_lines.is_empty());
        assert!(record.created_at.is_none());
        assert!(!record.has_diffs());
    }

    #[test]
    fn test_conflict_aliases() {
        let json = r#"{
            "type": "OA",
            "interference": [
                {"location": {"file": "pkg/Foo.java", "line": 10}},
                {"location": {"file": "pkg/Foo.java", "line": 12}}
            ]
        }"#;
        let conflict: Conflict = serde_json::from_str(json).unwrap();
        assert_eq!(conflict.kind.as_deref(), Some("OA"));
        assert_eq!(conflict.start_line(), 10);
        assert_eq!(conflict.end_line(), 12);
        assert!(conflict.events[0].stack_trace.is_none());
    }

    #[test]
    fn test_modified_line_aliases() {
        let json = r#"{"file": "Foo.java", "leftAdded": [20], "leftRemoved": []}"#;
        let ml: ModifiedLine = serde_json::from_str(json).unwrap();
        assert_eq!(ml.left_added, vec![20]);
        assert!(ml.left_removed.is_empty());
    }

    #[test]
    fn test_degenerate_conflict_lines_default_to_zero() {
        let conflict = Conflict {
            kind: None,
            label: None,
            events: vec![],
        };
        assert_eq!(conflict.start_line(), 0);
        assert_eq!(conflict.end_line(), 0);
    }
}
