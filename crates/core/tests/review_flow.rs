//! End-to-end tests for the review flow: analysis record JSON in, ordered
//! conflicts out, selection resolving and highlighting onto the rendered
//! merge pane, with line attribution by contributing side.
//!
//! No network I/O: records are built from JSON literals matching the
//! analysis backend's wire schema.

use mergelens_core::conflict::ConflictLocationResolver;
use mergelens_core::models::{AnalysisRecord, Side};
use mergelens_core::render::LineKind;
use mergelens_core::view::{Pane, ReviewView, ViewState};

// ===========================================================================
// Fixtures
// ===========================================================================

const MERGE_DIFF: &str = "\
diff --git a/src/main/com/acme/Bar.java b/src/main/com/acme/Bar.java
--- a/src/main/com/acme/Bar.java
+++ b/src/main/com/acme/Bar.java
@@ -3,4 +3,6 @@
 context three
+added four
+added five
 context six
-removed five
 context seven
diff --git a/pkg/Foo.java b/pkg/Foo.java
--- a/pkg/Foo.java
+++ b/pkg/Foo.java
@@ -9,3 +9,4 @@
 ctx
+foo ten
+foo eleven
 ctx
";

fn record() -> AnalysisRecord {
    let json = serde_json::json!({
        "uuid": "review-1",
        "owner": "acme",
        "repository": "widgets",
        "pull_number": 42,
        "branch_a": "feature/login",
        "branch_b": "feature/logout",
        "base_a": "",
        "base_b": "",
        "base_merge": MERGE_DIFF,
        "dependencies": [
            {
                "type": "OA",
                "label": "method interference",
                "interference": [
                    { "location": { "file": "pkg/Foo.java", "line": 10 } },
                    { "location": { "file": "pkg/Foo.java", "line": 11 } }
                ]
            },
            {
                "type": "DEFAULT",
                "interference": [
                    {
                        "location": { "file": "UNKNOWN", "line": 0 },
                        "stackTrace": [
                            { "class": "com.acme.Bar", "line": 4 },
                            { "class": "com.acme.Main", "line": 88 }
                        ]
                    },
                    {
                        "location": { "file": "UNKNOWN", "line": 0 },
                        "stackTrace": [
                            { "class": "com.acme.Bar", "line": 5 }
                        ]
                    }
                ]
            }
        ],
        "modifiedLines": [
            { "file": "com/acme/Bar.java", "leftAdded": [4], "leftRemoved": [5] }
        ]
    });
    serde_json::from_value(json).expect("fixture record deserializes")
}

fn highlighted_contents(view: &ReviewView) -> Vec<String> {
    view.pane(Pane::Merge)
        .files
        .iter()
        .flat_map(|f| {
            f.lines
                .iter()
                .filter(|l| l.highlighted)
                .map(|l| l.content.clone())
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn full_flow_orders_attributes_and_highlights() {
    let view = ReviewView::from_record(record()).unwrap();
    assert_eq!(view.state(), ViewState::Ready);
    assert_eq!(
        view.branch_names(),
        Some(("feature/login", "feature/logout"))
    );

    // The UNKNOWN-located conflict sorts first (start line 0 < 10).
    let conflicts = view.conflicts();
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].kind.as_deref(), Some("DEFAULT"));
    assert_eq!(conflicts[1].kind.as_deref(), Some("OA"));

    // Attribution ran over the merge pane on build: insertion at new
    // line 4 and deletion at old line 5 of Bar.java are branch A's.
    let bar = &view.pane(Pane::Merge).files[0];
    let left_tagged: Vec<_> = bar
        .lines
        .iter()
        .filter(|l| l.side == Some(Side::Left))
        .collect();
    assert_eq!(left_tagged.len(), 2);
    assert_eq!(left_tagged[0].kind, LineKind::Insertion);
    assert_eq!(left_tagged[0].content, "added four");
    assert_eq!(left_tagged[1].kind, LineKind::Deletion);
    assert_eq!(left_tagged[1].content, "removed five");

    // The second pane's files stay untagged.
    let foo = &view.pane(Pane::Merge).files[1];
    assert!(foo.lines.iter().all(|l| l.side.is_none()));
}

#[test]
fn selection_resolves_through_stack_trace_and_swaps_highlight() {
    let mut view = ReviewView::from_record(record()).unwrap();

    // Conflict 0 is the UNKNOWN one: resolved via its stack frames.
    let span = view.select_conflict(0).unwrap();
    assert_eq!(span.file, "com/acme/Bar.java");
    assert_eq!((span.from_line, span.to_line), (4, 5));

    // Suffix matching locates the file despite the src/main prefix.
    let first = highlighted_contents(&view);
    assert!(first.contains(&"added four".to_string()));
    assert!(first.contains(&"added five".to_string()));

    // Selecting the explicitly-located conflict swaps the highlight.
    let span = view.select_conflict(1).unwrap();
    assert_eq!(span.file, "pkg/Foo.java");
    let second = highlighted_contents(&view);
    assert_eq!(second, vec!["foo ten".to_string(), "foo eleven".to_string()]);
}

#[test]
fn resolver_matches_backend_examples() {
    let view = ReviewView::from_record(record()).unwrap();

    let explicit = &view.conflicts()[1];
    let span = ConflictLocationResolver::resolve(explicit).unwrap();
    assert_eq!(span.file, "pkg/Foo.java");
    assert_eq!((span.from_line, span.to_line), (10, 11));
}

#[test]
fn empty_analysis_degrades_to_absence_states() {
    // No record at all.
    assert_eq!(ReviewView::empty().state(), ViewState::NotAnalyzed);

    // A record with no diff text: "no analysis run yet".
    let mut bare = record();
    bare.base_merge = String::new();
    bare.conflicts.clear();
    let view = ReviewView::from_record(bare).unwrap();
    assert_eq!(view.state(), ViewState::NotAnalyzed);

    // Diffs but no conflicts: "no conflicts found".
    let mut quiet = record();
    quiet.conflicts.clear();
    let view = ReviewView::from_record(quiet).unwrap();
    assert_eq!(view.state(), ViewState::NoConflicts);
}

#[test]
fn absent_optional_fields_are_tolerated_end_to_end() {
    let json = serde_json::json!({
        "uuid": "review-2",
        "owner": "acme",
        "repository": "widgets",
        "pull_number": 7,
        "branch_a": "a",
        "branch_b": "b",
        "base_a": "",
        "base_b": "",
        "base_merge": MERGE_DIFF
    });
    let record: AnalysisRecord = serde_json::from_value(json).unwrap();
    let view = ReviewView::from_record(record).unwrap();
    assert_eq!(view.state(), ViewState::NoConflicts);
    // No modified-line data: nothing gets a side tag.
    for file in &view.pane(Pane::Merge).files {
        assert!(file.lines.iter().all(|l| l.side.is_none()));
    }
}
