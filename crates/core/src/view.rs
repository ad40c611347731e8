//! Review view assembly.
//!
//! [`ReviewView`] ties the components together for one pull request: it
//! renders the three diff panes (base vs A, base vs B, base vs merge),
//! runs line attribution over the merge pane, orders the conflict list,
//! and owns the single active highlight.
//!
//! Everything here is single-threaded and event-driven: each entry point
//! runs to completion, and pane rendering plus attribution is a full,
//! idempotent recompute on every relevant input change.

use tracing::{info, warn};

use crate::conflict::{
    ActiveConflictHighlighter, ActiveHighlight, ConflictLocationResolver, ConflictOrderer,
    DiffLineAttributor,
};
use crate::errors::{RenderError, ResolveError};
use crate::models::{AnalysisRecord, Conflict, ResolvedSpan};
use crate::render::{render_unified_diff, RenderedDiff};

/// Which diff pane of the three-way view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Base vs branch A.
    BaseA,
    /// Base vs branch B.
    BaseB,
    /// Base vs merge result.
    Merge,
}

/// Top-level display state of the review view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No analysis record, or a record carrying no diff text at all.
    NotAnalyzed,
    /// Diffs present but the conflict list is empty.
    NoConflicts,
    /// Diffs and conflicts present.
    Ready,
}

/// The assembled review view for one pull request.
pub struct ReviewView {
    record: Option<AnalysisRecord>,
    base_a: RenderedDiff,
    base_b: RenderedDiff,
    merge: RenderedDiff,
    /// Conflicts in display order.
    conflicts: Vec<Conflict>,
    /// The single live highlight, always on the merge pane.
    active: ActiveHighlight,
}

impl ReviewView {
    /// The "no analysis run yet" view.
    pub fn empty() -> Self {
        Self {
            record: None,
            base_a: RenderedDiff::default(),
            base_b: RenderedDiff::default(),
            merge: RenderedDiff::default(),
            conflicts: Vec::new(),
            active: ActiveHighlight::default(),
        }
    }

    /// Build the view from a fetched analysis record.
    ///
    /// Renders all three panes, attributes the merge pane's changed lines
    /// by contributing side, and orders the conflict list for display.
    pub fn from_record(record: AnalysisRecord) -> Result<Self, RenderError> {
        let base_a = render_unified_diff(&record.base_a)?;
        let base_b = render_unified_diff(&record.base_b)?;
        let mut merge = render_unified_diff(&record.base_merge)?;

        DiffLineAttributor::attribute(&mut merge.files, &record.modified_lines);
        let conflicts = ConflictOrderer::order(record.conflicts.clone());

        info!(
            owner = %record.owner,
            repo = %record.repository,
            pull_number = record.pull_number,
            conflicts = conflicts.len(),
            "assembled review view"
        );
        Ok(Self {
            record: Some(record),
            base_a,
            base_b,
            merge,
            conflicts,
            active: ActiveHighlight::default(),
        })
    }

    pub fn state(&self) -> ViewState {
        match &self.record {
            None => ViewState::NotAnalyzed,
            Some(record) if !record.has_diffs() => ViewState::NotAnalyzed,
            Some(_) if self.conflicts.is_empty() => ViewState::NoConflicts,
            Some(_) => ViewState::Ready,
        }
    }

    /// Branch display names `(branch_a, branch_b)`, if analyzed.
    pub fn branch_names(&self) -> Option<(&str, &str)> {
        self.record
            .as_ref()
            .map(|r| (r.branch_a.as_str(), r.branch_b.as_str()))
    }

    /// Conflicts in display order.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn pane(&self, pane: Pane) -> &RenderedDiff {
        match pane {
            Pane::BaseA => &self.base_a,
            Pane::BaseB => &self.base_b,
            Pane::Merge => &self.merge,
        }
    }

    /// Select the conflict at `index`, swapping the active highlight on
    /// the merge pane.
    ///
    /// The previous highlight is always cleared first; selection is
    /// atomic from the viewer's perspective. A conflict whose location
    /// cannot be resolved leaves no highlight and surfaces its error to
    /// the caller — it never poisons the rest of the view.
    pub fn select_conflict(&mut self, index: usize) -> Result<ResolvedSpan, ResolveError> {
        let Some(conflict) = self.conflicts.get(index) else {
            ActiveConflictHighlighter::clear(&mut self.merge.files, &self.active);
            self.active = ActiveHighlight::default();
            return Err(ResolveError::NoEvents);
        };

        match ConflictLocationResolver::resolve(conflict) {
            Ok(span) => {
                self.active =
                    ActiveConflictHighlighter::select(&span, &mut self.merge.files, &self.active);
                Ok(span)
            }
            Err(e) => {
                warn!(index, error = %e, "conflict location unavailable");
                ActiveConflictHighlighter::clear(&mut self.merge.files, &self.active);
                self.active = ActiveHighlight::default();
                Err(e)
            }
        }
    }

    /// Drop the active highlight.
    pub fn clear_selection(&mut self) {
        ActiveConflictHighlighter::clear(&mut self.merge.files, &self.active);
        self.active = ActiveHighlight::default();
    }

    /// The current highlight set (empty when nothing is selected).
    pub fn active_highlight(&self) -> &ActiveHighlight {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterferenceEvent, Location, ModifiedLine};

    const MERGE_DIFF: &str = "\
diff --git a/pkg/Foo.java b/pkg/Foo.java
--- a/pkg/Foo.java
+++ b/pkg/Foo.java
@@ -9,3 +9,4 @@
 ctx
+line ten
+line eleven
 ctx
";

    fn record(conflicts: Vec<Conflict>, modified: Vec<ModifiedLine>) -> AnalysisRecord {
        AnalysisRecord {
            uuid: "u".into(),
            owner: "acme".into(),
            repository: "widgets".into(),
            pull_number: 1,
            branch_a: "left".into(),
            branch_b: "right".into(),
            base_a: String::new(),
            base_b: String::new(),
            base_merge: MERGE_DIFF.into(),
            created_at: None,
            conflicts,
            modified_lines: modified,
        }
    }

    fn conflict_at(file: &str, from: u32, to: u32) -> Conflict {
        Conflict {
            kind: None,
            label: None,
            events: vec![
                InterferenceEvent {
                    location: Location {
                        file: file.into(),
                        line: from,
                    },
                    stack_trace: None,
                },
                InterferenceEvent {
                    location: Location {
                        file: file.into(),
                        line: to,
                    },
                    stack_trace: None,
                },
            ],
        }
    }

    #[test]
    fn test_absence_states() {
        assert_eq!(ReviewView::empty().state(), ViewState::NotAnalyzed);

        let mut no_diffs = record(vec![], vec![]);
        no_diffs.base_merge = String::new();
        let view = ReviewView::from_record(no_diffs).unwrap();
        assert_eq!(view.state(), ViewState::NotAnalyzed);

        let view = ReviewView::from_record(record(vec![], vec![])).unwrap();
        assert_eq!(view.state(), ViewState::NoConflicts);

        let view =
            ReviewView::from_record(record(vec![conflict_at("pkg/Foo.java", 10, 11)], vec![]))
                .unwrap();
        assert_eq!(view.state(), ViewState::Ready);
    }

    #[test]
    fn test_merge_pane_is_attributed_on_build() {
        let view = ReviewView::from_record(record(
            vec![],
            vec![ModifiedLine {
                file: "pkg/Foo.java".into(),
                left_added: vec![10],
                left_removed: vec![],
            }],
        ))
        .unwrap();

        let lines = &view.pane(Pane::Merge).files[0].lines;
        let tagged: Vec<_> = lines.iter().filter(|l| l.side.is_some()).collect();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].content, "line ten");
    }

    #[test]
    fn test_select_conflict_highlights_merge_pane() {
        let mut view =
            ReviewView::from_record(record(vec![conflict_at("pkg/Foo.java", 10, 11)], vec![]))
                .unwrap();
        let span = view.select_conflict(0).unwrap();
        assert_eq!(span.file, "pkg/Foo.java");
        assert_eq!(view.active_highlight().line_indexes.len(), 2);

        view.clear_selection();
        assert!(view.active_highlight().is_empty());
        let highlighted = view.pane(Pane::Merge).files[0]
            .lines
            .iter()
            .any(|l| l.highlighted);
        assert!(!highlighted);
    }

    #[test]
    fn test_unresolvable_conflict_clears_highlight_locally() {
        let unresolvable = Conflict {
            kind: None,
            label: None,
            events: vec![InterferenceEvent {
                location: Location {
                    file: "UNKNOWN".into(),
                    line: 0,
                },
                stack_trace: None,
            }],
        };
        let mut view = ReviewView::from_record(record(
            vec![conflict_at("pkg/Foo.java", 10, 11), unresolvable],
            vec![],
        ))
        .unwrap();

        view.select_conflict(1).unwrap();
        assert!(!view.active_highlight().is_empty());

        // Conflict 0 sorts before 1; the UNKNOWN one has start_line 0 so
        // it is at index 0 after ordering.
        let err = view.select_conflict(0).unwrap_err();
        assert!(matches!(err, ResolveError::MissingStackTrace { .. }));
        assert!(view.active_highlight().is_empty());
        let any_highlight = view.pane(Pane::Merge).files[0]
            .lines
            .iter()
            .any(|l| l.highlighted);
        assert!(!any_highlight);
    }
}
