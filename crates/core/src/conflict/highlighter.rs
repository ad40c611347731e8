//! Active conflict highlighting.
//!
//! At most one conflict's lines carry the highlight flag at any time.
//! Selecting a new conflict always clears the previous set first, so no
//! state ever shows stale and new highlights together.

use tracing::debug;

use crate::models::ResolvedSpan;
use crate::render::{find_file_mut, LineKind, RenderedFile};

/// The set of rendered lines currently marked as the selected conflict,
/// addressed as (file path, line index) so clearing survives re-lookup.
#[derive(Debug, Clone, Default)]
pub struct ActiveHighlight {
    /// Path of the file containing the highlighted lines.
    pub file: Option<String>,
    /// Indices into that file's line vector.
    pub line_indexes: Vec<usize>,
}

impl ActiveHighlight {
    pub fn is_empty(&self) -> bool {
        self.line_indexes.is_empty()
    }
}

/// Swaps the single active highlight between conflicts.
pub struct ActiveConflictHighlighter;

impl ActiveConflictHighlighter {
    /// Select the lines covered by `span` as the new highlight.
    ///
    /// Clears every line referenced by `current` first, then marks every
    /// line of the matching file whose line number falls within
    /// `[from_line, to_line]` inclusive. A span pointing at a file absent
    /// from the diff yields an empty highlight — a legitimate result, not
    /// a fault.
    pub fn select(
        span: &ResolvedSpan,
        files: &mut [RenderedFile],
        current: &ActiveHighlight,
    ) -> ActiveHighlight {
        Self::clear(files, current);

        let Some(file) = find_file_mut(files, &span.file) else {
            debug!(file = %span.file, "conflict file not present in diff");
            return ActiveHighlight::default();
        };

        let mut line_indexes = Vec::new();
        for (idx, line) in file.lines.iter_mut().enumerate() {
            if line.kind == LineKind::HunkHeader {
                continue;
            }
            // Deletions have no post-change number; match them by their
            // pre-change number so a span covering a removal lights up.
            let number = match line.new_line {
                Some(n) => n,
                None => match line.old_line {
                    Some(n) => n,
                    None => continue,
                },
            };
            if number >= span.from_line && number <= span.to_line {
                line.highlighted = true;
                line_indexes.push(idx);
            }
        }

        debug!(
            file = %file.path,
            count = line_indexes.len(),
            "highlighted conflict lines"
        );
        ActiveHighlight {
            file: Some(file.path.clone()),
            line_indexes,
        }
    }

    /// Remove the highlight flag from every line referenced by `current`.
    pub fn clear(files: &mut [RenderedFile], current: &ActiveHighlight) {
        let Some(path) = current.file.as_deref() else {
            return;
        };
        let Some(file) = find_file_mut(files, path) else {
            return;
        };
        for &idx in &current.line_indexes {
            if let Some(line) = file.lines.get_mut(idx) {
                line.highlighted = false;
            }
        }
    }
}
