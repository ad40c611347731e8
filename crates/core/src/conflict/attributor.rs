//! Diff line attribution.
//!
//! Recolors each changed line of the rendered merge diff by the merge
//! side that contributed it. Only the left side (branch A) is recorded by
//! the analysis backend; unmatched changed lines keep their default
//! styling, implicitly belonging to branch B.
//!
//! This is a pure relabeling pass: it never changes line content,
//! ordering, or file grouping, only the per-line side tag. Running it
//! twice with the same inputs produces the same assignment.

use tracing::{debug, warn};

use crate::errors::AttributionError;
use crate::models::{ModifiedLine, Side};
use crate::render::{find_file_mut, LineKind, RenderedFile};

/// Assigns per-line side tags from modified-line classifications.
pub struct DiffLineAttributor;

impl DiffLineAttributor {
    /// Attribute every file of the rendered diff, once per diff render.
    ///
    /// A modified-line record whose file is absent from the diff is an
    /// inconsistency between the two data sources: it is logged and
    /// skipped, never aborting attribution of the remaining files.
    pub fn attribute(files: &mut [RenderedFile], modified: &[ModifiedLine]) {
        for record in modified {
            if let Err(e) = Self::attribute_file(files, record) {
                warn!(file = %record.file, error = %e, "skipping attribution");
            }
        }
    }

    /// Attribute one modified-line record, surfacing the failure.
    pub fn attribute_file(
        files: &mut [RenderedFile],
        record: &ModifiedLine,
    ) -> Result<(), AttributionError> {
        let file = find_file_mut(files, &record.file).ok_or_else(|| {
            AttributionError::DiffFileNotFound {
                file: record.file.clone(),
            }
        })?;

        let mut tagged = 0usize;
        for line in &mut file.lines {
            let matched = match line.kind {
                LineKind::Insertion => line
                    .new_line
                    .map_or(false, |n| record.left_added.contains(&n)),
                LineKind::Deletion => line
                    .old_line
                    .map_or(false, |n| record.left_removed.contains(&n)),
                _ => false,
            };
            if matched {
                line.side = Some(Side::Left);
                tagged += 1;
            }
        }

        debug!(file = %file.path, tagged, "attributed diff lines");
        Ok(())
    }
}
