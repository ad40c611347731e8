//! Conflict location resolution.
//!
//! Turns a conflict's abstract boundary events into a concrete
//! [`ResolvedSpan`]. Locations in a real file resolve directly; the
//! `UNKNOWN` sentinel marks a synthetic location that must be recovered
//! from the captured stack trace instead.
//!
//! Resolution is pure: the input conflict is never mutated, and the
//! resolved span is threaded explicitly to downstream consumers.

use tracing::debug;

use crate::errors::ResolveError;
use crate::models::{Conflict, InterferenceEvent, ResolvedSpan, UNKNOWN_FILE};
use crate::render::normalize_path;

/// Source-file extension appended to stack-trace-derived paths. The
/// analysis backend targets the JVM, so traces name Java classes.
const SOURCE_EXTENSION: &str = ".java";

/// Stateless conflict location resolution.
pub struct ConflictLocationResolver;

impl ConflictLocationResolver {
    /// Resolve a conflict's file/line span.
    ///
    /// When the reported file is real, the span uses the literal reported
    /// lines with separators normalized. When it is `UNKNOWN`, both
    /// boundary events must carry a non-empty stack trace; the file is
    /// derived from the first frame's qualified class name and the lines
    /// from the first frame of each boundary event.
    pub fn resolve(conflict: &Conflict) -> Result<ResolvedSpan, ResolveError> {
        let first = conflict.events.first().ok_or(ResolveError::NoEvents)?;
        let last = conflict.events.last().ok_or(ResolveError::NoEvents)?;

        if first.location.file != UNKNOWN_FILE {
            return Ok(ResolvedSpan {
                file: normalize_path(&first.location.file),
                from_line: first.location.line,
                to_line: last.location.line,
            });
        }

        let head = boundary_frame(first, "first")?;
        let tail = boundary_frame(last, "last")?;

        let file = format!("{}{}", head.class.replace('.', "/"), SOURCE_EXTENSION);
        let span = ResolvedSpan {
            file,
            from_line: head.line,
            to_line: tail.line,
        };
        debug!(
            file = %span.file,
            from = span.from_line,
            to = span.to_line,
            "resolved UNKNOWN location from stack trace"
        );
        Ok(span)
    }
}

/// First stack frame of a boundary event, or the per-boundary error.
fn boundary_frame<'a>(
    event: &'a InterferenceEvent,
    boundary: &'static str,
) -> Result<&'a crate::models::StackFrame, ResolveError> {
    event
        .first_frame()
        .ok_or(ResolveError::MissingStackTrace { boundary })
}
