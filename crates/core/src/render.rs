//! Rendered diff model and unified-diff parsing.
//!
//! The analysis backend delivers diffs as pre-computed unified diff text.
//! This module parses that text into the structured per-file, per-line
//! groupings the conflict components operate on: each line carries its
//! change kind, its old/new line numbers, and two mutable presentation
//! tags (side attribution and highlight state).
//!
//! Rendered output is a derived artifact: it is recomputed in full
//! whenever the underlying diff text changes, never updated in place.

use serde::Serialize;
use tracing::debug;

use crate::errors::RenderError;
use crate::models::Side;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The kind of a rendered diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Unchanged context line.
    Context,
    /// Line added by the change.
    Insertion,
    /// Line removed by the change.
    Deletion,
    /// A `@@` hunk header.
    HunkHeader,
}

/// One rendered line of a diff file.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedLine {
    pub kind: LineKind,
    /// Line number in the pre-change numbering. `None` for insertions
    /// and hunk headers.
    pub old_line: Option<u32>,
    /// Line number in the post-change numbering. `None` for deletions
    /// and hunk headers.
    pub new_line: Option<u32>,
    /// Line content without the leading marker character.
    pub content: String,
    /// Merge side responsible for this change, set by the attributor.
    pub side: Option<Side>,
    /// Whether this line belongs to the active conflict highlight.
    pub highlighted: bool,
}

/// One file grouping of a rendered diff.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedFile {
    /// Display path, taken from the diff headers with the `a/`/`b/`
    /// prefix stripped. Separators are normalized to `/`.
    pub path: String,
    pub lines: Vec<RenderedLine>,
}

/// A fully rendered diff: an ordered list of file groupings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedDiff {
    pub files: Vec<RenderedFile>,
}

impl RenderedDiff {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ---------------------------------------------------------------------------
// File matching
// ---------------------------------------------------------------------------

/// Normalize path separators to `/`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// True when `path` matches `wanted`, tolerating path-root differences
/// between the analysis backend and the diff headers: exact match first,
/// then a suffix match on a `/` boundary.
pub fn path_matches(path: &str, wanted: &str) -> bool {
    let path = normalize_path(path);
    let wanted = normalize_path(wanted);
    if path == wanted {
        return true;
    }
    path.ends_with(&format!("/{wanted}")) || wanted.ends_with(&format!("/{path}"))
}

/// Find the file grouping matching `wanted`.
pub fn find_file<'a>(files: &'a [RenderedFile], wanted: &str) -> Option<&'a RenderedFile> {
    files.iter().find(|f| path_matches(&f.path, wanted))
}

/// Find the file grouping matching `wanted`, mutably.
pub fn find_file_mut<'a>(
    files: &'a mut [RenderedFile],
    wanted: &str,
) -> Option<&'a mut RenderedFile> {
    files.iter_mut().find(|f| path_matches(&f.path, wanted))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one unified diff text into a [`RenderedDiff`].
///
/// Empty input yields an empty diff. Unrecognized leading material (e.g.
/// `index` lines, mode changes) is skipped.
pub fn render_unified_diff(diff_text: &str) -> Result<RenderedDiff, RenderError> {
    let mut files: Vec<RenderedFile> = Vec::new();
    let mut current: Option<RenderedFile> = None;
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;
    // Header paths seen for the file being assembled.
    let mut minus_path: Option<String> = None;

    for raw in diff_text.lines() {
        if let Some(rest) = raw.strip_prefix("diff --git ") {
            if let Some(f) = current.take() {
                files.push(f);
            }
            minus_path = None;
            // Fallback display path from the `b/` half of the header; the
            // `+++` line below overrides it when present.
            let b_half = rest.split_whitespace().last().unwrap_or(rest);
            current = Some(RenderedFile {
                path: strip_prefix_marker(b_half),
                lines: Vec::new(),
            });
        } else if let (Some(rest), true) = (
            raw.strip_prefix("--- "),
            // Only a header position; inside a hunk this is a deleted line.
            current.as_ref().map_or(true, |f| f.lines.is_empty()),
        ) {
            minus_path = Some(strip_prefix_marker(rest));
            if current.is_none() {
                // Bare `---`/`+++` diff without a `diff --git` header.
                current = Some(RenderedFile {
                    path: String::new(),
                    lines: Vec::new(),
                });
            }
        } else if let (Some(rest), true) = (
            raw.strip_prefix("+++ "),
            current.as_ref().map_or(false, |f| f.lines.is_empty()),
        ) {
            if let Some(f) = current.as_mut() {
                let plus = strip_prefix_marker(rest);
                // `+++ /dev/null` means a deleted file; keep the old path.
                f.path = if plus == "/dev/null" {
                    minus_path.clone().unwrap_or_else(|| f.path.clone())
                } else {
                    plus
                };
            }
        } else if raw.starts_with("@@") {
            let (old_start, new_start) = parse_hunk_header(raw)?;
            old_line = old_start;
            new_line = new_start;
            if let Some(f) = current.as_mut() {
                f.lines.push(RenderedLine {
                    kind: LineKind::HunkHeader,
                    old_line: None,
                    new_line: None,
                    content: raw.to_string(),
                    side: None,
                    highlighted: false,
                });
            }
        } else if let Some(f) = current.as_mut() {
            if f.lines.is_empty() && !raw.starts_with(['+', '-', ' ']) {
                // Pre-hunk metadata: index lines, mode changes, etc.
                continue;
            }
            match raw.as_bytes().first() {
                Some(b'+') => {
                    f.lines.push(RenderedLine {
                        kind: LineKind::Insertion,
                        old_line: None,
                        new_line: Some(new_line),
                        content: raw[1..].to_string(),
                        side: None,
                        highlighted: false,
                    });
                    new_line += 1;
                }
                Some(b'-') => {
                    f.lines.push(RenderedLine {
                        kind: LineKind::Deletion,
                        old_line: Some(old_line),
                        new_line: None,
                        content: raw[1..].to_string(),
                        side: None,
                        highlighted: false,
                    });
                    old_line += 1;
                }
                Some(b' ') => {
                    f.lines.push(RenderedLine {
                        kind: LineKind::Context,
                        old_line: Some(old_line),
                        new_line: Some(new_line),
                        content: raw[1..].to_string(),
                        side: None,
                        highlighted: false,
                    });
                    old_line += 1;
                    new_line += 1;
                }
                // "\ No newline at end of file" and blank separators.
                _ => {}
            }
        }
    }
    if let Some(f) = current.take() {
        files.push(f);
    }

    debug!(file_count = files.len(), "rendered unified diff");
    Ok(RenderedDiff { files })
}

/// Strip the `a/` or `b/` prefix git puts on header paths.
fn strip_prefix_marker(path: &str) -> String {
    let path = path.trim();
    let stripped = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    normalize_path(stripped)
}

/// Parse `@@ -a,b +c,d @@ ...` into the `(a, c)` start lines.
fn parse_hunk_header(header: &str) -> Result<(u32, u32), RenderError> {
    let malformed = || RenderError::MalformedHunkHeader(header.to_string());

    let mut parts = header.split_whitespace();
    parts.next(); // leading "@@"
    let old_part = parts.next().ok_or_else(malformed)?;
    let new_part = parts.next().ok_or_else(malformed)?;

    let old_start = parse_range_start(old_part, '-').ok_or_else(malformed)?;
    let new_start = parse_range_start(new_part, '+').ok_or_else(malformed)?;
    Ok((old_start, new_start))
}

/// Parse the start line out of a `-a,b` / `+c,d` range (count optional).
fn parse_range_start(range: &str, marker: char) -> Option<u32> {
    let range = range.strip_prefix(marker)?;
    let start = range.split(',').next()?;
    start.parse().ok()
}
