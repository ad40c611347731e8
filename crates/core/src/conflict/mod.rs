//! Conflict display logic: ordering, location resolution, highlighting,
//! and diff line attribution.

pub mod attributor;
pub mod highlighter;
pub mod locator;
pub mod orderer;

pub use attributor::DiffLineAttributor;
pub use highlighter::{ActiveConflictHighlighter, ActiveHighlight};
pub use locator::ConflictLocationResolver;
pub use orderer::ConflictOrderer;
