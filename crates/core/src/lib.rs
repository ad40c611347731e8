//! mergelens core library.
//!
//! Displays, for a pull request, a three-way diff (branch A vs base,
//! branch B vs base, merge result vs base) with a list of detected
//! semantic conflicts overlaid onto it: conflict locations are resolved
//! onto rendered diff lines, and each changed line is attributed to the
//! merge side that produced it.

pub mod analysis;
pub mod config;
pub mod conflict;
pub mod errors;
pub mod models;
pub mod render;
pub mod view;

// Re-exports for convenience.
pub use analysis::{AnalysisApi, AnalysisClient};
pub use config::AppConfig;
pub use models::AnalysisRecord;
pub use view::ReviewView;
