//! Error types for the mergelens core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.
//!
//! Propagation policy: resolution and attribution errors are per-item and
//! non-fatal to the overall view. Only a missing analysis record changes
//! the top-level view state.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Attribution(#[from] AttributionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Analysis fetch errors
// ---------------------------------------------------------------------------

/// Errors from the analysis backend client.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// HTTP-level transport error (network, TLS, etc.).
    #[error("analysis HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("analysis API error (HTTP {status}): {body}")]
    ApiError { status: u16, body: String },

    /// No analysis record exists for the requested pull request.
    #[error("no analysis found for {owner}/{repo}#{pull_number}")]
    NotFound {
        owner: String,
        repo: String,
        pull_number: u64,
    },

    /// JSON deserialization failure.
    #[error("analysis response parse error: {0}")]
    ParseError(String),
}

// ---------------------------------------------------------------------------
// Location resolution errors
// ---------------------------------------------------------------------------

/// Errors from conflict location resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A conflict in an unresolvable file lacks the stack-trace fallback
    /// needed to resolve it. Fatal to resolving that conflict only.
    #[error("conflict at UNKNOWN location has no stack trace on its {boundary} event")]
    MissingStackTrace {
        /// Which boundary event lacked the trace: "first" or "last".
        boundary: &'static str,
    },

    /// The conflict carries no interference events at all.
    #[error("conflict has no interference events")]
    NoEvents,
}

// ---------------------------------------------------------------------------
// Attribution errors
// ---------------------------------------------------------------------------

/// Errors from the diff line attribution pass.
#[derive(Debug, Error)]
pub enum AttributionError {
    /// A modified-line record references a file absent from the rendered
    /// diff. Indicates an inconsistency between the two data sources.
    #[error("modified-line record for '{file}' has no matching file in the diff")]
    DiffFileNotFound { file: String },
}

// ---------------------------------------------------------------------------
// Diff rendering errors
// ---------------------------------------------------------------------------

/// Errors from unified-diff parsing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A `@@` hunk header could not be parsed.
    #[error("malformed hunk header: {0}")]
    MalformedHunkHeader(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A required environment variable is not set.
    #[error("required environment variable '{var}' is not set (referenced by config field '{field}')")]
    EnvVarMissing { var: String, field: String },

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
