//! # RMD Core
//!
//! Pure analysis functions for the RMD screening system:
//! - [`scorer`] — the canonical risk tier and confidence computation
//! - [`patterns`] — named clinical pattern and red-flag detection
//! - [`differential`] — ranked candidate condition generation
//! - [`tools`] — the five named analysis tools exposed to the agent surface
//!
//! Every function in this crate is a pure, synchronous computation over a
//! borrowed [`rmd_types::PatientScreening`]: no I/O, no shared mutable
//! state, no hidden randomness. Independent assessments may run these
//! concurrently without coordination.
//!
//! **No orchestration concerns**: strategy selection, LLM calls, and
//! fallback handling belong in `rmd-agent`.

pub mod differential;
pub mod patterns;
pub mod scorer;
pub mod tools;

pub use differential::{differential, Differential, DifferentialEntry};
pub use patterns::{analyze, PatternAnalysis};
pub use scorer::{score, score_with_breakdown, ScoreBreakdown};

/// Errors raised by the by-name tool surface.
///
/// The analysis functions themselves never fail; errors only arise when a
/// tool is invoked by name with an unknown identifier or an unparseable
/// patient payload.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("failed to deserialise patient payload: {0}")]
    PatientDeserialization(serde_json::Error),
    #[error("invalid screening: {0}")]
    InvalidScreening(#[from] rmd_types::ValidationError),
}

pub type ScreeningResult<T> = std::result::Result<T, ScreeningError>;
