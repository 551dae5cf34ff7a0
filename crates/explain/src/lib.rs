//! # RMD Explain
//!
//! Explainable-AI companion to the screening assessment:
//! - [`attribution`] — LIME/SHAP-style feature contributions
//! - [`counterfactual`] — "what would change the outcome" statements
//! - [`audit`] — reasoning traces, audit entries, and input hashing
//! - [`render`] — assembly of the complete [`XAIExplanation`] package with
//!   pre-rendered clinician, patient, and auditor views
//!
//! The attribution magnitudes here are deliberately independent of the
//! integer risk scorer in `rmd-core`: they exist purely to explain a
//! decision, never to compute the tier.
//!
//! No component in this crate calls external services; the only failure
//! mode is a patient payload that cannot be serialised for audit hashing.

pub mod attribution;
pub mod audit;
pub mod counterfactual;
pub mod render;

pub use attribution::{attribute, ContributionDirection, FeatureContribution};
pub use audit::{AuditEntry, ReasoningStep};
pub use counterfactual::counterfactuals;
pub use render::{render, UserRole, XAIExplanation};

#[derive(Debug, thiserror::Error)]
pub enum ExplanationError {
    #[error("failed to serialise patient data for audit hashing: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ExplanationResult<T> = std::result::Result<T, ExplanationError>;
