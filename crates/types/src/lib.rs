//! # RMD Types
//!
//! Shared data model for the RMD screening system.
//!
//! This crate contains the boundary types exchanged between the analysis
//! engines, the orchestrator, and external collaborators:
//! - [`Symptom`] and the fixed [`SymptomName`] vocabulary
//! - [`PatientScreening`] (one encounter's worth of input)
//! - [`RiskAssessment`] (the primary output)
//!
//! **No behaviour beyond validation and rendering helpers**: scoring, pattern
//! analysis, and explanation generation belong in `rmd-core` and
//! `rmd-explain`.

pub mod assessment;
pub mod screening;
pub mod symptom;

pub use assessment::{RiskAssessment, RiskLevel};
pub use screening::{PatientScreening, Sex};
pub use symptom::{Symptom, SymptomName};

/// Errors raised when a screening fails structural validation.
///
/// A [`ValidationError`] is surfaced to the caller immediately; an assessment
/// is never attempted on invalid input.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("age must be between 0 and 120, got {0}")]
    AgeOutOfRange(u32),
    #[error("severity for '{name}' must be between 0 and 10, got {severity}")]
    SeverityOutOfRange { name: String, severity: u32 },
    #[error("patient_id cannot be empty")]
    EmptyPatientId,
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
