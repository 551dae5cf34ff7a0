//! # RMD FHIR
//!
//! FHIR R4 wire models for the screening encounter boundary.
//!
//! This crate provides **wire structs** and **translation helpers** from
//! the screening domain types to FHIR R4 resources:
//! - [`Patient`] — pseudonymised demographics (FHIR Patient)
//! - [`Observation`] — one clinical symptom (FHIR Observation)
//! - [`RiskAssessment`] — the generated assessment (FHIR RiskAssessment)
//! - [`Bundle`] — the collection container for one encounter
//!
//! The focus is FHIR semantic alignment and serialisation; there is no
//! FHIR REST transport here. Coding uses SNOMED CT for symptoms and
//! conditions and the standard terminology systems for categories and
//! risk probability.

pub mod bundle;
pub mod codes;
pub mod elements;
pub mod observation;
pub mod patient;
pub mod risk_assessment;

pub use bundle::{screening_bundle, Bundle, BundleEntry};
pub use elements::{CodeableConcept, Coding, HumanName, Identifier, Quantity, Reference};
pub use observation::Observation;
pub use patient::Patient;
pub use risk_assessment::{Prediction, RiskAssessment};

/// Errors returned by the FHIR boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("failed to serialise FHIR resource: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FhirResult<T> = std::result::Result<T, FhirError>;
