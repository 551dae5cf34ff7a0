//! SNOMED CT code tables for symptoms and RMD conditions.
//!
//! Codes are illustrative demonstration values, not a clinically validated
//! terminology binding.

use rmd_types::SymptomName;

pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";
pub const RISK_PROBABILITY_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/risk-probability";
pub const OBSERVATION_CATEGORY_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/observation-category";
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";
pub const NHS_NUMBER_SYSTEM: &str = "https://fhir.nhs.uk/Id/nhs-number";
pub const PATIENT_REF_SYSTEM: &str = "urn:rmd-health:patient-ref";

/// SNOMED code and display for a canonical symptom.
pub fn symptom_code(name: SymptomName) -> (&'static str, &'static str) {
    match name {
        SymptomName::JointPain => ("57676002", "Joint pain"),
        SymptomName::MultipleJointsAffected => ("202322003", "Polyarthralgia"),
        SymptomName::MorningStiffness => ("271706000", "Morning stiffness"),
        SymptomName::JointSwelling => ("298158008", "Joint swelling"),
        SymptomName::JointRedness => ("248491001", "Redness of joint"),
        SymptomName::Fatigue => ("84229001", "Fatigue"),
        SymptomName::ReducedMobility => ("8510008", "Reduced mobility"),
        SymptomName::Fever => ("386661006", "Fever"),
        SymptomName::WeightLoss => ("89362005", "Weight loss"),
        SymptomName::SkinRash => ("271807003", "Skin rash"),
    }
}

/// SNOMED code and display for a condition name, when one is known.
pub fn condition_code(condition: &str) -> Option<(&'static str, &'static str)> {
    match condition {
        "Rheumatoid Arthritis" => Some(("69896004", "Rheumatoid arthritis")),
        "Osteoarthritis" => Some(("396275006", "Osteoarthritis")),
        "Psoriatic Arthritis" => Some(("33339001", "Psoriatic arthritis")),
        "Ankylosing Spondylitis" => Some(("9631008", "Ankylosing spondylitis")),
        "Gout" => Some(("90560007", "Gout")),
        "Systemic Lupus Erythematosus" | "Systemic Lupus Erythematosus (SLE)" => {
            Some(("55464009", "Systemic lupus erythematosus"))
        }
        "Fibromyalgia" => Some(("203082005", "Fibromyalgia")),
        "Polymyalgia Rheumatica" => Some(("65323003", "Polymyalgia rheumatica")),
        _ => None,
    }
}
