//! FHIR Patient resource for pseudonymised screening patients.
//!
//! GDPR handling follows the screening product's data-minimisation rules:
//! no name is carried, the NHS-number-system identifier is a clearly
//! marked pseudonym derived from the internal patient reference, and the
//! resource is tagged as pseudonymised data.

use rmd_types::Sex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codes::{NHS_NUMBER_SYSTEM, PATIENT_REF_SYSTEM};
use crate::elements::{HumanName, Identifier};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub resource_type: String,
    pub id: String,
    pub meta: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<serde_json::Value>,
}

impl Patient {
    /// Build the pseudonymised Patient resource for a screening encounter.
    pub fn from_screening(patient_id: &str, age: u32, sex: Sex) -> Self {
        let gender = match sex {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
            Sex::Unspecified => "unknown",
        };

        Self {
            resource_type: "Patient".to_string(),
            id: patient_id.to_string(),
            meta: serde_json::json!({
                "profile": ["https://fhir.hl7.org.uk/StructureDefinition/UKCore-Patient"],
                "security": [{
                    "system": "http://terminology.hl7.org/CodeSystem/v3-Confidentiality",
                    "code": "R",
                    "display": "Restricted"
                }],
                "tag": [{
                    "system": "urn:rmd-health:data-classification",
                    "code": "PSEUDONYMIZED",
                    "display": "Pseudonymized Patient Data"
                }]
            }),
            identifier: vec![
                Identifier {
                    system: Some(NHS_NUMBER_SYSTEM.to_string()),
                    value: format!("DEMO-{}", pseudonym(patient_id)),
                },
                Identifier {
                    system: Some(PATIENT_REF_SYSTEM.to_string()),
                    value: patient_id.to_string(),
                },
            ],
            name: Vec::new(),
            gender: Some(gender.to_string()),
            extension: vec![serde_json::json!({
                "url": "http://hl7.org/fhir/StructureDefinition/patient-age",
                "valueInteger": age
            })],
        }
    }
}

/// Pseudonymised NHS-style identifier: 10 uppercase hex characters derived
/// from the internal patient reference. Not a real NHS number.
fn pseudonym(patient_id: &str) -> String {
    let digest = Sha256::digest(format!("NHS-{patient_id}").as_bytes());
    digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()[..10]
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_is_pseudonymised_with_no_name() {
        let patient = Patient::from_screening("A1B2C3D4", 52, Sex::Female);
        assert!(patient.name.is_empty());
        assert_eq!(patient.gender.as_deref(), Some("female"));
        assert!(patient.identifier[0].value.starts_with("DEMO-"));
        assert_eq!(patient.identifier[1].value, "A1B2C3D4");
    }

    #[test]
    fn pseudonym_is_stable_and_ten_characters() {
        let first = pseudonym("A1B2C3D4");
        let second = pseudonym("A1B2C3D4");
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
        assert_ne!(first, pseudonym("E5F6A7B8"));
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let patient = Patient::from_screening("A1B2C3D4", 30, Sex::Unspecified);
        let json = serde_json::to_value(&patient).expect("serialisation should succeed");
        assert_eq!(json["resourceType"], "Patient");
        assert_eq!(json["gender"], "unknown");
        assert_eq!(json["extension"][0]["valueInteger"], 30);
    }
}
