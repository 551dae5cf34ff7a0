//! FHIR Observation resource for one clinical symptom.

use chrono::Utc;
use rmd_types::Symptom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codes::{symptom_code, OBSERVATION_CATEGORY_SYSTEM, SNOMED_SYSTEM, UCUM_SYSTEM};
use crate::elements::{CodeableConcept, Quantity, Reference};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub resource_type: String,
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<serde_json::Value>,
}

impl Observation {
    /// Build the Observation for one symptom row.
    ///
    /// Severity and duration, when supplied, become SNOMED-coded
    /// components (246112005 Severity, 103335007 Duration in days).
    pub fn from_symptom(symptom: &Symptom, patient_ref: &str) -> Self {
        let (code, display) = symptom_code(symptom.name);

        let mut component = Vec::new();
        if let Some(severity) = symptom.severity {
            component.push(serde_json::json!({
                "code": {
                    "coding": [{
                        "system": SNOMED_SYSTEM,
                        "code": "246112005",
                        "display": "Severity"
                    }]
                },
                "valueInteger": severity
            }));
        }
        if let Some(days) = symptom.duration_days {
            let quantity = Quantity {
                value: f64::from(days),
                unit: "days".to_string(),
                system: UCUM_SYSTEM.to_string(),
                code: "d".to_string(),
            };
            component.push(serde_json::json!({
                "code": {
                    "coding": [{
                        "system": SNOMED_SYSTEM,
                        "code": "103335007",
                        "display": "Duration"
                    }]
                },
                "valueQuantity": quantity
            }));
        }

        Self {
            resource_type: "Observation".to_string(),
            id: Uuid::new_v4().to_string(),
            status: "final".to_string(),
            category: vec![CodeableConcept::coded(
                OBSERVATION_CATEGORY_SYSTEM,
                "exam",
                "Exam",
                "Clinical Examination",
            )],
            code: CodeableConcept::coded(SNOMED_SYSTEM, code, display, display),
            subject: Some(Reference::to(format!("Patient/{patient_ref}"))),
            effective_date_time: Some(Utc::now().to_rfc3339()),
            value_boolean: Some(symptom.present),
            component,
        }
    }
}
