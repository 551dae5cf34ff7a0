//! FHIR RiskAssessment resource for the generated assessment.

use chrono::Utc;
use rmd_types::{RiskAssessment as Assessment, RiskLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codes::{condition_code, RISK_PROBABILITY_SYSTEM, SNOMED_SYSTEM};
use crate::elements::{CodeableConcept, Reference};

/// One predicted outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub outcome: CodeableConcept,
    pub qualitative_risk: CodeableConcept,
    pub probability_decimal: f64,
    pub rationale: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub resource_type: String,
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    pub occurrence_date_time: String,
    pub performer: Reference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub basis: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prediction: Vec<Prediction>,
    pub mitigation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<serde_json::Value>,
}

fn risk_concept(level: RiskLevel) -> CodeableConcept {
    let (code, display, text) = match level {
        RiskLevel::High => ("high", "High likelihood", "High Risk"),
        RiskLevel::Moderate => ("moderate", "Moderate likelihood", "Moderate Risk"),
        RiskLevel::Low => ("low", "Low likelihood", "Low Risk"),
    };
    CodeableConcept::coded(RISK_PROBABILITY_SYSTEM, code, display, text)
}

impl RiskAssessment {
    /// Build the RiskAssessment resource, with one prediction per likely
    /// condition and the screening observations as basis.
    pub fn from_assessment(
        assessment: &Assessment,
        patient_ref: &str,
        observation_refs: &[String],
    ) -> Self {
        // Truncate by characters, not bytes; reasoning is free model text.
        let rationale: String = assessment.reasoning.chars().take(200).collect();

        let prediction = assessment
            .likely_conditions
            .iter()
            .map(|condition| {
                let outcome = match condition_code(condition) {
                    Some((code, display)) => {
                        CodeableConcept::coded(SNOMED_SYSTEM, code, display, condition)
                    }
                    None => CodeableConcept {
                        coding: Vec::new(),
                        text: Some(condition.clone()),
                    },
                };
                Prediction {
                    outcome,
                    qualitative_risk: risk_concept(assessment.risk_level),
                    probability_decimal: assessment.confidence_score,
                    rationale: rationale.clone(),
                }
            })
            .collect();

        let mut extension = Vec::new();
        if !assessment.red_flags_identified.is_empty() {
            extension.push(serde_json::json!({
                "url": "http://rmd-health.demo/fhir/StructureDefinition/red-flags",
                "valueString": assessment.red_flags_identified.join("; ")
            }));
        }

        Self {
            resource_type: "RiskAssessment".to_string(),
            id: Uuid::new_v4().to_string(),
            status: "final".to_string(),
            subject: Some(Reference::to(format!("Patient/{patient_ref}"))),
            occurrence_date_time: Utc::now().to_rfc3339(),
            performer: Reference {
                reference: "Device/rmd-health-ai-agent".to_string(),
                display: Some("RMD-Health AI Screening Agent".to_string()),
            },
            basis: observation_refs
                .iter()
                .map(|id| Reference::to(format!("Observation/{id}")))
                .collect(),
            prediction,
            mitigation: assessment.recommended_next_step.clone(),
            note: vec![serde_json::json!({"text": assessment.reasoning})],
            extension,
        }
    }
}
