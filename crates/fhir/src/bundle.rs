//! FHIR Bundle assembly for one screening encounter.

use chrono::Utc;
use rmd_types::{PatientScreening, RiskAssessment as Assessment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::observation::Observation;
use crate::patient::Patient;
use crate::risk_assessment::RiskAssessment;
use crate::FhirResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: serde_json::Value,
}

/// A `collection`-type container for the encounter's resources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    pub id: String,
    pub r#type: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    pub fn collection() -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: Uuid::new_v4().to_string(),
            r#type: "collection".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            entry: Vec::new(),
        }
    }

    /// Add a resource, deriving the `urn:uuid:` full URL from its `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError::Serialization`] when the resource cannot
    /// be serialised.
    pub fn add_resource<T: Serialize>(&mut self, resource: &T) -> FhirResult<()> {
        let value = serde_json::to_value(resource)?;
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.entry.push(BundleEntry {
            full_url: format!("urn:uuid:{id}"),
            resource: value,
        });
        Ok(())
    }
}

/// Build the complete screening-encounter bundle: the pseudonymised
/// Patient, one Observation per symptom row, and the RiskAssessment.
pub fn screening_bundle(
    patient: &PatientScreening,
    assessment: &Assessment,
) -> FhirResult<Bundle> {
    let mut bundle = Bundle::collection();

    let fhir_patient = Patient::from_screening(&patient.patient_id, patient.age, patient.sex);
    bundle.add_resource(&fhir_patient)?;

    let mut observation_ids = Vec::with_capacity(patient.symptoms.len());
    for symptom in &patient.symptoms {
        let observation = Observation::from_symptom(symptom, &patient.patient_id);
        observation_ids.push(observation.id.clone());
        bundle.add_resource(&observation)?;
    }

    let risk_assessment =
        RiskAssessment::from_assessment(assessment, &patient.patient_id, &observation_ids);
    bundle.add_resource(&risk_assessment)?;

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rmd_types::{screening::samples, RiskLevel};

    fn assessment() -> Assessment {
        Assessment {
            risk_level: RiskLevel::High,
            likely_conditions: vec!["Rheumatoid Arthritis".to_string()],
            reasoning: "Polyarticular inflammatory pattern.".to_string(),
            recommended_next_step: "Urgent rheumatology referral recommended".to_string(),
            confidence_score: 0.86,
            red_flags_identified: vec!["Multiple joint involvement".to_string()],
            assessment_timestamp: Utc::now(),
        }
    }

    #[test]
    fn screening_bundle_contains_patient_observations_and_assessment() {
        let patient = samples::high_risk();
        let bundle = screening_bundle(&patient, &assessment()).expect("bundle should build");

        // One Patient + ten symptom Observations + one RiskAssessment.
        assert_eq!(bundle.entry.len(), 12);
        assert_eq!(bundle.r#type, "collection");
        assert_eq!(bundle.entry[0].resource["resourceType"], "Patient");
        assert_eq!(bundle.entry[1].resource["resourceType"], "Observation");
        assert_eq!(
            bundle.entry[11].resource["resourceType"],
            "RiskAssessment"
        );
    }

    #[test]
    fn entries_use_urn_uuid_full_urls() {
        let bundle =
            screening_bundle(&samples::low_risk(), &assessment()).expect("bundle should build");
        for entry in &bundle.entry {
            assert!(entry.full_url.starts_with("urn:uuid:"));
            assert_eq!(
                entry.full_url.trim_start_matches("urn:uuid:"),
                entry.resource["id"].as_str().expect("id should be a string")
            );
        }
    }

    #[test]
    fn assessment_basis_references_the_bundle_observations() {
        let patient = samples::high_risk();
        let bundle = screening_bundle(&patient, &assessment()).expect("bundle should build");
        let risk = &bundle.entry[11].resource;
        let basis = risk["basis"].as_array().expect("basis should be an array");
        assert_eq!(basis.len(), 10);
        let first_obs_id = bundle.entry[1].resource["id"]
            .as_str()
            .expect("id should be a string");
        assert_eq!(
            basis[0]["reference"],
            format!("Observation/{first_obs_id}")
        );
    }
}
