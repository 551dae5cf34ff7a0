//! Patient screening encounters.
//!
//! A [`PatientScreening`] captures one encounter's worth of input: the
//! patient's demographics, the observed symptoms, and optional free-text
//! medical history. A screening is created once per encounter and never
//! mutated; a new encounter is a new object.

use crate::symptom::{Symptom, SymptomName};
use crate::{ValidationError, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patient sex as collected on the screening form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Other,
    /// Not stated. The legacy form label for this option was
    /// "Prefer not to say", accepted as a wire alias.
    #[serde(alias = "Prefer not to say")]
    Unspecified,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
            Sex::Unspecified => "Unspecified",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One screening encounter.
///
/// Owned exclusively by the caller for the duration of one assessment call;
/// every analysis function borrows it read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientScreening {
    /// Opaque patient identifier; generated when absent. Not a real NHS
    /// number.
    pub patient_id: String,
    pub age: u32,
    pub sex: Sex,
    /// Observed symptoms. Names need not be unique, though form-driven
    /// input carries each canonical name at most once.
    pub symptoms: Vec<Symptom>,
    #[serde(default)]
    pub medical_history: Option<String>,
    pub screening_date: DateTime<Utc>,
}

impl PatientScreening {
    /// Create a screening with a freshly generated patient identifier and
    /// the current time as the screening date.
    pub fn new(age: u32, sex: Sex, symptoms: Vec<Symptom>) -> Self {
        Self {
            patient_id: generate_patient_id(),
            age,
            sex,
            symptoms,
            medical_history: None,
            screening_date: Utc::now(),
        }
    }

    pub fn with_medical_history(mut self, history: impl Into<String>) -> Self {
        self.medical_history = Some(history.into());
        self
    }

    /// Validate the structural invariants of the screening.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if:
    /// - `age` is outside `[0, 120]`,
    /// - any symptom severity is outside `[0, 10]`,
    /// - `patient_id` is empty or whitespace.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.age > 120 {
            return Err(ValidationError::AgeOutOfRange(self.age));
        }
        if self.patient_id.trim().is_empty() {
            return Err(ValidationError::EmptyPatientId);
        }
        for symptom in &self.symptoms {
            if let Some(severity) = symptom.severity {
                if severity > 10 {
                    return Err(ValidationError::SeverityOutOfRange {
                        name: symptom.name.as_str().to_string(),
                        severity,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a symptom by canonical name.
    ///
    /// When the same name appears more than once, the first occurrence wins.
    pub fn get_symptom(&self, name: SymptomName) -> Option<&Symptom> {
        self.symptoms.iter().find(|s| s.name == name)
    }

    /// Whether a symptom exists in the list and is marked present.
    pub fn has_symptom(&self, name: SymptomName) -> bool {
        self.get_symptom(name).is_some_and(|s| s.present)
    }

    /// Count of symptoms marked present.
    pub fn present_symptom_count(&self) -> usize {
        self.symptoms.iter().filter(|s| s.present).count()
    }

    /// Render a clinical summary suitable for prompt building and logs.
    pub fn to_clinical_summary(&self) -> String {
        let mut lines = vec![
            format!("Patient ID: {}", self.patient_id),
            format!("Age: {} years", self.age),
            format!("Sex: {}", self.sex),
            format!(
                "Screening Date: {}",
                self.screening_date.format("%Y-%m-%d %H:%M")
            ),
            String::new(),
            "SYMPTOMS:".to_string(),
        ];

        for symptom in &self.symptoms {
            if symptom.present {
                let mut detail = String::new();
                if let Some(severity) = symptom.severity {
                    detail.push_str(&format!(" (severity: {severity}/10)"));
                }
                if let Some(days) = symptom.duration_days {
                    detail.push_str(&format!(" for {days} days"));
                }
                lines.push(format!("  - {}: Present{detail}", symptom.name));
            } else {
                lines.push(format!("  - {}: Not present", symptom.name));
            }
        }

        if let Some(history) = &self.medical_history {
            lines.push(String::new());
            lines.push("MEDICAL HISTORY:".to_string());
            lines.push(format!("  {history}"));
        }

        lines.join("\n")
    }
}

/// Generate an 8-character uppercase patient token from a v4 UUID.
fn generate_patient_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Sample screenings for the demo tiers.
///
/// These mirror the sample patients the screening form offers and are used
/// by tests and the demo endpoint.
pub mod samples {
    use super::*;

    /// Low-risk sample: young active male with mild mechanical joint pain.
    pub fn low_risk() -> PatientScreening {
        let mut symptoms = crate::symptom::default_symptoms();
        symptoms[0] = Symptom::present(SymptomName::JointPain).with_severity(3);
        PatientScreening::new(32, Sex::Male, symptoms).with_medical_history(
            "Occasional knee pain after running. Active lifestyle, plays football weekly.",
        )
    }

    /// Moderate-risk sample: middle-aged woman with early, still-ambiguous
    /// symptoms.
    pub fn moderate_risk() -> PatientScreening {
        let mut symptoms = crate::symptom::default_symptoms();
        symptoms[0] = Symptom::present(SymptomName::JointPain).with_severity(5);
        symptoms[2] = Symptom::present(SymptomName::MorningStiffness).with_duration_days(21);
        symptoms[5] = Symptom::present(SymptomName::Fatigue).with_severity(5);
        PatientScreening::new(48, Sex::Female, symptoms).with_medical_history(
            "Episode of hand stiffness last winter, resolved without treatment.",
        )
    }

    /// High-risk sample: polyarticular inflammatory picture in a woman in
    /// her fifties.
    pub fn high_risk() -> PatientScreening {
        let mut symptoms = crate::symptom::default_symptoms();
        symptoms[0] = Symptom::present(SymptomName::JointPain).with_severity(8);
        symptoms[1] = Symptom::present(SymptomName::MultipleJointsAffected);
        symptoms[2] = Symptom::present(SymptomName::MorningStiffness).with_duration_minutes(75);
        symptoms[3] = Symptom::present(SymptomName::JointSwelling);
        symptoms[4] = Symptom::present(SymptomName::JointRedness);
        symptoms[5] = Symptom::present(SymptomName::Fatigue).with_severity(7);
        PatientScreening::new(52, Sex::Female, symptoms).with_medical_history(
            "Family history of RA (mother and aunt). Hypothyroidism diagnosed 2020.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_screening() -> PatientScreening {
        PatientScreening::new(45, Sex::Female, crate::symptom::default_symptoms())
    }

    #[test]
    fn new_generates_patient_id_and_timestamp() {
        let screening = minimal_screening();
        assert_eq!(screening.patient_id.len(), 8);
        assert!(screening
            .patient_id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn validate_accepts_well_formed_screening() {
        minimal_screening().validate().expect("should validate");
    }

    #[test]
    fn validate_rejects_age_above_120() {
        let mut screening = minimal_screening();
        screening.age = 121;
        let err = screening.validate().expect_err("should reject age");
        assert!(matches!(err, ValidationError::AgeOutOfRange(121)));
    }

    #[test]
    fn validate_rejects_severity_above_10() {
        let mut screening = minimal_screening();
        screening.symptoms[0] = Symptom::present(SymptomName::JointPain).with_severity(11);
        let err = screening.validate().expect_err("should reject severity");
        assert!(matches!(
            err,
            ValidationError::SeverityOutOfRange { severity: 11, .. }
        ));
    }

    #[test]
    fn validate_rejects_blank_patient_id() {
        let mut screening = minimal_screening();
        screening.patient_id = "  ".to_string();
        let err = screening.validate().expect_err("should reject blank id");
        assert!(matches!(err, ValidationError::EmptyPatientId));
    }

    #[test]
    fn get_symptom_returns_first_occurrence() {
        let mut screening = minimal_screening();
        screening.symptoms = vec![
            Symptom::present(SymptomName::Fatigue).with_severity(3),
            Symptom::present(SymptomName::Fatigue).with_severity(9),
        ];
        let found = screening
            .get_symptom(SymptomName::Fatigue)
            .expect("symptom should be found");
        assert_eq!(found.severity, Some(3));
    }

    #[test]
    fn has_symptom_requires_present_flag() {
        let screening = minimal_screening();
        assert!(!screening.has_symptom(SymptomName::JointPain));

        let low = samples::low_risk();
        assert!(low.has_symptom(SymptomName::JointPain));
        assert!(!low.has_symptom(SymptomName::Fever));
    }

    #[test]
    fn present_symptom_count_counts_only_present() {
        assert_eq!(samples::low_risk().present_symptom_count(), 1);
        assert_eq!(samples::high_risk().present_symptom_count(), 6);
    }

    #[test]
    fn clinical_summary_lists_present_symptoms_with_detail() {
        let summary = samples::high_risk().to_clinical_summary();
        assert!(summary.contains("joint_pain: Present (severity: 8/10)"));
        assert!(summary.contains("fever: Not present"));
        assert!(summary.contains("MEDICAL HISTORY:"));
    }

    #[test]
    fn sex_accepts_legacy_prefer_not_to_say_alias() {
        let parsed: Sex =
            serde_json::from_str("\"Prefer not to say\"").expect("alias should parse");
        assert_eq!(parsed, Sex::Unspecified);

        let parsed: Sex = serde_json::from_str("\"Female\"").expect("should parse");
        assert_eq!(parsed, Sex::Female);
    }

    #[test]
    fn screening_round_trips_through_json() {
        let screening = samples::high_risk();
        let json = serde_json::to_string(&screening).expect("serialisation should succeed");
        let parsed: PatientScreening =
            serde_json::from_str(&json).expect("deserialisation should succeed");
        assert_eq!(parsed, screening);
    }
}
