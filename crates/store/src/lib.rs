//! # RMD Store
//!
//! File-backed persistence for completed screening assessments.
//!
//! Records live under `data_dir/<patient_ref>/<assessment_id>.json`, one
//! file per assessment. Writes go to a `.tmp` sibling first and are then
//! renamed into place, so a crash mid-write never leaves a truncated
//! record where history loading would find it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rmd_explain::XAIExplanation;
use rmd_types::RiskAssessment;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("assessment store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialise assessment record: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One persisted screening assessment: the clinical result plus its
/// explanation package, stamped with the time it was stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredAssessment {
    pub assessment_id: String,
    pub patient_ref: String,
    pub created_at: DateTime<Utc>,
    pub assessment: RiskAssessment,
    pub explanation: XAIExplanation,
}

/// File-backed store rooted at a single data directory.
#[derive(Clone, Debug)]
pub struct AssessmentStore {
    data_dir: PathBuf,
}

impl AssessmentStore {
    /// Open (creating if necessary) the store rooted at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the root directory cannot be
    /// created.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Persist one assessment under the given identifier (see
    /// [`new_assessment_id`]).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure and
    /// [`StoreError::Serialization`] when the record cannot be encoded.
    pub fn save(
        &self,
        patient_ref: &str,
        assessment_id: &str,
        assessment: &RiskAssessment,
        explanation: &XAIExplanation,
    ) -> StoreResult<()> {
        let created_at = Utc::now();

        let record = StoredAssessment {
            assessment_id: assessment_id.to_string(),
            patient_ref: patient_ref.to_string(),
            created_at,
            assessment: assessment.clone(),
            explanation: explanation.clone(),
        };

        let patient_dir = self.data_dir.join(patient_ref);
        fs::create_dir_all(&patient_dir)?;

        let path = patient_dir.join(format!("{assessment_id}.json"));
        write_atomically(&path, &serde_json::to_vec_pretty(&record)?)
    }

    /// Load one stored assessment by patient reference and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the record does not exist or cannot
    /// be read, and [`StoreError::Serialization`] when it cannot be decoded.
    pub fn load(&self, patient_ref: &str, assessment_id: &str) -> StoreResult<StoredAssessment> {
        let path = self
            .data_dir
            .join(patient_ref)
            .join(format!("{assessment_id}.json"));
        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load every stored assessment for a patient, oldest first.
    ///
    /// A patient with no stored assessments yields an empty history.
    /// Records that cannot be read or decoded are logged and skipped so
    /// one corrupt file never hides the rest of the history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the patient directory exists but
    /// cannot be listed.
    pub fn load_history(&self, patient_ref: &str) -> StoreResult<Vec<StoredAssessment>> {
        let patient_dir = self.data_dir.join(patient_ref);
        if !patient_dir.exists() {
            return Ok(Vec::new());
        }

        let mut history = Vec::new();
        for entry in fs::read_dir(&patient_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_record(&path) {
                Ok(record) => history.push(record),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable assessment record");
                }
            }
        }

        history.sort_by_key(|record| record.created_at);
        Ok(history)
    }
}

fn read_record(path: &Path) -> StoreResult<StoredAssessment> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write via a `.tmp` sibling and rename, so readers only ever see
/// complete files.
fn write_atomically(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Generate an assessment identifier of the form
/// `RMD-20260825-141503-A1B2`: a UTC timestamp plus a short random
/// suffix to keep same-second assessments distinct.
pub fn new_assessment_id() -> String {
    let suffix: String = Uuid::new_v4()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("RMD-{}-{suffix}", Utc::now().format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmd_explain::render;
    use rmd_types::{screening::samples, RiskLevel};
    use tempfile::TempDir;

    fn assessment(level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            risk_level: level,
            likely_conditions: vec!["Rheumatoid Arthritis".to_string()],
            reasoning: "Polyarticular inflammatory pattern.".to_string(),
            recommended_next_step: "Urgent rheumatology referral recommended".to_string(),
            confidence_score: 0.86,
            red_flags_identified: vec!["Multiple joint involvement".to_string()],
            assessment_timestamp: Utc::now(),
        }
    }

    fn explanation(patient: &rmd_types::PatientScreening) -> XAIExplanation {
        render(
            "RMD-TEST",
            patient,
            RiskLevel::High,
            0.86,
            &["Rheumatoid Arthritis".to_string()],
            "Urgent rheumatology referral recommended",
            &["Multiple joint involvement".to_string()],
            &[],
        )
        .expect("explanation should render")
    }

    #[test]
    fn save_then_load_round_trips_the_record() {
        let dir = TempDir::new().unwrap();
        let store = AssessmentStore::open(dir.path()).expect("store should open");
        let patient = samples::high_risk();

        let id = new_assessment_id();
        assert!(id.starts_with("RMD-"));
        store
            .save(
                &patient.patient_id,
                &id,
                &assessment(RiskLevel::High),
                &explanation(&patient),
            )
            .expect("save should succeed");

        let record = store
            .load(&patient.patient_id, &id)
            .expect("load should succeed");
        assert_eq!(record.assessment_id, id);
        assert_eq!(record.patient_ref, patient.patient_id);
        assert_eq!(record.assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn history_is_sorted_oldest_first() {
        let dir = TempDir::new().unwrap();
        let store = AssessmentStore::open(dir.path()).expect("store should open");
        let patient = samples::high_risk();
        let explanation = explanation(&patient);

        let first = new_assessment_id();
        store
            .save(&patient.patient_id, &first, &assessment(RiskLevel::Low), &explanation)
            .expect("save should succeed");
        let second = new_assessment_id();
        store
            .save(&patient.patient_id, &second, &assessment(RiskLevel::High), &explanation)
            .expect("save should succeed");

        let history = store
            .load_history(&patient.patient_id)
            .expect("history should load");
        assert_eq!(history.len(), 2);
        assert!(history[0].created_at <= history[1].created_at);
        let ids: Vec<_> = history.iter().map(|r| r.assessment_id.as_str()).collect();
        assert!(ids.contains(&first.as_str()));
        assert!(ids.contains(&second.as_str()));
    }

    #[test]
    fn unknown_patient_has_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = AssessmentStore::open(dir.path()).expect("store should open");
        let history = store
            .load_history("NOBODY")
            .expect("history should load");
        assert!(history.is_empty());
    }

    #[test]
    fn corrupt_records_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let store = AssessmentStore::open(dir.path()).expect("store should open");
        let patient = samples::low_risk();

        store
            .save(
                &patient.patient_id,
                &new_assessment_id(),
                &assessment(RiskLevel::Low),
                &explanation(&patient),
            )
            .expect("save should succeed");
        let patient_dir = dir.path().join(&patient.patient_id);
        std::fs::write(patient_dir.join("RMD-19700101-000000-ZZZZ.json"), b"not json").unwrap();

        let history = store
            .load_history(&patient.patient_id)
            .expect("history should load");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn assessment_ids_are_distinct_within_a_second() {
        assert_ne!(new_assessment_id(), new_assessment_id());
        assert_eq!(new_assessment_id().len(), "RMD-20260825-141503-A1B2".len());
    }
}
