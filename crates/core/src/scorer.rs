//! Canonical rule-based risk scoring.
//!
//! This is the screening scorer: it accumulates an integer risk score over
//! the canonical symptom set and maps it onto a tier with fixed thresholds
//! (`>= 8` HIGH, `>= 4` MODERATE, otherwise LOW). The thresholds and point
//! values are illustrative business rules preserved verbatim; they are not
//! validated clinical guidelines.
//!
//! A second, deliberately different weight table lives in
//! [`crate::tools::risk_score_tool`]; the two are never unified because a
//! borderline patient could silently change tier. This module is the
//! canonical tier-assigning path.

use rmd_types::{PatientScreening, RiskLevel, SymptomName};

/// Numeric intermediates of one scoring run, exposed for explanation and
/// test purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Accumulated integer risk score.
    pub risk_score: i32,
    /// Data points actually supplied (presence flags, severities, durations,
    /// medical history).
    pub confidence_factors: u32,
    /// Data points that could have been supplied for the symptom rows given.
    pub max_confidence_factors: u32,
    /// Count of symptoms marked present.
    pub present_symptoms: u32,
}

/// Score a screening: `(risk tier, confidence)`.
///
/// Never fails; a screening with no symptom rows at all still yields
/// `(LOW, 0.30)` when no medical history is supplied.
pub fn score(patient: &PatientScreening) -> (RiskLevel, f64) {
    let (level, confidence, _) = score_with_breakdown(patient);
    (level, confidence)
}

/// Score a screening and expose the numeric breakdown.
pub fn score_with_breakdown(patient: &PatientScreening) -> (RiskLevel, f64, ScoreBreakdown) {
    let mut risk_score: i32 = 0;
    let mut confidence_factors: u32 = 0;
    let mut max_confidence_factors: u32 = 0;

    // Joint pain is the baseline presenting symptom: presence + severity.
    if let Some(joint_pain) = patient.get_symptom(SymptomName::JointPain) {
        max_confidence_factors += 2;
        if joint_pain.present {
            risk_score += 1;
            confidence_factors += 1;
            if let Some(severity) = joint_pain.severity {
                confidence_factors += 1;
                if severity >= 7 {
                    risk_score += 1;
                }
            }
        }
    }

    // Polyarticular involvement.
    if let Some(multiple_joints) = patient.get_symptom(SymptomName::MultipleJointsAffected) {
        max_confidence_factors += 1;
        if multiple_joints.present {
            risk_score += 2;
            confidence_factors += 1;
        }
    }

    // Morning stiffness: presence + duration. The duration comparison uses
    // the days-unit field against a threshold of 30, as documented; the
    // collecting form labels this value as minutes. Not converted here.
    if let Some(stiffness) = patient.get_symptom(SymptomName::MorningStiffness) {
        max_confidence_factors += 2;
        if stiffness.present {
            risk_score += 2;
            confidence_factors += 1;
            if let Some(duration) = stiffness.duration_days {
                confidence_factors += 1;
                if duration > 30 {
                    risk_score += 2;
                }
            }
        }
    }

    if let Some(swelling) = patient.get_symptom(SymptomName::JointSwelling) {
        max_confidence_factors += 1;
        if swelling.present {
            risk_score += 2;
            confidence_factors += 1;
        }
    }

    if let Some(redness) = patient.get_symptom(SymptomName::JointRedness) {
        max_confidence_factors += 1;
        if redness.present {
            risk_score += 1;
            confidence_factors += 1;
        }
    }

    // Systemic symptoms.
    if let Some(fever) = patient.get_symptom(SymptomName::Fever) {
        max_confidence_factors += 1;
        if fever.present {
            risk_score += 2;
            confidence_factors += 1;
        }
    }

    if let Some(weight_loss) = patient.get_symptom(SymptomName::WeightLoss) {
        max_confidence_factors += 1;
        if weight_loss.present {
            risk_score += 1;
            confidence_factors += 1;
        }
    }

    if let Some(fatigue) = patient.get_symptom(SymptomName::Fatigue) {
        max_confidence_factors += 2;
        if fatigue.present {
            risk_score += 1;
            confidence_factors += 1;
            if let Some(severity) = fatigue.severity {
                confidence_factors += 1;
                if severity >= 7 {
                    risk_score += 1;
                }
            }
        }
    }

    if let Some(rash) = patient.get_symptom(SymptomName::SkinRash) {
        max_confidence_factors += 1;
        if rash.present {
            risk_score += 2;
            confidence_factors += 1;
        }
    }

    // Medical history contributes to confidence, not to the risk score.
    max_confidence_factors += 1;
    if patient
        .medical_history
        .as_deref()
        .is_some_and(|h| h.trim().len() > 10)
    {
        confidence_factors += 1;
    }

    let present_symptoms = patient.present_symptom_count() as u32;

    let confidence = compute_confidence(confidence_factors, max_confidence_factors, present_symptoms);

    let level = if risk_score >= 8 {
        RiskLevel::High
    } else if risk_score >= 4 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    (
        level,
        confidence,
        ScoreBreakdown {
            risk_score,
            confidence_factors,
            max_confidence_factors,
            present_symptoms,
        },
    )
}

/// Confidence from data completeness, adjusted by symptom count.
///
/// Base band is `0.40 + completeness * 0.55`; five or more present symptoms
/// push towards (capped) 0.95, three or more towards 0.90, and zero present
/// symptoms floor the result at 0.30. The result is clamped to `[0, 1]` and
/// rounded to two decimal places.
fn compute_confidence(
    confidence_factors: u32,
    max_confidence_factors: u32,
    present_symptoms: u32,
) -> f64 {
    let mut confidence = if max_confidence_factors > 0 {
        let completeness = f64::from(confidence_factors) / f64::from(max_confidence_factors);
        0.40 + completeness * 0.55
    } else {
        0.40
    };

    if present_symptoms >= 5 {
        confidence = (confidence + 0.10).min(0.95);
    } else if present_symptoms >= 3 {
        confidence = (confidence + 0.05).min(0.90);
    } else if present_symptoms == 0 {
        confidence = (confidence - 0.15).max(0.30);
    }

    (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0
}
