//! LIME/SHAP-style feature attribution.
//!
//! Each demographic factor and present symptom contributes a signed score
//! with a fixed clinical-significance sentence and a fixed plain-language
//! sentence. The output is always sorted by descending absolute
//! contribution, with input order as the stable tie-break.

use rmd_types::{Sex, Symptom, SymptomName};
use serde::{Deserialize, Serialize};

/// Whether a factor pushed the assessment towards or away from risk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionDirection {
    IncreasesRisk,
    DecreasesRisk,
    Neutral,
}

/// One factor's contribution to the risk assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature_name: String,
    pub feature_value: String,
    /// Signed score in `[-1, 1]`, rounded to two decimal places.
    pub contribution_score: f64,
    pub contribution_direction: ContributionDirection,
    pub clinical_significance: String,
    /// Patient-friendly wording of the same factor.
    pub plain_language: String,
}

struct SymptomWeight {
    base_score: f64,
    clinical: &'static str,
    plain: &'static str,
}

/// Static per-symptom attribution table. Reduced mobility carries no
/// attribution weight.
fn symptom_weight(name: SymptomName) -> Option<SymptomWeight> {
    let entry = match name {
        SymptomName::JointPain => SymptomWeight {
            base_score: 0.15,
            clinical: "Joint pain is the primary presenting symptom in RMDs",
            plain: "Joint pain is something we take seriously and want to investigate",
        },
        SymptomName::MultipleJointsAffected => SymptomWeight {
            base_score: 0.25,
            clinical: "Polyarticular involvement suggests inflammatory arthritis (RA, PsA)",
            plain: "Having pain in several joints at once can be a sign of certain conditions",
        },
        SymptomName::MorningStiffness => SymptomWeight {
            base_score: 0.20,
            clinical: "Morning stiffness >30min is characteristic of inflammatory arthritis",
            plain: "Stiffness in the morning that takes time to improve is something we look out for",
        },
        SymptomName::JointSwelling => SymptomWeight {
            base_score: 0.22,
            clinical: "Synovitis (joint swelling) indicates active inflammation",
            plain: "Swelling in your joints shows there may be inflammation we need to address",
        },
        SymptomName::JointRedness => SymptomWeight {
            base_score: 0.18,
            clinical: "Erythema suggests acute inflammatory process",
            plain: "Redness around joints can indicate inflammation",
        },
        SymptomName::Fatigue => SymptomWeight {
            base_score: 0.10,
            clinical: "Constitutional symptoms suggest systemic inflammatory disease",
            plain: "Feeling very tired can sometimes be linked to inflammation in the body",
        },
        SymptomName::Fever => SymptomWeight {
            base_score: 0.15,
            clinical: "Fever with joint symptoms requires urgent evaluation",
            plain: "A fever along with joint problems needs quick attention",
        },
        SymptomName::SkinRash => SymptomWeight {
            base_score: 0.18,
            clinical: "Skin involvement suggests PsA, SLE, or dermatomyositis",
            plain: "Skin changes can sometimes be connected to joint conditions",
        },
        SymptomName::WeightLoss => SymptomWeight {
            base_score: 0.12,
            clinical: "Unexplained weight loss suggests systemic disease",
            plain: "Losing weight without trying can be a sign your body is dealing with something",
        },
        SymptomName::ReducedMobility => return None,
    };
    Some(entry)
}

/// Attribute the assessment to demographic and symptom factors.
///
/// Demographic magnitudes are fixed: age 50 or over contributes +0.10, age
/// under 40 contributes -0.05, female sex contributes +0.08. Per-symptom
/// scores start from the static base weight, multiplied by 1.3 for severity
/// of 7 or above and by 1.2 for each duration field over its 30-unit
/// threshold (both may apply), then clamped to at most 0.35.
pub fn attribute(symptoms: &[Symptom], age: u32, sex: Sex) -> Vec<FeatureContribution> {
    let mut contributions = Vec::new();

    if age >= 50 {
        contributions.push(FeatureContribution {
            feature_name: "Age".to_string(),
            feature_value: format!("{age} years"),
            contribution_score: 0.10,
            contribution_direction: ContributionDirection::IncreasesRisk,
            clinical_significance: "Age >=50 increases risk of inflammatory conditions like PMR"
                .to_string(),
            plain_language:
                "Your age means we want to be extra careful to check for certain conditions"
                    .to_string(),
        });
    } else if age < 40 {
        contributions.push(FeatureContribution {
            feature_name: "Age".to_string(),
            feature_value: format!("{age} years"),
            contribution_score: -0.05,
            contribution_direction: ContributionDirection::DecreasesRisk,
            clinical_significance: "Younger age reduces risk of degenerative conditions"
                .to_string(),
            plain_language: "Your age is a positive factor in this assessment".to_string(),
        });
    }

    if sex == Sex::Female {
        contributions.push(FeatureContribution {
            feature_name: "Sex".to_string(),
            feature_value: "Female".to_string(),
            contribution_score: 0.08,
            contribution_direction: ContributionDirection::IncreasesRisk,
            clinical_significance: "Female sex increases RA risk (3:1 female:male ratio)"
                .to_string(),
            plain_language: "Some conditions are slightly more common in women".to_string(),
        });
    }

    for symptom in symptoms.iter().filter(|s| s.present) {
        let Some(weight) = symptom_weight(symptom.name) else {
            continue;
        };

        let mut score = weight.base_score;
        if symptom.severity.is_some_and(|sev| sev >= 7) {
            score *= 1.3;
        }
        if symptom.duration_days.is_some_and(|d| d > 30) {
            score *= 1.2;
        }
        if symptom.duration_minutes.is_some_and(|m| m > 30) {
            score *= 1.2;
        }

        let mut value_parts = vec!["Present".to_string()];
        if let Some(severity) = symptom.severity {
            value_parts.push(format!("Severity: {severity}/10"));
        }
        if let Some(days) = symptom.duration_days {
            value_parts.push(format!("Duration: {days} days"));
        }
        if let Some(minutes) = symptom.duration_minutes {
            value_parts.push(format!("Duration: {minutes} minutes"));
        }

        contributions.push(FeatureContribution {
            feature_name: symptom.name.display_name(),
            feature_value: value_parts.join(", "),
            contribution_score: round2(score.min(0.35)),
            contribution_direction: ContributionDirection::IncreasesRisk,
            clinical_significance: weight.clinical.to_string(),
            plain_language: weight.plain.to_string(),
        });
    }

    // Stable sort keeps input order as the tie-break.
    contributions.sort_by(|a, b| {
        b.contribution_score
            .abs()
            .total_cmp(&a.contribution_score.abs())
    });

    contributions
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
