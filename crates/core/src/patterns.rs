//! Named clinical pattern and red-flag detection.
//!
//! Each rule inspects the screening and may emit a pattern line (free text
//! used in reasoning) and a red flag (a short named finding surfaced
//! independently of the numeric score). Rules are mutually distinct, so a
//! flag can appear at most once per analysis.

use rmd_types::{PatientScreening, SymptomName};

/// The outcome of one pattern analysis run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternAnalysis {
    /// Pattern lines in rule-evaluation order.
    pub patterns: Vec<String>,
    /// Red flags in rule-evaluation order.
    pub red_flags: Vec<String>,
}

impl PatternAnalysis {
    /// Render the analysis as the findings string used on the tool surface.
    pub fn summary(&self) -> String {
        if self.patterns.is_empty() {
            return "No specific RMD patterns identified. Symptoms appear non-specific or \
                    mechanical in nature."
                .to_string();
        }

        let mut lines = vec!["PATTERN ANALYSIS RESULTS:".to_string(), "=".repeat(40)];
        lines.extend(self.patterns.iter().cloned());

        if !self.red_flags.is_empty() {
            lines.push(String::new());
            lines.push("RED FLAGS IDENTIFIED:".to_string());
            for flag in &self.red_flags {
                lines.push(format!("  [!] {flag}"));
            }
        }

        lines.join("\n")
    }
}

/// Run every pattern rule against a screening.
///
/// Always returns; a screening matching no rule yields an empty analysis
/// whose [`PatternAnalysis::summary`] states that no pattern was found.
pub fn analyze(patient: &PatientScreening) -> PatternAnalysis {
    let mut analysis = PatternAnalysis::default();

    if patient.has_symptom(SymptomName::MultipleJointsAffected) {
        analysis.patterns.push(
            "POLYARTICULAR: Multiple joints affected - concerning for inflammatory arthritis"
                .to_string(),
        );
        analysis.red_flags.push("Multiple joint involvement".to_string());
    }

    // The duration field carries a days-unit name but is compared against
    // the 30-minute inflammatory threshold, matching the documented
    // screening-form behaviour. Not converted.
    let stiffness = patient.get_symptom(SymptomName::MorningStiffness);
    let prolonged_stiffness = stiffness
        .filter(|s| s.present)
        .and_then(|s| s.duration_days)
        .is_some_and(|d| d > 30);
    if let Some(stiffness) = stiffness.filter(|s| s.present) {
        if prolonged_stiffness {
            let duration = stiffness.duration_days.unwrap_or_default();
            analysis.patterns.push(format!(
                "MORNING STIFFNESS: Present for {duration} minutes - significant (>30 min \
                 suggests inflammatory)"
            ));
            analysis
                .red_flags
                .push("Prolonged morning stiffness".to_string());
        } else if stiffness.severity.is_some_and(|sev| sev >= 5) {
            let severity = stiffness.severity.unwrap_or_default();
            analysis.patterns.push(format!(
                "MORNING STIFFNESS: Severity {severity}/10 - moderate to severe"
            ));
        }
    }

    let swelling = patient.has_symptom(SymptomName::JointSwelling);
    if swelling {
        if patient.has_symptom(SymptomName::JointRedness) {
            analysis.patterns.push(
                "INFLAMMATORY SIGNS: Both swelling and redness present - active inflammation \
                 likely"
                    .to_string(),
            );
            analysis
                .red_flags
                .push("Joint swelling with redness".to_string());
        } else {
            analysis
                .patterns
                .push("JOINT SWELLING: Present - possible inflammatory component".to_string());
        }
    }

    let systemic_count = [
        SymptomName::Fever,
        SymptomName::WeightLoss,
        SymptomName::Fatigue,
    ]
    .into_iter()
    .filter(|&name| patient.has_symptom(name))
    .count();

    if systemic_count >= 2 {
        analysis.patterns.push(format!(
            "SYSTEMIC: {systemic_count} systemic symptoms present - concerning for systemic \
             inflammatory disease"
        ));
        analysis
            .red_flags
            .push("Multiple systemic symptoms".to_string());
    } else if patient.has_symptom(SymptomName::Fever) {
        analysis
            .patterns
            .push("FEVER: Present - consider infectious or inflammatory cause".to_string());
        analysis
            .red_flags
            .push("Fever with joint symptoms".to_string());
    }

    if patient.age < 40 {
        if patient.has_symptom(SymptomName::JointPain) {
            analysis.patterns.push(format!(
                "YOUNG ADULT ({}y): Consider inflammatory spondyloarthropathy, RA, or reactive \
                 arthritis",
                patient.age
            ));
        }
    } else if patient.age >= 50
        && patient.has_symptom(SymptomName::Fatigue)
        && (swelling || prolonged_stiffness)
    {
        analysis.patterns.push(format!(
            "OLDER ADULT ({}y): Consider PMR, late-onset RA, or OA with inflammatory overlay",
            patient.age
        ));
    }

    if patient.has_symptom(SymptomName::SkinRash) {
        analysis.patterns.push(
            "SKIN INVOLVEMENT: Rash present - consider psoriatic arthritis, SLE, or reactive \
             arthritis"
                .to_string(),
        );
        analysis
            .red_flags
            .push("Skin rash with joint symptoms".to_string());
    }

    analysis
}
