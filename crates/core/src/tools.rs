//! The five named analysis tools exposed to the agent surface.
//!
//! Each tool takes the same patient payload and returns a human-readable
//! findings string. They remain callable standalone (the rule-based demo
//! path calls them directly) and by name through [`run_tool`] (the LLM
//! tool-selection path passes a serialised patient).
//!
//! [`risk_score_tool`] carries its own weight table, deliberately distinct
//! from [`crate::scorer`]; see the scorer module notes.

use crate::{differential, patterns, ScreeningError, ScreeningResult};
use rmd_types::{PatientScreening, RiskLevel, SymptomName};

/// Tool names in registration order.
pub const TOOL_NAMES: [&str; 5] = [
    "analyze_inflammatory_markers",
    "analyze_joint_pattern",
    "analyze_systemic_symptoms",
    "calculate_risk_score",
    "get_differential_diagnosis",
];

/// Invoke a tool by name with a serialised patient payload.
///
/// # Errors
///
/// Returns [`ScreeningError::UnknownTool`] for an unregistered name,
/// [`ScreeningError::PatientDeserialization`] when the payload does not
/// parse, and [`ScreeningError::InvalidScreening`] when it parses but fails
/// validation.
pub fn run_tool(name: &str, patient_json: &str) -> ScreeningResult<String> {
    let patient: PatientScreening =
        serde_json::from_str(patient_json).map_err(ScreeningError::PatientDeserialization)?;
    patient.validate()?;
    tracing::debug!(tool = name, patient_id = %patient.patient_id, "running analysis tool");
    dispatch(name, &patient)
}

/// Invoke a tool by name with an already-typed patient.
pub fn dispatch(name: &str, patient: &PatientScreening) -> ScreeningResult<String> {
    match name {
        "analyze_inflammatory_markers" => Ok(inflammatory_markers(patient)),
        "analyze_joint_pattern" => Ok(joint_pattern(patient)),
        "analyze_systemic_symptoms" => Ok(systemic_symptoms(patient)),
        "calculate_risk_score" => Ok(risk_score_tool(patient)),
        "get_differential_diagnosis" => Ok(differential_tool(patient)),
        other => Err(ScreeningError::UnknownTool(other.to_string())),
    }
}

/// Run every tool and combine the outputs, one `[tool_name]` block each.
pub fn run_all(patient: &PatientScreening) -> String {
    TOOL_NAMES
        .iter()
        .map(|name| {
            // Dispatch cannot fail for a registered name.
            let output = dispatch(name, patient).unwrap_or_else(|e| format!("Error: {e}"));
            format!("[{name}]\n{output}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Clinical proxies for active inflammation: swelling, redness, and
/// prolonged morning stiffness.
pub fn inflammatory_markers(patient: &PatientScreening) -> String {
    let mut findings = Vec::new();

    let swelling = patient.has_symptom(SymptomName::JointSwelling);
    let redness = patient.has_symptom(SymptomName::JointRedness);
    if swelling && redness {
        findings.push(
            "Joint swelling with overlying redness - strong indicator of active synovitis"
                .to_string(),
        );
    } else if swelling {
        findings.push("Joint swelling without redness - possible synovitis".to_string());
    } else if redness {
        findings.push("Joint redness without swelling - consider crystal arthropathy".to_string());
    }

    if let Some(stiffness) = patient
        .get_symptom(SymptomName::MorningStiffness)
        .filter(|s| s.present)
    {
        match stiffness.duration_days {
            Some(d) if d > 30 => findings.push(format!(
                "Morning stiffness of {d} minutes - exceeds the 30-minute inflammatory threshold"
            )),
            _ => findings.push("Morning stiffness reported - duration not quantified".to_string()),
        }
    }

    render_findings(
        "INFLAMMATORY MARKER ANALYSIS",
        &findings,
        "No clinical markers of active inflammation identified.",
    )
}

/// Joint distribution and pain characteristics.
pub fn joint_pattern(patient: &PatientScreening) -> String {
    let mut findings = Vec::new();

    if patient.has_symptom(SymptomName::MultipleJointsAffected) {
        findings.push(
            "Polyarticular distribution - favours inflammatory arthritis over mechanical causes"
                .to_string(),
        );
    } else if patient.has_symptom(SymptomName::JointPain) {
        findings
            .push("Localised joint involvement - mechanical or monoarticular cause".to_string());
    }

    if let Some(pain) = patient
        .get_symptom(SymptomName::JointPain)
        .filter(|s| s.present)
    {
        match pain.severity {
            Some(sev) if sev >= 7 => {
                findings.push(format!("Severe joint pain ({sev}/10) reported"));
            }
            Some(sev) => findings.push(format!("Joint pain severity {sev}/10")),
            None => findings.push("Joint pain present - severity not recorded".to_string()),
        }
    }

    if patient.has_symptom(SymptomName::ReducedMobility) {
        findings.push("Reduced joint mobility reported - functional impact present".to_string());
    }

    render_findings(
        "JOINT PATTERN ANALYSIS",
        &findings,
        "No joint symptoms reported.",
    )
}

/// Constitutional symptoms suggesting systemic disease.
pub fn systemic_symptoms(patient: &PatientScreening) -> String {
    let mut findings = Vec::new();

    for (name, note) in [
        (SymptomName::Fever, "Fever - infectious or systemic inflammatory cause"),
        (SymptomName::WeightLoss, "Unintentional weight loss - constitutional symptom"),
        (SymptomName::Fatigue, "Fatigue - common in systemic inflammatory disease"),
    ] {
        if patient.has_symptom(name) {
            findings.push(note.to_string());
        }
    }

    if findings.len() >= 2 {
        findings.push(format!(
            "{} constitutional symptoms in combination - systemic disease should be excluded",
            findings.len()
        ));
    }

    render_findings(
        "SYSTEMIC SYMPTOM ANALYSIS",
        &findings,
        "No systemic symptoms reported.",
    )
}

/// Quantitative risk scoring with the tool-path weight table.
pub fn risk_score_tool(patient: &PatientScreening) -> String {
    let mut score: i32 = 0;
    let mut contributions = Vec::new();
    let mut add = |points: i32, label: &str| {
        score += points;
        contributions.push(format!("  +{points} {label}"));
    };

    if let Some(pain) = patient
        .get_symptom(SymptomName::JointPain)
        .filter(|s| s.present)
    {
        add(1, "joint pain present");
        if pain.severity.is_some_and(|sev| sev >= 7) {
            add(1, "severe joint pain");
        }
    }
    if patient.has_symptom(SymptomName::MultipleJointsAffected) {
        add(3, "multiple joints affected");
    }
    if let Some(stiffness) = patient
        .get_symptom(SymptomName::MorningStiffness)
        .filter(|s| s.present)
    {
        add(2, "morning stiffness present");
        match stiffness.duration_days {
            Some(d) if d > 60 => add(3, "stiffness exceeding 60 minutes"),
            Some(d) if d > 30 => add(2, "stiffness exceeding 30 minutes"),
            _ => {}
        }
    }
    if patient.has_symptom(SymptomName::JointSwelling) {
        add(2, "joint swelling");
    }
    if patient.has_symptom(SymptomName::JointRedness) {
        add(2, "joint redness");
    }
    if patient.has_symptom(SymptomName::Fever) {
        add(2, "fever");
    }
    if patient.has_symptom(SymptomName::WeightLoss) {
        add(1, "weight loss");
    }
    if let Some(fatigue) = patient
        .get_symptom(SymptomName::Fatigue)
        .filter(|s| s.present)
    {
        add(1, "fatigue present");
        if fatigue.severity.is_some_and(|sev| sev >= 7) {
            add(1, "severe fatigue");
        }
    }
    if patient.has_symptom(SymptomName::SkinRash) {
        add(2, "skin rash");
    }

    let level = if score >= 8 {
        RiskLevel::High
    } else if score >= 4 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let mut lines = vec![
        "RISK SCORE CALCULATION:".to_string(),
        "=".repeat(40),
        format!("Total score: {score} ({level})"),
    ];
    lines.extend(contributions);
    lines.join("\n")
}

/// Ranked differential rendered as a findings string.
pub fn differential_tool(patient: &PatientScreening) -> String {
    differential::differential(patient).summary()
}

/// Pattern analysis rendered as a findings string, kept on the tool surface
/// for callers that want the combined pattern/red-flag view.
pub fn pattern_summary(patient: &PatientScreening) -> String {
    patterns::analyze(patient).summary()
}

fn render_findings(header: &str, findings: &[String], empty_message: &str) -> String {
    if findings.is_empty() {
        return empty_message.to_string();
    }
    let mut lines = vec![format!("{header}:"), "=".repeat(40)];
    for finding in findings {
        lines.push(format!("- {finding}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmd_types::screening::samples;

    #[test]
    fn every_registered_tool_dispatches() {
        let patient = samples::high_risk();
        for name in TOOL_NAMES {
            let output = dispatch(name, &patient).expect("registered tool should dispatch");
            assert!(!output.is_empty());
        }
    }

    #[test]
    fn unknown_tool_name_is_an_error() {
        let err = dispatch("order_mri", &samples::low_risk()).expect_err("should fail");
        assert!(matches!(err, ScreeningError::UnknownTool(name) if name == "order_mri"));
    }

    #[test]
    fn run_tool_rejects_malformed_payload() {
        let err = run_tool("calculate_risk_score", "{not json").expect_err("should fail");
        assert!(matches!(err, ScreeningError::PatientDeserialization(_)));
    }

    #[test]
    fn run_tool_validates_the_parsed_screening() {
        let mut patient = samples::low_risk();
        patient.age = 150;
        let json = serde_json::to_string(&patient).expect("serialisation should succeed");
        let err = run_tool("calculate_risk_score", &json).expect_err("should fail");
        assert!(matches!(err, ScreeningError::InvalidScreening(_)));
    }

    #[test]
    fn run_tool_accepts_a_serialised_patient() {
        let json =
            serde_json::to_string(&samples::high_risk()).expect("serialisation should succeed");
        let output = run_tool("get_differential_diagnosis", &json).expect("should dispatch");
        assert!(output.contains("Rheumatoid Arthritis"));
    }

    #[test]
    fn tool_path_weights_diverge_from_the_scorer() {
        // Polyarticular involvement is worth 3 here against the scorer's 2,
        // so the same patient reports a higher tool-path score.
        let patient = samples::high_risk();
        let output = risk_score_tool(&patient);
        assert!(output.contains("Total score: 13 (HIGH)"));
        let (_, _, breakdown) = crate::scorer::score_with_breakdown(&patient);
        assert_eq!(breakdown.risk_score, 11);
    }

    #[test]
    fn tool_path_uses_the_sixty_minute_stiffness_band() {
        let mut patient = samples::low_risk();
        patient.symptoms[2] = rmd_types::Symptom::present(SymptomName::MorningStiffness)
            .with_duration_days(90);
        let output = risk_score_tool(&patient);
        assert!(output.contains("stiffness exceeding 60 minutes"));
    }

    #[test]
    fn inflammatory_markers_distinguish_combined_signs() {
        let output = inflammatory_markers(&samples::high_risk());
        assert!(output.contains("active synovitis"));

        let quiet = inflammatory_markers(&samples::low_risk());
        assert!(quiet.contains("No clinical markers"));
    }

    #[test]
    fn systemic_analysis_notes_symptom_combinations() {
        let mut patient = samples::low_risk();
        patient.symptoms[5] = rmd_types::Symptom::present(SymptomName::Fatigue);
        patient.symptoms[7] = rmd_types::Symptom::present(SymptomName::Fever);
        let output = systemic_symptoms(&patient);
        assert!(output.contains("in combination"));
    }

    #[test]
    fn run_all_labels_each_tool_block() {
        let output = run_all(&samples::high_risk());
        for name in TOOL_NAMES {
            assert!(output.contains(&format!("[{name}]")));
        }
    }
}
