//! Assembly of the complete explanation package.
//!
//! [`render`] runs attribution and counterfactual generation, synthesises
//! the reasoning trace and audit trail, pre-renders the three role views,
//! and returns everything as one atomic [`XAIExplanation`]. Callers never
//! observe a partially built explanation.

use chrono::{DateTime, Utc};
use rmd_types::{PatientScreening, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::attribution::{attribute, ContributionDirection, FeatureContribution};
use crate::audit::{audit_trail, input_hash, reasoning_steps, AuditEntry, ReasoningStep};
use crate::audit::{MODEL_VERSION, SYSTEM_VERSION};
use crate::counterfactual::counterfactuals;
use crate::ExplanationResult;

/// Audiences with different explanation needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Clinician,
    Patient,
    Auditor,
}

/// The complete explanation package for one assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XAIExplanation {
    pub assessment_id: String,
    pub risk_level: RiskLevel,
    pub confidence_score: f64,
    pub generated_at: DateTime<Utc>,
    pub feature_contributions: Vec<FeatureContribution>,
    pub reasoning_steps: Vec<ReasoningStep>,
    pub audit_trail: Vec<AuditEntry>,
    pub clinician_summary: String,
    pub patient_summary: String,
    pub auditor_summary: String,
    pub counterfactuals: Vec<String>,
    pub key_factors: Vec<String>,
    pub red_flags: Vec<String>,
}

impl XAIExplanation {
    /// The pre-rendered view for a role.
    pub fn for_role(&self, role: UserRole) -> &str {
        match role {
            UserRole::Clinician => &self.clinician_summary,
            UserRole::Patient => &self.patient_summary,
            UserRole::Auditor => &self.auditor_summary,
        }
    }
}

/// Build the explanation package for an assessment.
///
/// # Errors
///
/// Returns [`crate::ExplanationError::Serialization`] only when the patient
/// data cannot be serialised for audit hashing; no other failure mode
/// exists.
#[allow(clippy::too_many_arguments)]
pub fn render(
    assessment_id: &str,
    patient: &PatientScreening,
    risk_level: RiskLevel,
    confidence: f64,
    likely_conditions: &[String],
    recommended_action: &str,
    red_flags: &[String],
    tools_used: &[String],
) -> ExplanationResult<XAIExplanation> {
    let generated_at = Utc::now();

    let contributions = attribute(&patient.symptoms, patient.age, patient.sex);
    let counterfactuals = counterfactuals(risk_level, &contributions);
    let steps = reasoning_steps(tools_used, generated_at);
    let hash = input_hash(patient)?;
    let trail = audit_trail(generated_at);

    let clinician_summary = clinician_view(
        risk_level,
        confidence,
        &contributions,
        likely_conditions,
        &steps,
        red_flags,
    );
    let patient_summary = patient_view(risk_level, &contributions, recommended_action);
    let auditor_summary =
        auditor_view(assessment_id, generated_at, &trail, &contributions, &steps, &hash);

    let key_factors = contributions
        .iter()
        .take(5)
        .map(|c| format!("{}: {}", c.feature_name, c.feature_value))
        .collect();

    Ok(XAIExplanation {
        assessment_id: assessment_id.to_string(),
        risk_level,
        confidence_score: confidence,
        generated_at,
        feature_contributions: contributions,
        reasoning_steps: steps,
        audit_trail: trail,
        clinician_summary,
        patient_summary,
        auditor_summary,
        counterfactuals,
        key_factors,
        red_flags: red_flags.to_vec(),
    })
}

/// Technical, evidence-based markdown for clinicians.
fn clinician_view(
    risk_level: RiskLevel,
    confidence: f64,
    contributions: &[FeatureContribution],
    likely_conditions: &[String],
    steps: &[ReasoningStep],
    red_flags: &[String],
) -> String {
    let mut lines = vec![
        "## Clinical Assessment Summary".to_string(),
        format!("**Risk Classification:** {risk_level}"),
        format!("**Model Confidence:** {:.0}%", confidence * 100.0),
        String::new(),
        "### Key Clinical Findings".to_string(),
    ];

    for contribution in contributions.iter().take(5) {
        let marker = match contribution.contribution_direction {
            ContributionDirection::IncreasesRisk => "[+]",
            ContributionDirection::DecreasesRisk => "[-]",
            ContributionDirection::Neutral => "[=]",
        };
        lines.push(format!(
            "- **{}** ({}): {marker} {}",
            contribution.feature_name,
            contribution.feature_value,
            contribution.clinical_significance
        ));
    }
    lines.push(String::new());

    if !likely_conditions.is_empty() {
        lines.push("### Differential Considerations".to_string());
        for (i, condition) in likely_conditions.iter().enumerate() {
            lines.push(format!("{}. {condition}", i + 1));
        }
        lines.push(String::new());
    }

    if !red_flags.is_empty() {
        lines.push("### Red Flags Identified".to_string());
        for flag in red_flags {
            lines.push(format!("- {flag}"));
        }
        lines.push(String::new());
    }

    if !steps.is_empty() {
        lines.push("### Agent Reasoning Trace".to_string());
        lines.push("The assessment followed this clinical logic:".to_string());
        for step in steps {
            lines.push(format!("**Step {}:** {}", step.step_number, step.thought));
            if let Some(tool) = &step.tool_used {
                lines.push(format!("  - Tool: `{tool}`"));
            }
            if let Some(observation) = &step.observation {
                lines.push(format!("  - Finding: {observation}"));
            }
        }
    }

    lines.push(String::new());
    lines.push("### Evidence Base".to_string());
    lines.push("- NICE NG100: Rheumatoid arthritis in adults".to_string());
    lines.push("- NICE CG79: Early referral of suspected inflammatory arthritis".to_string());
    lines.push("- BSR Guidelines for RMD management".to_string());

    lines.join("\n")
}

/// Plain-language reassurance for patients, keyed by tier.
fn patient_view(
    risk_level: RiskLevel,
    contributions: &[FeatureContribution],
    recommended_action: &str,
) -> String {
    let mut lines = vec!["## Your Joint Health Check Results".to_string(), String::new()];

    match risk_level {
        RiskLevel::High => {
            lines.push("### We'd like a specialist to see you soon".to_string());
            lines.push(String::new());
            lines.push(
                "Based on your symptoms, we think it would be helpful for you to see a joint \
                 specialist (called a rheumatologist). This doesn't mean anything is definitely \
                 wrong - it just means we want to make sure you get the right care."
                    .to_string(),
            );
        }
        RiskLevel::Moderate => {
            lines.push("### We'd like to learn more".to_string());
            lines.push(String::new());
            lines.push(
                "Your symptoms suggest we should look into this further. Your GP can help \
                 arrange some tests or a follow-up appointment to better understand what's \
                 happening."
                    .to_string(),
            );
        }
        RiskLevel::Low => {
            lines.push("### Things look okay for now".to_string());
            lines.push(String::new());
            lines.push(
                "Based on what you've told us, your symptoms don't suggest anything serious \
                 right now. However, if things change or get worse, please don't hesitate to \
                 speak to your GP."
                    .to_string(),
            );
        }
    }

    lines.push(String::new());
    lines.push("### What we looked at:".to_string());
    for contribution in contributions.iter().take(4) {
        lines.push(format!("- {}", contribution.plain_language));
    }

    lines.push(String::new());
    lines.push("### What happens next?".to_string());
    lines.push(format!("**{recommended_action}**"));
    lines.push(String::new());

    lines.push("### Remember:".to_string());
    lines.push("- This check is a helpful first step, not a diagnosis".to_string());
    lines.push("- Many joint conditions can be managed very well with proper care".to_string());
    lines.push("- Early attention often leads to better outcomes".to_string());
    lines.push("- Your GP and healthcare team are here to support you".to_string());
    lines.push(String::new());
    lines.push(
        "*If you have any questions, please discuss them with your GP or healthcare provider.*"
            .to_string(),
    );

    lines.join("\n")
}

/// Tabular markdown with hashes and the full decision record for auditors.
fn auditor_view(
    assessment_id: &str,
    generated_at: DateTime<Utc>,
    trail: &[AuditEntry],
    contributions: &[FeatureContribution],
    steps: &[ReasoningStep],
    hash: &str,
) -> String {
    let mut lines = vec![
        "# AUDIT LOG".to_string(),
        format!("**Assessment ID:** {assessment_id}"),
        format!("**Generated:** {}", generated_at.to_rfc3339()),
        format!("**Input Data Hash:** SHA256:{hash}"),
        String::new(),
        "## System Information".to_string(),
        "| Property | Value |".to_string(),
        "|----------|-------|".to_string(),
        format!("| System Version | {SYSTEM_VERSION} |"),
        format!("| Model Version | {MODEL_VERSION} |"),
        "| Explanation Method | Reasoning Traces + Rule-Based Attribution |".to_string(),
        String::new(),
        "## Processing Steps".to_string(),
        "| Step | Timestamp | Event | Details |".to_string(),
        "|------|-----------|-------|---------|".to_string(),
    ];

    for entry in trail {
        let mut details = entry.details.to_string();
        if details.chars().count() > 50 {
            details = details.chars().take(50).collect();
            details.push_str("...");
        }
        lines.push(format!(
            "| {} | {} | {} | {details} |",
            entry.entry_id,
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.event_type
        ));
    }

    lines.push(String::new());
    lines.push("## Decision Factors".to_string());
    lines.push("| Factor | Value | Contribution | Direction |".to_string());
    lines.push("|--------|-------|--------------|-----------|".to_string());
    for contribution in contributions {
        let direction = match contribution.contribution_direction {
            ContributionDirection::IncreasesRisk => "increases_risk",
            ContributionDirection::DecreasesRisk => "decreases_risk",
            ContributionDirection::Neutral => "neutral",
        };
        lines.push(format!(
            "| {} | {} | {:+.2} | {direction} |",
            contribution.feature_name, contribution.feature_value, contribution.contribution_score
        ));
    }

    lines.push(String::new());
    lines.push("## Agent Reasoning Trace".to_string());
    for step in steps {
        lines.push(format!(
            "### Step {} ({})",
            step.step_number,
            step.timestamp.format("%H:%M:%S%.3f")
        ));
        lines.push(format!("- **Thought:** {}", step.thought));
        if let Some(action) = &step.action {
            lines.push(format!("- **Action:** {action}"));
        }
        if let Some(tool) = &step.tool_used {
            lines.push(format!("- **Tool Used:** {tool}"));
        }
        if let Some(observation) = &step.observation {
            lines.push(format!("- **Observation:** {observation}"));
        }
        lines.push(format!("- **Duration:** {}ms", step.duration_ms));
        lines.push(String::new());
    }

    lines.push("## Regulatory Compliance Notes".to_string());
    lines.push("- This system is a **DEMONSTRATION PROTOTYPE** only".to_string());
    lines.push("- Not certified for clinical use under MHRA/MDR regulations".to_string());
    lines.push("- Audit trails maintained for transparency demonstration".to_string());
    lines.push("- All explanations are deterministic and reproducible".to_string());

    lines.join("\n")
}
