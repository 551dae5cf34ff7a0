//! Reasoning traces, audit entries, and input hashing.
//!
//! The reasoning trace is illustrative, not measured: one synthesised
//! step per tool, with fixed 150ms spacing and durations. The audit trail
//! is the fixed six-event processing sequence, spaced at 100ms from the
//! explanation's generation time.

use chrono::{DateTime, Duration, Utc};
use rmd_types::PatientScreening;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ExplanationResult;

pub const MODEL_VERSION: &str = "rmd-agent-v2.0.0";
pub const SYSTEM_VERSION: &str = "RMD-Health-Demo-v2.0";

/// One thought-action-observation step in the reasoning trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step_number: u32,
    pub timestamp: DateTime<Utc>,
    pub thought: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub tool_used: Option<String>,
    #[serde(default)]
    pub observation: Option<String>,
    pub duration_ms: u64,
}

/// One audit-trail entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub details: serde_json::Value,
    #[serde(default)]
    pub input_hash: Option<String>,
    #[serde(default)]
    pub output_hash: Option<String>,
    pub model_version: String,
    pub system_version: String,
}

/// Synthesise the reasoning trace for the tools used.
///
/// An empty tool list yields the default two-step trace.
pub fn reasoning_steps(tools_used: &[String], generated_at: DateTime<Utc>) -> Vec<ReasoningStep> {
    let default_tools = ["analyze_symptoms".to_string(), "calculate_risk".to_string()];
    let tools: &[String] = if tools_used.is_empty() {
        &default_tools
    } else {
        tools_used
    };

    tools
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            let step_number = (i + 1) as u32;
            ReasoningStep {
                step_number,
                timestamp: generated_at + Duration::milliseconds(150 * i64::from(step_number)),
                thought: format!(
                    "Need to analyze patient data using {}",
                    tool.replace('_', " ")
                ),
                action: Some(format!("Call {tool}")),
                tool_used: Some(tool.clone()),
                observation: Some(
                    "Analysis complete - findings integrated into assessment".to_string(),
                ),
                duration_ms: 150,
            }
        })
        .collect()
}

const AUDIT_EVENTS: [&str; 6] = [
    "INPUT_RECEIVED",
    "INPUT_VALIDATED",
    "AGENT_STARTED",
    "TOOLS_EXECUTED",
    "ASSESSMENT_GENERATED",
    "EXPLANATION_CREATED",
];

/// Build the fixed six-entry audit trail.
pub fn audit_trail(generated_at: DateTime<Utc>) -> Vec<AuditEntry> {
    AUDIT_EVENTS
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let seq = (i + 1) as i64;
            AuditEntry {
                entry_id: format!("AE-{seq:04}"),
                timestamp: generated_at + Duration::milliseconds(seq * 100),
                event_type: (*event).to_string(),
                details: serde_json::json!({"status": "completed"}),
                input_hash: None,
                output_hash: None,
                model_version: MODEL_VERSION.to_string(),
                system_version: SYSTEM_VERSION.to_string(),
            }
        })
        .collect()
}

/// Stable content hash of the patient data for audit provenance.
///
/// SHA-256 over a canonical (sorted-key) JSON serialisation, truncated to
/// 16 hex characters.
///
/// # Errors
///
/// Returns [`crate::ExplanationError::Serialization`] when the patient data
/// cannot be serialised.
pub fn input_hash(patient: &PatientScreening) -> ExplanationResult<String> {
    // serde_json's default map is ordered by key, so Value round-tripping
    // yields a canonical serialisation.
    let canonical = serde_json::to_string(&serde_json::to_value(patient)?)?;
    let digest = Sha256::digest(canonical.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    Ok(hex[..16].to_string())
}
