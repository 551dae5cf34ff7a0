//! Structured-output recovery from free-form LLM replies.
//!
//! Models asked for "JSON only" still wrap replies in code fences or
//! prose. [`extract_json`] tries a direct parse first, then the fenced and
//! raw-object fallbacks; [`parse_assessment`] validates the recovered
//! object against the assessment contract.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use rmd_types::{RiskAssessment, RiskLevel};

use crate::{AgentError, AgentResult};

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap());
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").unwrap());
static RAW_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

/// Recover a JSON object from a model reply.
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Some(value);
    }

    for captures in JSON_FENCE.captures_iter(text).chain(ANY_FENCE.captures_iter(text)) {
        if let Some(inner) = captures.get(1) {
            if let Ok(value) = serde_json::from_str(inner.as_str().trim()) {
                return Some(value);
            }
        }
    }

    RAW_OBJECT
        .find(text)
        .and_then(|m| serde_json::from_str(m.as_str()).ok())
}

/// Validate a recovered object and build the assessment.
///
/// # Errors
///
/// Returns [`AgentError::InvalidAssessment`] listing every violated
/// constraint: missing required fields, an unknown risk level, or a
/// confidence score outside `[0, 1]`.
pub fn parse_assessment(value: &serde_json::Value) -> AgentResult<RiskAssessment> {
    let mut errors = Vec::new();

    let risk_level = match value.get("risk_level").and_then(|v| v.as_str()) {
        Some("LOW") => Some(RiskLevel::Low),
        Some("MODERATE") => Some(RiskLevel::Moderate),
        Some("HIGH") => Some(RiskLevel::High),
        Some(other) => {
            errors.push(format!("risk_level must be LOW, MODERATE or HIGH, got {other}"));
            None
        }
        None => {
            errors.push("missing required field: risk_level".to_string());
            None
        }
    };

    let reasoning = value.get("reasoning").and_then(|v| v.as_str());
    if reasoning.is_none() {
        errors.push("missing required field: reasoning".to_string());
    }

    let recommended_next_step = value.get("recommended_next_step").and_then(|v| v.as_str());
    if recommended_next_step.is_none() {
        errors.push("missing required field: recommended_next_step".to_string());
    }

    let confidence_score = match value.get("confidence_score").and_then(|v| v.as_f64()) {
        Some(score) if (0.0..=1.0).contains(&score) => Some(score),
        Some(score) => {
            errors.push(format!(
                "confidence_score must be between 0 and 1, got {score}"
            ));
            None
        }
        None => {
            errors.push("missing required field: confidence_score".to_string());
            None
        }
    };

    if !errors.is_empty() {
        return Err(AgentError::InvalidAssessment(errors.join("; ")));
    }

    let string_list = |key: &str| -> Vec<String> {
        value
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    // The Nones are all rejected above.
    Ok(RiskAssessment {
        risk_level: risk_level.ok_or_else(|| AgentError::MalformedResponse)?,
        likely_conditions: string_list("likely_conditions"),
        reasoning: reasoning.unwrap_or_default().to_string(),
        recommended_next_step: recommended_next_step.unwrap_or_default().to_string(),
        confidence_score: confidence_score.ok_or_else(|| AgentError::MalformedResponse)?,
        red_flags_identified: string_list("red_flags_identified"),
        assessment_timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "risk_level": "MODERATE",
        "likely_conditions": ["Osteoarthritis"],
        "reasoning": "Localised mechanical pain pattern.",
        "recommended_next_step": "Schedule GP consultation",
        "confidence_score": 0.72,
        "red_flags_identified": []
    }"#;

    #[test]
    fn direct_json_parses() {
        let value = extract_json(VALID).expect("should parse");
        assert_eq!(value["risk_level"], "MODERATE");
    }

    #[test]
    fn json_fenced_reply_parses() {
        let reply = format!("Here is my assessment:\n```json\n{VALID}\n```\nThank you.");
        let value = extract_json(&reply).expect("should parse");
        assert_eq!(value["confidence_score"], 0.72);
    }

    #[test]
    fn bare_fenced_reply_parses() {
        let reply = format!("```\n{VALID}\n```");
        assert!(extract_json(&reply).is_some());
    }

    #[test]
    fn embedded_raw_object_parses() {
        let reply = format!("My assessment follows. {VALID} Let me know if you need more.");
        assert!(extract_json(&reply).is_some());
    }

    #[test]
    fn prose_without_json_yields_none() {
        assert!(extract_json("The patient appears to be at moderate risk.").is_none());
    }

    #[test]
    fn valid_object_builds_an_assessment() {
        let value = extract_json(VALID).expect("should parse");
        let assessment = parse_assessment(&value).expect("should validate");
        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
        assert_eq!(assessment.likely_conditions, vec!["Osteoarthritis"]);
        assert_eq!(assessment.confidence_score, 0.72);
    }

    #[test]
    fn unknown_risk_level_is_rejected() {
        let value: serde_json::Value = serde_json::json!({
            "risk_level": "SEVERE",
            "reasoning": "x",
            "recommended_next_step": "x",
            "confidence_score": 0.5
        });
        let err = parse_assessment(&value).expect_err("should reject");
        assert!(matches!(err, AgentError::InvalidAssessment(msg) if msg.contains("SEVERE")));
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let value: serde_json::Value = serde_json::json!({
            "risk_level": "LOW",
            "reasoning": "x",
            "recommended_next_step": "x",
            "confidence_score": 1.4
        });
        let err = parse_assessment(&value).expect_err("should reject");
        assert!(matches!(err, AgentError::InvalidAssessment(msg) if msg.contains("1.4")));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let value: serde_json::Value = serde_json::json!({"risk_level": "LOW"});
        let err = parse_assessment(&value).expect_err("should reject");
        let AgentError::InvalidAssessment(msg) = err else {
            panic!("wrong error variant");
        };
        assert!(msg.contains("reasoning"));
        assert!(msg.contains("recommended_next_step"));
        assert!(msg.contains("confidence_score"));
    }
}
