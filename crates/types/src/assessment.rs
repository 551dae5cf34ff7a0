//! Risk assessment output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The primary output classification.
///
/// Ordered: `Low < Moderate < High`, so tier comparisons read naturally in
/// monotonicity checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }

    /// Display colour used by presentation layers.
    pub fn display_colour(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Moderate => "orange",
            RiskLevel::High => "red",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The assessment produced by one `assess` call.
///
/// Produced exactly once per call, immutable, and owned by the caller after
/// return. Every field is populated on every path, including the total-LLM-
/// failure fallback path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub likely_conditions: Vec<String>,
    pub reasoning: String,
    pub recommended_next_step: String,
    /// Confidence in `[0, 1]`, rounded to two decimal places.
    pub confidence_score: f64,
    pub red_flags_identified: Vec<String>,
    pub assessment_timestamp: DateTime<Utc>,
}

impl RiskAssessment {
    /// Human-readable confidence label for presentation layers.
    pub fn confidence_label(&self) -> &'static str {
        if self.confidence_score >= 0.8 {
            "High Confidence"
        } else if self.confidence_score >= 0.5 {
            "Moderate Confidence"
        } else {
            "Low Confidence"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_serialises_to_upper_case_wire_values() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Moderate).expect("serialisation should succeed"),
            "\"MODERATE\""
        );
        let parsed: RiskLevel =
            serde_json::from_str("\"HIGH\"").expect("deserialisation should succeed");
        assert_eq!(parsed, RiskLevel::High);
    }

    #[test]
    fn risk_level_rejects_unknown_wire_values() {
        let result = serde_json::from_str::<RiskLevel>("\"SEVERE\"");
        assert!(result.is_err());
    }

    #[test]
    fn risk_levels_order_low_to_high() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
    }

    #[test]
    fn display_colours_match_tiers() {
        assert_eq!(RiskLevel::Low.display_colour(), "green");
        assert_eq!(RiskLevel::Moderate.display_colour(), "orange");
        assert_eq!(RiskLevel::High.display_colour(), "red");
    }

    #[test]
    fn confidence_label_bands() {
        let mut assessment = RiskAssessment {
            risk_level: RiskLevel::Low,
            likely_conditions: vec![],
            reasoning: String::new(),
            recommended_next_step: String::new(),
            confidence_score: 0.85,
            red_flags_identified: vec![],
            assessment_timestamp: Utc::now(),
        };
        assert_eq!(assessment.confidence_label(), "High Confidence");
        assessment.confidence_score = 0.6;
        assert_eq!(assessment.confidence_label(), "Moderate Confidence");
        assessment.confidence_score = 0.3;
        assert_eq!(assessment.confidence_label(), "Low Confidence");
    }

    #[test]
    fn assessment_round_trips_through_json() {
        let assessment = RiskAssessment {
            risk_level: RiskLevel::High,
            likely_conditions: vec!["Rheumatoid Arthritis".to_string()],
            reasoning: "polyarticular inflammatory pattern".to_string(),
            recommended_next_step: "Urgent rheumatology referral recommended".to_string(),
            confidence_score: 0.92,
            red_flags_identified: vec!["Multiple joint involvement".to_string()],
            assessment_timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&assessment).expect("serialisation should succeed");
        let parsed: RiskAssessment =
            serde_json::from_str(&json).expect("deserialisation should succeed");
        assert_eq!(parsed, assessment);
    }
}
