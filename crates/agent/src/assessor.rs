//! Assessment strategies and the unconditional fallback wrapper.

use chrono::Utc;
use rmd_core::{differential, patterns, scorer, tools};
use rmd_types::{PatientScreening, RiskAssessment, RiskLevel};
use tracing::{debug, info, warn};

use crate::client::LlmClient;
use crate::extract::{extract_json, parse_assessment};
use crate::prompts::{build_tool_analysis_prompt, SYSTEM_PROMPT};
use crate::{AgentError, AgentResult};

/// An assessment strategy.
pub trait Assessor {
    /// Assess one screening.
    ///
    /// # Errors
    ///
    /// Strategy-dependent; the rule-based strategy never fails.
    fn assess(&self, patient: &PatientScreening) -> AgentResult<RiskAssessment>;
}

/// Recommended next step for a tier, shared by the rule-based strategy and
/// test expectations.
pub fn next_step_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "Urgent rheumatology referral recommended",
        RiskLevel::Moderate => "Schedule GP consultation for further evaluation",
        RiskLevel::Low => "Continue monitoring symptoms; consult GP if symptoms persist or worsen",
    }
}

/// Rule-based strategy composing the pure analysis functions directly.
///
/// `likely_conditions` comes from the ranked differential; an
/// insufficient-data differential falls back to the mechanical-pain
/// defaults, so the list is never empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedAssessor;

impl Assessor for RuleBasedAssessor {
    fn assess(&self, patient: &PatientScreening) -> AgentResult<RiskAssessment> {
        let analysis = patterns::analyze(patient);
        let (risk_level, confidence) = scorer::score(patient);
        let likely_conditions = differential::differential(patient).likely_conditions();

        let reasoning = format!(
            "Rule-based analysis (no LLM called).\n\
             \n\
             Pattern Analysis Results:\n\
             {}\n\
             \n\
             Risk Level: {risk_level}\n\
             This assessment is based on the number and severity of symptoms present, with \
             particular attention to inflammatory markers (morning stiffness, joint swelling, \
             systemic symptoms) and polyarticular involvement.",
            analysis.summary()
        );

        debug!(
            risk_level = %risk_level,
            confidence,
            red_flags = analysis.red_flags.len(),
            "rule-based assessment complete"
        );

        Ok(RiskAssessment {
            risk_level,
            likely_conditions,
            reasoning,
            recommended_next_step: next_step_for(risk_level).to_string(),
            confidence_score: confidence,
            red_flags_identified: analysis.red_flags,
            assessment_timestamp: Utc::now(),
        })
    }
}

/// LLM-backed strategy: tools, prompt, chat call, structured-output
/// parsing, validation.
pub struct LlmAssessor<C: LlmClient> {
    client: C,
}

impl<C: LlmClient> LlmAssessor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: LlmClient> Assessor for LlmAssessor<C> {
    fn assess(&self, patient: &PatientScreening) -> AgentResult<RiskAssessment> {
        debug!(patient_id = %patient.patient_id, "running analysis tools");
        let tool_output = tools::run_all(patient);

        let user_prompt = build_tool_analysis_prompt(patient, &tool_output);

        debug!("calling LLM endpoint");
        let reply = self.client.chat(SYSTEM_PROMPT, &user_prompt)?;

        let value = extract_json(&reply).ok_or(AgentError::MalformedResponse)?;
        let assessment = parse_assessment(&value)?;

        info!(
            risk_level = %assessment.risk_level,
            confidence = assessment.confidence_score,
            "LLM assessment validated"
        );
        Ok(assessment)
    }
}

/// Wrapper guaranteeing the caller always receives a valid assessment.
///
/// Any failure of the primary strategy short-circuits to the rule-based
/// output: the failure reason is embedded in the reasoning text and an
/// explicit red flag marks the result as needing clinical review.
pub struct FallbackAssessor {
    primary: Box<dyn Assessor + Send + Sync>,
    rule_based: RuleBasedAssessor,
}

impl FallbackAssessor {
    pub fn new(primary: Box<dyn Assessor + Send + Sync>) -> Self {
        Self {
            primary,
            rule_based: RuleBasedAssessor,
        }
    }

    /// A fallback wrapper with no LLM strategy at all.
    pub fn rule_based_only() -> Self {
        Self::new(Box::new(RuleBasedAssessor))
    }

    /// Assess a screening, falling back on any primary failure.
    ///
    /// This is deliberately infallible: the rule-based strategy cannot
    /// fail, so a `RiskAssessment` is always produced.
    pub fn assess(&self, patient: &PatientScreening) -> RiskAssessment {
        match self.primary.assess(patient) {
            Ok(assessment) => assessment,
            Err(error) => {
                warn!(%error, "primary assessor failed, using rule-based fallback");
                let mut assessment = self
                    .rule_based
                    .assess(patient)
                    .unwrap_or_else(|_| unreachable!("rule-based assessment cannot fail"));
                assessment.reasoning = format!(
                    "Automated analysis encountered an issue: {error}. A rule-based assessment \
                     was performed instead. This patient should be reviewed by a healthcare \
                     professional.\n\n{}",
                    assessment.reasoning
                );
                assessment
                    .red_flags_identified
                    .push("System used fallback - clinical review required".to_string());
                assessment
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockLlmClient;
    use rmd_types::screening::samples;

    #[test]
    fn rule_based_low_risk_sample() {
        let assessment = RuleBasedAssessor
            .assess(&samples::low_risk())
            .expect("rule-based assessment should succeed");
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(
            assessment.likely_conditions,
            vec!["Osteoarthritis", "Mechanical Joint Pain"]
        );
        assert!(assessment.red_flags_identified.is_empty());
        assert_eq!(
            assessment.recommended_next_step,
            "Continue monitoring symptoms; consult GP if symptoms persist or worsen"
        );
    }

    #[test]
    fn rule_based_high_risk_sample() {
        let assessment = RuleBasedAssessor
            .assess(&samples::high_risk())
            .expect("rule-based assessment should succeed");
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment
            .likely_conditions
            .contains(&"Rheumatoid Arthritis".to_string()));
        assert!(!assessment.red_flags_identified.is_empty());
        assert_eq!(
            assessment.recommended_next_step,
            "Urgent rheumatology referral recommended"
        );
        assert!(assessment.reasoning.contains("POLYARTICULAR"));
    }

    #[test]
    fn rule_based_empty_screening_is_low_with_floor_confidence() {
        let patient = PatientScreening::new(40, rmd_types::Sex::Unspecified, Vec::new());
        let assessment = RuleBasedAssessor
            .assess(&patient)
            .expect("rule-based assessment should succeed");
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.confidence_score, 0.30);
        assert!(assessment.red_flags_identified.is_empty());
    }

    #[test]
    fn rule_based_inflammatory_presentation_is_high_with_red_flags() {
        use rmd_types::{Symptom, SymptomName};
        let patient = PatientScreening::new(
            45,
            rmd_types::Sex::Female,
            vec![
                Symptom::present(SymptomName::JointPain).with_severity(7),
                Symptom::present(SymptomName::MorningStiffness).with_duration_days(60),
                Symptom::present(SymptomName::MultipleJointsAffected),
                Symptom::present(SymptomName::JointSwelling),
                Symptom::present(SymptomName::Fatigue).with_severity(6),
            ],
        );
        let assessment = RuleBasedAssessor
            .assess(&patient)
            .expect("rule-based assessment should succeed");
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.likely_conditions[0], "Rheumatoid Arthritis");
        assert!(assessment
            .red_flags_identified
            .contains(&"Prolonged morning stiffness".to_string()));
    }

    #[test]
    fn rule_based_assessment_is_deterministic() {
        let patient = samples::high_risk();
        let first = RuleBasedAssessor.assess(&patient).expect("should succeed");
        let second = RuleBasedAssessor.assess(&patient).expect("should succeed");
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.confidence_score, second.confidence_score);
        assert_eq!(first.likely_conditions, second.likely_conditions);
        assert_eq!(first.red_flags_identified, second.red_flags_identified);
    }

    #[test]
    fn llm_assessor_accepts_a_valid_fenced_reply() {
        let reply = r#"Here is the assessment:
```json
{
    "risk_level": "HIGH",
    "likely_conditions": ["Rheumatoid Arthritis"],
    "reasoning": "Polyarticular inflammatory pattern with systemic features.",
    "recommended_next_step": "Urgent rheumatology referral recommended",
    "confidence_score": 0.85,
    "red_flags_identified": ["Multiple joint involvement"]
}
```"#;
        let assessor = LlmAssessor::new(MockLlmClient::replying(reply));
        let assessment = assessor
            .assess(&samples::high_risk())
            .expect("valid reply should parse");
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.confidence_score, 0.85);
    }

    #[test]
    fn llm_assessor_rejects_a_reply_without_json() {
        let assessor = LlmAssessor::new(MockLlmClient::replying(
            "I think this patient is probably fine.",
        ));
        let err = assessor
            .assess(&samples::low_risk())
            .expect_err("prose reply should fail");
        assert!(matches!(err, AgentError::MalformedResponse));
    }

    #[test]
    fn fallback_wraps_llm_garbage_into_a_rule_based_assessment() {
        let assessor = FallbackAssessor::new(Box::new(LlmAssessor::new(
            MockLlmClient::replying("no json here"),
        )));
        let assessment = assessor.assess(&samples::high_risk());
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment
            .reasoning
            .contains("Automated analysis encountered an issue"));
        assert!(assessment
            .red_flags_identified
            .contains(&"System used fallback - clinical review required".to_string()));
        // Rule-based red flags survive alongside the fallback flag.
        assert!(assessment
            .red_flags_identified
            .contains(&"Multiple joint involvement".to_string()));
    }

    #[test]
    fn fallback_wraps_transport_failures() {
        let assessor = FallbackAssessor::new(Box::new(LlmAssessor::new(MockLlmClient::failing(
            AgentError::Timeout(60),
        ))));
        let assessment = assessor.assess(&samples::low_risk());
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(assessment.reasoning.contains("timed out after 60s"));
    }

    #[test]
    fn fallback_passes_through_a_healthy_primary() {
        let assessor = FallbackAssessor::rule_based_only();
        let assessment = assessor.assess(&samples::low_risk());
        assert!(!assessment
            .red_flags_identified
            .iter()
            .any(|f| f.contains("fallback")));
    }

    #[test]
    fn llm_assessor_rejects_schema_invalid_replies() {
        let assessor = LlmAssessor::new(MockLlmClient::replying(
            r#"{"risk_level": "HIGH", "confidence_score": 3.0}"#,
        ));
        let err = assessor
            .assess(&samples::high_risk())
            .expect_err("schema-invalid reply should fail");
        assert!(matches!(err, AgentError::InvalidAssessment(_)));
    }
}
