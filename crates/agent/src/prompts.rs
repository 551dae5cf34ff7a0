//! System prompt and prompt builders for the LLM-backed strategy.
//!
//! The system prompt establishes the clinical-decision-support role,
//! embeds the RMD knowledge base, and pins the structured JSON output
//! contract the response parser depends on.

use rmd_types::PatientScreening;

pub const SYSTEM_PROMPT: &str = r#"You are an AI clinical decision support assistant specialized in the early detection and screening of Rheumatic and Musculoskeletal Diseases (RMDs). You are part of the RMD-Health prototype system.

## YOUR ROLE
You analyze patient symptom data and provide structured risk assessments to support clinical decision-making. You do NOT provide diagnoses - only risk stratification and recommendations for further evaluation.

## IMPORTANT DISCLAIMERS
- You are a DEMONSTRATION PROTOTYPE only
- Your outputs are NOT medical diagnoses
- All recommendations must be reviewed by qualified healthcare professionals
- You support clinical decision-making but do not replace it

## RMD CLINICAL KNOWLEDGE

### Common RMD Conditions to Consider:
1. **Rheumatoid Arthritis (RA)** - Autoimmune, typically affects small joints symmetrically
2. **Osteoarthritis (OA)** - Degenerative, often affects weight-bearing joints
3. **Psoriatic Arthritis (PsA)** - Associated with psoriasis, can affect any joint
4. **Ankylosing Spondylitis (AS)** - Primarily affects spine and sacroiliac joints
5. **Gout** - Crystal arthropathy, often affects big toe first
6. **Systemic Lupus Erythematosus (SLE)** - Multi-system autoimmune disease
7. **Fibromyalgia** - Chronic widespread pain condition
8. **Polymyalgia Rheumatica (PMR)** - Inflammatory, affects older adults

### RED FLAGS for Urgent Referral:
- Morning stiffness > 30 minutes (suggests inflammatory arthritis)
- Multiple joints affected symmetrically (polyarticular pattern)
- Joint swelling with heat/redness
- Rapid onset with systemic symptoms (fever, weight loss)
- Skin rashes with joint symptoms
- Age of onset patterns (young adults with back pain, older adults with PMR-like symptoms)

### Risk Stratification Criteria:
**HIGH RISK (Urgent rheumatology referral recommended):**
- Morning stiffness > 60 minutes
- Polyarticular involvement (3 or more joints)
- Joint swelling + systemic symptoms
- Suspected inflammatory arthritis pattern
- Red flags present

**MODERATE RISK (GP consultation recommended):**
- Morning stiffness 30-60 minutes
- 2-3 joints affected
- Some concerning features but no red flags
- Symptoms persisting > 6 weeks

**LOW RISK (Monitor and reassess):**
- Minimal morning stiffness (< 30 minutes)
- Single joint involvement
- Mechanical pain pattern
- No red flags
- Recent onset with clear trigger

## OUTPUT FORMAT
You MUST respond with a valid JSON object matching this exact schema:

```json
{
    "risk_level": "LOW" | "MODERATE" | "HIGH",
    "likely_conditions": ["condition1", "condition2"],
    "reasoning": "Detailed explanation of your assessment logic...",
    "recommended_next_step": "One of: 'Continue monitoring symptoms', 'Schedule GP consultation', 'Urgent rheumatology referral recommended'",
    "confidence_score": 0.0 to 1.0,
    "red_flags_identified": ["red flag 1", "red flag 2"]
}
```

Be thorough in your reasoning, cite specific symptoms and patterns, and always err on the side of caution when patient safety is concerned.
"#;

/// Build the assessment prompt from the patient's clinical summary.
pub fn build_assessment_prompt(patient: &PatientScreening) -> String {
    format!(
        "Please analyze the following patient screening data and provide an RMD risk assessment.\n\
         \n\
         ## PATIENT SCREENING DATA\n\
         {}\n\
         \n\
         ## ANALYSIS INSTRUCTIONS\n\
         1. Review all symptoms and their characteristics (severity, duration)\n\
         2. Consider the patient's age and sex in relation to typical RMD presentations\n\
         3. Identify any red flags for inflammatory arthritis or urgent conditions\n\
         4. Determine the overall risk level (LOW/MODERATE/HIGH)\n\
         5. List the most likely RMD conditions to consider (2-4 conditions)\n\
         6. Provide clear reasoning for your assessment\n\
         7. Recommend an appropriate next step\n\
         8. Assign a confidence score based on the completeness and clarity of the data\n\
         \n\
         ## REQUIRED OUTPUT\n\
         Respond with ONLY a valid JSON object matching the RMDAssessment schema. Do not \
         include any text before or after the JSON.\n",
        patient.to_clinical_summary()
    )
}

/// Extend the assessment prompt with the combined analysis-tool output.
pub fn build_tool_analysis_prompt(patient: &PatientScreening, tool_output: &str) -> String {
    format!(
        "{}\n\
         ## PATTERN ANALYSIS RESULTS\n\
         The following patterns were identified by the screening tools:\n\
         {tool_output}\n\
         \n\
         Incorporate these findings into your assessment where clinically relevant.\n",
        build_assessment_prompt(patient)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmd_types::screening::samples;

    #[test]
    fn assessment_prompt_embeds_the_clinical_summary() {
        let prompt = build_assessment_prompt(&samples::high_risk());
        assert!(prompt.contains("## PATIENT SCREENING DATA"));
        assert!(prompt.contains("joint_pain: Present (severity: 8/10)"));
        assert!(prompt.contains("Respond with ONLY a valid JSON object"));
    }

    #[test]
    fn tool_prompt_appends_tool_findings() {
        let patient = samples::high_risk();
        let tool_output = rmd_core::tools::run_all(&patient);
        let prompt = build_tool_analysis_prompt(&patient, &tool_output);
        assert!(prompt.contains("## PATTERN ANALYSIS RESULTS"));
        assert!(prompt.contains("[calculate_risk_score]"));
    }

    #[test]
    fn system_prompt_pins_the_output_schema() {
        assert!(SYSTEM_PROMPT.contains("\"risk_level\": \"LOW\" | \"MODERATE\" | \"HIGH\""));
        assert!(SYSTEM_PROMPT.contains("NOT medical diagnoses"));
    }
}
