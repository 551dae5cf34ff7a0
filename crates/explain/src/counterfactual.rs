//! Counterfactual explanation generation.
//!
//! Answers "what would need to change for a different outcome" from the
//! risk tier and the attributed factors. Always produces at least one
//! statement.

use crate::attribution::FeatureContribution;
use rmd_types::RiskLevel;

/// Generate counterfactual statements for a tier and its attributions.
pub fn counterfactuals(
    risk_level: RiskLevel,
    contributions: &[FeatureContribution],
) -> Vec<String> {
    let mut statements = Vec::new();

    match risk_level {
        RiskLevel::High => {
            let top_factors: Vec<&FeatureContribution> = contributions
                .iter()
                .filter(|c| c.contribution_score > 0.15)
                .collect();

            if let Some(first) = top_factors.first() {
                statements.push(format!(
                    "The risk level would be MODERATE if {} was not present or less severe.",
                    first.feature_name.to_lowercase()
                ));
            }
            if top_factors.len() >= 2 {
                statements.push(format!(
                    "If both {} and {} were absent, the assessment would likely be LOW risk.",
                    top_factors[0].feature_name.to_lowercase(),
                    top_factors[1].feature_name.to_lowercase()
                ));
            }
            // A HIGH tier with no strong single factor still needs one
            // actionable statement.
            if statements.is_empty() {
                statements.push(
                    "The risk level would be lower if fewer symptoms were present or less severe."
                        .to_string(),
                );
            }
        }
        RiskLevel::Moderate => {
            statements.push(
                "The risk would be HIGH if additional inflammatory signs were present."
                    .to_string(),
            );
            statements.push(
                "The risk would be LOW if morning stiffness resolved within 15 minutes."
                    .to_string(),
            );
        }
        RiskLevel::Low => {
            statements.push(
                "If symptoms persist beyond 6 weeks, the assessment may change to MODERATE."
                    .to_string(),
            );
        }
    }

    statements
}
