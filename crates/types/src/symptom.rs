//! Symptom observations and the canonical symptom vocabulary.
//!
//! A [`Symptom`] is the normalised representation of one observed symptom:
//! its name (from a fixed 10-entry vocabulary), whether it is present, and
//! optional severity/duration detail. Symptoms are immutable once
//! constructed and are consumed read-only by every analysis function.

use serde::{Deserialize, Serialize};

/// The fixed vocabulary of canonical symptom names.
///
/// These are the only names the screening form collects and the only names
/// the analysis engines assign weight to. The wire format is the snake_case
/// name (e.g. `"joint_pain"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomName {
    JointPain,
    MultipleJointsAffected,
    MorningStiffness,
    JointSwelling,
    JointRedness,
    Fatigue,
    ReducedMobility,
    Fever,
    WeightLoss,
    SkinRash,
}

impl SymptomName {
    /// All canonical names, in fixed vocabulary order.
    ///
    /// This order is load-bearing: feature attribution uses it as the
    /// tie-break for equal contribution magnitudes.
    pub const ALL: [SymptomName; 10] = [
        SymptomName::JointPain,
        SymptomName::MultipleJointsAffected,
        SymptomName::MorningStiffness,
        SymptomName::JointSwelling,
        SymptomName::JointRedness,
        SymptomName::Fatigue,
        SymptomName::ReducedMobility,
        SymptomName::Fever,
        SymptomName::WeightLoss,
        SymptomName::SkinRash,
    ];

    /// The snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomName::JointPain => "joint_pain",
            SymptomName::MultipleJointsAffected => "multiple_joints_affected",
            SymptomName::MorningStiffness => "morning_stiffness",
            SymptomName::JointSwelling => "joint_swelling",
            SymptomName::JointRedness => "joint_redness",
            SymptomName::Fatigue => "fatigue",
            SymptomName::ReducedMobility => "reduced_mobility",
            SymptomName::Fever => "fever",
            SymptomName::WeightLoss => "weight_loss",
            SymptomName::SkinRash => "skin_rash",
        }
    }

    /// Parse a wire name back into the vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        SymptomName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
    }

    /// Human-readable display name, e.g. `"Joint Pain"`.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for SymptomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed symptom.
///
/// `severity` and the duration fields are only meaningful when `present` is
/// true; callers should supply `None` otherwise, but every consumer must
/// tolerate either.
///
/// Morning stiffness carries a known unit ambiguity: some call sites store
/// the value in `duration_days` while the collecting form labels it as
/// minutes. Both fields are kept and never converted; each consumer
/// documents which field it compares against which threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub name: SymptomName,
    #[serde(default)]
    pub present: bool,
    #[serde(default)]
    pub severity: Option<u32>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Symptom {
    /// A symptom marked present with no further detail.
    pub fn present(name: SymptomName) -> Self {
        Self {
            name,
            present: true,
            severity: None,
            duration_days: None,
            duration_minutes: None,
            notes: None,
        }
    }

    /// A symptom marked absent.
    pub fn absent(name: SymptomName) -> Self {
        Self {
            name,
            present: false,
            severity: None,
            duration_days: None,
            duration_minutes: None,
            notes: None,
        }
    }

    pub fn with_severity(mut self, severity: u32) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// The standard symptom set with every symptom marked absent.
///
/// This is what the screening form starts from; it also keeps the
/// confidence computation's "data points that could have been supplied"
/// denominator stable for form-driven input.
pub fn default_symptoms() -> Vec<Symptom> {
    SymptomName::ALL.iter().copied().map(Symptom::absent).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_round_trips_through_wire_names() {
        for name in SymptomName::ALL {
            assert_eq!(SymptomName::parse(name.as_str()), Some(name));
        }
        assert_eq!(SymptomName::parse("back_pain"), None);
    }

    #[test]
    fn serde_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&SymptomName::MultipleJointsAffected)
            .expect("serialisation should succeed");
        assert_eq!(json, "\"multiple_joints_affected\"");

        let parsed: SymptomName =
            serde_json::from_str("\"joint_pain\"").expect("deserialisation should succeed");
        assert_eq!(parsed, SymptomName::JointPain);
    }

    #[test]
    fn display_name_title_cases_words() {
        assert_eq!(
            SymptomName::MultipleJointsAffected.display_name(),
            "Multiple Joints Affected"
        );
        assert_eq!(SymptomName::Fever.display_name(), "Fever");
    }

    #[test]
    fn default_symptoms_covers_full_vocabulary_in_order() {
        let symptoms = default_symptoms();
        assert_eq!(symptoms.len(), 10);
        for (symptom, name) in symptoms.iter().zip(SymptomName::ALL) {
            assert_eq!(symptom.name, name);
            assert!(!symptom.present);
            assert!(symptom.severity.is_none());
        }
    }

    #[test]
    fn symptom_json_tolerates_missing_optional_fields() {
        let parsed: Symptom = serde_json::from_str(r#"{"name": "fatigue", "present": true}"#)
            .expect("deserialisation should succeed");
        assert_eq!(parsed.name, SymptomName::Fatigue);
        assert!(parsed.present);
        assert!(parsed.severity.is_none());
        assert!(parsed.duration_days.is_none());
        assert!(parsed.duration_minutes.is_none());
    }

    #[test]
    fn builder_helpers_set_detail_fields() {
        let symptom = Symptom::present(SymptomName::MorningStiffness)
            .with_duration_days(60)
            .with_duration_minutes(75);
        assert_eq!(symptom.duration_days, Some(60));
        assert_eq!(symptom.duration_minutes, Some(75));
    }
}
