//! Ranked differential diagnosis generation.
//!
//! Each candidate condition carries its own independent point rule and
//! inclusion threshold. A condition enters the differential only when its
//! score meets its threshold; the result is capped at the top four, ordered
//! by descending score with ties broken by declaration order.

use rmd_types::{PatientScreening, Sex, SymptomName};

/// Candidate conditions in tie-break declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    RheumatoidArthritis,
    Osteoarthritis,
    PsoriaticArthritis,
    PolymyalgiaRheumatica,
    Gout,
    SystemicLupusErythematosus,
}

impl Condition {
    pub fn display_name(&self) -> &'static str {
        match self {
            Condition::RheumatoidArthritis => "Rheumatoid Arthritis",
            Condition::Osteoarthritis => "Osteoarthritis",
            Condition::PsoriaticArthritis => "Psoriatic Arthritis",
            Condition::PolymyalgiaRheumatica => "Polymyalgia Rheumatica",
            Condition::Gout => "Gout",
            Condition::SystemicLupusErythematosus => "Systemic Lupus Erythematosus (SLE)",
        }
    }
}

/// One ranked candidate with the factors that scored for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifferentialEntry {
    pub condition: Condition,
    pub score: i32,
    pub rationale: String,
}

/// Outcome of differential generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Differential {
    /// At least one condition met its threshold; entries are ordered by
    /// descending score, capped at four.
    Ranked(Vec<DifferentialEntry>),
    /// No condition met its threshold.
    InsufficientData,
}

impl Differential {
    /// Condition names for the assessment's `likely_conditions` field.
    ///
    /// An insufficient-data differential defaults to the mechanical-pain
    /// conditions so the assessment list is never empty.
    pub fn likely_conditions(&self) -> Vec<String> {
        match self {
            Differential::Ranked(entries) => entries
                .iter()
                .map(|e| e.condition.display_name().to_string())
                .collect(),
            Differential::InsufficientData => vec![
                "Osteoarthritis".to_string(),
                "Mechanical Joint Pain".to_string(),
            ],
        }
    }

    /// Render the differential as the findings string used on the tool
    /// surface.
    pub fn summary(&self) -> String {
        match self {
            Differential::Ranked(entries) => {
                let mut lines = vec!["DIFFERENTIAL DIAGNOSIS:".to_string(), "=".repeat(40)];
                for (rank, entry) in entries.iter().enumerate() {
                    lines.push(format!(
                        "{}. {} (score {}) - {}",
                        rank + 1,
                        entry.condition.display_name(),
                        entry.score,
                        entry.rationale
                    ));
                }
                lines.join("\n")
            }
            Differential::InsufficientData => {
                "Insufficient data for a specific differential. Presentation is most consistent \
                 with mechanical or non-specific joint pain."
                    .to_string()
            }
        }
    }
}

struct ConditionScore {
    condition: Condition,
    threshold: i32,
    score: i32,
    factors: Vec<&'static str>,
}

impl ConditionScore {
    fn new(condition: Condition, threshold: i32) -> Self {
        Self {
            condition,
            threshold,
            score: 0,
            factors: Vec::new(),
        }
    }

    fn add_if(&mut self, applies: bool, points: i32, factor: &'static str) {
        if applies {
            self.score += points;
            self.factors.push(factor);
        }
    }

    fn into_entry(self) -> Option<DifferentialEntry> {
        if self.score >= self.threshold {
            Some(DifferentialEntry {
                condition: self.condition,
                score: self.score,
                rationale: self.factors.join("; "),
            })
        } else {
            None
        }
    }
}

/// Score every candidate condition against a screening.
pub fn differential(patient: &PatientScreening) -> Differential {
    let has = |name| patient.has_symptom(name);
    let prolonged_stiffness = patient
        .get_symptom(SymptomName::MorningStiffness)
        .filter(|s| s.present)
        .and_then(|s| s.duration_days)
        .is_some_and(|d| d > 30);
    let severe_joint_pain = patient
        .get_symptom(SymptomName::JointPain)
        .filter(|s| s.present)
        .and_then(|s| s.severity)
        .is_some_and(|sev| sev >= 7);

    let mut ra = ConditionScore::new(Condition::RheumatoidArthritis, 4);
    ra.add_if(
        has(SymptomName::MultipleJointsAffected),
        2,
        "symmetric polyarticular involvement",
    );
    ra.add_if(
        has(SymptomName::MorningStiffness),
        2,
        "morning stiffness",
    );
    ra.add_if(prolonged_stiffness, 1, "stiffness exceeding 30 minutes");
    ra.add_if(has(SymptomName::JointSwelling), 1, "joint swelling");
    ra.add_if(patient.sex == Sex::Female, 1, "female predominance");
    ra.add_if(
        (30..=60).contains(&patient.age),
        1,
        "typical age of onset (30-60)",
    );

    let mut oa = ConditionScore::new(Condition::Osteoarthritis, 3);
    oa.add_if(patient.age >= 50, 2, "age 50 or over");
    oa.add_if(
        (40..50).contains(&patient.age),
        1,
        "age over 40",
    );
    oa.add_if(has(SymptomName::JointPain), 1, "activity-related joint pain");
    oa.add_if(
        has(SymptomName::ReducedMobility),
        1,
        "reduced joint mobility",
    );

    let mut psa = ConditionScore::new(Condition::PsoriaticArthritis, 4);
    psa.add_if(has(SymptomName::SkinRash), 3, "psoriasiform skin involvement");
    psa.add_if(has(SymptomName::JointPain), 1, "joint pain");
    psa.add_if(has(SymptomName::JointSwelling), 1, "joint swelling");
    psa.add_if(
        has(SymptomName::MultipleJointsAffected),
        1,
        "multiple joints affected",
    );

    let mut pmr = ConditionScore::new(Condition::PolymyalgiaRheumatica, 4);
    pmr.add_if(patient.age >= 50, 2, "age 50 or over");
    pmr.add_if(
        has(SymptomName::MorningStiffness),
        2,
        "proximal morning stiffness",
    );
    pmr.add_if(has(SymptomName::Fatigue), 1, "fatigue");

    let mut gout = ConditionScore::new(Condition::Gout, 4);
    gout.add_if(has(SymptomName::JointRedness), 2, "marked joint redness");
    gout.add_if(has(SymptomName::JointSwelling), 1, "joint swelling");
    gout.add_if(severe_joint_pain, 1, "severe pain (7/10 or above)");
    gout.add_if(patient.sex == Sex::Male, 1, "male predominance");

    let mut sle = ConditionScore::new(Condition::SystemicLupusErythematosus, 4);
    sle.add_if(has(SymptomName::SkinRash), 2, "rash");
    sle.add_if(has(SymptomName::Fever), 1, "fever");
    sle.add_if(has(SymptomName::Fatigue), 1, "fatigue");
    sle.add_if(has(SymptomName::WeightLoss), 1, "weight loss");
    sle.add_if(patient.sex == Sex::Female, 1, "female predominance");

    let mut entries: Vec<DifferentialEntry> = [ra, oa, psa, pmr, gout, sle]
        .into_iter()
        .filter_map(ConditionScore::into_entry)
        .collect();

    if entries.is_empty() {
        return Differential::InsufficientData;
    }

    // Stable sort keeps declaration order for equal scores.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(4);
    Differential::Ranked(entries)
}
