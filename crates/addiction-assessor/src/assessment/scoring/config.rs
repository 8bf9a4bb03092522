use serde::{Deserialize, Serialize};

/// Fixed coefficients of the linear addiction rubric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub bias: f64,
    pub age: f64,
    pub gender: f64,
    pub academic_level: f64,
    pub daily_usage: f64,
    pub platform: f64,
    pub academic_impact: f64,
    pub sleep_hours: f64,
    pub mental_health: f64,
    pub relationship_status: f64,
    pub conflicts: f64,
}

impl ScoringWeights {
    pub const STANDARD: ScoringWeights = ScoringWeights {
        bias: 3.2,
        age: -0.05,
        gender: 0.10,
        academic_level: -0.20,
        daily_usage: 0.85,
        platform: 0.15,
        academic_impact: 1.50,
        sleep_hours: -0.40,
        mental_health: -0.35,
        relationship_status: 0.10,
        conflicts: 0.60,
    };
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}
