mod config;
mod features;
mod tiers;

pub use config::ScoringWeights;
pub use features::{
    academic_impact_flag, academic_level_code, encode, gender_code, platform_code,
    relationship_code, FeatureVector, OTHER_PLATFORM_CODE,
};
pub use tiers::{classify, Tier, TierLevel, TIERS};

use super::domain::Profile;
use super::questionnaire::QuestionKey;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: u8 = 2;
pub const MAX_SCORE: u8 = 10;

/// Unrounded rubric output: bias plus the weighted feature sum.
pub fn raw_score(features: &FeatureVector, weights: &ScoringWeights) -> f64 {
    features
        .weighted(weights)
        .iter()
        .fold(weights.bias, |total, (_, value, weight)| total + value * weight)
}

pub fn score(features: &FeatureVector, weights: &ScoringWeights) -> u8 {
    round_score(raw_score(features, weights))
}

/// Round half away from zero, then clamp to `MIN_SCORE..=MAX_SCORE`.
pub fn round_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round()
        .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}

/// Stateless scorer bound to one set of weights.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn assess(&self, profile: &Profile) -> Assessment {
        let features = encode(profile);
        let raw_score = raw_score(&features, &self.weights);
        let score = round_score(raw_score);
        let components = features
            .weighted(&self.weights)
            .iter()
            .map(|(feature, value, weight)| ScoreComponent {
                feature: *feature,
                value: *value,
                weight: *weight,
                contribution: value * weight,
            })
            .collect();

        Assessment {
            score,
            raw_score,
            tier: classify(score).level,
            features,
            components,
        }
    }
}

/// One feature's share of the raw score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub feature: QuestionKey,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Scorer output for a single profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub score: u8,
    pub raw_score: f64,
    pub tier: TierLevel,
    pub features: FeatureVector,
    pub components: Vec<ScoreComponent>,
}

impl Assessment {
    pub fn tier(&self) -> &'static Tier {
        self.tier.tier()
    }
}

/// Completed interview: the answers plus their assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub profile: Profile,
    pub assessment: Assessment,
}

impl AssessmentResult {
    pub fn score(&self) -> u8 {
        self.assessment.score
    }

    pub fn tier(&self) -> &'static Tier {
        self.assessment.tier()
    }
}
