use serde::{Deserialize, Serialize};

use super::super::domain::Profile;
use super::super::questionnaire::QuestionKey;
use super::config::ScoringWeights;

/// Numeric encoding of a [`Profile`] consumed by the rubric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
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

impl FeatureVector {
    /// Feature values paired with their weights, in questionnaire order.
    pub(crate) fn weighted(&self, weights: &ScoringWeights) -> [(QuestionKey, f64, f64); 10] {
        [
            (QuestionKey::Age, self.age, weights.age),
            (QuestionKey::Gender, self.gender, weights.gender),
            (
                QuestionKey::AcademicLevel,
                self.academic_level,
                weights.academic_level,
            ),
            (QuestionKey::DailyUsage, self.daily_usage, weights.daily_usage),
            (QuestionKey::Platform, self.platform, weights.platform),
            (
                QuestionKey::AcademicImpact,
                self.academic_impact,
                weights.academic_impact,
            ),
            (QuestionKey::SleepHours, self.sleep_hours, weights.sleep_hours),
            (
                QuestionKey::MentalHealth,
                self.mental_health,
                weights.mental_health,
            ),
            (
                QuestionKey::RelationshipStatus,
                self.relationship_status,
                weights.relationship_status,
            ),
            (QuestionKey::Conflicts, self.conflicts, weights.conflicts),
        ]
    }
}

const PLATFORM_CODES: [(&str, u8); 8] = [
    ("facebook", 0),
    ("instagram", 1),
    ("tiktok", 2),
    ("youtube", 3),
    ("twitter", 4),
    ("linkedin", 5),
    ("snapchat", 6),
    ("whatsapp", 7),
];

pub const OTHER_PLATFORM_CODE: u8 = 8;

pub fn encode(profile: &Profile) -> FeatureVector {
    FeatureVector {
        age: profile.age,
        gender: f64::from(gender_code(&profile.gender)),
        academic_level: f64::from(academic_level_code(&profile.academic_level)),
        daily_usage: profile.daily_usage,
        platform: f64::from(platform_code(&profile.platform)),
        academic_impact: f64::from(academic_impact_flag(&profile.academic_impact)),
        sleep_hours: profile.sleep_hours,
        mental_health: profile.mental_health,
        relationship_status: f64::from(relationship_code(&profile.relationship_status)),
        conflicts: profile.conflicts,
    }
}

pub fn gender_code(raw: &str) -> u8 {
    match normalized(raw).as_str() {
        "female" | "f" => 1,
        _ => 0,
    }
}

pub fn academic_level_code(raw: &str) -> u8 {
    let level = normalized(raw);
    if level.contains("high") || level == "hs" {
        2
    } else if level.contains("undergrad") || level == "ug" {
        0
    } else {
        1
    }
}

/// Exact match on the lower-cased name; anything unlisted is "other".
pub fn platform_code(raw: &str) -> u8 {
    let platform = normalized(raw);
    PLATFORM_CODES
        .iter()
        .find(|(name, _)| *name == platform)
        .map(|(_, code)| *code)
        .unwrap_or(OTHER_PLATFORM_CODE)
}

pub fn academic_impact_flag(raw: &str) -> u8 {
    match normalized(raw).as_str() {
        "yes" | "y" => 1,
        _ => 0,
    }
}

pub fn relationship_code(raw: &str) -> u8 {
    let status = normalized(raw);
    if status.contains("single") || status == "s" {
        0
    } else if status.contains("relationship") || status == "r" {
        1
    } else {
        2
    }
}

fn normalized(raw: &str) -> String {
    raw.trim().to_lowercase()
}
