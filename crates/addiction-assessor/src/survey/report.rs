use std::collections::BTreeMap;

use serde::Serialize;

use super::parser::SurveyRecord;
use crate::assessment::{QuestionKey, Scorer, TierLevel};

/// Outcome of scoring a whole survey export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyBatchReport {
    pub scored: Vec<ScoredRow>,
    pub rejected: Vec<RejectedRow>,
    pub tier_counts: BTreeMap<TierLevel, usize>,
    /// Mean |score - recorded score| over rows that carry a recorded score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_absolute_error: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub score: u8,
    pub tier: TierLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub question: QuestionKey,
    pub reason: String,
}

impl SurveyBatchReport {
    pub fn build(scorer: &Scorer, records: &[SurveyRecord]) -> Self {
        let mut scored = Vec::new();
        let mut rejected = Vec::new();
        let mut tier_counts = BTreeMap::new();

        for record in records {
            match &record.profile {
                Ok(profile) => {
                    let assessment = scorer.assess(profile);
                    *tier_counts.entry(assessment.tier).or_insert(0) += 1;
                    scored.push(ScoredRow {
                        row: record.row,
                        student_id: record.student_id.clone(),
                        score: assessment.score,
                        tier: assessment.tier,
                        recorded_score: record.recorded_score,
                    });
                }
                Err(err) => rejected.push(RejectedRow {
                    row: record.row,
                    student_id: record.student_id.clone(),
                    question: err.key(),
                    reason: err.to_string(),
                }),
            }
        }

        let errors: Vec<f64> = scored
            .iter()
            .filter_map(|row| {
                row.recorded_score
                    .map(|recorded| (f64::from(row.score) - recorded).abs())
            })
            .collect();
        let mean_absolute_error = if errors.is_empty() {
            None
        } else {
            Some(errors.iter().sum::<f64>() / errors.len() as f64)
        };

        Self {
            scored,
            rejected,
            tier_counts,
            mean_absolute_error,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.scored.len() + self.rejected.len()
    }
}
