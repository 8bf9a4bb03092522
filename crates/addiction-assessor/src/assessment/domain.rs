use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::questionnaire::{question, AnswerError, QuestionKey, QUESTIONNAIRE};

/// Parsed answer as stored against a question key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

impl AnswerValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(number) => Some(*number),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Number(_) => None,
        }
    }
}

/// A user's complete set of answers, one value per question key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: f64,
    pub gender: String,
    pub academic_level: String,
    pub daily_usage: f64,
    pub platform: String,
    pub academic_impact: String,
    pub sleep_hours: f64,
    pub mental_health: f64,
    pub relationship_status: String,
    pub conflicts: f64,
}

impl Profile {
    pub fn value(&self, key: QuestionKey) -> AnswerValue {
        match key {
            QuestionKey::Age => AnswerValue::Number(self.age),
            QuestionKey::Gender => AnswerValue::Text(self.gender.clone()),
            QuestionKey::AcademicLevel => AnswerValue::Text(self.academic_level.clone()),
            QuestionKey::DailyUsage => AnswerValue::Number(self.daily_usage),
            QuestionKey::Platform => AnswerValue::Text(self.platform.clone()),
            QuestionKey::AcademicImpact => AnswerValue::Text(self.academic_impact.clone()),
            QuestionKey::SleepHours => AnswerValue::Number(self.sleep_hours),
            QuestionKey::MentalHealth => AnswerValue::Number(self.mental_health),
            QuestionKey::RelationshipStatus => {
                AnswerValue::Text(self.relationship_status.clone())
            }
            QuestionKey::Conflicts => AnswerValue::Number(self.conflicts),
        }
    }

    /// Hold a profile that did not come through the interview to the same domains.
    pub fn validate(&self) -> Result<(), AnswerError> {
        QUESTIONNAIRE
            .iter()
            .try_for_each(|question| question.check(&self.value(question.key)))
    }
}

/// Write-once accumulator filled as the interview advances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    answers: BTreeMap<QuestionKey, AnswerValue>,
}

impl ProfileDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: QuestionKey, value: AnswerValue) -> Result<(), DraftError> {
        if self.answers.contains_key(&key) {
            return Err(DraftError::AlreadyAnswered(key));
        }
        question(key).check(&value)?;
        self.answers.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: QuestionKey) -> Option<&AnswerValue> {
        self.answers.get(&key)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        QUESTIONNAIRE
            .iter()
            .all(|question| self.answers.contains_key(&question.key))
    }

    pub fn finish(&self) -> Result<Profile, DraftError> {
        Ok(Profile {
            age: self.number(QuestionKey::Age)?,
            gender: self.text(QuestionKey::Gender)?,
            academic_level: self.text(QuestionKey::AcademicLevel)?,
            daily_usage: self.number(QuestionKey::DailyUsage)?,
            platform: self.text(QuestionKey::Platform)?,
            academic_impact: self.text(QuestionKey::AcademicImpact)?,
            sleep_hours: self.number(QuestionKey::SleepHours)?,
            mental_health: self.number(QuestionKey::MentalHealth)?,
            relationship_status: self.text(QuestionKey::RelationshipStatus)?,
            conflicts: self.number(QuestionKey::Conflicts)?,
        })
    }

    // `record` type-checks every value, so a present key always has the right shape.
    fn number(&self, key: QuestionKey) -> Result<f64, DraftError> {
        self.get(key)
            .and_then(AnswerValue::as_number)
            .ok_or(DraftError::Missing(key))
    }

    fn text(&self, key: QuestionKey) -> Result<String, DraftError> {
        self.get(key)
            .and_then(AnswerValue::as_text)
            .map(str::to_string)
            .ok_or(DraftError::Missing(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("`{0}` has already been answered")]
    AlreadyAnswered(QuestionKey),
    #[error("`{0}` has not been answered")]
    Missing(QuestionKey),
    #[error(transparent)]
    Invalid(#[from] AnswerError),
}
