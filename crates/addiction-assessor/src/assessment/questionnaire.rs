use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::AnswerValue;

/// Field identifier for each interview question, in interview order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKey {
    Age,
    Gender,
    AcademicLevel,
    DailyUsage,
    Platform,
    AcademicImpact,
    SleepHours,
    MentalHealth,
    RelationshipStatus,
    Conflicts,
}

impl QuestionKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            QuestionKey::Age => "age",
            QuestionKey::Gender => "gender",
            QuestionKey::AcademicLevel => "academicLevel",
            QuestionKey::DailyUsage => "dailyUsage",
            QuestionKey::Platform => "platform",
            QuestionKey::AcademicImpact => "academicImpact",
            QuestionKey::SleepHours => "sleepHours",
            QuestionKey::MentalHealth => "mentalHealth",
            QuestionKey::RelationshipStatus => "relationshipStatus",
            QuestionKey::Conflicts => "conflicts",
        }
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the raw answer text is interpreted before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Numeric,
    Text,
}

/// Accepted values for a question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnswerDomain {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    /// Case-insensitive membership in a fixed synonym list.
    OneOf(&'static [&'static str]),
    /// Any non-empty text.
    AnyText,
}

impl AnswerDomain {
    pub const fn kind(&self) -> AnswerKind {
        match self {
            AnswerDomain::Range { .. } => AnswerKind::Numeric,
            AnswerDomain::OneOf(_) | AnswerDomain::AnyText => AnswerKind::Text,
        }
    }

    /// Pure membership check; a value of the wrong kind is never accepted.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (AnswerDomain::Range { min, max }, AnswerValue::Number(number)) => {
                number.is_finite() && *number >= *min && *number <= *max
            }
            (AnswerDomain::OneOf(options), AnswerValue::Text(text)) => {
                let lowered = text.trim().to_lowercase();
                options.iter().any(|option| *option == lowered)
            }
            (AnswerDomain::AnyText, AnswerValue::Text(text)) => !text.trim().is_empty(),
            _ => false,
        }
    }
}

/// Static interview question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Question {
    pub key: QuestionKey,
    pub prompt: &'static str,
    pub domain: AnswerDomain,
}

impl Question {
    pub const fn kind(&self) -> AnswerKind {
        self.domain.kind()
    }

    /// Parse and validate raw input for this question.
    pub fn interpret(&self, raw: &str) -> Result<AnswerValue, AnswerError> {
        let trimmed = raw.trim();
        let value = match self.kind() {
            AnswerKind::Numeric => {
                let number = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|number| number.is_finite())
                    .ok_or(AnswerError::NotANumber { key: self.key })?;
                AnswerValue::Number(number)
            }
            AnswerKind::Text => AnswerValue::Text(trimmed.to_string()),
        };

        self.check(&value)?;
        Ok(value)
    }

    /// Validate an already-typed value against this question's domain.
    pub fn check(&self, value: &AnswerValue) -> Result<(), AnswerError> {
        if self.domain.accepts(value) {
            Ok(())
        } else {
            Err(AnswerError::OutOfDomain { key: self.key })
        }
    }
}

pub const NUMBER_REPROMPT: &str = "Please enter a valid number.";
pub const FORMAT_REPROMPT: &str = "Please provide a valid answer in the specified format.";

/// Ordered interview. Order is significant: it is the interview sequence.
pub static QUESTIONNAIRE: [Question; 10] = [
    Question {
        key: QuestionKey::Age,
        prompt: "What's your age?",
        domain: AnswerDomain::Range {
            min: 15.0,
            max: 30.0,
        },
    },
    Question {
        key: QuestionKey::Gender,
        prompt: "What's your gender? (Male/Female)",
        domain: AnswerDomain::OneOf(&["male", "female", "m", "f"]),
    },
    Question {
        key: QuestionKey::AcademicLevel,
        prompt: "What's your academic level? (High School/Undergraduate/Graduate)",
        domain: AnswerDomain::OneOf(&[
            "high school",
            "undergraduate",
            "graduate",
            "hs",
            "ug",
            "grad",
        ]),
    },
    Question {
        key: QuestionKey::DailyUsage,
        prompt: "How many hours per day do you spend on social media? (e.g., 2.5)",
        domain: AnswerDomain::Range {
            min: 0.0,
            max: 24.0,
        },
    },
    Question {
        key: QuestionKey::Platform,
        prompt: "What's your most used platform? (Instagram/TikTok/Facebook/Twitter/YouTube/Snapchat/WhatsApp/LinkedIn/Other)",
        domain: AnswerDomain::AnyText,
    },
    Question {
        key: QuestionKey::AcademicImpact,
        prompt: "Does social media affect your academic performance? (Yes/No)",
        domain: AnswerDomain::OneOf(&["yes", "no", "y", "n"]),
    },
    Question {
        key: QuestionKey::SleepHours,
        prompt: "How many hours do you sleep per night on average? (e.g., 7)",
        domain: AnswerDomain::Range {
            min: 3.0,
            max: 12.0,
        },
    },
    Question {
        key: QuestionKey::MentalHealth,
        prompt: "Rate your mental health on a scale of 1-10 (10 being excellent)",
        domain: AnswerDomain::Range {
            min: 1.0,
            max: 10.0,
        },
    },
    Question {
        key: QuestionKey::RelationshipStatus,
        prompt: "What's your relationship status? (Single/In Relationship/Complicated)",
        domain: AnswerDomain::OneOf(&[
            "single",
            "in relationship",
            "complicated",
            "s",
            "r",
            "c",
        ]),
    },
    Question {
        key: QuestionKey::Conflicts,
        prompt: "How often do you have conflicts over social media use? (0-5, where 0 is never and 5 is very often)",
        domain: AnswerDomain::Range { min: 0.0, max: 5.0 },
    },
];

pub fn question(key: QuestionKey) -> &'static Question {
    // Table order matches the enum's declaration order.
    &QUESTIONNAIRE[key as usize]
}

/// Recoverable answer rejection; the caller re-prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("answer to `{key}` is not a valid number")]
    NotANumber { key: QuestionKey },
    #[error("answer to `{key}` is outside the accepted values")]
    OutOfDomain { key: QuestionKey },
}

/// Wire-level classification of an [`AnswerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerErrorKind {
    Parse,
    Validation,
}

impl AnswerError {
    pub const fn kind(&self) -> AnswerErrorKind {
        match self {
            AnswerError::NotANumber { .. } => AnswerErrorKind::Parse,
            AnswerError::OutOfDomain { .. } => AnswerErrorKind::Validation,
        }
    }

    pub const fn key(&self) -> QuestionKey {
        match self {
            AnswerError::NotANumber { key } | AnswerError::OutOfDomain { key } => *key,
        }
    }

    pub const fn reprompt(&self) -> &'static str {
        match self {
            AnswerError::NotANumber { .. } => NUMBER_REPROMPT,
            AnswerError::OutOfDomain { .. } => FORMAT_REPROMPT,
        }
    }
}
