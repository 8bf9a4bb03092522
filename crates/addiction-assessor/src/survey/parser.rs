use crate::assessment::{question, AnswerError, DraftError, Profile, ProfileDraft, QuestionKey};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One survey row after domain checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    /// 1-based position among data rows (the header is not counted).
    pub row: usize,
    pub student_id: Option<String>,
    pub profile: Result<Profile, AnswerError>,
    pub recorded_score: Option<f64>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<SurveyRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<SurveyRow>().enumerate() {
        let row = record?;
        records.push(SurveyRecord {
            row: index + 1,
            student_id: row.student_id.clone(),
            profile: row.profile(),
            recorded_score: row
                .addicted_score
                .as_deref()
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|score| score.is_finite()),
        });
    }

    Ok(records)
}

// Fields stay textual so every cell goes through the interview's own validator.
#[derive(Debug, Deserialize)]
struct SurveyRow {
    #[serde(rename = "Student_ID", default, deserialize_with = "empty_string_as_none")]
    student_id: Option<String>,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Academic_Level")]
    academic_level: String,
    #[serde(rename = "Avg_Daily_Usage_Hours")]
    daily_usage: String,
    #[serde(rename = "Most_Used_Platform")]
    platform: String,
    #[serde(rename = "Affects_Academic_Performance")]
    academic_impact: String,
    #[serde(rename = "Sleep_Hours_Per_Night")]
    sleep_hours: String,
    #[serde(rename = "Mental_Health_Score")]
    mental_health: String,
    #[serde(rename = "Relationship_Status")]
    relationship_status: String,
    #[serde(rename = "Conflicts_Over_Social_Media")]
    conflicts: String,
    #[serde(
        rename = "Addicted_Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    addicted_score: Option<String>,
}

impl SurveyRow {
    fn cells(&self) -> [(QuestionKey, &str); 10] {
        [
            (QuestionKey::Age, self.age.as_str()),
            (QuestionKey::Gender, self.gender.as_str()),
            (QuestionKey::AcademicLevel, self.academic_level.as_str()),
            (QuestionKey::DailyUsage, self.daily_usage.as_str()),
            (QuestionKey::Platform, self.platform.as_str()),
            (QuestionKey::AcademicImpact, self.academic_impact.as_str()),
            (QuestionKey::SleepHours, self.sleep_hours.as_str()),
            (QuestionKey::MentalHealth, self.mental_health.as_str()),
            (QuestionKey::RelationshipStatus, self.relationship_status.as_str()),
            (QuestionKey::Conflicts, self.conflicts.as_str()),
        ]
    }

    fn profile(&self) -> Result<Profile, AnswerError> {
        let mut draft = ProfileDraft::new();
        for (key, raw) in self.cells() {
            let value = question(key).interpret(raw)?;
            draft.record(key, value).map_err(as_answer_error)?;
        }
        draft.finish().map_err(as_answer_error)
    }
}

// Each column maps to a distinct key, so only `Invalid` can occur in practice.
fn as_answer_error(err: DraftError) -> AnswerError {
    match err {
        DraftError::Invalid(answer) => answer,
        DraftError::AlreadyAnswered(key) | DraftError::Missing(key) => {
            AnswerError::OutOfDomain { key }
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
