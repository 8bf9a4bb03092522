use addiction_assessor::assessment::{
    AssessmentResult, Conversation, ConversationError, Profile, Scorer, Speaker, TurnOutcome,
    QUESTIONNAIRE,
};
use addiction_assessor::error::AppError;
use addiction_assessor::survey::{SurveyBatchReport, SurveyImporter};
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ChatArgs {
    /// Print the final result as JSON instead of a text card
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Age in years (15-30)
    #[arg(long)]
    pub(crate) age: f64,
    /// Male/Female (m/f accepted)
    #[arg(long)]
    pub(crate) gender: String,
    /// High School/Undergraduate/Graduate
    #[arg(long)]
    pub(crate) academic_level: String,
    /// Average hours per day on social media (0-24)
    #[arg(long)]
    pub(crate) daily_usage: f64,
    /// Most used platform
    #[arg(long)]
    pub(crate) platform: String,
    /// Whether social media affects academic performance (yes/no)
    #[arg(long)]
    pub(crate) academic_impact: String,
    /// Average hours of sleep per night (3-12)
    #[arg(long)]
    pub(crate) sleep_hours: f64,
    /// Self-rated mental health (1-10)
    #[arg(long)]
    pub(crate) mental_health: f64,
    /// Single/In Relationship/Complicated
    #[arg(long)]
    pub(crate) relationship_status: String,
    /// Conflicts over social media (0-5)
    #[arg(long)]
    pub(crate) conflicts: f64,
    /// Print the result as JSON instead of a text card
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScoreArgs {
    fn profile(&self) -> Profile {
        Profile {
            age: self.age,
            gender: self.gender.clone(),
            academic_level: self.academic_level.clone(),
            daily_usage: self.daily_usage,
            platform: self.platform.clone(),
            academic_impact: self.academic_impact.clone(),
            sleep_hours: self.sleep_hours,
            mental_health: self.mental_health,
            relationship_status: self.relationship_status.clone(),
            conflicts: self.conflicts,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Survey export with the Students Social Media Addiction columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// List every rejected row instead of the first ten
    #[arg(long)]
    pub(crate) all_rejections: bool,
}

const RESET_COMMAND: &str = "reset";
const REJECTION_PREVIEW: usize = 10;

pub(crate) fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let scorer = Scorer::default();

    if let Some(result) = chat_session(stdin.lock(), &mut stdout, &scorer)? {
        if args.json {
            print_json(&mut stdout, &result)?;
        } else {
            render_result(&mut stdout, &result)?;
        }
    }
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let profile = args.profile();
    profile.validate()?;

    let assessment = Scorer::default().assess(&profile);
    let result = AssessmentResult {
        profile,
        assessment,
    };

    let mut stdout = io::stdout();
    if args.json {
        print_json(&mut stdout, &result)
    } else {
        render_result(&mut stdout, &result)
    }
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let report = SurveyImporter::score_path(&args.csv, &Scorer::default())?;

    let mut stdout = io::stdout();
    if args.json {
        print_json(&mut stdout, &report)
    } else {
        let limit = if args.all_rejections {
            usize::MAX
        } else {
            REJECTION_PREVIEW
        };
        render_batch_report(&mut stdout, &report, limit)
    }
}

/// Drive one interview over line input, echoing the bot's reply to each turn.
///
/// Returns `None` when input ends before the last question is answered.
pub(crate) fn chat_session<R, W>(
    input: R,
    output: &mut W,
    scorer: &Scorer,
) -> Result<Option<AssessmentResult>, AppError>
where
    R: BufRead,
    W: Write,
{
    let mut conversation = Conversation::new();
    echo_latest_reply(output, &conversation)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case(RESET_COMMAND) {
            conversation.reset();
            writeln!(output, "Starting over.")?;
            echo_latest_reply(output, &conversation)?;
            continue;
        }

        match conversation.submit(&line) {
            Ok(TurnOutcome::Ignored) => {}
            Ok(TurnOutcome::NextQuestion(_)) | Err(ConversationError::Answer(_)) => {
                echo_latest_reply(output, &conversation)?;
            }
            Ok(TurnOutcome::Complete) => {
                echo_latest_reply(output, &conversation)?;
                return Ok(Some(conversation.result(scorer)?));
            }
            Err(err) => return Err(err.into()),
        }
    }

    writeln!(
        output,
        "Interview ended after {} of {} answers; no score was computed.",
        conversation.answered(),
        QUESTIONNAIRE.len()
    )?;
    Ok(None)
}

fn echo_latest_reply<W: Write>(output: &mut W, conversation: &Conversation) -> Result<(), AppError> {
    if let Some(message) = conversation
        .transcript()
        .last()
        .filter(|message| message.speaker == Speaker::Bot)
    {
        writeln!(output, "> {}", message.text)?;
    }
    Ok(())
}

pub(crate) fn render_result<W: Write>(
    output: &mut W,
    result: &AssessmentResult,
) -> Result<(), AppError> {
    let tier = result.tier();
    let profile = &result.profile;

    writeln!(output)?;
    writeln!(
        output,
        "Addiction score: {}/10 ({})",
        result.score(),
        tier.label
    )?;
    writeln!(output, "{}", tier.description)?;
    writeln!(output)?;
    writeln!(output, "Profile summary")?;
    writeln!(output, "- Daily usage: {} hours", profile.daily_usage)?;
    writeln!(output, "- Sleep: {} hours per night", profile.sleep_hours)?;
    writeln!(output, "- Mental health: {}/10", profile.mental_health)?;
    writeln!(output, "- Main platform: {}", profile.platform)?;
    writeln!(output)?;
    writeln!(output, "Recommendations")?;
    for (index, recommendation) in tier.recommendations.iter().enumerate() {
        writeln!(output, "{}. {}", index + 1, recommendation)?;
    }
    Ok(())
}

pub(crate) fn render_batch_report<W: Write>(
    output: &mut W,
    report: &SurveyBatchReport,
    rejection_limit: usize,
) -> Result<(), AppError> {
    writeln!(
        output,
        "Survey batch: {} rows | {} scored | {} rejected",
        report.total_rows(),
        report.scored.len(),
        report.rejected.len()
    )?;

    if !report.tier_counts.is_empty() {
        writeln!(output, "Tier distribution:")?;
        for (level, count) in &report.tier_counts {
            writeln!(output, "  - {}: {}", level.label(), count)?;
        }
    }

    if let Some(mae) = report.mean_absolute_error {
        writeln!(output, "Mean absolute error vs recorded score: {mae:.2}")?;
    }

    if !report.rejected.is_empty() {
        writeln!(output, "Rejected rows:")?;
        for rejected in report.rejected.iter().take(rejection_limit) {
            writeln!(
                output,
                "  - row {} ({}): {}",
                rejected.row,
                rejected.student_id.as_deref().unwrap_or("no id"),
                rejected.reason
            )?;
        }
        if report.rejected.len() > rejection_limit {
            writeln!(
                output,
                "  ... {} more (use --all-rejections)",
                report.rejected.len() - rejection_limit
            )?;
        }
    }
    Ok(())
}

fn print_json<W: Write, T: serde::Serialize>(output: &mut W, value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    writeln!(output, "{rendered}")?;
    Ok(())
}
