use crate::console::{run_batch, run_chat, run_score, BatchArgs, ChatArgs, ScoreArgs};
use crate::server;
use addiction_assessor::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Social Media Addiction Assessor",
    about = "Run the addiction questionnaire as an HTTP service or from the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Answer the questionnaire interactively on stdin
    Chat(ChatArgs),
    /// Score a complete set of answers passed as flags
    Score(ScoreArgs),
    /// Score every row of a student survey CSV export
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Chat(args) => run_chat(args),
        Command::Score(args) => run_score(args),
        Command::Batch(args) => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["addiction-assessor-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_flags() {
        let cli = Cli::try_parse_from([
            "addiction-assessor-api",
            "score",
            "--age",
            "19",
            "--gender",
            "female",
            "--academic-level",
            "undergraduate",
            "--daily-usage",
            "5.2",
            "--platform",
            "Instagram",
            "--academic-impact",
            "yes",
            "--sleep-hours",
            "6.5",
            "--mental-health",
            "6",
            "--relationship-status",
            "single",
            "--conflicts",
            "3",
        ])
        .expect("score flags parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.age, 19.0);
                assert_eq!(args.platform, "Instagram");
                assert!(!args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_csv_path() {
        assert!(Cli::try_parse_from(["addiction-assessor-api", "batch"]).is_err());
        let cli = Cli::try_parse_from(["addiction-assessor-api", "batch", "--csv", "export.csv"])
            .expect("batch parses");
        assert!(matches!(cli.command, Some(Command::Batch(_))));
    }
}
