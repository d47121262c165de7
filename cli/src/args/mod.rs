use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use study_core::{Difficulty, StudyStatus};

#[derive(Parser, Debug)]
#[command(
    name = "study",
    version,
    about,
    long_about = "CLI companion for the study question bank"
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct ConfigArgs {
    /// Backend base URL
    #[arg(long, short, env = "STUDY_SERVER")]
    pub server: Option<String>,

    /// Path to profile configuration file
    #[arg(long, short, env = "STUDY_PROFILE")]
    pub profile_path: Option<String>,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Prints out current configuration
    Config,
    /// Initializes a new profile
    Init,
    /// Question bank subcommands
    #[clap(subcommand)]
    Question(QuestionCommand),
    /// Coding problem subcommands
    #[clap(subcommand)]
    Problem(ProblemCommand),
    /// Bulk-loads question records from a JSON file
    Import(ImportArgs),
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum QuestionCommand {
    /// Lists questions with filtering and pagination.
    List(QuestionListArgs),
    /// Creates a new question.
    Add(QuestionEditArgs),
    /// Replaces the content of an existing question.
    Update(QuestionUpdateArgs),
    /// Deletes questions by id.
    Delete(QuestionDeleteArgs),
    /// Advances a question's mastery level to the next state.
    Mastery(QuestionMasteryArgs),
    /// Lists categories with question counts.
    Categories,
    /// Shows mastery statistics for the whole bank.
    Stats,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ProblemCommand {
    /// Lists coding problems with filtering and pagination.
    List(ProblemListArgs),
    /// Shows today's pick.
    Daily,
    /// Shows a random problem.
    Random,
    /// Shows difficulty statistics.
    Stats,
    /// Sets the study status of a problem.
    Status(ProblemStatusArgs),
    /// Opens a problem on its source site.
    Open(ProblemOpenArgs),
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Pretty,
    Plain,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Pretty
    }
}

#[derive(Debug, Args, PartialEq)]
#[command(about = "Search and list questions")]
pub struct QuestionListArgs {
    /// Free-text search over content, answer and category
    #[arg(default_value = None)]
    pub search: Option<String>,

    /// Restrict to one category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Page to display (1-based, clamped to the last page)
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Items per page (defaults to the profile's page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, PartialEq)]
pub struct QuestionEditArgs {
    /// Question text (markdown)
    #[arg(long)]
    pub content: String,

    /// Answer text (markdown)
    #[arg(long)]
    pub answer: String,

    /// Grouping label
    #[arg(long)]
    pub category: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct QuestionUpdateArgs {
    /// Question ID to update
    #[arg(value_name = "ID")]
    pub id: i64,

    #[command(flatten)]
    pub fields: QuestionEditArgs,
}

#[derive(Debug, Args, PartialEq)]
pub struct QuestionDeleteArgs {
    /// Question ID(s) to delete
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<i64>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Args, PartialEq)]
pub struct QuestionMasteryArgs {
    /// Question ID to advance
    #[arg(value_name = "ID")]
    pub id: i64,
}

#[derive(Debug, Args, PartialEq)]
#[command(about = "Search and list coding problems")]
pub struct ProblemListArgs {
    /// Free-text search over title, description and tags
    #[arg(default_value = None)]
    pub search: Option<String>,

    /// Restrict to one difficulty (easy, medium, hard; localized labels work too)
    #[arg(long, short, value_parser = parse_difficulty)]
    pub difficulty: Option<Difficulty>,

    /// Restrict to one origin site
    #[arg(long)]
    pub source: Option<String>,

    /// Show the daily-pick history instead of the full set
    #[arg(long)]
    pub daily: bool,

    /// Page to display (1-based, clamped to the last page)
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Items per page (defaults to the profile's page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, PartialEq)]
pub struct ProblemStatusArgs {
    /// Problem ID to update
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New status (not_started, in_progress or completed)
    #[arg(value_name = "STATUS", value_parser = parse_study_status)]
    pub status: StudyStatus,
}

#[derive(Debug, Args, PartialEq)]
pub struct ProblemOpenArgs {
    /// Problem ID to open in the browser
    #[arg(value_name = "ID")]
    pub id: i64,
}

#[derive(Debug, Args, PartialEq)]
pub struct ImportArgs {
    /// Path to a JSON file with an array of {content, answer, category}
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Pause between submissions, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,
}

pub fn parse_difficulty(s: &str) -> anyhow::Result<Difficulty> {
    return Ok(s.parse()?);
}

pub fn parse_study_status(s: &str) -> anyhow::Result<StudyStatus> {
    return Ok(s.parse()?);
}
