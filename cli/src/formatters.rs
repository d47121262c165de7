use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use study_core::{
    fingerprint, unique_sources, CodingProblem, Difficulty, FilteredView, ImportReport,
    MasteryLevel, MasteryStats, ProblemStats, QuestionItem,
};

use crate::args::OutputFormat;

/// How many per-item failure reasons the import summary prints before
/// collapsing the remainder into a count
const SHOWN_FAILURES: usize = 5;

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Stable display key for a question, derived from its content rather than
/// the backend id, so scripted consumers can track a record across exports
/// even when ids are reassigned
fn content_key(question: &QuestionItem) -> String {
    fingerprint(&question.content)
}

fn last_studied_label(last_studied: DateTime<Utc>) -> String {
    last_studied
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

fn mastery_color(level: MasteryLevel) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match level {
        MasteryLevel::Unlearned => spec.set_dimmed(true),
        MasteryLevel::Learning => spec.set_fg(Some(Color::Yellow)),
        MasteryLevel::Mastered => spec.set_fg(Some(Color::Green)),
    };
    spec
}

fn difficulty_color(label: &str) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match Difficulty::from_label(label) {
        Some(Difficulty::Easy) => spec.set_fg(Some(Color::Green)),
        Some(Difficulty::Medium) => spec.set_fg(Some(Color::Yellow)),
        Some(Difficulty::Hard) => spec.set_fg(Some(Color::Red)),
        None => spec.set_dimmed(true),
    };
    spec
}

fn json_error(err: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn print_page_summary(
    stream: &mut StandardStream,
    shown: usize,
    page: usize,
    last_page: usize,
    filtered: usize,
    total: usize,
) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(
        stream,
        "page {}/{}: showing {} of {} filtered ({} total)",
        page, last_page, shown, filtered, total
    )?;
    stream.reset()
}

pub struct QuestionListFormatter {
    output: OutputFormat,
}

impl QuestionListFormatter {
    pub fn new(output: OutputFormat) -> Self {
        QuestionListFormatter { output }
    }

    pub fn print_page(&mut self, view: &FilteredView<QuestionItem>) -> io::Result<()> {
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        let page = view.visible_page();

        match self.output {
            OutputFormat::Json => {
                let text = serde_json::to_string_pretty(page).map_err(json_error)?;
                writeln!(stream, "{}", text)
            }
            OutputFormat::Plain => {
                for question in page {
                    writeln!(
                        stream,
                        "{}\t{}\t{}\t{}\t{}",
                        question.id,
                        content_key(question),
                        question.category,
                        question.mastery_level,
                        first_line(&question.content)
                    )?;
                }
                Ok(())
            }
            OutputFormat::Pretty => {
                for question in page {
                    stream.set_color(ColorSpec::new().set_dimmed(true))?;
                    write!(stream, "#{} ", question.id)?;
                    stream.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
                    write!(stream, "[{}] ", question.category)?;
                    stream.set_color(&mastery_color(question.mastery_level))?;
                    writeln!(stream, "{}", question.mastery_level)?;
                    stream.reset()?;
                    writeln!(stream, "    Q: {}", first_line(&question.content))?;
                    writeln!(stream, "    A: {}", first_line(&question.answer))?;
                }
                print_page_summary(
                    &mut stream,
                    page.len(),
                    view.current_page(),
                    view.last_page(),
                    view.filtered_count(),
                    view.source_count(),
                )
            }
        }
    }
}

pub struct ProblemListFormatter {
    output: OutputFormat,
}

impl ProblemListFormatter {
    pub fn new(output: OutputFormat) -> Self {
        ProblemListFormatter { output }
    }

    pub fn print_page(&mut self, view: &FilteredView<CodingProblem>) -> io::Result<()> {
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        let page = view.visible_page();

        match self.output {
            OutputFormat::Json => {
                let text = serde_json::to_string_pretty(page).map_err(json_error)?;
                writeln!(stream, "{}", text)
            }
            OutputFormat::Plain => {
                for problem in page {
                    writeln!(
                        stream,
                        "{}\t{}\t{}\t{}\t{}",
                        problem.id,
                        problem.difficulty,
                        problem.source,
                        problem.title,
                        problem.source_url
                    )?;
                }
                Ok(())
            }
            OutputFormat::Pretty => {
                for problem in page {
                    stream.set_color(ColorSpec::new().set_dimmed(true))?;
                    write!(stream, "#{} ", problem.id)?;
                    stream.set_color(&difficulty_color(&problem.difficulty))?;
                    let label = Difficulty::from_label(&problem.difficulty)
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| problem.difficulty.clone());
                    write!(stream, "[{}] ", label)?;
                    stream.reset()?;
                    write!(stream, "{} ({})", problem.title, problem.source)?;
                    if !problem.tags.is_empty() {
                        stream.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
                        write!(stream, "  #{}", problem.tags.join(" #"))?;
                        stream.reset()?;
                    }
                    writeln!(stream)?;
                    stream.set_color(ColorSpec::new().set_dimmed(true))?;
                    writeln!(stream, "    {}", problem.source_url)?;
                    stream.reset()?;
                }
                print_page_summary(
                    &mut stream,
                    page.len(),
                    view.current_page(),
                    view.last_page(),
                    view.filtered_count(),
                    view.source_count(),
                )
            }
        }
    }

    /// Footer with the origin sites present in the working set, so the user
    /// knows what `--source` accepts
    pub fn print_sources(&mut self, problems: &[CodingProblem]) -> io::Result<()> {
        if self.output != OutputFormat::Pretty {
            return Ok(());
        }
        let sources = unique_sources(problems);
        if sources.is_empty() {
            return Ok(());
        }
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        stream.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(stream, "sources: {}", sources.join(", "))?;
        stream.reset()
    }
}

/// Multi-line detail card for a single problem (daily / random pick)
pub fn print_problem(problem: &CodingProblem) -> io::Result<()> {
    let mut stream = StandardStream::stdout(ColorChoice::Auto);

    stream.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(stream, "{}", problem.title)?;
    stream.reset()?;

    stream.set_color(&difficulty_color(&problem.difficulty))?;
    write!(stream, "{}", problem.difficulty)?;
    stream.reset()?;
    writeln!(stream, " · {} · {}", problem.source, problem.study_status)?;

    if !problem.tags.is_empty() {
        writeln!(stream, "tags: {}", problem.tags.join(", "))?;
    }
    if let Some(last_studied) = problem.last_studied {
        writeln!(stream, "last studied: {}", last_studied_label(last_studied))?;
    }
    if !problem.description.is_empty() {
        writeln!(stream, "{}", first_line(&problem.description))?;
    }
    writeln!(stream, "{}", problem.source_url)
}

pub fn print_mastery_stats(stats: &MasteryStats) -> io::Result<()> {
    let mut stream = StandardStream::stdout(ColorChoice::Auto);
    writeln!(stream, "total:     {}", stats.total)?;

    stream.set_color(&mastery_color(MasteryLevel::Mastered))?;
    writeln!(stream, "mastered:  {}", stats.mastered)?;
    stream.set_color(&mastery_color(MasteryLevel::Learning))?;
    writeln!(stream, "learning:  {}", stats.learning)?;
    stream.set_color(&mastery_color(MasteryLevel::Unlearned))?;
    writeln!(stream, "unlearned: {}", stats.unlearned)?;
    stream.reset()
}

pub fn print_problem_stats(stats: &ProblemStats) -> io::Result<()> {
    let mut stream = StandardStream::stdout(ColorChoice::Auto);
    writeln!(stream, "total:  {}", stats.total)?;

    stream.set_color(&difficulty_color("Easy"))?;
    writeln!(stream, "easy:   {}", stats.easy)?;
    stream.set_color(&difficulty_color("Medium"))?;
    writeln!(stream, "medium: {}", stats.medium)?;
    stream.set_color(&difficulty_color("Hard"))?;
    writeln!(stream, "hard:   {}", stats.hard)?;
    stream.reset()
}

/// Colored per-item progress and final summary for the bulk importer.
/// Generic over the output stream so progress writing stays testable.
pub struct ImportProgressFormatter<W: WriteColor> {
    total: usize,
    stream: W,
}

impl ImportProgressFormatter<StandardStream> {
    pub fn stdout(total: usize) -> Self {
        ImportProgressFormatter::new(total, StandardStream::stdout(ColorChoice::Auto))
    }
}

impl<W: WriteColor> ImportProgressFormatter<W> {
    pub fn new(total: usize, stream: W) -> Self {
        ImportProgressFormatter { total, stream }
    }

    pub fn item(&mut self, index: usize, outcome: &study_core::Result<()>) -> io::Result<()> {
        write!(self.stream, "[{}/{}] ", index, self.total)?;
        match outcome {
            Ok(()) => {
                self.stream
                    .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(self.stream, "ok")?;
            }
            Err(err) => {
                self.stream
                    .set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(self.stream, "failed: {}", err)?;
            }
        }
        self.stream.reset()
    }

    pub fn finish(&mut self, report: &ImportReport) -> io::Result<()> {
        writeln!(self.stream)?;
        self.stream
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(self.stream, "imported: {}", report.succeeded)?;
        self.stream
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(self.stream, "failed:   {}", report.failed())?;
        self.stream.reset()?;
        writeln!(self.stream, "success rate: {}%", report.success_rate())?;

        for (index, reason) in report.failures.iter().take(SHOWN_FAILURES) {
            writeln!(self.stream, "  item {}: {}", index, reason)?;
        }
        if report.failures.len() > SHOWN_FAILURES {
            writeln!(
                self.stream,
                "  ... and {} more failures",
                report.failures.len() - SHOWN_FAILURES
            )?;
        }
        Ok(())
    }
}
