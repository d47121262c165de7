use std::io;
use std::time::Duration;

use anyhow::Context;
use termcolor::WriteColor;

use study_core::{parse_batch, run_import, ImportReport, NewQuestion, QuestionGateway};

use crate::{
    app_config::AppConfig, args::ImportArgs, client::ApiClient,
    formatters::ImportProgressFormatter,
};

/// Bulk-load question records from a JSON file.
///
/// The batch is validated in full before anything touches the network; a
/// malformed file is fatal. Per-item submission failures are reported and
/// counted but never stop the run or fail the exit status.
pub fn import_cmd(config: &AppConfig, args: ImportArgs) -> Result<(), anyhow::Error> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read batch file '{}'", args.file))?;

    let records = parse_batch(&text)?;
    println!("read {} records from {}", records.len(), args.file);

    let client = ApiClient::new(&config.server_url)?;

    // Connection check before the paced submission loop starts
    client
        .list_categories()
        .with_context(|| format!("cannot reach server {}", config.server_url))?;

    let mut progress = ImportProgressFormatter::stdout(records.len());
    let report = run_with_progress(
        &client,
        &records,
        Duration::from_millis(args.delay_ms),
        &mut progress,
    )?;

    progress.finish(&report)?;

    Ok(())
}

/// Drives the paced submission loop while printing per-item progress.
/// A progress write failure is carried out of the loop and surfaced after
/// the batch finishes submitting; it never aborts the remaining items.
fn run_with_progress<W: WriteColor>(
    gateway: &dyn QuestionGateway,
    records: &[NewQuestion],
    pacing: Duration,
    progress: &mut ImportProgressFormatter<W>,
) -> Result<ImportReport, anyhow::Error> {
    let mut write_err: Option<io::Error> = None;
    let report = run_import(gateway, records, pacing, |index, outcome| {
        if write_err.is_none() {
            if let Err(err) = progress.item(index, outcome) {
                write_err = Some(err);
            }
        }
    });

    if let Some(err) = write_err {
        return Err(err).context("failed to write import progress");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::Cell;

    use termcolor::NoColor;

    use study_core::{MasteryLevel, MasteryStats, QuestionItem, Result};

    use super::*;

    struct CountingGateway {
        created: Cell<usize>,
    }

    impl QuestionGateway for CountingGateway {
        fn list_all(&self) -> Result<Vec<QuestionItem>> {
            Ok(vec![])
        }
        fn list_by_category(&self, _category: &str) -> Result<Vec<QuestionItem>> {
            Ok(vec![])
        }
        fn list_categories(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
        fn mastery_stats(&self) -> Result<MasteryStats> {
            Ok(MasteryStats::default())
        }
        fn create(&self, _question: &NewQuestion) -> Result<()> {
            self.created.set(self.created.get() + 1);
            Ok(())
        }
        fn update(&self, _id: i64, _question: &NewQuestion) -> Result<()> {
            Ok(())
        }
        fn update_mastery(&self, _id: i64, _level: MasteryLevel) -> Result<()> {
            Ok(())
        }
        fn delete(&self, _id: i64) -> Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl io::Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl WriteColor for BrokenWriter {
        fn supports_color(&self) -> bool {
            false
        }
        fn set_color(&mut self, _spec: &termcolor::ColorSpec) -> io::Result<()> {
            Ok(())
        }
        fn reset(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn records() -> Vec<NewQuestion> {
        vec![
            NewQuestion::new("first", "a", "Go"),
            NewQuestion::new("second", "a", "Go"),
        ]
    }

    #[test]
    fn test_progress_lines_accompany_the_report() {
        let gateway = CountingGateway {
            created: Cell::new(0),
        };
        let mut progress = ImportProgressFormatter::new(2, NoColor::new(Vec::new()));

        let report =
            run_with_progress(&gateway, &records(), Duration::ZERO, &mut progress).unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(gateway.created.get(), 2);
    }

    #[test]
    fn test_broken_progress_stream_is_surfaced_after_the_batch() {
        let gateway = CountingGateway {
            created: Cell::new(0),
        };
        let mut progress = ImportProgressFormatter::new(2, BrokenWriter);

        let err =
            run_with_progress(&gateway, &records(), Duration::ZERO, &mut progress).unwrap_err();

        assert!(err.to_string().contains("import progress"));
        // Every record was still submitted despite the dead stream
        assert_eq!(gateway.created.get(), 2);
    }
}
