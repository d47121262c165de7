use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::gateway::QuestionGateway;
use crate::models::NewQuestion;

/// Outcome of a batch import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub total: usize,
    pub succeeded: usize,
    /// 1-based item index and failure reason, in submission order
    pub failures: Vec<(usize, String)>,
}

impl ImportReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Success percentage, rounded to the nearest whole number
    pub fn success_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.succeeded * 100) as f64 / self.total as f64).round() as u32
    }
}

/// Parse and pre-validate a batch file. The whole batch is rejected if the
/// text is not valid JSON, not an array, an empty array, or any element is
/// missing a required field (or has it blank after trimming). The error
/// names the 1-based item index and the field.
pub fn parse_batch(text: &str) -> Result<Vec<NewQuestion>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::Validation(format!("invalid JSON: {}", e)))?;

    let array = value
        .as_array()
        .ok_or_else(|| Error::Validation("batch must be a JSON array".to_string()))?;

    if array.is_empty() {
        return Err(Error::Validation("batch contains no records".to_string()));
    }

    let mut records = Vec::with_capacity(array.len());
    for (index, element) in array.iter().enumerate() {
        let object = element
            .as_object()
            .ok_or_else(|| Error::Validation(format!("item {}: not an object", index + 1)))?;

        let text_field = |name: &str| -> &str {
            object.get(name).and_then(Value::as_str).unwrap_or("")
        };

        let record = NewQuestion::new(
            text_field("content"),
            text_field("answer"),
            text_field("category"),
        );
        record.validate().map_err(|err| match err {
            Error::Validation(msg) => Error::Validation(format!("item {}: {}", index + 1, msg)),
            other => other,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Submit records one at a time (a degree-1 task queue), pausing `pacing`
/// between submissions. Per-item failures are captured and do not stop the
/// run; records failing local validation never reach the gateway.
/// `on_item` is invoked after each item with its 1-based index and outcome.
pub fn run_import<F>(
    gateway: &dyn QuestionGateway,
    records: &[NewQuestion],
    pacing: Duration,
    mut on_item: F,
) -> ImportReport
where
    F: FnMut(usize, &Result<()>),
{
    let mut report = ImportReport {
        total: records.len(),
        ..Default::default()
    };

    for (index, record) in records.iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            thread::sleep(pacing);
        }

        let outcome = record.validate().and_then(|_| gateway.create(record));
        match &outcome {
            Ok(()) => report.succeeded += 1,
            Err(err) => report.failures.push((index + 1, err.to_string())),
        }
        on_item(index + 1, &outcome);
    }

    report
}
