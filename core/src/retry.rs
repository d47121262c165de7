use std::thread;
use std::time::Duration;

use crate::error::Result;

/// Run `op` up to `attempts` times, pausing `backoff` between attempts.
/// Returns the first success or the last error. Only the daily-problem
/// fetch uses this; no other operation auto-retries.
pub fn retry_with_backoff<T, F>(attempts: u32, backoff: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let attempts = attempts.max(1);
    let mut last_err = None;
    for attempt in 0..attempts {
        if attempt > 0 {
            thread::sleep(backoff);
        }
        match op() {
            Ok(value) => return Ok(value),
            Err(err) => last_err = Some(err),
        }
    }
    // attempts >= 1, so at least one op() ran and failed
    Err(last_err.unwrap_or_else(|| crate::error::Error::Transport("retry exhausted".to_string())))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_succeeds_without_retry() {
        let mut calls = 0;
        let result = retry_with_backoff(3, Duration::ZERO, || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_recovers_within_bound() {
        let mut calls = 0;
        let result = retry_with_backoff(3, Duration::ZERO, || {
            calls += 1;
            if calls < 3 {
                Err(Error::Transport("flaky".to_string()))
            } else {
                Ok("daily")
            }
        });
        assert_eq!(result.unwrap(), "daily");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_surfaces_last_error_after_bound() {
        let mut calls = 0;
        let result: Result<()> = retry_with_backoff(3, Duration::ZERO, || {
            calls += 1;
            Err(Error::NotFound(format!("attempt {}", calls)))
        });
        assert_eq!(calls, 3);
        assert_eq!(result.unwrap_err(), Error::NotFound("attempt 3".to_string()));
    }
}
