//! Fallback orchestrator — run the serve command, and when it fails in the
//! recognized "sandbox forbids listening" way, substitute a one-off build.
//!
//! Returns the wrapper's exit code instead of exiting; `main` performs the
//! actual termination.

use std::time::{Duration, SystemTime};

use crate::cmd;
use crate::logs;
use crate::ng::NgCommand;

/// Env var overriding the log recency window, in milliseconds.
const WINDOW_ENV: &str = "NG_START_LOG_WINDOW_MS";

/// Warning printed before the substituted build starts streaming.
const FALLBACK_NOTICE: &str = "\n`ng serve` could not start (port binding not permitted in this environment). Falling back to a one-off `ng build` so you still get compile errors.\n";

/// Log recency window: `NG_START_LOG_WINDOW_MS` if set and valid, else
/// 5000 ms. The window tolerates clock and log-flush skew between the
/// attempt start and the log's mtime.
pub fn log_window() -> Duration {
    match std::env::var(WINDOW_ENV) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                tracing::warn!(%raw, "ignoring unparseable {WINDOW_ENV}");
                logs::DEFAULT_WINDOW
            }
        },
        Err(_) => logs::DEFAULT_WINDOW,
    }
}

/// Run `primary`; on failure, read the recent diagnostic log and let
/// `should_fall_back(exit_code, log_text)` decide between running
/// `fallback` and propagating the original outcome.
///
/// Single-shot: the fallback itself gets no further fallback. The returned
/// code is the wrapper's exit code.
pub async fn run_with_fallback<F>(
    primary: NgCommand,
    fallback: NgCommand,
    window: Duration,
    should_fall_back: F,
) -> anyhow::Result<i32>
where
    F: Fn(i32, &str) -> bool,
{
    let started = SystemTime::now();
    tracing::debug!(program = %primary.program.display(), args = ?primary.args, "starting primary");

    let (code, spawn_error) = match cmd::wait_inherited(&primary).await {
        Ok(0) => return Ok(0),
        Ok(code) => (code, None),
        Err(err) => (1, Some(err)),
    };

    let log_text = read_recent_log(started, window)?;

    if should_fall_back(code, &log_text) {
        eprintln!("{FALLBACK_NOTICE}");
        tracing::info!(program = %fallback.program.display(), args = ?fallback.args, "running fallback build");
        return Ok(cmd::run_to_exit_code(&fallback).await);
    }

    if let Some(err) = spawn_error {
        eprintln!("{err:#}");
    }
    Ok(code)
}

/// Text of the most recent diagnostic log within the window, or an empty
/// string when none qualifies.
fn read_recent_log(started: SystemTime, window: Duration) -> anyhow::Result<String> {
    let bound = started.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);
    match logs::find_latest_error_log(bound)? {
        Some(path) => Ok(std::fs::read_to_string(&path).unwrap_or_default()),
        None => Ok(String::new()),
    }
}
