//! Diagnostic log locator.
//!
//! The Angular CLI writes crash logs to uniquely named temp directories
//! (`<tmp>/ng-*/angular-errors.log`) with no handle back to the invocation
//! that produced them. Correlation is by recency: scan the temp dir and
//! take the most recently modified log not older than the current attempt.
//! Best-effort by nature — a slow flush can push the real log outside the
//! window.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Temp subdirectory prefix the Angular CLI uses.
const DIR_PREFIX: &str = "ng-";

/// Crash log filename inside each subdirectory.
const LOG_NAME: &str = "angular-errors.log";

/// Skew tolerance between attempt start and the log's mtime.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(5000);

/// Find the most recent `angular-errors.log` in the platform temp dir,
/// ignoring files modified before `not_older_than`.
pub fn find_latest_error_log(not_older_than: SystemTime) -> anyhow::Result<Option<PathBuf>> {
    find_latest_in(&std::env::temp_dir(), not_older_than)
}

/// Scan `tmp_dir` for `ng-*/angular-errors.log` candidates and return the
/// one with the strictly greatest mtime at or after `not_older_than`.
/// First seen wins on an exact mtime tie; enumeration order is whatever
/// the OS yields.
fn find_latest_in(tmp_dir: &Path, not_older_than: SystemTime) -> anyhow::Result<Option<PathBuf>> {
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    let entries = std::fs::read_dir(tmp_dir)
        .with_context(|| format!("reading temp dir {}", tmp_dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("reading temp dir {}", tmp_dir.display()))?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        if !entry.file_name().to_string_lossy().starts_with(DIR_PREFIX) {
            continue;
        }

        let candidate = entry.path().join(LOG_NAME);
        let Ok(meta) = std::fs::metadata(&candidate) else {
            continue; // no log in this ng-* dir
        };
        let mtime = meta
            .modified()
            .with_context(|| format!("reading mtime of {}", candidate.display()))?;

        if mtime < not_older_than {
            continue;
        }
        if latest.as_ref().is_none_or(|(best, _)| mtime > *best) {
            latest = Some((mtime, candidate));
        }
    }

    if let Some((mtime, path)) = &latest {
        tracing::debug!(path = %path.display(), ?mtime, "found recent angular error log");
    }

    Ok(latest.map(|(_, path)| path))
}
