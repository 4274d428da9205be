//! Utility functions for date approximation, string handling, and file system
//! preparation.
//!
//! - Relative age ("3 hours ago") to absolute UTC date conversion
//! - String truncation for logging
//! - Parent directory creation for the database file

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Unit of a relative age phrase as printed by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Minute,
    Hour,
    Day,
}

impl AgeUnit {
    /// Map the singular unit word captured from the page to a unit.
    ///
    /// Returns `None` for anything outside `minute`, `hour`, `day`.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            _ => None,
        }
    }

    pub fn seconds(self) -> i64 {
        match self {
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }
}

/// Approximate the calendar date something was posted, given how long ago
/// it was posted relative to `now`.
///
/// The result is truncated to a UTC date; minute and hour precision is
/// intentionally discarded. Returns `None` only if the offset falls outside
/// the range chrono can represent.
///
/// # Examples
///
/// ```ignore
/// // 2025-05-06T01:00:00Z minus 3 hours is still the 5th.
/// let date = approximate_posted_date(3, AgeUnit::Hour, now);
/// assert_eq!(date, NaiveDate::from_ymd_opt(2025, 5, 5));
/// ```
pub fn approximate_posted_date(count: u64, unit: AgeUnit, now: DateTime<Utc>) -> Option<NaiveDate> {
    let seconds = i64::try_from(count).ok()?.checked_mul(unit.seconds())?;
    let offset = TimeDelta::try_seconds(seconds)?;
    now.checked_sub_signed(offset).map(|posted| posted.date_naive())
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `path` exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)?;
            info!(dir = %parent.display(), "Created database directory");
            Ok(())
        }
        _ => Ok(()),
    }
}
