//! Ranked report output
//!
//! A run produces one [`MatchReport`]: scored rows sorted best first, plus the
//! candidates that could not be scored and why. The report is written once, to
//! `result_<YYYY-MM-DD_HH-MM-SS>.<ext>` in the output directory. An existing
//! report is never replaced: a run that lands on a taken name writes
//! `result_<timestamp>_1.<ext>`, `_2` and so on.
//!
//! # Usage
//!
//! ```ignore
//! use matchscore_lib::report::{write_report, ReportFormat};
//!
//! report.sort();
//! let path = write_report(&report, Path::new("."), ReportFormat::Xlsx)?;
//! println!("Check results in {}", path.display());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::{Error, Result};

/// Suffixes tried after the plain name before giving up
const MAX_NAME_SUFFIX: usize = 999;

/// One scored candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Candidate file name
    pub resume_name: String,
    /// Best chunk cosine similarity, scaled to [-100, 100]
    pub match_score: f64,
}

/// Why a candidate has no score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "message")]
pub enum SkipReason {
    /// The document produced no text after normalization
    NoExtractableText,
    /// The document could not be read or parsed
    ExtractionFailed(String),
    /// Tokenizing or embedding the document failed
    EmbeddingFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoExtractableText => write!(f, "no extractable text"),
            SkipReason::ExtractionFailed(msg) => write!(f, "extraction failed: {msg}"),
            SkipReason::EmbeddingFailed(msg) => write!(f, "embedding failed: {msg}"),
        }
    }
}

/// A candidate that was skipped instead of scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub resume_name: String,
    pub reason: SkipReason,
}

/// Everything a run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub rows: Vec<MatchResult>,
    pub skipped: Vec<SkippedCandidate>,
}

impl MatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort rows by score, highest first. Equal scores keep name order.
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.resume_name.cmp(&b.resume_name))
        });
        self.skipped.sort_by(|a, b| a.resume_name.cmp(&b.resume_name));
    }

    /// Total number of candidates processed, scored or not.
    pub fn len(&self) -> usize {
        self.rows.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Spreadsheet with a `results` sheet and, when needed, a `skipped` sheet
    #[default]
    Xlsx,
    /// Pretty-printed JSON of the whole [`MatchReport`]
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "json" => Ok(ReportFormat::Json),
            other => Err(Error::InvalidInput(format!(
                "unknown report format '{other}', expected xlsx or json"
            ))),
        }
    }
}

/// `result_<YYYY-MM-DD_HH-MM-SS>.<ext>`
pub fn report_file_name(format: ReportFormat, timestamp: &DateTime<Local>) -> String {
    format!(
        "result_{}.{}",
        timestamp.format("%Y-%m-%d_%H-%M-%S"),
        format.extension()
    )
}

/// `result_<YYYY-MM-DD_HH-MM-SS>_<n>.<ext>`, or the plain name for `n == 0`
fn suffixed_file_name(format: ReportFormat, timestamp: &DateTime<Local>, n: usize) -> String {
    if n == 0 {
        return report_file_name(format, timestamp);
    }
    format!(
        "result_{}_{}.{}",
        timestamp.format("%Y-%m-%d_%H-%M-%S"),
        n,
        format.extension()
    )
}

/// Write `report` into `dir`, stamped with the current local time.
///
/// Returns the path written.
pub fn write_report(report: &MatchReport, dir: &Path, format: ReportFormat) -> Result<PathBuf> {
    write_report_at(report, dir, format, &Local::now())
}

/// Same as [`write_report`] with an explicit timestamp.
///
/// Never overwrites: when the timestamped name is taken, the first free
/// `_<n>` suffix is used instead.
pub fn write_report_at(
    report: &MatchReport,
    dir: &Path,
    format: ReportFormat,
    timestamp: &DateTime<Local>,
) -> Result<PathBuf> {
    let (path, file) = create_report_file(dir, format, timestamp)?;
    let written = match format {
        ReportFormat::Xlsx => xlsx::write(report, file, &path),
        ReportFormat::Json => json::write(report, file, &path),
    };
    if let Err(e) = written {
        // don't leave a truncated report behind
        let _ = fs::remove_file(&path);
        return Err(e);
    }
    Ok(path)
}

/// Atomically claim a report name that does not exist yet.
fn create_report_file(
    dir: &Path,
    format: ReportFormat,
    timestamp: &DateTime<Local>,
) -> Result<(PathBuf, File)> {
    for n in 0..=MAX_NAME_SUFFIX {
        let path = dir.join(suffixed_file_name(format, timestamp, n));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(report_error(&path, e)),
        }
    }

    Err(report_error(
        &dir.join(report_file_name(format, timestamp)),
        format!("no free report name after {MAX_NAME_SUFFIX} attempts"),
    ))
}

fn report_error(path: &Path, message: impl fmt::Display) -> Error {
    Error::Report {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

mod json;
mod xlsx;
