//! Batch jobs over whole sheets. Each pass re-derives its work from the
//! current cell contents, so any job can be re-run after a partial failure.

mod archive;
mod dedupe;
mod highlight;
mod intake;
mod lapsed;
mod reminders;
mod sort;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub use archive::ArchiveReport;
pub use dedupe::DedupeReport;
pub use highlight::{HighlightReport, Urgency};
pub use intake::IntakeReport;
pub use lapsed::{LapsedContract, LapsedReport};
pub use reminders::ReminderReport;
pub use sort::SortReport;

use crate::error::TrackerError;
use crate::renewal::RenewalReport;
use crate::tracker::Tracker;

/// Batch jobs that can be triggered by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    Intake,
    Archive,
    Dedupe,
    Sort,
    Renewals,
    Lapsed,
    Highlight,
    ClearHighlight,
    Reminders,
}

impl Job {
    pub const ALL: [Job; 9] = [
        Job::Intake,
        Job::Archive,
        Job::Dedupe,
        Job::Sort,
        Job::Renewals,
        Job::Lapsed,
        Job::Highlight,
        Job::ClearHighlight,
        Job::Reminders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Job::Intake => "intake",
            Job::Archive => "archive",
            Job::Dedupe => "dedupe",
            Job::Sort => "sort",
            Job::Renewals => "renewals",
            Job::Lapsed => "lapsed",
            Job::Highlight => "highlight",
            Job::ClearHighlight => "clear-highlight",
            Job::Reminders => "reminders",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown job: {0}")]
pub struct UnknownJob(pub String);

impl FromStr for Job {
    type Err = UnknownJob;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Job::ALL
            .into_iter()
            .find(|job| job.as_str() == s)
            .ok_or_else(|| UnknownJob(s.to_string()))
    }
}

/// Outcome of a batch job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum JobReport {
    Intake(IntakeReport),
    Archive(ArchiveReport),
    Dedupe(DedupeReport),
    Sort(SortReport),
    Renewals(RenewalReport),
    Lapsed(LapsedReport),
    Highlight(HighlightReport),
    ClearHighlight { rows: usize },
    Reminders(ReminderReport),
}

impl Tracker<'_> {
    /// Run a job by name. A missing sheet is reported to the user before the
    /// error is returned.
    pub fn run_job(&mut self, job: Job) -> Result<JobReport, TrackerError> {
        tracing::info!(%job, today = %self.today, "running job");
        let result = match job {
            Job::Intake => self.intake().map(JobReport::Intake),
            Job::Archive => self.archive_terminated().map(JobReport::Archive),
            Job::Dedupe => self.remove_archived_duplicates().map(JobReport::Dedupe),
            Job::Sort => self.sort_by_start().map(JobReport::Sort),
            Job::Renewals => self.sync_renewals().map(JobReport::Renewals),
            Job::Lapsed => self.scan_lapsed().map(JobReport::Lapsed),
            Job::Highlight => self.highlight_urgency().map(JobReport::Highlight),
            Job::ClearHighlight => self.clear_highlight().map(|rows| JobReport::ClearHighlight { rows }),
            Job::Reminders => self.send_reminders().map(JobReport::Reminders),
        };

        if let Err(TrackerError::MissingSheet(name)) = &result {
            let message = format!("Sheet \"{}\" was not found. Nothing was changed.", name);
            self.alert(&message);
        }
        result
    }
}

/// `items` joined one per line, cut off after `limit` with a count of the rest
pub(crate) fn capped_list(items: &[String], limit: usize) -> String {
    let mut lines: Vec<String> = items.iter().take(limit).map(|i| format!("- {}", i)).collect();
    if items.len() > limit {
        lines.push(format!("...and {} more", items.len() - limit));
    }
    lines.join("\n")
}
