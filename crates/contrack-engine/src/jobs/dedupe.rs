use std::collections::HashSet;

use serde::Serialize;

use crate::error::TrackerError;
use crate::rows::read_rows;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub removed: Vec<String>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Tracker<'_> {
    /// Delete tracker rows whose company already sits in the archive,
    /// comparing trimmed names without regard to case
    pub fn remove_archived_duplicates(&mut self) -> Result<DedupeReport, TrackerError> {
        let sheets = &self.settings.sheets;
        self.require_sheets(&[&sheets.tracker, &sheets.archive])?;

        let archived: HashSet<String> =
            read_rows(&*self.store, &sheets.archive, &self.settings.tracker, self.settings.archive_header_rows)?
                .iter()
                .map(|r| normalize(&r.company))
                .filter(|name| !name.is_empty())
                .collect();

        let mut report = DedupeReport::default();
        for row in self.tracker_rows()?.into_iter().rev() {
            if row.company.is_empty() || !archived.contains(&normalize(&row.company)) {
                continue;
            }
            self.store.delete_row(&sheets.tracker, row.row)?;
            tracing::info!(row = row.row + 1, company = %row.company, "archived company removed from tracker");
            report.removed.push(row.company);
        }

        tracing::info!(removed = report.removed.len(), "duplicate cleanup finished");
        let message = if report.removed.is_empty() {
            "No archived companies found on the tracker.".to_string()
        } else {
            format!(
                "Removed {} row(s) already in the archive:\n{}",
                report.removed.len(),
                super::capped_list(&report.removed, self.settings.lapsed_report_limit)
            )
        };
        self.alert(&message);
        Ok(report)
    }
}
