use contrack_core::MonthStatus;
use serde::Serialize;

use crate::error::TrackerError;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Companies moved to the archive, bottom row first
    pub archived: Vec<String>,
}

impl Tracker<'_> {
    /// Move every row with a `terminate` month to the archive.
    ///
    /// Rows are visited bottom to top so deleting one never shifts a row
    /// that is still to be visited.
    pub fn archive_terminated(&mut self) -> Result<ArchiveReport, TrackerError> {
        let sheets = &self.settings.sheets;
        self.require_sheets(&[&sheets.tracker, &sheets.archive])?;

        let mut report = ArchiveReport::default();
        for row in self.tracker_rows()?.into_iter().rev() {
            if !row.has_month_status(MonthStatus::Terminate) {
                continue;
            }
            let archived_at = self.store.append_row(&sheets.archive, row.cells)?;
            self.store.delete_row(&sheets.tracker, row.row)?;
            tracing::info!(row = row.row + 1, archive_row = archived_at + 1, company = %row.company, "contract archived");
            report.archived.push(row.company);
        }

        tracing::info!(archived = report.archived.len(), "archive finished");
        let message = if report.archived.is_empty() {
            "No terminated contracts to archive.".to_string()
        } else {
            format!(
                "Archived {} terminated contract(s):\n{}",
                report.archived.len(),
                super::capped_list(&report.archived, self.settings.lapsed_report_limit)
            )
        };
        self.alert(&message);
        Ok(report)
    }
}
