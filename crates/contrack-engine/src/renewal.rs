use chrono::NaiveDate;
use contrack_core::month::add_months;
use contrack_core::{CellValue, MonthLabel, MonthStatus, RenewalStatus, TrackerField};
use serde::Serialize;

use crate::error::TrackerError;
use crate::grid::term_cells;
use crate::mail::{renewal_confirmation, termination_notice};
use crate::rows::TrackerRow;
use crate::tracker::Tracker;

/// Result of one renewal sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenewalReport {
    pub renewed: Vec<String>,
    pub terminated: Vec<String>,
    /// Rows with a decision but no usable contract end
    pub skipped: Vec<u32>,
    pub email_failures: usize,
}

/// What a sync pass does to one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Renew { old_end: NaiveDate, new_start: NaiveDate, new_end: NaiveDate },
    Terminate { end: NaiveDate },
}

impl Decision {
    fn for_row(row: &TrackerRow) -> Option<Result<Self, u32>> {
        let status = row.renewal_status?;
        if !matches!(status, RenewalStatus::Renew | RenewalStatus::NotRenewing) {
            return None;
        }
        let Some(end) = row.contract_end else {
            return Some(Err(row.row));
        };

        Some(Ok(match status {
            RenewalStatus::Renew => Decision::Renew {
                old_end: end,
                new_start: MonthLabel::of(end).next().first_day(),
                new_end: add_months(end, 12),
            },
            _ => Decision::Terminate { end },
        }))
    }
}

impl Tracker<'_> {
    /// Apply every pending `Renew` / `Not Renewing` decision on the tracker
    pub fn sync_renewals(&mut self) -> Result<RenewalReport, TrackerError> {
        let tracker = self.tracker_sheet();
        self.require_sheets(&[tracker])?;
        let log_sheet = self.settings.sheets.renewal_log.as_str();
        let log_enabled = self.store.has_sheet(log_sheet);
        if !log_enabled {
            tracing::warn!(sheet = %log_sheet, "renewal log sheet missing; actions will not be logged");
        }

        let mut report = RenewalReport::default();
        for row in self.tracker_rows()? {
            let decision = match Decision::for_row(&row) {
                None => continue,
                Some(Err(r)) => {
                    tracing::warn!(row = r + 1, company = %row.company, "renewal decision without a contract end; skipped");
                    report.skipped.push(r + 1);
                    continue;
                }
                Some(Ok(d)) => d,
            };

            let delivered = match decision {
                Decision::Renew { old_end, new_start, new_end } => {
                    self.renew_row(&row, new_start, new_end)?;
                    if log_enabled {
                        self.log_action(&row.company, "Renewed", old_end, Some(new_end))?;
                    }
                    report.renewed.push(row.company.clone());
                    self.notify(&row, |to, company, name| renewal_confirmation(to, company, new_start, new_end, name))
                }
                Decision::Terminate { end } => {
                    self.terminate_row(&row, end)?;
                    if log_enabled {
                        self.log_action(&row.company, "Terminated", end, None)?;
                    }
                    report.terminated.push(row.company.clone());
                    self.notify(&row, |to, company, name| termination_notice(to, company, end, name))
                }
            };
            if !delivered {
                report.email_failures += 1;
            }
        }

        tracing::info!(
            renewed = report.renewed.len(),
            terminated = report.terminated.len(),
            skipped = report.skipped.len(),
            email_failures = report.email_failures,
            "renewal sync finished"
        );
        let mut summary = format!(
            "Renewal sync complete.\nRenewed: {}\nTerminated: {}",
            report.renewed.len(),
            report.terminated.len()
        );
        if !report.skipped.is_empty() {
            let rows: Vec<String> = report.skipped.iter().map(u32::to_string).collect();
            summary.push_str(&format!("\nSkipped (no contract end): rows {}", rows.join(", ")));
        }
        if report.email_failures > 0 {
            summary.push_str(&format!("\nEmails that could not be sent: {}", report.email_failures));
        }
        self.alert(&summary);
        Ok(report)
    }

    fn renew_row(&mut self, row: &TrackerRow, new_start: NaiveDate, new_end: NaiveDate) -> Result<(), TrackerError> {
        let grid = self.grid();
        grid.ensure_span(self.store, new_start, new_end)?;
        grid.fill(self.store, row.row, &term_cells(MonthLabel::of(new_start), MonthStatus::Renew), false)?;
        self.write_field(row.row, TrackerField::ContractStart, new_start)?;
        self.write_field(row.row, TrackerField::ContractEnd, new_end)?;
        self.write_field(row.row, TrackerField::RenewalStatus, RenewalStatus::Renewed)?;
        tracing::info!(row = row.row + 1, company = %row.company, %new_start, %new_end, "contract renewed");
        Ok(())
    }

    fn terminate_row(&mut self, row: &TrackerRow, end: NaiveDate) -> Result<(), TrackerError> {
        self.grid().set_cell(self.store, row.row, MonthLabel::of(end), MonthStatus::Terminate)?;
        self.write_field(row.row, TrackerField::RenewalStatus, RenewalStatus::Terminated)?;
        tracing::info!(row = row.row + 1, company = %row.company, %end, "contract terminated");
        Ok(())
    }

    /// Email the row's contact, if any. Returns false only on a failed send.
    fn notify<F>(&self, row: &TrackerRow, render: F) -> bool
    where
        F: FnOnce(&str, &str, &str) -> crate::mail::OutgoingEmail,
    {
        if row.email.is_empty() {
            tracing::debug!(row = row.row + 1, "no email on file");
            return true;
        }
        self.send(&render(&row.email, &row.company, &self.settings.sender_name))
    }

    fn log_action(
        &mut self,
        company: &str,
        action: &str,
        old_end: NaiveDate,
        new_end: Option<NaiveDate>,
    ) -> Result<(), TrackerError> {
        let entry = vec![
            CellValue::Date(self.today),
            CellValue::text(company),
            CellValue::text(action),
            CellValue::Date(old_end),
            new_end.map(CellValue::Date).unwrap_or_default(),
        ];
        self.store.append_row(&self.settings.sheets.renewal_log, entry)?;
        Ok(())
    }
}
