use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TrackerError;
use crate::tracker::Tracker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LapsedContract {
    /// 1-based sheet row
    pub row: u32,
    pub company: String,
    pub contract_end: NaiveDate,
    pub days_lapsed: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LapsedReport {
    pub lapsed: Vec<LapsedContract>,
}

impl Tracker<'_> {
    /// Report contracts whose end date has passed with no renewal decision
    /// recorded. Nothing is written.
    pub fn scan_lapsed(&mut self) -> Result<LapsedReport, TrackerError> {
        let sheet = self.tracker_sheet();
        self.require_sheets(&[sheet])?;

        let today = self.today;
        let lapsed: Vec<LapsedContract> = self
            .tracker_rows()?
            .into_iter()
            .filter(|row| row.renewal_status.is_none())
            .filter_map(|row| {
                let end = row.contract_end.filter(|end| *end < today)?;
                Some(LapsedContract {
                    row: row.row + 1,
                    company: row.company,
                    contract_end: end,
                    days_lapsed: (today - end).num_days(),
                })
            })
            .collect();

        tracing::info!(lapsed = lapsed.len(), "lapsed contract scan finished");
        let message = if lapsed.is_empty() {
            "No lapsed contracts found.".to_string()
        } else {
            let lines: Vec<String> = lapsed
                .iter()
                .map(|c| format!("{} (row {}): ended {}, {} day(s) ago", c.company, c.row, c.contract_end, c.days_lapsed))
                .collect();
            format!(
                "{} contract(s) have lapsed without a renewal decision:\n{}",
                lapsed.len(),
                super::capped_list(&lines, self.settings.lapsed_report_limit)
            )
        };
        self.alert(&message);
        Ok(LapsedReport { lapsed })
    }
}
