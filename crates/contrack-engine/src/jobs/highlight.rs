use chrono::NaiveDate;
use contrack_core::{CellCoord, CellRange, Color, MonthLabel, RenewalStatus};
use serde::Serialize;

use crate::error::TrackerError;
use crate::rows::TrackerRow;
use crate::tracker::Tracker;

/// How soon a contract needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Renewed,
    /// Ends this month or has already ended
    Due,
    OneMonth,
    TwoToThreeMonths,
    None,
}

impl Urgency {
    /// Renewal status decides first, then whole months until the end month
    pub fn classify(row: &TrackerRow, today: NaiveDate) -> Self {
        if row.renewal_status == Some(RenewalStatus::Renewed) {
            return Urgency::Renewed;
        }
        let Some(end) = row.contract_end else {
            return Urgency::None;
        };
        match MonthLabel::of(today).months_until(MonthLabel::of(end)) {
            ..=0 => Urgency::Due,
            1 => Urgency::OneMonth,
            2..=3 => Urgency::TwoToThreeMonths,
            _ => Urgency::None,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Urgency::Renewed => Some(Color::LIGHT_GREEN),
            Urgency::Due => Some(Color::LIGHT_RED),
            Urgency::OneMonth => Some(Color::LIGHT_ORANGE),
            Urgency::TwoToThreeMonths => Some(Color::LIGHT_YELLOW),
            Urgency::None => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    pub renewed: usize,
    pub due: usize,
    pub one_month: usize,
    pub two_to_three_months: usize,
}

impl Tracker<'_> {
    /// Paint each row's detail columns by urgency. Rows with no urgency are
    /// cleared, so re-running after dates change leaves no stale color.
    pub fn highlight_urgency(&mut self) -> Result<HighlightReport, TrackerError> {
        let sheet = self.tracker_sheet();
        self.require_sheets(&[sheet])?;

        let mut report = HighlightReport::default();
        for row in self.tracker_rows()? {
            let urgency = Urgency::classify(&row, self.today);
            match urgency {
                Urgency::Renewed => report.renewed += 1,
                Urgency::Due => report.due += 1,
                Urgency::OneMonth => report.one_month += 1,
                Urgency::TwoToThreeMonths => report.two_to_three_months += 1,
                Urgency::None => {}
            }
            let span = self.detail_span(row.row);
            self.store.set_background(sheet, span, urgency.color())?;
        }

        tracing::info!(?report, "urgency highlighting applied");
        self.alert(&format!(
            "Highlighting updated.\nRenewed: {}\nEnding this month or already ended: {}\nEnding next month: {}\nEnding in 2-3 months: {}",
            report.renewed, report.due, report.one_month, report.two_to_three_months
        ));
        Ok(report)
    }

    /// Remove urgency coloring from every data row. Returns the rows cleared.
    pub fn clear_highlight(&mut self) -> Result<usize, TrackerError> {
        let sheet = self.tracker_sheet();
        self.require_sheets(&[sheet])?;

        let first = self.settings.tracker.first_data_row();
        let rows = self.store.row_count(sheet)?.saturating_sub(first);
        if rows > 0 {
            let last_col = self.settings.tracker.first_month_col.saturating_sub(1);
            let range = CellRange::new(
                CellCoord::new(first, 0),
                CellCoord::new(first + rows - 1, last_col),
            );
            self.store.set_background(sheet, range, None)?;
        }

        tracing::info!(rows, "urgency highlighting cleared");
        self.alert("Highlighting cleared.");
        Ok(rows as usize)
    }

    /// Columns left of the month grid on one row
    fn detail_span(&self, row: u32) -> CellRange {
        CellRange::row_span(row, 0, self.settings.tracker.first_month_col.saturating_sub(1))
    }
}
