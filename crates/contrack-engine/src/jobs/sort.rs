use chrono::NaiveDate;
use contrack_core::{CellCoord, CellRange};
use serde::Serialize;

use crate::error::TrackerError;
use crate::rows::TrackerRow;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortReport {
    pub rows: usize,
    /// Rows that ended up at a different position
    pub moved: usize,
}

/// Rows missing a company or a start sort after every dated row
fn sort_key(row: &TrackerRow) -> (bool, Option<NaiveDate>) {
    match row.contract_start {
        Some(start) if !row.company.is_empty() => (false, Some(start)),
        _ => (true, None),
    }
}

impl Tracker<'_> {
    /// Reorder data rows by contract start, oldest first. The sort is stable
    /// and the sequence column stays where it is.
    pub fn sort_by_start(&mut self) -> Result<SortReport, TrackerError> {
        let sheet = self.tracker_sheet();
        self.require_sheets(&[sheet])?;

        let rows = self.tracker_rows()?;
        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by_key(|&i| sort_key(&rows[i]));

        let moved = order.iter().enumerate().filter(|(pos, src)| pos != *src).count();
        let report = SortReport { rows: rows.len(), moved };
        if moved == 0 {
            tracing::info!(rows = rows.len(), "tracker already sorted");
            self.alert("The tracker is already sorted by contract start.");
            return Ok(report);
        }

        // Whole cells move so each row keeps its dropdowns and highlight
        let schema = &self.settings.tracker;
        let first_row = schema.first_data_row();
        let width = self.store.col_count(sheet)?.max(schema.first_month_col);
        let last_row = first_row + rows.len() as u32 - 1;
        let block = self.store.read_cells(
            sheet,
            CellRange::new(CellCoord::new(first_row, 0), CellCoord::new(last_row, width - 1)),
        )?;

        let seq = schema.sequence as usize;
        let sorted: Vec<_> = order
            .iter()
            .enumerate()
            .map(|(pos, &src)| {
                let mut cells = block[src].clone();
                if let (Some(slot), Some(kept)) = (cells.get_mut(seq), block[pos].get(seq)) {
                    slot.value = kept.value.clone();
                }
                cells
            })
            .collect();

        self.store.write_cells(sheet, CellCoord::new(first_row, 0), sorted)?;

        tracing::info!(rows = report.rows, moved, "tracker sorted by contract start");
        self.alert(&format!("Sorted {} row(s) by contract start.", report.rows));
        Ok(report)
    }
}
