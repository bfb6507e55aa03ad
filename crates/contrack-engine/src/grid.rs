use chrono::NaiveDate;
use contrack_core::{
    CellCoord, CellRange, CellValue, MonthLabel, MonthStatus, SheetStore, StoreError,
    TrackerSchema, TrackerSettings,
};

/// The rolling band of month columns on the tracker sheet.
///
/// Columns run left to right without gaps from `first_month_col`. The month
/// row holds `Mmm-YYYY` labels; the year row carries the year on January
/// columns. Columns are only ever appended.
#[derive(Debug, Clone, Copy)]
pub struct MonthGrid<'a> {
    sheet: &'a str,
    schema: &'a TrackerSchema,
}

impl<'a> MonthGrid<'a> {
    pub fn new(settings: &'a TrackerSettings) -> Self {
        Self {
            sheet: &settings.sheets.tracker,
            schema: &settings.tracker,
        }
    }

    /// Every labelled month column, left to right
    pub fn columns(&self, store: &dyn SheetStore) -> Result<Vec<(u32, MonthLabel)>, StoreError> {
        let first = self.schema.first_month_col;
        let col_count = store.col_count(self.sheet)?;
        if col_count <= first {
            return Ok(Vec::new());
        }

        let row = self.schema.month_row;
        let headers = store.read_range(self.sheet, CellRange::row_span(row, first, col_count - 1))?;
        Ok(headers
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, value)| MonthLabel::from_cell(&value).map(|label| (first + i as u32, label)))
            .collect())
    }

    /// Column holding `label`, if the grid has one
    pub fn find_column(&self, store: &dyn SheetStore, label: MonthLabel) -> Result<Option<u32>, StoreError> {
        Ok(self
            .columns(store)?
            .into_iter()
            .find(|(_, l)| *l == label)
            .map(|(col, _)| col))
    }

    /// Rightmost month column
    pub fn last_month(&self, store: &dyn SheetStore) -> Result<Option<(u32, MonthLabel)>, StoreError> {
        Ok(self.columns(store)?.into_iter().max_by_key(|(col, _)| *col))
    }

    /// Append month columns until the month containing `target` is covered.
    /// An empty grid is seeded with the target month. Returns the number of
    /// columns added.
    pub fn extend_to(&self, store: &mut dyn SheetStore, target: NaiveDate) -> Result<usize, StoreError> {
        let target = MonthLabel::of(target);

        let Some((last_col, last)) = self.last_month(store)? else {
            self.write_headers(store, self.schema.first_month_col, &[target], true)?;
            tracing::info!(month = %target, "seeded month grid");
            return Ok(1);
        };

        if target <= last {
            return Ok(0);
        }

        let months: Vec<MonthLabel> = last.next().through(target).collect();
        self.write_headers(store, last_col + 1, &months, false)?;
        tracing::info!(from = %last.next(), to = %target, added = months.len(), "extended month grid");
        Ok(months.len())
    }

    /// Make sure `start..=end` is addressable. Seeds an empty grid at `start`;
    /// months before an existing grid cannot be added and are only logged.
    pub fn ensure_span(
        &self,
        store: &mut dyn SheetStore,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, StoreError> {
        let start_label = MonthLabel::of(start);
        let mut added = 0;
        match self.columns(store)?.first() {
            None => {
                added += self.extend_to(store, start)?;
            }
            Some((_, first)) if start_label < *first => {
                tracing::warn!(month = %start_label, first = %first, "month precedes the grid; cells before it are skipped");
            }
            Some(_) => {}
        }
        added += self.extend_to(store, end)?;
        Ok(added)
    }

    fn write_headers(
        &self,
        store: &mut dyn SheetStore,
        first_col: u32,
        months: &[MonthLabel],
        stamp_first_year: bool,
    ) -> Result<(), StoreError> {
        let labels = months.iter().map(|m| CellValue::text(m.to_string())).collect();
        let years = months
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if m.is_january() || (stamp_first_year && i == 0) {
                    CellValue::Number(m.year() as f64)
                } else {
                    CellValue::Empty
                }
            })
            .collect();

        store.write_range(self.sheet, CellCoord::new(self.schema.month_row, first_col), vec![labels])?;
        store.write_range(self.sheet, CellCoord::new(self.schema.year_row, first_col), vec![years])?;
        Ok(())
    }

    /// Write one monthly cell and re-attach the status dropdown.
    /// A missing month column is logged and skipped; returns whether a write happened.
    pub fn set_cell(
        &self,
        store: &mut dyn SheetStore,
        row: u32,
        label: MonthLabel,
        status: MonthStatus,
    ) -> Result<bool, StoreError> {
        match self.find_column(store, label)? {
            Some(col) => {
                self.stamp(store, CellCoord::new(row, col), status)?;
                Ok(true)
            }
            None => {
                tracing::warn!(row = row + 1, month = %label, "month column not found; cell skipped");
                Ok(false)
            }
        }
    }

    /// Write several monthly cells of one row, resolving headers once.
    /// With `keep_existing`, cells that already hold a value are left alone.
    /// Returns the months actually written.
    pub fn fill(
        &self,
        store: &mut dyn SheetStore,
        row: u32,
        cells: &[(MonthLabel, MonthStatus)],
        keep_existing: bool,
    ) -> Result<Vec<MonthLabel>, StoreError> {
        let columns = self.columns(store)?;
        let mut written = Vec::new();
        for (label, status) in cells {
            let Some(col) = columns.iter().find(|(_, l)| l == label).map(|(c, _)| *c) else {
                tracing::warn!(row = row + 1, month = %label, "month column not found; cell skipped");
                continue;
            };
            let coord = CellCoord::new(row, col);
            if keep_existing && !store.read_cell(self.sheet, coord)?.is_empty() {
                continue;
            }
            self.stamp(store, coord, *status)?;
            written.push(*label);
        }
        Ok(written)
    }

    fn stamp(&self, store: &mut dyn SheetStore, coord: CellCoord, status: MonthStatus) -> Result<(), StoreError> {
        store.write_cell(self.sheet, coord, status.into())?;
        store.set_validation(self.sheet, coord, MonthStatus::validation_rule())
    }

    /// Latest month whose cell in `row` holds a value
    pub fn last_filled(&self, store: &dyn SheetStore, row: u32) -> Result<Option<MonthLabel>, StoreError> {
        let columns = self.columns(store)?;
        let Some(last_col) = columns.iter().map(|(c, _)| *c).max() else {
            return Ok(None);
        };
        let first = self.schema.first_month_col;
        let values = store
            .read_range(self.sheet, CellRange::row_span(row, first, last_col))?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        Ok(columns
            .iter()
            .rev()
            .find(|(col, _)| values.get((col - first) as usize).is_some_and(|v| !v.is_empty()))
            .map(|(_, label)| *label))
    }

    /// Range covering the month cells of `row`, if the grid has any columns
    pub fn row_range(&self, store: &dyn SheetStore, row: u32) -> Result<Option<CellRange>, StoreError> {
        Ok(self
            .last_month(store)?
            .map(|(last_col, _)| CellRange::row_span(row, self.schema.first_month_col, last_col)))
    }
}

/// Twelve consecutive months from `start`; the first gets `first`, the rest `paid`
pub fn term_cells(start: MonthLabel, first: MonthStatus) -> Vec<(MonthLabel, MonthStatus)> {
    start
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, m)| (m, if i == 0 { first } else { MonthStatus::Paid }))
        .collect()
}
