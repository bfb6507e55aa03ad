use chrono::NaiveDate;
use contrack_core::{
    CellCoord, CellRange, CellValue, MonthStatus, RenewalStatus, SheetStore, StoreError,
    TrackerSchema,
};

/// One data row of the tracker, parsed through the column table
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerRow {
    /// Sheet row index (0-based)
    pub row: u32,
    pub company: String,
    pub location: String,
    pub email: String,
    pub pilot_number: String,
    pub renewal_status: Option<RenewalStatus>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    /// Every cell of the row, including the monthly grid
    pub cells: Vec<CellValue>,
    first_month_col: usize,
}

impl TrackerRow {
    pub fn parse(row: u32, cells: Vec<CellValue>, schema: &TrackerSchema) -> Self {
        let text = |col: u32| {
            cells
                .get(col as usize)
                .map(|v| v.as_text().trim().to_string())
                .unwrap_or_default()
        };
        let date = |col: u32| cells.get(col as usize).and_then(CellValue::as_date);

        Self {
            row,
            company: text(schema.company),
            location: text(schema.location),
            email: text(schema.email),
            pilot_number: text(schema.pilot_number),
            renewal_status: cells
                .get(schema.renewal_status as usize)
                .and_then(RenewalStatus::from_cell),
            contract_start: date(schema.contract_start),
            contract_end: date(schema.contract_end),
            first_month_col: schema.first_month_col as usize,
            cells,
        }
    }

    /// Monthly status cells, left to right
    pub fn month_cells(&self) -> &[CellValue] {
        self.cells.get(self.first_month_col..).unwrap_or(&[])
    }

    /// Whether any monthly cell holds `status`
    pub fn has_month_status(&self, status: MonthStatus) -> bool {
        self.month_cells()
            .iter()
            .any(|v| MonthStatus::from_cell(v) == Some(status))
    }
}

/// Read every data row of a sheet, starting at `first_row`, across all used columns
pub fn read_rows(
    store: &dyn SheetStore,
    sheet: &str,
    schema: &TrackerSchema,
    first_row: u32,
) -> Result<Vec<TrackerRow>, StoreError> {
    let row_count = store.row_count(sheet)?;
    let col_count = store.col_count(sheet)?.max(schema.first_month_col);
    if row_count <= first_row || col_count == 0 {
        return Ok(Vec::new());
    }

    let range = CellRange::new(
        CellCoord::new(first_row, 0),
        CellCoord::new(row_count - 1, col_count - 1),
    );
    let block = store.read_range(sheet, range)?;
    Ok(block
        .into_iter()
        .enumerate()
        .map(|(i, cells)| TrackerRow::parse(first_row + i as u32, cells, schema))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_fields() {
        let schema = TrackerSchema::default();
        let mut cells = vec![CellValue::Empty; 10];
        cells[1] = CellValue::text(" Acme ");
        cells[3] = CellValue::text("ops@acme.test");
        cells[5] = CellValue::text("Renew");
        cells[6] = CellValue::Date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        cells[7] = CellValue::Number(46387.0);
        cells[9] = CellValue::text("terminate");

        let row = TrackerRow::parse(4, cells, &schema);
        assert_eq!(row.company, "Acme");
        assert_eq!(row.renewal_status, Some(RenewalStatus::Renew));
        assert_eq!(row.contract_end, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(row.month_cells().len(), 2);
        assert!(row.has_month_status(MonthStatus::Terminate));
        assert!(!row.has_month_status(MonthStatus::Paid));
    }
}
