use crate::error::StoreError;
use crate::format::Color;
use crate::range::{CellCoord, CellRange};
use crate::validation::DataValidationRule;
use crate::cell::Cell;
use crate::CellValue;

/// Storage primitives the tracker logic is allowed to use.
///
/// Rows and columns are 0-indexed. Reads outside the populated area return
/// [`CellValue::Empty`]; writes grow the sheet as needed.
pub trait SheetStore {
    /// Check whether a sheet with this name exists
    fn has_sheet(&self, sheet: &str) -> bool;

    /// Number of rows in use (index of the first row after the last populated one)
    fn row_count(&self, sheet: &str) -> Result<u32, StoreError>;

    /// Number of columns in use across all rows
    fn col_count(&self, sheet: &str) -> Result<u32, StoreError>;

    /// Read a rectangular block, row-major
    fn read_range(&self, sheet: &str, range: CellRange) -> Result<Vec<Vec<CellValue>>, StoreError>;

    /// Write a row-major block whose top-left corner is `origin`
    fn write_range(
        &mut self,
        sheet: &str,
        origin: CellCoord,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), StoreError>;

    /// Read whole cells (value, format and validation), row-major
    fn read_cells(&self, sheet: &str, range: CellRange) -> Result<Vec<Vec<Cell>>, StoreError>;

    /// Replace whole cells in a row-major block whose top-left corner is `origin`
    fn write_cells(&mut self, sheet: &str, origin: CellCoord, cells: Vec<Vec<Cell>>) -> Result<(), StoreError>;

    /// Append a row after the last populated row, returning its index
    fn append_row(&mut self, sheet: &str, values: Vec<CellValue>) -> Result<u32, StoreError>;

    /// Remove a row, shifting everything below it up by one
    fn delete_row(&mut self, sheet: &str, row: u32) -> Result<(), StoreError>;

    /// Paint (or clear, with `None`) the background of every cell in `range`
    fn set_background(
        &mut self,
        sheet: &str,
        range: CellRange,
        color: Option<Color>,
    ) -> Result<(), StoreError>;

    /// Attach a validation rule to a single cell, replacing any previous rule
    fn set_validation(
        &mut self,
        sheet: &str,
        coord: CellCoord,
        rule: DataValidationRule,
    ) -> Result<(), StoreError>;

    /// Validation rule attached to a cell, if any
    fn validation(&self, sheet: &str, coord: CellCoord) -> Result<Option<DataValidationRule>, StoreError>;

    /// Read a single cell
    fn read_cell(&self, sheet: &str, coord: CellCoord) -> Result<CellValue, StoreError> {
        let mut rows = self.read_range(sheet, CellRange::new(coord, coord))?;
        Ok(rows
            .pop()
            .and_then(|mut row| row.pop())
            .unwrap_or_default())
    }

    /// Write a single cell
    fn write_cell(&mut self, sheet: &str, coord: CellCoord, value: CellValue) -> Result<(), StoreError> {
        self.write_range(sheet, coord, vec![vec![value]])
    }
}
