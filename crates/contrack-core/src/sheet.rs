use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellValue};
use crate::range::CellCoord;

/// A single sheet stored as dense rows of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name (displayed in tab)
    pub name: String,
    /// Row-major cell storage; rows may be ragged
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
    /// Number of frozen rows (header band)
    #[serde(default)]
    pub frozen_rows: u32,
}

impl Sheet {
    /// Create a new empty sheet with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            frozen_rows: 0,
        }
    }

    /// Get a reference to a cell at the given coordinate
    pub fn get_cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.rows
            .get(coord.row as usize)
            .and_then(|row| row.get(coord.col as usize))
    }

    /// Get a mutable reference to a cell, growing the grid if needed
    pub fn get_cell_mut(&mut self, coord: CellCoord) -> &mut Cell {
        let row = coord.row as usize;
        let col = coord.col as usize;

        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::default);
        }
        &mut cells[col]
    }

    /// Get the value of a cell (returns Empty for cells never written)
    pub fn get_value(&self, coord: CellCoord) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.get_cell(coord).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Set the value of a cell, keeping its format and validation
    pub fn set_value(&mut self, coord: CellCoord, value: CellValue) {
        if value == CellValue::Empty && self.get_cell(coord).is_none() {
            return;
        }
        self.get_cell_mut(coord).value = value;
    }

    /// Number of rows up to and including the last row holding a value
    pub fn row_count(&self) -> u32 {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| c.value != CellValue::Empty))
            .map_or(0, |i| i as u32 + 1)
    }

    /// Number of columns up to and including the rightmost column holding a value
    pub fn col_count(&self) -> u32 {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|c| c.value != CellValue::Empty))
            .max()
            .map_or(0, |i| i as u32 + 1)
    }

    /// Remove a row, shifting later rows up. Returns false if the row was never allocated.
    pub fn delete_row(&mut self, row: u32) -> bool {
        let row = row as usize;
        if row < self.rows.len() {
            self.rows.remove(row);
            true
        } else {
            false
        }
    }

    /// Write a row of values directly after the last populated row
    pub fn append_row(&mut self, values: Vec<CellValue>) -> u32 {
        let row = self.row_count();
        for (col, value) in values.into_iter().enumerate() {
            self.set_value(CellCoord::new(row, col as u32), value);
        }
        row
    }
}
