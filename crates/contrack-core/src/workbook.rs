use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellValue};
use crate::error::StoreError;
use crate::format::Color;
use crate::range::{CellCoord, CellRange};
use crate::settings::{TrackerField, TrackerSettings};
use crate::sheet::Sheet;
use crate::store::SheetStore;
use crate::validation::DataValidationRule;

/// A workbook containing named sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Workbook name
    pub name: String,
    /// List of sheets in the workbook
    pub sheets: Vec<Sheet>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Workbook {
    /// Create a new workbook with no sheets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    /// Create a workbook with the four tracker sheets and their header bands
    pub fn seeded(name: impl Into<String>, settings: &TrackerSettings) -> Self {
        let mut wb = Self::new(name);
        let names = &settings.sheets;

        let mut form = Sheet::new(names.form_responses.clone());
        let form_schema = &settings.form;
        for (col, title) in [
            (form_schema.timestamp, "Timestamp"),
            (form_schema.company, "Company Name"),
            (form_schema.location, "Location"),
            (form_schema.email, "Email"),
        ] {
            form.set_value(CellCoord::new(0, col), CellValue::text(title));
        }
        form.frozen_rows = form_schema.header_rows;
        wb.sheets.push(form);

        let schema = &settings.tracker;
        let mut tracker = Sheet::new(names.tracker.clone());
        let mut archive = Sheet::new(names.archive.clone());
        for field in TrackerField::ALL {
            let col = schema.column(field);
            tracker.set_value(CellCoord::new(schema.month_row, col), CellValue::text(field.title()));
            archive.set_value(CellCoord::new(0, col), CellValue::text(field.title()));
        }
        tracker.frozen_rows = schema.first_data_row();
        archive.frozen_rows = settings.archive_header_rows;
        wb.sheets.push(tracker);
        wb.sheets.push(archive);

        let mut log = Sheet::new(names.renewal_log.clone());
        log.append_row(
            ["Date", "Company", "Action", "Previous End", "New End"]
                .into_iter()
                .map(CellValue::text)
                .collect(),
        );
        log.frozen_rows = 1;
        wb.sheets.push(log);

        wb
    }

    /// Get a sheet by name
    pub fn get_sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get a mutable sheet by name
    pub fn get_sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Add a new sheet with the given name
    pub fn add_sheet(&mut self, name: impl Into<String>) -> Result<usize, StoreError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(StoreError::InvalidSheetName("Name cannot be empty".to_string()));
        }

        if self.sheets.iter().any(|s| s.name == name) {
            return Err(StoreError::SheetNameExists(name));
        }

        let index = self.sheets.len();
        self.sheets.push(Sheet::new(name));
        Ok(index)
    }

    /// Remove a sheet by name
    pub fn remove_sheet(&mut self, name: &str) -> Result<Sheet, StoreError> {
        let index = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))?;
        Ok(self.sheets.remove(index))
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn sheet(&self, name: &str) -> Result<&Sheet, StoreError> {
        self.get_sheet_by_name(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet, StoreError> {
        self.get_sheet_by_name_mut(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }
}

impl SheetStore for Workbook {
    fn has_sheet(&self, sheet: &str) -> bool {
        self.get_sheet_by_name(sheet).is_some()
    }

    fn row_count(&self, sheet: &str) -> Result<u32, StoreError> {
        Ok(self.sheet(sheet)?.row_count())
    }

    fn col_count(&self, sheet: &str) -> Result<u32, StoreError> {
        Ok(self.sheet(sheet)?.col_count())
    }

    fn read_range(&self, sheet: &str, range: CellRange) -> Result<Vec<Vec<CellValue>>, StoreError> {
        let sheet = self.sheet(sheet)?;
        let rows = range
            .rows()
            .map(|row| {
                range
                    .cols()
                    .map(|col| sheet.get_value(CellCoord::new(row, col)).clone())
                    .collect()
            })
            .collect();
        Ok(rows)
    }

    fn write_range(
        &mut self,
        sheet: &str,
        origin: CellCoord,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet)?;
        for (dr, row) in values.into_iter().enumerate() {
            for (dc, value) in row.into_iter().enumerate() {
                let coord = CellCoord::new(origin.row + dr as u32, origin.col + dc as u32);
                sheet.set_value(coord, value);
            }
        }
        Ok(())
    }

    fn read_cells(&self, sheet: &str, range: CellRange) -> Result<Vec<Vec<Cell>>, StoreError> {
        let sheet = self.sheet(sheet)?;
        Ok(range
            .rows()
            .map(|row| {
                range
                    .cols()
                    .map(|col| sheet.get_cell(CellCoord::new(row, col)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect())
    }

    fn write_cells(&mut self, sheet: &str, origin: CellCoord, cells: Vec<Vec<Cell>>) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet)?;
        for (dr, row) in cells.into_iter().enumerate() {
            for (dc, cell) in row.into_iter().enumerate() {
                let coord = CellCoord::new(origin.row + dr as u32, origin.col + dc as u32);
                // Blank cells never written stay unallocated
                if cell == Cell::default() && sheet.get_cell(coord).is_none() {
                    continue;
                }
                *sheet.get_cell_mut(coord) = cell;
            }
        }
        Ok(())
    }

    fn append_row(&mut self, sheet: &str, values: Vec<CellValue>) -> Result<u32, StoreError> {
        Ok(self.sheet_mut(sheet)?.append_row(values))
    }

    fn delete_row(&mut self, sheet: &str, row: u32) -> Result<(), StoreError> {
        let target = self.sheet_mut(sheet)?;
        if target.delete_row(row) {
            Ok(())
        } else {
            Err(StoreError::RowOutOfRange {
                sheet: sheet.to_string(),
                row,
            })
        }
    }

    fn set_background(
        &mut self,
        sheet: &str,
        range: CellRange,
        color: Option<Color>,
    ) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet)?;
        for row in range.rows() {
            for col in range.cols() {
                let coord = CellCoord::new(row, col);
                if color.is_none() && sheet.get_cell(coord).is_none() {
                    continue;
                }
                sheet.get_cell_mut(coord).format.background_color = color;
            }
        }
        Ok(())
    }

    fn set_validation(
        &mut self,
        sheet: &str,
        coord: CellCoord,
        rule: DataValidationRule,
    ) -> Result<(), StoreError> {
        self.sheet_mut(sheet)?.get_cell_mut(coord).validation = Some(rule);
        Ok(())
    }

    fn validation(&self, sheet: &str, coord: CellCoord) -> Result<Option<DataValidationRule>, StoreError> {
        Ok(self.sheet(sheet)?.get_cell(coord).and_then(|c| c.validation.clone()))
    }
}
