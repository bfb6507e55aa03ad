use contrack_core::{CellCoord, CellRange, CellValue, SheetStore, StoreError};

/// Type alias for boxed commands
pub type CommandBox = Box<dyn Command>;

/// Trait for reversible sheet mutations
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Execute the command, returning affected cell coordinates
    fn execute(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError>;

    /// Undo the command, returning affected cell coordinates
    fn undo(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError>;

    /// Get a description of this command (for logs and alerts)
    fn description(&self) -> &str;
}

/// Set a single cell's value
#[derive(Debug)]
pub struct SetCellCommand {
    sheet: String,
    coord: CellCoord,
    new_value: CellValue,
    old_value: Option<CellValue>,
}

impl SetCellCommand {
    pub fn new(sheet: impl Into<String>, coord: CellCoord, new_value: CellValue) -> Self {
        Self {
            sheet: sheet.into(),
            coord,
            new_value,
            old_value: None,
        }
    }

    /// A write the host has already made, with the value it replaced.
    /// Undoing it restores `old_value`, or clears the cell when there was none.
    pub fn applied(
        sheet: impl Into<String>,
        coord: CellCoord,
        new_value: CellValue,
        old_value: Option<CellValue>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            coord,
            new_value,
            old_value: Some(old_value.unwrap_or_default()),
        }
    }
}

impl Command for SetCellCommand {
    fn execute(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        // Capture old state for undo
        self.old_value = Some(store.read_cell(&self.sheet, self.coord)?);
        store.write_cell(&self.sheet, self.coord, self.new_value.clone())?;
        Ok(vec![self.coord])
    }

    fn undo(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        let value = self.old_value.clone().unwrap_or_default();
        store.write_cell(&self.sheet, self.coord, value)?;
        Ok(vec![self.coord])
    }

    fn description(&self) -> &str {
        "Set cell value"
    }
}

/// Clear the values of a range of cells (formats and validation stay)
#[derive(Debug)]
pub struct ClearRangeCommand {
    sheet: String,
    range: CellRange,
    old_values: Vec<Vec<CellValue>>,
}

impl ClearRangeCommand {
    pub fn new(sheet: impl Into<String>, range: CellRange) -> Self {
        Self {
            sheet: sheet.into(),
            range,
            old_values: Vec::new(),
        }
    }
}

impl Command for ClearRangeCommand {
    fn execute(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        self.old_values = store.read_range(&self.sheet, self.range)?;

        let blank = vec![vec![CellValue::Empty; self.range.cols().count()]; self.range.rows().count()];
        store.write_range(&self.sheet, self.range.start, blank)?;

        Ok(coords_of(self.range))
    }

    fn undo(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        store.write_range(&self.sheet, self.range.start, self.old_values.clone())?;
        Ok(coords_of(self.range))
    }

    fn description(&self) -> &str {
        "Clear range"
    }
}

fn coords_of(range: CellRange) -> Vec<CellCoord> {
    range
        .rows()
        .flat_map(|row| range.cols().map(move |col| CellCoord::new(row, col)))
        .collect()
}

/// Composite command for batch operations
#[derive(Debug)]
pub struct CompositeCommand {
    commands: Vec<CommandBox>,
    description: String,
}

impl CompositeCommand {
    pub fn new(commands: Vec<CommandBox>, description: impl Into<String>) -> Self {
        Self {
            commands,
            description: description.into(),
        }
    }
}

impl Command for CompositeCommand {
    fn execute(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        let mut affected = Vec::new();
        for cmd in &mut self.commands {
            affected.extend(cmd.execute(store)?);
        }
        Ok(affected)
    }

    fn undo(&mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        let mut affected = Vec::new();
        // Undo in reverse order
        for cmd in self.commands.iter_mut().rev() {
            affected.extend(cmd.undo(store)?);
        }
        Ok(affected)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
