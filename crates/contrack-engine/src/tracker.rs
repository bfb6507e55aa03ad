use chrono::NaiveDate;
use contrack_core::{CellCoord, CellValue, SheetStore, StoreError, TrackerField, TrackerSettings};

use crate::error::TrackerError;
use crate::grid::MonthGrid;
use crate::mail::{deliver, Mailer, OutgoingEmail};
use crate::prompt::Prompt;
use crate::rows::{read_rows, TrackerRow};

/// One invocation's view of the collaborators: storage, mail, prompt,
/// settings and the date it runs on.
pub struct Tracker<'a> {
    pub(crate) store: &'a mut dyn SheetStore,
    pub(crate) mailer: &'a dyn Mailer,
    pub(crate) prompt: &'a mut dyn Prompt,
    pub(crate) settings: &'a TrackerSettings,
    pub(crate) today: NaiveDate,
}

impl<'a> Tracker<'a> {
    pub fn new(
        store: &'a mut dyn SheetStore,
        mailer: &'a dyn Mailer,
        prompt: &'a mut dyn Prompt,
        settings: &'a TrackerSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            store,
            mailer,
            prompt,
            settings,
            today,
        }
    }

    pub(crate) fn grid(&self) -> MonthGrid<'a> {
        MonthGrid::new(self.settings)
    }

    pub(crate) fn tracker_sheet(&self) -> &'a str {
        &self.settings.sheets.tracker
    }

    /// Fail with [`TrackerError::MissingSheet`] unless every sheet exists
    pub(crate) fn require_sheets(&self, names: &[&str]) -> Result<(), TrackerError> {
        match names.iter().find(|name| !self.store.has_sheet(name)) {
            Some(missing) => {
                tracing::error!(sheet = %missing, "required sheet is missing");
                Err(TrackerError::MissingSheet(missing.to_string()))
            }
            None => Ok(()),
        }
    }

    pub(crate) fn field_coord(&self, row: u32, field: TrackerField) -> CellCoord {
        CellCoord::new(row, self.settings.tracker.column(field))
    }

    pub(crate) fn read_field(&self, row: u32, field: TrackerField) -> Result<CellValue, StoreError> {
        self.store.read_cell(self.tracker_sheet(), self.field_coord(row, field))
    }

    pub(crate) fn write_field(
        &mut self,
        row: u32,
        field: TrackerField,
        value: impl Into<CellValue>,
    ) -> Result<(), StoreError> {
        let coord = self.field_coord(row, field);
        self.store.write_cell(self.tracker_sheet(), coord, value.into())
    }

    /// Data rows of the tracker sheet
    pub(crate) fn tracker_rows(&self) -> Result<Vec<TrackerRow>, StoreError> {
        let schema = &self.settings.tracker;
        read_rows(&*self.store, self.tracker_sheet(), schema, schema.first_data_row())
    }

    pub(crate) fn send(&self, email: &OutgoingEmail) -> bool {
        deliver(self.mailer, email)
    }

    pub(crate) fn alert(&mut self, message: &str) {
        self.prompt.alert(message);
    }
}
