//! Fixtures shared by the engine's unit tests

use std::sync::Mutex;

use chrono::NaiveDate;
use contrack_core::{CellCoord, CellValue, SheetStore, TrackerSettings, Workbook};

use crate::dispatch::{EditEvent, EditOutcome};
use crate::grid::MonthGrid;
use crate::mail::{MailError, Mailer, OutgoingEmail};
use crate::prompt::ScriptedPrompt;
use crate::tracker::Tracker;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Mailer that keeps every accepted message and refuses listed recipients
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    refuse: Vec<String>,
}

impl RecordingMailer {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::default(),
            refuse: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if self.refuse.contains(&email.to) {
            return Err(MailError::Delivery(format!("refused {}", email.to)));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// A seeded workbook plus the collaborators a [`Tracker`] needs
pub struct Fixture {
    pub workbook: Workbook,
    pub settings: TrackerSettings,
    pub mailer: RecordingMailer,
    pub prompt: ScriptedPrompt,
    pub today: NaiveDate,
}

impl Fixture {
    pub fn new(today: NaiveDate) -> Self {
        let settings = TrackerSettings::default();
        Self {
            workbook: Workbook::seeded("Fixture", &settings),
            settings,
            mailer: RecordingMailer::default(),
            prompt: ScriptedPrompt::answering(true),
            today,
        }
    }

    pub fn tracker(&mut self) -> Tracker<'_> {
        Tracker::new(&mut self.workbook, &self.mailer, &mut self.prompt, &self.settings, self.today)
    }

    fn tracker_sheet(&self) -> String {
        self.settings.sheets.tracker.clone()
    }

    /// Append a tracker row with only a company name; returns its row index
    pub fn add_company(&mut self, company: &str) -> u32 {
        let schema = &self.settings.tracker;
        let mut cells = vec![CellValue::Empty; schema.first_month_col as usize];
        cells[schema.company as usize] = CellValue::text(company);
        let sheet = self.tracker_sheet();
        self.workbook.append_row(&sheet, cells).unwrap()
    }

    /// Append a tracker row with contact, dates and renewal status
    pub fn add_contract(&mut self, company: &str, email: &str, start: NaiveDate, end: NaiveDate, status: &str) -> u32 {
        let row = self.add_company(company);
        let schema = self.settings.tracker.clone();
        self.set(row, schema.email, CellValue::text(email));
        self.set(row, schema.contract_start, CellValue::Date(start));
        self.set(row, schema.contract_end, CellValue::Date(end));
        self.set(row, schema.renewal_status, CellValue::text(status));
        row
    }

    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        let sheet = self.tracker_sheet();
        self.workbook.write_cell(&sheet, CellCoord::new(row, col), value).unwrap();
    }

    pub fn cell(&self, row: u32, col: u32) -> CellValue {
        self.workbook
            .read_cell(&self.settings.sheets.tracker, CellCoord::new(row, col))
            .unwrap()
    }

    /// Non-empty monthly cells of a row as (label, text) pairs
    pub fn month_values(&self, row: u32) -> Vec<(String, String)> {
        MonthGrid::new(&self.settings)
            .columns(&self.workbook)
            .unwrap()
            .into_iter()
            .map(|(col, label)| (label.to_string(), self.cell(row, col).as_text()))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }

    /// An edit event for the tracker sheet without touching the workbook
    pub fn edit(&self, row: u32, col: u32, new_value: CellValue, old_value: Option<CellValue>) -> EditEvent {
        EditEvent {
            sheet: self.tracker_sheet(),
            row,
            col,
            new_value,
            old_value,
        }
    }

    /// Write a value the way a user typing into the cell would, returning the event
    pub fn type_value(&mut self, row: u32, col: u32, value: CellValue) -> EditEvent {
        let old = Some(self.cell(row, col)).filter(|v| !v.is_empty());
        self.type_value_with_old(row, col, value, old)
    }

    pub fn type_value_with_old(
        &mut self,
        row: u32,
        col: u32,
        value: CellValue,
        old: Option<CellValue>,
    ) -> EditEvent {
        self.set(row, col, value.clone());
        self.edit(row, col, value, old)
    }

    pub fn dispatch(&mut self, event: &EditEvent) -> EditOutcome {
        self.tracker().handle_edit(event).unwrap()
    }

    /// Type a value and dispatch the resulting edit
    pub fn enter(&mut self, row: u32, col: u32, value: CellValue) -> EditOutcome {
        let event = self.type_value(row, col, value);
        self.dispatch(&event)
    }
}
