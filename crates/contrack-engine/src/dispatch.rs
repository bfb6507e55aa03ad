use chrono::NaiveDate;
use contrack_core::{AlertStyle, CellCoord, CellValue, TrackerField, ValidationResult};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::tracker::Tracker;

/// A single-cell edit as delivered by the host, after the new value is in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    pub sheet: String,
    pub row: u32,
    pub col: u32,
    pub new_value: CellValue,
    #[serde(default)]
    pub old_value: Option<CellValue>,
}

impl EditEvent {
    /// Value the cell held before the edit, `None` if it was blank.
    ///
    /// Date columns report their previous value as a day-count serial; it is
    /// turned back into a date so restoring it keeps the cell a date.
    pub fn previous_value(&self, field: TrackerField) -> Option<CellValue> {
        let old = self.old_value.as_ref().filter(|v| !v.is_empty())?;
        match field {
            TrackerField::ContractStart | TrackerField::ContractEnd => {
                Some(old.as_date().map(CellValue::Date).unwrap_or_else(|| old.clone()))
            }
            _ => Some(old.clone()),
        }
    }
}

/// What an edit led to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EditOutcome {
    /// Not a tracker data cell, or a column nothing reacts to
    Ignored,
    /// Pilot number accepted; the row already had contract dates
    PilotRecorded,
    /// Pilot number accepted and the contract started
    Activated { start: NaiveDate, end: NaiveDate },
    /// The edit was undone
    Rejected { reason: String },
    StartChanged { start: NaiveDate, end: NaiveDate },
    StartChangeDeclined,
    EndChanged { end: NaiveDate, filled: usize },
}

/// Columns that react to edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditRoute {
    PilotNumber,
    ContractStart,
    ContractEnd,
}

impl EditRoute {
    fn for_field(field: TrackerField) -> Option<Self> {
        match field {
            TrackerField::PilotNumber => Some(EditRoute::PilotNumber),
            TrackerField::ContractStart => Some(EditRoute::ContractStart),
            TrackerField::ContractEnd => Some(EditRoute::ContractEnd),
            _ => None,
        }
    }
}

impl Tracker<'_> {
    /// Put a typed value into a cell the way the host does before the edit
    /// event fires, returning that event. A value refused by the cell's
    /// validation rule is not written.
    pub fn write_edit(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        new_value: CellValue,
    ) -> Result<EditEvent, TrackerError> {
        let coord = CellCoord::new(row, col);
        if let Some(rule) = self.store.validation(sheet, coord)? {
            if let ValidationResult::Invalid(alert) = rule.validate(&new_value) {
                if alert.style == AlertStyle::Stop {
                    return Err(TrackerError::InvalidEntry {
                        cell: coord.to_a1(),
                        message: alert.message.unwrap_or_else(|| "value not allowed".to_string()),
                    });
                }
                tracing::warn!(%sheet, cell = %coord, "entry does not match the cell's validation rule");
            }
        }

        let old = self.store.read_cell(sheet, coord)?;
        self.store.write_cell(sheet, coord, new_value.clone())?;
        Ok(EditEvent {
            sheet: sheet.to_string(),
            row,
            col,
            new_value,
            old_value: Some(old).filter(|v| !v.is_empty()),
        })
    }

    /// Entry point for every cell edit
    pub fn handle_edit(&mut self, event: &EditEvent) -> Result<EditOutcome, TrackerError> {
        let schema = &self.settings.tracker;
        if event.sheet != self.settings.sheets.tracker || schema.is_header_row(event.row) {
            return Ok(EditOutcome::Ignored);
        }

        let Some(route) = schema.field_at(event.col).and_then(EditRoute::for_field) else {
            return Ok(EditOutcome::Ignored);
        };

        tracing::debug!(row = event.row + 1, col = event.col, ?route, "dispatching edit");
        match route {
            EditRoute::PilotNumber => self.on_pilot_number(event),
            EditRoute::ContractStart => self.on_contract_start(event),
            EditRoute::ContractEnd => self.on_contract_end(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, Fixture};
    use contrack_core::MonthLabel;

    const PILOT: u32 = 4;
    const START: u32 = 6;
    const END: u32 = 7;

    #[test]
    fn test_edits_outside_tracker_data_are_ignored() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        fx.add_company("Acme");
        let before = fx.workbook.clone();

        let header = fx.edit(1, PILOT, CellValue::text("P-1"), None);
        assert_eq!(fx.dispatch(&header), EditOutcome::Ignored);

        let mut other_sheet = fx.edit(2, PILOT, CellValue::text("P-1"), None);
        other_sheet.sheet = "Archive".to_string();
        assert_eq!(fx.dispatch(&other_sheet), EditOutcome::Ignored);

        let location = fx.edit(2, 2, CellValue::text("Lisbon"), None);
        assert_eq!(fx.dispatch(&location), EditOutcome::Ignored);
        assert_eq!(fx.workbook, before);
    }

    #[test]
    fn test_pilot_number_activates_twelve_paid_months() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");

        let event = fx.type_value(row, PILOT, CellValue::text("P-100"));
        let outcome = fx.dispatch(&event);

        let start = date(2026, 3, 1);
        let end = date(2027, 2, 28);
        assert_eq!(outcome, EditOutcome::Activated { start, end });
        assert_eq!(fx.cell(row, START), CellValue::Date(start));
        assert_eq!(fx.cell(row, END), CellValue::Date(end));

        let months = fx.month_values(row);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], ("Mar-2026".to_string(), "paid".to_string()));
        assert_eq!(months[11], ("Feb-2027".to_string(), "paid".to_string()));
        assert!(months.iter().all(|(_, v)| v == "paid"));
    }

    #[test]
    fn test_pilot_number_on_row_with_dates_only_records() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.set(row, START, CellValue::Date(date(2025, 1, 1)));

        let event = fx.type_value(row, PILOT, CellValue::text("P-100"));
        assert_eq!(fx.dispatch(&event), EditOutcome::PilotRecorded);
        assert!(fx.month_values(row).is_empty());
    }

    #[test]
    fn test_duplicate_pilot_number_is_rejected() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let first = fx.add_company("Acme");
        let second = fx.add_company("Globex");
        let event = fx.type_value(first, PILOT, CellValue::text("P-100"));
        fx.dispatch(&event);

        let event = fx.type_value(second, PILOT, CellValue::text(" P-100 "));
        let outcome = fx.dispatch(&event);

        assert!(matches!(outcome, EditOutcome::Rejected { .. }));
        assert_eq!(fx.cell(second, PILOT), CellValue::Empty);
        assert_eq!(fx.cell(second, START), CellValue::Empty);
        assert_eq!(fx.cell(second, END), CellValue::Empty);
        assert!(fx.month_values(second).is_empty());
        assert_eq!(fx.prompt.alerts.len(), 1);
    }

    #[test]
    fn test_declined_start_change_restores_serial_as_date() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.enter(row, PILOT, CellValue::text("P-100"));
        let before = fx.workbook.clone();

        // Previous value arrives as a serial for 2026-03-01
        let event = fx.type_value_with_old(row, START, CellValue::Date(date(2026, 9, 10)), Some(CellValue::Number(46082.0)));
        fx.prompt = crate::prompt::ScriptedPrompt::answering(false);
        let outcome = fx.dispatch(&event);

        assert_eq!(outcome, EditOutcome::StartChangeDeclined);
        assert_eq!(fx.cell(row, START), CellValue::Date(date(2026, 3, 1)));
        assert_eq!(fx.workbook, before);
        assert_eq!(fx.prompt.questions.len(), 1);
    }

    #[test]
    fn test_declined_start_change_without_previous_clears() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.prompt = crate::prompt::ScriptedPrompt::answering(false);

        let event = fx.type_value(row, START, CellValue::Date(date(2026, 9, 10)));
        assert_eq!(fx.dispatch(&event), EditOutcome::StartChangeDeclined);
        assert_eq!(fx.cell(row, START), CellValue::Empty);
        assert!(crate::grid::MonthGrid::new(&fx.settings).columns(&fx.workbook).unwrap().is_empty());
    }

    #[test]
    fn test_confirmed_start_change_repopulates() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.enter(row, PILOT, CellValue::text("P-100"));

        let event = fx.type_value(row, START, CellValue::Date(date(2026, 9, 10)));
        let outcome = fx.dispatch(&event);

        let start = date(2026, 9, 1);
        let end = date(2027, 8, 31);
        assert_eq!(outcome, EditOutcome::StartChanged { start, end });
        assert_eq!(fx.cell(row, START), CellValue::Date(start));
        assert_eq!(fx.cell(row, END), CellValue::Date(end));

        let months = fx.month_values(row);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].0, "Sep-2026");
        assert_eq!(months[11].0, "Aug-2027");
    }

    #[test]
    fn test_unparseable_start_is_reverted() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.set(row, START, CellValue::Date(date(2026, 1, 1)));

        let event = fx.type_value(row, START, CellValue::text("next spring"));
        let outcome = fx.dispatch(&event);

        assert!(matches!(outcome, EditOutcome::Rejected { .. }));
        assert_eq!(fx.cell(row, START), CellValue::Date(date(2026, 1, 1)));
        assert!(fx.prompt.questions.is_empty());
    }

    #[test]
    fn test_end_extension_marks_first_new_month_renew() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.enter(row, PILOT, CellValue::text("P-100"));

        let event = fx.type_value(row, END, CellValue::Date(date(2027, 5, 3)));
        let outcome = fx.dispatch(&event);

        assert_eq!(outcome, EditOutcome::EndChanged { end: date(2027, 5, 31), filled: 3 });
        assert_eq!(fx.cell(row, END), CellValue::Date(date(2027, 5, 31)));
        let months = fx.month_values(row);
        assert_eq!(months.len(), 15);
        assert_eq!(months[11], ("Feb-2027".to_string(), "paid".to_string()));
        assert_eq!(months[12], ("Mar-2027".to_string(), "renew".to_string()));
        assert_eq!(months[13], ("Apr-2027".to_string(), "paid".to_string()));
        assert_eq!(months[14], ("May-2027".to_string(), "paid".to_string()));
    }

    #[test]
    fn test_end_shrink_changes_no_months() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.enter(row, PILOT, CellValue::text("P-100"));
        let months_before = fx.month_values(row);

        let event = fx.type_value(row, END, CellValue::Date(date(2026, 8, 10)));
        let outcome = fx.dispatch(&event);

        assert_eq!(outcome, EditOutcome::EndChanged { end: date(2026, 8, 31), filled: 0 });
        assert_eq!(fx.month_values(row), months_before);
    }

    #[test]
    fn test_end_on_blank_row_fills_all_paid_from_start() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.set(row, START, CellValue::Date(date(2026, 2, 1)));

        let event = fx.type_value(row, END, CellValue::Date(date(2026, 5, 15)));
        let outcome = fx.dispatch(&event);

        assert_eq!(outcome, EditOutcome::EndChanged { end: date(2026, 5, 31), filled: 4 });
        let months = fx.month_values(row);
        let labels: Vec<&str> = months.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Feb-2026", "Mar-2026", "Apr-2026", "May-2026"]);
        assert!(months.iter().all(|(_, v)| v == "paid"));
    }

    #[test]
    fn test_end_fill_never_overwrites() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.set(row, START, CellValue::Date(date(2026, 1, 1)));
        let grid = crate::grid::MonthGrid::new(&fx.settings);
        grid.ensure_span(&mut fx.workbook, date(2026, 1, 1), date(2026, 4, 30)).unwrap();
        let feb = MonthLabel::new(2026, 2).unwrap();
        let col = grid.find_column(&fx.workbook, feb).unwrap().unwrap();
        fx.set(row, col, CellValue::text("not proceed"));

        // Feb holds data, so this is an extension from Mar
        let event = fx.type_value(row, END, CellValue::Date(date(2026, 4, 1)));
        fx.dispatch(&event);

        let months = fx.month_values(row);
        assert_eq!(
            months,
            vec![
                ("Feb-2026".to_string(), "not proceed".to_string()),
                ("Mar-2026".to_string(), "renew".to_string()),
                ("Apr-2026".to_string(), "paid".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_edit_captures_previous_value() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.set(row, START, CellValue::Date(date(2026, 1, 1)));

        let event = fx.tracker().write_edit("Tracker", row, START, CellValue::Date(date(2026, 2, 1))).unwrap();
        assert_eq!(event.old_value, Some(CellValue::Date(date(2026, 1, 1))));
        assert_eq!(fx.cell(row, START), CellValue::Date(date(2026, 2, 1)));

        let event = fx.tracker().write_edit("Tracker", row, PILOT, CellValue::text("P-1")).unwrap();
        assert_eq!(event.old_value, None);
        assert!(fx.tracker().write_edit("Nope", row, PILOT, CellValue::Empty).is_err());
    }

    #[test]
    fn test_write_edit_enforces_month_dropdown() {
        let mut fx = Fixture::new(date(2026, 3, 17));
        let row = fx.add_company("Acme");
        fx.enter(row, PILOT, CellValue::text("P-100"));

        let err = fx.tracker().write_edit("Tracker", row, 8, CellValue::text("late")).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidEntry { ref cell, .. } if *cell == CellCoord::new(row, 8).to_a1()));
        assert_eq!(fx.cell(row, 8), CellValue::text("paid"));

        fx.tracker().write_edit("Tracker", row, 8, CellValue::text("terminate")).unwrap();
        assert_eq!(fx.cell(row, 8), CellValue::text("terminate"));
    }

    #[test]
    fn test_previous_value_decoding_is_per_column() {
        let event = EditEvent {
            sheet: "Tracker".into(),
            row: 2,
            col: PILOT,
            new_value: CellValue::text("x"),
            old_value: Some(CellValue::Number(1001.0)),
        };
        assert_eq!(event.previous_value(TrackerField::PilotNumber), Some(CellValue::Number(1001.0)));
        assert_eq!(
            event.previous_value(TrackerField::ContractStart),
            NaiveDate::from_ymd_opt(1902, 9, 27).map(CellValue::Date)
        );

        let blank = EditEvent { old_value: Some(CellValue::text("")), ..event };
        assert_eq!(blank.previous_value(TrackerField::ContractStart), None);
    }
}
