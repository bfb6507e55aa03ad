use chrono::NaiveDate;
use contrack_core::month::{first_of_month, last_of_month, term_end_from_start};
use contrack_core::{MonthLabel, MonthStatus, TrackerField};
use contrack_history::{ClearRangeCommand, CommandBox, CompositeCommand, Command, Proposal, SetCellCommand};

use crate::dispatch::{EditEvent, EditOutcome};
use crate::error::TrackerError;
use crate::grid::term_cells;
use crate::tracker::Tracker;

impl Tracker<'_> {
    /// A pilot number was typed into a row. Duplicates are reverted; a row
    /// without a contract start is activated for twelve months from the
    /// current month.
    pub(crate) fn on_pilot_number(&mut self, event: &EditEvent) -> Result<EditOutcome, TrackerError> {
        let pilot = event.new_value.as_text().trim().to_string();
        if pilot.is_empty() {
            return Ok(EditOutcome::Ignored);
        }

        if let Some(other) = self.find_pilot_number(&pilot, event.row)? {
            tracing::warn!(row = event.row + 1, other_row = other + 1, %pilot, "duplicate pilot number rejected");
            self.revert(event, TrackerField::PilotNumber)?;
            let reason = format!(
                "Pilot number {} is already assigned on row {}. The entry has been removed.",
                pilot,
                other + 1
            );
            self.alert(&reason);
            return Ok(EditOutcome::Rejected { reason });
        }

        if !self.read_field(event.row, TrackerField::ContractStart)?.is_empty() {
            return Ok(EditOutcome::PilotRecorded);
        }

        let start = first_of_month(self.today);
        let end = term_end_from_start(start);
        self.write_field(event.row, TrackerField::ContractStart, start)?;
        self.write_field(event.row, TrackerField::ContractEnd, end)?;

        let grid = self.grid();
        grid.ensure_span(self.store, start, end)?;
        grid.fill(self.store, event.row, &term_cells(MonthLabel::of(start), MonthStatus::Paid), false)?;

        tracing::info!(row = event.row + 1, %pilot, %start, %end, "pilot number activated");
        Ok(EditOutcome::Activated { start, end })
    }

    /// Row (other than `skip_row`) already carrying `pilot`, compared trimmed
    fn find_pilot_number(&self, pilot: &str, skip_row: u32) -> Result<Option<u32>, TrackerError> {
        Ok(self
            .tracker_rows()?
            .into_iter()
            .find(|r| r.row != skip_row && !r.pilot_number.is_empty() && r.pilot_number == pilot)
            .map(|r| r.row))
    }

    /// The contract start was edited. Clearing the row's months needs a yes
    /// from the user; a no puts the previous value back and changes nothing else.
    pub(crate) fn on_contract_start(&mut self, event: &EditEvent) -> Result<EditOutcome, TrackerError> {
        if event.new_value.is_empty() {
            return Ok(EditOutcome::Ignored);
        }
        let Some(entered) = event.new_value.as_date() else {
            return self.reject_date(event, TrackerField::ContractStart);
        };

        let start = first_of_month(entered);
        let end = term_end_from_start(start);
        let proposal = self.propose_start_change(event, start, end)?;

        if !self.prompt.confirm(proposal.message()) {
            proposal.reject(self.store)?;
            tracing::info!(row = event.row + 1, "contract start change declined");
            return Ok(EditOutcome::StartChangeDeclined);
        }

        proposal.confirm(self.store)?;
        let grid = self.grid();
        grid.ensure_span(self.store, start, end)?;
        grid.fill(self.store, event.row, &term_cells(MonthLabel::of(start), MonthStatus::Paid), false)?;

        tracing::info!(row = event.row + 1, %start, %end, "contract start changed");
        Ok(EditOutcome::StartChanged { start, end })
    }

    fn propose_start_change(
        &self,
        event: &EditEvent,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Proposal, TrackerError> {
        let sheet = self.tracker_sheet();
        let mut change: Vec<CommandBox> = vec![
            Box::new(SetCellCommand::new(sheet, self.field_coord(event.row, TrackerField::ContractStart), start.into())),
            Box::new(SetCellCommand::new(sheet, self.field_coord(event.row, TrackerField::ContractEnd), end.into())),
        ];
        if let Some(months) = self.grid().row_range(&*self.store, event.row)? {
            change.push(Box::new(ClearRangeCommand::new(sheet, months)));
        }

        let company = self.read_field(event.row, TrackerField::Company)?.as_text();
        let message = format!(
            "Changing the contract start for {} to {} will clear every monthly status on row {} \
             and restart twelve paid months. Continue?",
            if company.trim().is_empty() { "this contract" } else { company.trim() },
            start.format("%Y-%m-%d"),
            event.row + 1,
        );

        Ok(Proposal::new(
            self.edit_command(event, TrackerField::ContractStart),
            CompositeCommand::new(change, "Change contract start"),
            message,
        ))
    }

    /// The contract end was edited. Months after the last filled one (or
    /// from the contract start on a blank row) are filled through the new
    /// end; non-empty cells are never touched.
    pub(crate) fn on_contract_end(&mut self, event: &EditEvent) -> Result<EditOutcome, TrackerError> {
        if event.new_value.is_empty() {
            return Ok(EditOutcome::Ignored);
        }
        let Some(entered) = event.new_value.as_date() else {
            return self.reject_date(event, TrackerField::ContractEnd);
        };

        let end = last_of_month(entered);
        self.write_field(event.row, TrackerField::ContractEnd, end)?;
        let end_month = MonthLabel::of(end);

        let grid = self.grid();
        let (fill_start, extending) = match grid.last_filled(&*self.store, event.row)? {
            Some(last) => (last.next(), true),
            None => match self.read_field(event.row, TrackerField::ContractStart)?.as_date() {
                Some(start) => (MonthLabel::of(start), false),
                None => {
                    tracing::warn!(row = event.row + 1, "contract end set on a row without monthly data or start date");
                    return Ok(EditOutcome::EndChanged { end, filled: 0 });
                }
            },
        };

        if fill_start > end_month {
            return Ok(EditOutcome::EndChanged { end, filled: 0 });
        }

        grid.ensure_span(self.store, fill_start.first_day(), end)?;

        // Only the first month actually written on an extension is marked renew
        let mut filled = 0;
        let mut mark_renew = extending;
        for month in fill_start.through(end_month) {
            let status = if mark_renew { MonthStatus::Renew } else { MonthStatus::Paid };
            if !grid.fill(self.store, event.row, &[(month, status)], true)?.is_empty() {
                filled += 1;
                mark_renew = false;
            }
        }

        tracing::info!(row = event.row + 1, %end, filled, extending, "contract end changed");
        Ok(EditOutcome::EndChanged { end, filled })
    }

    /// The host's write as a reversible command carrying the event's previous value
    fn edit_command(&self, event: &EditEvent, field: TrackerField) -> SetCellCommand {
        SetCellCommand::applied(
            self.tracker_sheet(),
            self.field_coord(event.row, field),
            event.new_value.clone(),
            event.previous_value(field),
        )
    }

    fn revert(&mut self, event: &EditEvent, field: TrackerField) -> Result<(), TrackerError> {
        self.edit_command(event, field).undo(self.store)?;
        Ok(())
    }

    fn reject_date(&mut self, event: &EditEvent, field: TrackerField) -> Result<EditOutcome, TrackerError> {
        let entered = event.new_value.as_text();
        tracing::warn!(row = event.row + 1, value = %entered, field = field.title(), "unparseable date rejected");
        self.revert(event, field)?;
        let reason = format!("\"{}\" is not a valid {} date.", entered, field.title().to_lowercase());
        self.alert(&reason);
        Ok(EditOutcome::Rejected { reason })
    }
}
