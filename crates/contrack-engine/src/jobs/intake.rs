use std::collections::HashSet;

use contrack_core::{CellCoord, CellRange, CellValue, StoreError};
use serde::Serialize;

use crate::error::TrackerError;
use crate::rows::read_rows;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntakeReport {
    /// Companies copied into the tracker, in form order
    pub added: Vec<String>,
    /// Responses skipped because the company is already tracked or archived
    pub already_present: usize,
}

impl Tracker<'_> {
    /// Copy new form responses into the tracker. A response is new when its
    /// company name is not already on the tracker or the archive (exact match
    /// after trimming). The sequence column is left for the sheet formula.
    pub fn intake(&mut self) -> Result<IntakeReport, TrackerError> {
        let sheets = &self.settings.sheets;
        self.require_sheets(&[&sheets.form_responses, &sheets.tracker, &sheets.archive])?;

        let mut known: HashSet<String> = self.tracker_rows()?.into_iter().map(|r| r.company).collect();
        known.extend(
            read_rows(&*self.store, &sheets.archive, &self.settings.tracker, self.settings.archive_header_rows)?
                .into_iter()
                .map(|r| r.company),
        );

        let mut report = IntakeReport::default();
        for response in self.form_responses()? {
            let company = response.company.trim().to_string();
            if company.is_empty() {
                continue;
            }
            if known.contains(&company) {
                report.already_present += 1;
                continue;
            }

            let schema = &self.settings.tracker;
            let fields = [
                (schema.company, CellValue::text(&company)),
                (schema.location, CellValue::text(response.location.trim())),
                (schema.email, CellValue::text(response.email.trim())),
            ];
            let width = fields.iter().map(|(col, _)| *col + 1).max().unwrap_or(0);
            let mut cells = vec![CellValue::Empty; width as usize];
            for (col, value) in fields {
                cells[col as usize] = value;
            }
            let row = self.store.append_row(&sheets.tracker, cells)?;

            tracing::info!(row = row + 1, %company, "form response added to tracker");
            known.insert(company.clone());
            report.added.push(company);
        }

        tracing::info!(added = report.added.len(), already_present = report.already_present, "intake finished");
        let message = if report.added.is_empty() {
            "No new form responses to add.".to_string()
        } else {
            format!(
                "Added {} new contract(s) to the tracker:\n{}",
                report.added.len(),
                super::capped_list(&report.added, self.settings.lapsed_report_limit)
            )
        };
        self.alert(&message);
        Ok(report)
    }

    fn form_responses(&self) -> Result<Vec<FormResponse>, StoreError> {
        let form = &self.settings.form;
        let sheet = &self.settings.sheets.form_responses;
        let rows = self.store.row_count(sheet)?;
        if rows <= form.header_rows {
            return Ok(Vec::new());
        }

        let last_col = form.company.max(form.location).max(form.email);
        let block = self.store.read_range(
            sheet,
            CellRange::new(CellCoord::new(form.header_rows, 0), CellCoord::new(rows - 1, last_col)),
        )?;
        Ok(block
            .into_iter()
            .map(|cells| {
                let text = |col: u32| cells.get(col as usize).map(CellValue::as_text).unwrap_or_default();
                FormResponse {
                    company: text(form.company),
                    location: text(form.location),
                    email: text(form.email),
                }
            })
            .collect())
    }
}

struct FormResponse {
    company: String,
    location: String,
    email: String,
}

#[cfg(test)]
mod tests {
    use crate::testing::{date, Fixture};
    use contrack_core::{CellCoord, CellValue, SheetStore};

    fn respond(fx: &mut Fixture, company: &str, email: &str) {
        let values = vec![
            CellValue::text("2026-03-01 09:00"),
            CellValue::text(company),
            CellValue::text("Porto"),
            CellValue::text(email),
        ];
        fx.workbook.append_row("Form Responses", values).unwrap();
    }

    #[test]
    fn test_intake_copies_new_companies_once() {
        let mut fx = Fixture::new(date(2026, 3, 2));
        respond(&mut fx, "Acme", "ops@acme.test");
        respond(&mut fx, "  ", "nobody@test");
        respond(&mut fx, "Globex", "it@globex.test");

        let report = fx.tracker().intake().unwrap();
        assert_eq!(report.added, vec!["Acme".to_string(), "Globex".to_string()]);
        assert_eq!(fx.cell(2, 1), CellValue::text("Acme"));
        assert_eq!(fx.cell(2, 2), CellValue::text("Porto"));
        assert_eq!(fx.cell(2, 3), CellValue::text("ops@acme.test"));
        assert_eq!(fx.cell(2, 0), CellValue::Empty);

        let after_first = fx.workbook.clone();
        let again = fx.tracker().intake().unwrap();
        assert!(again.added.is_empty());
        assert_eq!(again.already_present, 2);
        assert_eq!(fx.workbook, after_first);
    }

    #[test]
    fn test_intake_skips_archived_and_matches_exactly() {
        let mut fx = Fixture::new(date(2026, 3, 2));
        fx.workbook
            .write_cell("Archive", CellCoord::new(1, 1), CellValue::text("Initech"))
            .unwrap();
        respond(&mut fx, "Initech", "");
        respond(&mut fx, "initech", "");

        let report = fx.tracker().intake().unwrap();
        assert_eq!(report.added, vec!["initech".to_string()]);
        assert_eq!(report.already_present, 1);
    }

    #[test]
    fn test_intake_follows_configured_columns() {
        let mut fx = Fixture::new(date(2026, 3, 2));
        fx.settings.tracker.email = 12;
        respond(&mut fx, "Acme", "ops@acme.test");

        let report = fx.tracker().intake().unwrap();
        assert_eq!(report.added, vec!["Acme".to_string()]);
        assert_eq!(fx.cell(2, 12), CellValue::text("ops@acme.test"));
        assert_eq!(fx.cell(2, 3), CellValue::Empty);
    }

    #[test]
    fn test_intake_alerts_when_nothing_new() {
        let mut fx = Fixture::new(date(2026, 3, 2));
        fx.tracker().intake().unwrap();
        assert_eq!(fx.prompt.alerts, vec!["No new form responses to add.".to_string()]);
    }
}
