use serde::Serialize;

use crate::error::TrackerError;
use crate::mail::renewal_reminder;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    /// Companies reminded, with the days left on their contract
    pub sent: Vec<(String, i64)>,
    pub failed: usize,
}

impl Tracker<'_> {
    /// Email every undecided contract that ends exactly one of the configured
    /// number of days from today
    pub fn send_reminders(&mut self) -> Result<ReminderReport, TrackerError> {
        let sheet = self.tracker_sheet();
        self.require_sheets(&[sheet])?;

        let mut report = ReminderReport::default();
        for row in self.tracker_rows()? {
            if row.renewal_status.is_some() || row.email.is_empty() {
                continue;
            }
            let Some(end) = row.contract_end else { continue };
            let days_left = (end - self.today).num_days();
            if !self.settings.reminder_days.contains(&days_left) {
                continue;
            }

            let email = renewal_reminder(&row.email, &row.company, end, days_left, &self.settings.sender_name);
            if self.send(&email) {
                tracing::info!(row = row.row + 1, company = %row.company, days_left, "renewal reminder sent");
                report.sent.push((row.company, days_left));
            } else {
                report.failed += 1;
            }
        }

        tracing::info!(sent = report.sent.len(), failed = report.failed, "reminders finished");
        let mut message = format!("Renewal reminders sent: {}", report.sent.len());
        if report.failed > 0 {
            message.push_str(&format!("\nReminders that could not be sent: {}", report.failed));
        }
        self.alert(&message);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{date, Fixture, RecordingMailer};

    #[test]
    fn test_reminders_fire_on_threshold_days_only() {
        let mut fx = Fixture::new(date(2026, 5, 1));
        fx.add_contract("Thirty", "thirty@test", date(2025, 6, 1), date(2026, 5, 31), "");
        fx.add_contract("TwentyNine", "tn@test", date(2025, 5, 31), date(2026, 5, 30), "");
        fx.add_contract("Decided", "d@test", date(2025, 6, 1), date(2026, 5, 31), "Renew");
        fx.add_contract("NoEmail", "", date(2025, 6, 1), date(2026, 5, 31), "");

        let report = fx.tracker().send_reminders().unwrap();

        assert_eq!(report.sent, vec![("Thirty".to_string(), 30)]);
        let sent = fx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "thirty@test");
        assert_eq!(sent[0].subject, "Your contract ends in 30 days");
    }

    #[test]
    fn test_failed_reminder_is_counted() {
        let mut fx = Fixture::new(date(2026, 5, 24));
        fx.mailer = RecordingMailer::failing_for(&["x@test"]);
        fx.add_contract("X", "x@test", date(2025, 6, 1), date(2026, 5, 31), "");

        let report = fx.tracker().send_reminders().unwrap();
        assert!(report.sent.is_empty());
        assert_eq!(report.failed, 1);
    }
}
