use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Delivery failure reported by a [`Mailer`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A rendered message ready to hand to the mail service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub display_name: String,
}

/// Outbound mail service
pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Mailer that only logs what it would have sent
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "email not sent (no mail transport configured)");
        Ok(())
    }
}

/// Send one email, logging instead of propagating a failure.
/// Returns whether the mailer accepted the message.
pub fn deliver(mailer: &dyn Mailer, email: &OutgoingEmail) -> bool {
    match mailer.send(email) {
        Ok(()) => {
            tracing::debug!(to = %email.to, subject = %email.subject, "email sent");
            true
        }
        Err(e) => {
            tracing::error!(to = %email.to, subject = %email.subject, error = %e, "failed to send email");
            false
        }
    }
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn renewal_confirmation(
    to: &str,
    company: &str,
    new_start: NaiveDate,
    new_end: NaiveDate,
    display_name: &str,
) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Contract renewal confirmed: {}", company),
        body: format!(
            "Dear {company},\n\n\
             Thank you for renewing your contract with us. Your new contract period runs from {} to {}.\n\n\
             Regards,\n{display_name}",
            long_date(new_start),
            long_date(new_end),
        ),
        display_name: display_name.to_string(),
    }
}

pub fn termination_notice(to: &str, company: &str, end: NaiveDate, display_name: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Contract termination notice: {}", company),
        body: format!(
            "Dear {company},\n\n\
             As requested, your contract will not be renewed and service ends on {}.\n\
             Thank you for working with us.\n\n\
             Regards,\n{display_name}",
            long_date(end),
        ),
        display_name: display_name.to_string(),
    }
}

pub fn renewal_reminder(
    to: &str,
    company: &str,
    end: NaiveDate,
    days_left: i64,
    display_name: &str,
) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Your contract ends in {} days", days_left),
        body: format!(
            "Dear {company},\n\n\
             Your current contract ends on {}. Please let us know whether you would like to renew.\n\n\
             Regards,\n{display_name}",
            long_date(end),
        ),
        display_name: display_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refusing;

    impl Mailer for Refusing {
        fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
            Err(MailError::Delivery(format!("mailbox full for {}", email.to)))
        }
    }

    #[test]
    fn test_deliver_swallows_failures() {
        let email = termination_notice("a@example.com", "Acme", NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(), "Desk");
        assert!(!deliver(&Refusing, &email));
        assert!(deliver(&LogMailer, &email));
    }

    #[test]
    fn test_templates_mention_dates() {
        let email = renewal_confirmation(
            "a@example.com",
            "Acme",
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2027, 5, 31).unwrap(),
            "Desk",
        );
        assert_eq!(email.subject, "Contract renewal confirmed: Acme");
        assert!(email.body.contains("June 1, 2026"));
        assert!(email.body.contains("May 31, 2027"));
        assert_eq!(email.display_name, "Desk");
    }
}
