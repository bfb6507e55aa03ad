use contrack_engine::{MailError, Mailer, OutgoingEmail};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};

use crate::config::SmtpConfig;

/// Mailer backed by an SMTP relay
pub struct SmtpMailer {
    smtp: SmtpTransport,
    from: Address,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder = SmtpTransport::relay(&config.host)?.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        let from = config.from.parse()?;

        tracing::info!(host = %config.host, port = config.port, "SMTP mailer configured");
        Ok(Self {
            smtp: builder.build(),
            from,
        })
    }

    fn message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.to.clone()))?;
        let from = Mailbox::new(Some(email.display_name.clone()), self.from.clone());

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .body(email.body.clone())
            .map_err(|e| MailError::Delivery(e.to_string()))
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = self.message(email)?;
        self.smtp
            .send(&message)
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(&SmtpConfig {
            host: "smtp.example.com".into(),
            port: 465,
            username: None,
            password: None,
            from: "desk@example.com".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_bad_recipient_is_rejected_before_sending() {
        let email = OutgoingEmail {
            to: "not an address".into(),
            subject: "s".into(),
            body: "b".into(),
            display_name: "Desk".into(),
        };
        assert_eq!(
            mailer().send(&email),
            Err(MailError::InvalidAddress("not an address".into()))
        );
    }

    #[test]
    fn test_message_uses_display_name() {
        let email = OutgoingEmail {
            to: "ops@acme.test".into(),
            subject: "Hello".into(),
            body: "Body".into(),
            display_name: "Contract Desk".into(),
        };
        let message = mailer().message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Contract Desk"));
        assert!(raw.contains("<desk@example.com>"));
        assert!(raw.contains("Subject: Hello"));
    }
}
