use std::fmt;

use jobwatch_core::NewJobsDigest;
use jobwatch_logging::watch_info;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

pub const DEFAULT_SUBJECT: &str = "New job postings found!";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid {role} address `{address}`: {source}")]
    Address {
        role: &'static str,
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("refusing to send an empty digest")]
    EmptyDigest,
}

/// Delivers a digest of new postings.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, digest: &NewJobsDigest) -> Result<(), NotifyError>;
}

/// Mail endpoint, credentials and addressing for the digest.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub subject: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish()
    }
}

/// One `company: link` line per new posting, in digest order.
pub fn format_digest_body(digest: &NewJobsDigest) -> String {
    digest
        .entries()
        .map(|(company, link)| format!("{company}: {link}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sends the digest as a plain-text mail over an authenticated STARTTLS session.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SmtpSettings {
        &self.settings
    }

    pub fn build_message(&self, digest: &NewJobsDigest) -> Result<Message, NotifyError> {
        if digest.is_empty() {
            return Err(NotifyError::EmptyDigest);
        }
        let from = parse_mailbox("sender", &self.settings.from)?;
        let to = parse_mailbox("recipient", &self.settings.to)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.settings.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(format_digest_body(digest))?;
        Ok(message)
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, digest: &NewJobsDigest) -> Result<(), NotifyError> {
        let message = self.build_message(digest)?;

        let credentials = Credentials::new(
            self.settings.username.clone(),
            self.settings.password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(credentials)
            .build();

        transport.send(message).await?;
        watch_info!(
            "Sent digest with {} new jobs to {}",
            digest.link_count(),
            self.settings.to
        );
        Ok(())
    }
}

fn parse_mailbox(role: &'static str, address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        role,
        address: address.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "watcher@example.com".to_string(),
            password: "hunter2".to_string(),
            from: "watcher@example.com".to_string(),
            to: "me@example.com".to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    fn digest() -> NewJobsDigest {
        [
            ("Acme", vec!["/job/1", "/job/2"]),
            ("Beta", vec!["https://beta.example/jobs/7"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn body_has_one_line_per_link() {
        assert_eq!(
            format_digest_body(&digest()),
            "Acme: /job/1\nAcme: /job/2\nBeta: https://beta.example/jobs/7"
        );
    }

    #[test]
    fn message_is_plain_text_with_subject_and_addresses() {
        let message = SmtpNotifier::new(settings()).build_message(&digest()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: watcher@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: New job postings found!"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("Acme: /job/2"));
    }

    #[test]
    fn bad_recipient_is_reported_by_role() {
        let mut bad = settings();
        bad.to = "not an address".to_string();

        let err = SmtpNotifier::new(bad).build_message(&digest()).unwrap_err();
        assert!(matches!(err, NotifyError::Address { role: "recipient", .. }));
    }

    #[test]
    fn empty_digest_is_rejected() {
        let err = SmtpNotifier::new(settings())
            .build_message(&NewJobsDigest::new())
            .unwrap_err();
        assert!(matches!(err, NotifyError::EmptyDigest));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", settings());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
