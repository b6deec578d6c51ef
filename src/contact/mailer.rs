//! Outgoing mail for accepted submissions.
//!
//! The gateway only talks to the [`Mailer`] trait. [`SmtpMailer`] is the
//! production implementation; tests plug in recording mailers instead.

use crate::contact::submission::Submission;
use async_trait::async_trait;
use thiserror::Error;

/// A composed plain-text email, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Display name of the visitor who filled in the form
    pub sender_name: String,
    /// Visitor's address, used as Reply-To
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery failures. Always reported to the visitor as one generic message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A required mail setting (e.g. the destination address) is missing
    #[error("mail delivery is not configured: {0} is not set")]
    NotConfigured(&'static str),

    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("mail transport error: {0}")]
    Transport(String),
}

/// Something that can deliver an [`OutgoingMail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the message in a single attempt.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError>;
}

/// Compose the notification email for a validated submission.
///
/// Omitted optional fields are replaced with fixed placeholders so every line
/// of the summary is always present.
pub fn compose_email(submission: &Submission) -> OutgoingMail {
    let name = submission.name.as_deref().unwrap_or_default();
    let email = submission.email.as_deref().unwrap_or_default();

    let body = format!(
        "Name: {name}\n\
         Partner: {partner}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Event: {event}\n\
         Date/Period: {date}\n\
         Message: {message}",
        partner = submission.partner_or_placeholder(),
        phone = submission.phone.as_deref().unwrap_or_default(),
        event = submission.event_or_placeholder(),
        date = submission.date_info.as_deref().unwrap_or_default(),
        message = submission.message_or_placeholder(),
    );

    OutgoingMail {
        sender_name: name.to_string(),
        reply_to: email.to_string(),
        subject: format!("New Contact Form Submission from {name}"),
        body: body.trim().to_string(),
    }
}

#[cfg(feature = "server")]
pub use smtp::SmtpMailer;

#[cfg(feature = "server")]
mod smtp {
    use super::{DeliveryError, Mailer, OutgoingMail};
    use crate::config::MailConfig;
    use async_trait::async_trait;
    use lettre::message::header::ContentType;
    use lettre::message::Mailbox;
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

    /// Delivers mail through an authenticated SMTP relay.
    pub struct SmtpMailer {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        account: Option<String>,
        destination: Option<String>,
    }

    impl SmtpMailer {
        /// Create a mailer for the configured relay.
        ///
        /// Missing account or destination settings are not an error here; they
        /// surface as [`DeliveryError::NotConfigured`] on the first send.
        pub fn new(config: &MailConfig) -> Result<Self, DeliveryError> {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;

            if let (Some(user), Some(pass)) = (&config.user, &config.password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }

            Ok(Self {
                transport: builder.build(),
                account: config.user.clone(),
                destination: config.destination.clone(),
            })
        }

        fn parse_address(address: &str) -> Result<Address, DeliveryError> {
            address.parse::<Address>().map_err(|e| DeliveryError::Address {
                address: address.to_string(),
                reason: e.to_string(),
            })
        }

        fn build_message(&self, mail: &OutgoingMail) -> Result<Message, DeliveryError> {
            let account = self
                .account
                .as_deref()
                .ok_or(DeliveryError::NotConfigured("EMAIL_USER"))?;
            let destination = self
                .destination
                .as_deref()
                .ok_or(DeliveryError::NotConfigured("EMAIL_TO"))?;

            let from = Mailbox::new(Some(mail.sender_name.clone()), Self::parse_address(account)?);
            let to = Mailbox::new(None, Self::parse_address(destination)?);

            let mut builder = Message::builder()
                .from(from)
                .to(to)
                .subject(mail.subject.clone())
                .header(ContentType::TEXT_PLAIN);

            // The form pattern is looser than RFC 5322, so an address it accepts
            // may still be unusable as a header.
            match Self::parse_address(&mail.reply_to) {
                Ok(address) => {
                    builder = builder.reply_to(Mailbox::new(Some(mail.sender_name.clone()), address));
                }
                Err(e) => tracing::warn!("Omitting Reply-To header: {}", e),
            }

            builder
                .body(mail.body.clone())
                .map_err(|e| DeliveryError::Build(e.to_string()))
        }
    }

    #[async_trait]
    impl Mailer for SmtpMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
            let message = self.build_message(mail)?;
            self.transport
                .send(message)
                .await
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn config(destination: Option<&str>) -> MailConfig {
            MailConfig {
                user: Some("studio@example.com".to_string()),
                password: Some("secret".to_string()),
                destination: destination.map(str::to_string),
                smtp_host: "smtp.example.com".to_string(),
            }
        }

        fn mail() -> OutgoingMail {
            OutgoingMail {
                sender_name: "Ada".to_string(),
                reply_to: "ada@example.com".to_string(),
                subject: "New Contact Form Submission from Ada".to_string(),
                body: "Name: Ada".to_string(),
            }
        }

        #[tokio::test]
        async fn test_missing_destination_is_reported_at_delivery() {
            let mailer = SmtpMailer::new(&config(None)).expect("relay builder");
            let err = mailer.send(&mail()).await.unwrap_err();
            assert!(matches!(err, DeliveryError::NotConfigured("EMAIL_TO")));
        }

        #[tokio::test]
        async fn test_message_headers() {
            let mailer = SmtpMailer::new(&config(Some("owner@example.com"))).expect("relay builder");
            let message = mailer.build_message(&mail()).expect("message");
            let raw = String::from_utf8(message.formatted()).unwrap();
            assert!(raw.contains("Subject: New Contact Form Submission from Ada"));
            assert!(raw.contains("Reply-To:"));
            assert!(raw.contains("<ada@example.com>"));
            assert!(raw.contains("owner@example.com"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::submission::{NOT_AVAILABLE, NO_MESSAGE};

    #[test]
    fn test_compose_email_uses_placeholders() {
        let submission = Submission {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 7946 0000".to_string()),
            date_info: Some("Spring".to_string()),
            ..Default::default()
        };

        let mail = compose_email(&submission);
        assert_eq!(mail.subject, "New Contact Form Submission from Ada");
        assert_eq!(mail.reply_to, "ada@example.com");

        assert_eq!(
            mail.body,
            format!(
                "Name: Ada\nPartner: {NOT_AVAILABLE}\nEmail: ada@example.com\n\
                 Phone: +44 20 7946 0000\nEvent: {NOT_AVAILABLE}\n\
                 Date/Period: Spring\nMessage: {NO_MESSAGE}"
            )
        );
    }

    #[test]
    fn test_compose_email_includes_optional_fields() {
        let submission = Submission {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("5551234567".to_string()),
            date_info: Some("12/09".to_string()),
            message: Some("Outdoor ceremony".to_string()),
            partner: Some("Charles".to_string()),
            event: Some("Wedding".to_string()),
        };

        let mail = compose_email(&submission);
        assert!(mail.body.contains("Partner: Charles"));
        assert!(mail.body.contains("Event: Wedding"));
        assert!(mail.body.contains("Message: Outdoor ceremony"));
        assert!(!mail.body.contains(NOT_AVAILABLE));
    }
}
