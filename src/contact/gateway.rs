//! Form gateway: re-validates a submission and relays it as an email.

use crate::contact::mailer::{compose_email, DeliveryError, Mailer};
use crate::contact::submission::{FieldError, Submission};
use std::sync::Arc;

/// Result of handling one submission.
#[derive(Debug)]
pub enum GatewayOutcome {
    /// The mailer accepted the message
    Delivered,
    /// The submission failed validation; nothing was sent
    Rejected(Vec<FieldError>),
    /// The single delivery attempt failed
    Failed(DeliveryError),
}

impl GatewayOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, GatewayOutcome::Delivered)
    }
}

/// Validates submissions and hands accepted ones to a [`Mailer`].
#[derive(Clone)]
pub struct FormGateway {
    mailer: Arc<dyn Mailer>,
}

impl FormGateway {
    /// Create a gateway that delivers through the given mailer.
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Validate the submission and, if it passes, deliver it once.
    pub async fn submit(&self, submission: &Submission) -> GatewayOutcome {
        let errors = submission.validate();
        if !errors.is_empty() {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            tracing::info!(?fields, "Rejected contact submission");
            return GatewayOutcome::Rejected(errors);
        }

        let mail = compose_email(submission);
        match self.mailer.send(&mail).await {
            Ok(()) => {
                tracing::info!("Contact submission relayed");
                GatewayOutcome::Delivered
            }
            Err(e) => {
                tracing::error!("Email error: {}", e);
                GatewayOutcome::Failed(e)
            }
        }
    }
}
