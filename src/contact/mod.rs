//! Contact form handling.
//!
//! This module contains:
//! - The submission record and its validation rules
//! - Email composition and the mailer seam
//! - The gateway that ties validation and delivery together
//! - The page-side form client

pub mod client;
pub mod gateway;
pub mod mailer;
pub mod submission;

// Re-export commonly used types
#[cfg(feature = "client")]
pub use client::ContactForm;
pub use client::{validate_form, FormStatus};
pub use gateway::{FormGateway, GatewayOutcome};
#[cfg(feature = "server")]
pub use mailer::SmtpMailer;
pub use mailer::{compose_email, DeliveryError, Mailer, OutgoingMail};
pub use submission::{Field, FieldError, Rules, Submission, NOT_AVAILABLE, NO_MESSAGE};
