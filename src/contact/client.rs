//! Client side of the contact form.
//!
//! Mirrors what the page does on submit: validate locally, post JSON to
//! `/send-message`, and turn the reply into a status line for the form.

use crate::contact::submission::{FieldError, Rules, Submission};
#[cfg(feature = "client")]
use serde::Deserialize;

#[cfg(feature = "client")]
const DEFAULT_SUCCESS: &str = "Message sent successfully!";
#[cfg(feature = "client")]
const DEFAULT_FAILURE: &str = "An error occurred while sending your message.";

/// What the form's status element shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Nothing submitted yet
    Idle,
    /// Local validation failed; no request was made
    Invalid(Vec<FieldError>),
    /// Request in flight
    Pending,
    /// Server relayed the message
    Success(String),
    /// Server answered with an error status
    Rejected(String),
    /// The request never completed
    NetworkError,
}

impl FormStatus {
    /// CSS modifier class for the status element.
    pub fn css_class(&self) -> &'static str {
        match self {
            FormStatus::Idle => "",
            FormStatus::Pending => "pending",
            FormStatus::Success(_) => "success",
            FormStatus::Invalid(_) | FormStatus::Rejected(_) | FormStatus::NetworkError => "error",
        }
    }

    /// Text for the status element.
    pub fn text(&self) -> &str {
        match self {
            FormStatus::Idle => "",
            FormStatus::Invalid(_) => "Some fields are not valid. Please check and try again.",
            FormStatus::Pending => "Sending...",
            FormStatus::Success(message) | FormStatus::Rejected(message) => message,
            FormStatus::NetworkError => "A network error occurred. Please try again later.",
        }
    }

    /// Whether the form inputs should be cleared.
    pub fn resets_form(&self) -> bool {
        matches!(self, FormStatus::Success(_))
    }
}

/// Validate with the page wording, one error per failing input.
pub fn validate_form(submission: &Submission) -> Vec<FieldError> {
    submission
        .invalid_fields_for(Rules::Page)
        .into_iter()
        .map(|field| FieldError {
            field,
            message: field.form_message().to_string(),
        })
        .collect()
}

#[cfg(feature = "client")]
#[derive(Debug, Deserialize)]
struct ServerReply {
    #[serde(default)]
    message: Option<String>,
}

/// Posts contact form submissions to the site backend.
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ContactForm {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "client")]
impl ContactForm {
    /// Create a form client for the site at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/send-message", base_url.trim_end_matches('/')),
        })
    }

    /// Endpoint the form posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit the form.
    ///
    /// Returns [`FormStatus::Invalid`] without touching the network when local
    /// validation fails.
    pub async fn submit(&self, submission: &Submission) -> FormStatus {
        let errors = validate_form(submission);
        if !errors.is_empty() {
            return FormStatus::Invalid(errors);
        }

        let response = match self.client.post(&self.endpoint).json(submission).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Contact form request failed: {}", e);
                return FormStatus::NetworkError;
            }
        };

        let ok = response.status().is_success();
        let reply: ServerReply = match response.json().await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Contact form reply was not JSON: {}", e);
                return FormStatus::NetworkError;
            }
        };

        if ok {
            FormStatus::Success(reply.message.unwrap_or_else(|| DEFAULT_SUCCESS.to_string()))
        } else {
            FormStatus::Rejected(reply.message.unwrap_or_else(|| DEFAULT_FAILURE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::submission::Field;

    #[test]
    fn test_form_wording_differs_from_server() {
        let errors = validate_form(&Submission::default());
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].field, Field::Name);
        assert_eq!(
            errors[0].message,
            "Your name must contain at least 2 characters."
        );
    }

    #[test]
    fn test_blank_phone_is_rejected_on_the_page() {
        let submission = Submission {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("         ".to_string()),
            date_info: Some("May".to_string()),
            ..Default::default()
        };
        let errors = validate_form(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Phone);
        assert_eq!(errors[0].message, "Please enter a valid phone number.");
    }

    #[test]
    fn test_status_classes_and_text() {
        assert_eq!(FormStatus::Pending.css_class(), "pending");
        assert_eq!(FormStatus::Pending.text(), "Sending...");
        assert_eq!(FormStatus::NetworkError.css_class(), "error");
        assert_eq!(
            FormStatus::Rejected("Validation failed".to_string()).text(),
            "Validation failed"
        );
        assert!(FormStatus::Success("ok".to_string()).resets_form());
        assert!(!FormStatus::NetworkError.resets_form());
    }

    #[cfg(feature = "client")]
    #[tokio::test]
    async fn test_invalid_form_skips_request() {
        // Nothing listens on port 9; a request would yield NetworkError.
        let form = ContactForm::new("http://127.0.0.1:9/").expect("client");
        assert_eq!(form.endpoint(), "http://127.0.0.1:9/send-message");

        let status = form.submit(&Submission::default()).await;
        assert!(matches!(status, FormStatus::Invalid(ref errors) if errors.len() == 4));
    }

    #[cfg(feature = "client")]
    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let form = ContactForm::new("http://127.0.0.1:9").expect("client");
        let submission = Submission {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("5551234567".to_string()),
            date_info: Some("May".to_string()),
            ..Default::default()
        };
        assert_eq!(form.submit(&submission).await, FormStatus::NetworkError);
    }
}
