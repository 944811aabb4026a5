use folio_models::{contact::ContactSubmission, validation::Violation};
use serde_json::{Map, Value};
use tracing::warn;

use crate::api::{ContactApi, ContactApiError, ContactRequest};

pub const MESSAGE_SENT: &str = "Message sent successfully!";
pub const SEND_FAILED: &str = "Failed to send message. Please try again later.";

/// State of the contact form between user input and the server's answer.
///
/// Input is rejected while a submission is in flight, and the fields are only
/// cleared after the server has accepted the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    email: String,
    message: String,
    state: FormState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// Notification shown to the user after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Local validation failed, nothing was sent.
    Invalid(Vec<Violation>),
    /// Another submission is still in flight.
    Busy,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            state: FormState::Editing,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    /// Update a field. Returns `false` and leaves the form untouched while a
    /// submission is in flight.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.is_submitting() {
            return false;
        }

        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
        true
    }

    /// Check the current input with the rules the server enforces.
    pub fn validate(&self) -> Result<ContactSubmission, Vec<Violation>> {
        let record = Map::from_iter([
            ("name".to_owned(), Value::String(self.name.clone())),
            ("email".to_owned(), Value::String(self.email.clone())),
            ("message".to_owned(), Value::String(self.message.clone())),
        ]);
        ContactSubmission::validate(&record)
    }

    pub fn begin_submit(&mut self) -> Result<ContactRequest, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::Busy);
        }

        self.validate().map_err(SubmitError::Invalid)?;
        self.state = FormState::Submitting;

        Ok(ContactRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<Option<String>, ContactApiError>) -> Toast {
        self.state = FormState::Editing;

        match result {
            Ok(message) => {
                self.name.clear();
                self.email.clear();
                self.message.clear();
                Toast::Success(message.unwrap_or_else(|| MESSAGE_SENT.into()))
            }
            Err(err) => {
                warn!("Failed to submit contact form: {err}");
                let message = match err {
                    ContactApiError::Rejected {
                        message: Some(message),
                        ..
                    } => message,
                    _ => SEND_FAILED.into(),
                };
                Toast::Failure(message)
            }
        }
    }

    /// Validate locally and send the form once.
    ///
    /// Dropping the returned future before it completes unlocks the form and
    /// keeps the input.
    pub async fn submit(&mut self, api: &impl ContactApi) -> Result<Toast, SubmitError> {
        let request = self.begin_submit()?;
        let guard = SubmitGuard(self);
        let result = api.send(request).await;
        Ok(guard.0.finish_submit(result))
    }
}

/// Returns the form to [`FormState::Editing`] if a submission is abandoned.
struct SubmitGuard<'a>(&'a mut ContactForm);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.0.is_submitting() {
            warn!("Contact form submission was cancelled");
            self.0.state = FormState::Editing;
        }
    }
}
