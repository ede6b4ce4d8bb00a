//! Contact form submission.
//!
//! [`submit_contact`] validates the three fields and hands the message to a
//! [`ContactSink`]. Delivery is fire-and-forget: one attempt, no retry.
//! [`ContactSession`] models the form on the page: a successful submission
//! clears it and shows a confirmation, a failed one keeps every value and
//! shows the error next to the offending field.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Inline validation messages, shared with the page script.
pub mod messages {
    pub const NAME_MISSING: &str = "Please enter your name.";
    pub const EMAIL_MISSING: &str = "Please enter your email address.";
    pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
    pub const MESSAGE_MISSING: &str = "Please enter a message.";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("invalid {}", fields(.0))]
    Validation(Vec<FieldError>),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

fn fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ContactError {
    /// The inline error for one field, if it failed validation.
    pub fn for_field(&self, field: Field) -> Option<&'static str> {
        match self {
            ContactError::Validation(errors) => errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message),
            ContactError::Delivery(_) => None,
        }
    }
}

/// Proof of hand-off to the delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Short content hash of the submitted message.
    pub reference: String,
}

impl Receipt {
    fn for_form(form: &ContactForm) -> Self {
        let digest = Sha256::digest(format!("{}\0{}\0{}", form.name, form.email, form.message));
        let hex = format!("{digest:x}");
        Self {
            reference: hex[..12].to_string(),
        }
    }
}

/// External delivery mechanism for contact messages.
pub trait ContactSink {
    fn deliver(&self, form: &ContactForm) -> Result<(), ContactError>;
}

/// Simulated delivery: logs the message and succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ContactSink for LogSink {
    fn deliver(&self, form: &ContactForm) -> Result<(), ContactError> {
        info!(name = %form.name, email = %form.email, "contact message received ({} chars)", form.message.len());
        Ok(())
    }
}

/// JSON `POST` to a form endpoint.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ContactError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContactError::Delivery(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl ContactSink for HttpSink {
    fn deliver(&self, form: &ContactForm) -> Result<(), ContactError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(form)
            .send()
            .map_err(|e| ContactError::Delivery(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ContactError::Delivery(format!(
                "endpoint returned {}",
                response.status()
            )))
        }
    }
}

/// `local@domain.tld`, no whitespace: a non-empty local part, one `@`, at
/// least two non-empty dot-separated domain labels, and a top-level label of
/// at least two characters. `static/contact.js` applies the same rule.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| !label.is_empty())
        && labels.last().is_some_and(|tld| tld.chars().count() >= 2)
}

/// Check every field, reporting all failures at once.
pub fn validate(form: &ContactForm) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if form.name.trim().is_empty() {
        errors.push(FieldError {
            field: Field::Name,
            message: messages::NAME_MISSING,
        });
    }
    if form.email.trim().is_empty() {
        errors.push(FieldError {
            field: Field::Email,
            message: messages::EMAIL_MISSING,
        });
    } else if !is_valid_email(form.email.trim()) {
        errors.push(FieldError {
            field: Field::Email,
            message: messages::EMAIL_INVALID,
        });
    }
    if form.message.trim().is_empty() {
        errors.push(FieldError {
            field: Field::Message,
            message: messages::MESSAGE_MISSING,
        });
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate then deliver. Values are trimmed before delivery.
pub fn submit_contact(form: &ContactForm, sink: &dyn ContactSink) -> Result<Receipt, ContactError> {
    validate(form).map_err(ContactError::Validation)?;
    let trimmed = ContactForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        message: form.message.trim().to_string(),
    };
    sink.deliver(&trimmed)?;
    Ok(Receipt::for_form(&trimmed))
}

/// The contact form as the visitor sees it.
#[derive(Debug, Default)]
pub struct ContactSession {
    pub form: ContactForm,
    last_error: Option<ContactError>,
    confirmation: Option<Receipt>,
}

impl ContactSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let target = match field {
            Field::Name => &mut self.form.name,
            Field::Email => &mut self.form.email,
            Field::Message => &mut self.form.message,
        };
        *target = value.to_string();
    }

    /// Submit the current form. On success the form is cleared and a
    /// confirmation recorded; on failure the values stay as entered.
    pub fn submit(&mut self, sink: &dyn ContactSink) -> bool {
        match submit_contact(&self.form, sink) {
            Ok(receipt) => {
                self.form = ContactForm::default();
                self.last_error = None;
                self.confirmation = Some(receipt);
                true
            }
            Err(e) => {
                self.confirmation = None;
                self.last_error = Some(e);
                false
            }
        }
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        self.last_error.as_ref().and_then(|e| e.for_field(field))
    }

    pub fn last_error(&self) -> Option<&ContactError> {
        self.last_error.as_ref()
    }

    pub fn confirmation(&self) -> Option<&Receipt> {
        self.confirmation.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records deliveries; optionally fails them.
    #[derive(Default)]
    struct RecordingSink {
        delivered: RefCell<Vec<ContactForm>>,
        fail: bool,
    }

    impl ContactSink for RecordingSink {
        fn deliver(&self, form: &ContactForm) -> Result<(), ContactError> {
            if self.fail {
                return Err(ContactError::Delivery("connection refused".to_string()));
            }
            self.delivered.borrow_mut().push(form.clone());
            Ok(())
        }
    }

    fn filled() -> ContactSession {
        let mut session = ContactSession::new();
        session.set(Field::Name, "Selam");
        session.set(Field::Email, "selam@example.com");
        session.set(Field::Message, "We need a launch film.");
        session
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@studio.example.et"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b..co"));
        assert!(!is_valid_email("a@.b.co"));
        assert!(!is_valid_email("a@b.co."));
        assert!(!is_valid_email("a@b.é"));
        assert!(is_valid_email("a@b.éé"));
    }

    #[test]
    fn blank_fields_are_reported_together() {
        let errors = validate(&ContactForm {
            name: "  ".to_string(),
            email: String::new(),
            message: "\n".to_string(),
        })
        .unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Message]);
    }

    #[test]
    fn invalid_email_keeps_other_values() {
        let sink = RecordingSink::default();
        let mut session = filled();
        session.set(Field::Email, "not-an-email");

        assert!(!session.submit(&sink));
        assert_eq!(
            session.error_for(Field::Email),
            Some("Please enter a valid email address.")
        );
        assert_eq!(session.error_for(Field::Name), None);
        assert_eq!(session.form.name, "Selam");
        assert_eq!(session.form.message, "We need a launch film.");
        assert_eq!(session.form.email, "not-an-email");
        assert!(sink.delivered.borrow().is_empty());
    }

    #[test]
    fn success_clears_form_and_confirms() {
        let sink = RecordingSink::default();
        let mut session = filled();
        assert!(session.submit(&sink));
        assert_eq!(session.form, ContactForm::default());
        assert_eq!(session.confirmation().unwrap().reference.len(), 12);
        assert_eq!(sink.delivered.borrow().len(), 1);
    }

    #[test]
    fn delivery_failure_keeps_values() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut session = filled();
        assert!(!session.submit(&sink));
        assert!(matches!(
            session.last_error(),
            Some(ContactError::Delivery(_))
        ));
        assert_eq!(session.form.name, "Selam");
        assert!(session.confirmation().is_none());
    }

    #[test]
    fn submitted_values_are_trimmed() {
        let sink = RecordingSink::default();
        let form = ContactForm {
            name: "  Abel ".to_string(),
            email: " abel@example.com ".to_string(),
            message: " Hi ".to_string(),
        };
        submit_contact(&form, &sink).unwrap();
        assert_eq!(sink.delivered.borrow()[0].email, "abel@example.com");
    }

    #[test]
    fn receipt_is_deterministic() {
        let form = ContactForm {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            message: "m".to_string(),
        };
        assert_eq!(
            submit_contact(&form, &LogSink).unwrap(),
            submit_contact(&form, &LogSink).unwrap()
        );
    }

    #[test]
    fn validation_error_message_names_fields() {
        let err = submit_contact(&ContactForm::default(), &LogSink).unwrap_err();
        assert_eq!(err.to_string(), "invalid name, email, message");
    }
}
