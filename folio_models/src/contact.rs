use nutype::nutype;
use serde_json::{Map, Value};

use crate::{
    email_address::EmailAddress,
    validation::{Violation, EXPECTED_STRING, REQUIRED},
};

/// A contact form submission which has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub message: ContactMessageContent,
}

#[nutype(
    validate(len_char_min = 2, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactName(String);

#[nutype(
    validate(len_char_min = 10, len_char_max = 1000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageContent(String);

impl ContactSubmission {
    pub const NAME_MIN_LEN: usize = 2;
    pub const NAME_MAX_LEN: usize = 100;
    pub const MESSAGE_MIN_LEN: usize = 10;
    pub const MESSAGE_MAX_LEN: usize = 1000;

    /// Validate an untyped record.
    ///
    /// Every field is checked and all violations are returned together. Fields
    /// other than `name`, `email` and `message` are ignored.
    pub fn validate(record: &Map<String, Value>) -> Result<Self, Vec<Violation>> {
        let mut violations = Vec::new();

        let name = string_field(record, "name", &mut violations).and_then(|name| {
            ContactName::try_new(name.to_owned())
                .map_err(|err| {
                    let message = match err {
                        ContactNameError::LenCharMinViolated => {
                            format!("Name must be at least {} characters", Self::NAME_MIN_LEN)
                        }
                        ContactNameError::LenCharMaxViolated => {
                            format!("Name must be at most {} characters", Self::NAME_MAX_LEN)
                        }
                    };
                    violations.push(Violation::new("name", message));
                })
                .ok()
        });

        let email = string_field(record, "email", &mut violations).and_then(|email| {
            email
                .parse::<EmailAddress>()
                .map_err(|_| violations.push(Violation::new("email", "Invalid email address")))
                .ok()
        });

        let message = string_field(record, "message", &mut violations).and_then(|message| {
            ContactMessageContent::try_new(message.to_owned())
                .map_err(|err| {
                    let message = match err {
                        ContactMessageContentError::LenCharMinViolated => format!(
                            "Message must be at least {} characters",
                            Self::MESSAGE_MIN_LEN
                        ),
                        ContactMessageContentError::LenCharMaxViolated => format!(
                            "Message must be at most {} characters",
                            Self::MESSAGE_MAX_LEN
                        ),
                    };
                    violations.push(Violation::new("message", message));
                })
                .ok()
        });

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if violations.is_empty() => Ok(Self {
                name,
                email,
                message,
            }),
            _ => Err(violations),
        }
    }
}

fn string_field<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    match record.get(field) {
        Some(Value::String(value)) => Some(value),
        None | Some(Value::Null) => {
            violations.push(Violation::new(field, REQUIRED));
            None
        }
        Some(_) => {
            violations.push(Violation::new(field, EXPECTED_STRING));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(record) => record,
            _ => panic!("not an object"),
        }
    }

    fn fields(violations: &[Violation]) -> Vec<&str> {
        violations.iter().filter_map(Violation::field).collect()
    }

    #[test]
    fn ok() {
        // Act
        let result = ContactSubmission::validate(&record(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "message": "Hello, I would like to get in touch regarding a project.",
            "extra": 42,
        })));

        // Assert
        let submission = result.unwrap();
        assert_eq!(*submission.name, "Jane Doe");
        assert_eq!(submission.email.as_str(), "jane@example.com");
        assert_eq!(
            *submission.message,
            "Hello, I would like to get in touch regarding a project."
        );
    }

    #[test]
    fn name_bounds() {
        for (name, valid) in [
            ("J".to_owned(), false),
            ("Jo".to_owned(), true),
            ("x".repeat(100), true),
            ("x".repeat(101), false),
        ] {
            let result = ContactSubmission::validate(&record(json!({
                "name": name,
                "email": "jane@example.com",
                "message": "Hello there, friend!",
            })));
            match result {
                Ok(_) => assert!(valid, "{name:?} should be rejected"),
                Err(violations) => {
                    assert!(!valid, "{name:?} should be accepted");
                    assert_eq!(fields(&violations), ["name"]);
                }
            }
        }
    }

    #[test]
    fn message_bounds() {
        for (message, valid) in [
            ("x".repeat(9), false),
            ("x".repeat(10), true),
            ("x".repeat(1000), true),
            ("x".repeat(1001), false),
        ] {
            let result = ContactSubmission::validate(&record(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "message": message,
            })));
            assert_eq!(result.is_ok(), valid, "{}", message.len());
        }
    }

    #[test]
    fn length_counts_characters() {
        let result = ContactSubmission::validate(&record(json!({
            "name": "Zoë",
            "email": "zoe@example.com",
            "message": "äöüäöüäöüä",
        })));
        result.unwrap();
    }

    #[test]
    fn invalid_email_with_valid_fields() {
        // Act
        let result = ContactSubmission::validate(&record(json!({
            "name": "Jane Doe",
            "email": "not-an-email",
            "message": "Hello, I would like to get in touch.",
        })));

        // Assert
        assert_eq!(
            result.unwrap_err(),
            [Violation::new("email", "Invalid email address")]
        );
    }

    #[test]
    fn collect_all_violations() {
        // Act
        let result = ContactSubmission::validate(&record(json!({
            "name": "J",
            "email": "jane",
            "message": "short",
        })));

        // Assert
        assert_eq!(
            result.unwrap_err(),
            [
                Violation::new("name", "Name must be at least 2 characters"),
                Violation::new("email", "Invalid email address"),
                Violation::new("message", "Message must be at least 10 characters"),
            ]
        );
    }

    #[test]
    fn missing_and_mistyped_fields() {
        // Act
        let result = ContactSubmission::validate(&record(json!({
            "email": 17,
            "message": null,
        })));

        // Assert
        assert_eq!(
            result.unwrap_err(),
            [
                Violation::new("name", REQUIRED),
                Violation::new("email", EXPECTED_STRING),
                Violation::new("message", REQUIRED),
            ]
        );
    }
}
