use serde::{Deserialize, Serialize};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Location of the offending value, e.g. `["email"]`
    pub path: Vec<String>,
    /// Human-readable reason
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.into()],
            message: message.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

pub const REQUIRED: &str = "Required";
pub const EXPECTED_STRING: &str = "Expected string";
