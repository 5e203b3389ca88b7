//! Validation error types.

use serde::{Deserialize, Serialize};

/// The rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required field absent or blank.
    MissingField,
    /// Date unparseable or not strictly after the validation date.
    InvalidDate,
    /// Value present but not in the expected textual format.
    InvalidFormat,
    NegativeValue,
    MalformedUrl,
    /// Uploaded payload is not an image.
    UnsupportedMediaType,
    /// Both a photo URL and a photo upload were supplied.
    AmbiguousPhoto,
    InvalidLength,
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}
