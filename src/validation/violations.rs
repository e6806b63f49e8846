//! Field-level payload validation failures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A single failed rule on a single field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All failures of one payload, keyed by field.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("Payload failed validation on {} field(s): {}", .fields.len(), .fields.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for one field.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = Self::new();
        for error in iter {
            errors.add(error.field, error.message);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_group_by_field() {
        let errors: ValidationErrors = vec![
            FieldError::new("comment", "is required"),
            FieldError::new("score", "must be numeric"),
            FieldError::new("score", "must be at least 1"),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.field("comment"), ["is required".to_string()]);
        assert_eq!(errors.field("score").len(), 2);
        assert!(errors.field("other").is_empty());
        assert!(errors.has("score"));
    }

    #[test]
    fn message_lists_failing_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("comment", "is required");

        assert_eq!(
            errors.to_string(),
            "Payload failed validation on 1 field(s): comment"
        );
    }
}
