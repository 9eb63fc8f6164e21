//! Field-level validation errors for submitted forms.

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key used for errors that do not belong to one field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Message for a required field submitted blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Validation failures keyed by form field name.
///
/// Field order is stable (sorted by name) so rendered output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an error set holding one message for one field.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Converts an empty set into `Ok(())` and a non-empty one into `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for FormErrors {}

/// Records `REQUIRED_MESSAGE` when `value` is blank after trimming.
pub(crate) fn require(errors: &mut FormErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
        return false;
    }
    true
}

/// Records a length error when `value` has more than `max_chars` characters.
pub(crate) fn limit_chars(errors: &mut FormErrors, field: &'static str, value: &str, max_chars: usize) {
    let count = value.chars().count();
    if count > max_chars {
        errors.add(
            field,
            format!("Ensure this value has at most {max_chars} characters (it has {count})."),
        );
    }
}
