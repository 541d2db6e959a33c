//! Validation and form error types

use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::FieldName;

/// A single field-scoped validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is missing, empty or unselected
    #[error("{message}")]
    Required {
        field: FieldName,
        message: &'static str,
    },

    /// Field is present but malformed
    #[error("{message}")]
    Format {
        field: FieldName,
        message: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> FieldName {
        match self {
            FieldError::Required { field, .. } | FieldError::Format { field, .. } => *field,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Required { message, .. } | FieldError::Format { message, .. } => *message,
        }
    }
}

/// All currently failing fields, keyed in validation order
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<FieldName, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, error: FieldError) {
        self.0.insert(error.field(), error);
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Form validation failed: {0}")]
    Invalid(FieldErrors),

    #[error("Form has already been submitted")]
    AlreadySubmitted,

    #[error("Submission failed: {0}")]
    Submission(#[source] anyhow::Error),
}
