use thiserror::Error;

use crate::field::{ElementKind, FieldKind};

/// Failure while mapping labels or moving a value between its raw text and a
/// record field.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The raw text cannot be coerced to the field's declared type.
    #[error("field `{field}`: cannot convert {raw:?} to {target}: {reason}")]
    Conversion {
        field: String,
        raw: String,
        target: FieldKind,
        reason: String,
    },

    /// A structured field has no converter for its exact type.
    #[error("field `{field}`: no converter registered for type `{type_name}`")]
    UnsupportedType {
        field: String,
        type_name: &'static str,
    },

    /// A sequence field whose element kind cannot be decoded.
    #[error("field `{field}`: sequences of {element} are not supported")]
    UnsupportedElementKind { field: String, element: ElementKind },

    /// Two fields resolved to the same external label under a strict policy.
    #[error("label {label:?} is declared by both `{first}` and `{second}`")]
    DuplicateLabel {
        label: String,
        first: String,
        second: String,
    },
}

impl TranscodeError {
    /// Name of the field the error is about, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            TranscodeError::Conversion { field, .. }
            | TranscodeError::UnsupportedType { field, .. }
            | TranscodeError::UnsupportedElementKind { field, .. } => Some(field),
            TranscodeError::DuplicateLabel { .. } => None,
        }
    }
}

/// Error returned by a [`Converter`](crate::Converter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A decoded value that does not fit the field it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("decoded value does not match a {target} field")]
    Mismatch { target: &'static str },
}
