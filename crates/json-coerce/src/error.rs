//! Error taxonomy and the classification helpers applied at recursion and
//! accessor boundaries.

use std::fmt;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IncompatibleType,
    IncompatibleTypeForCasting,
    FieldConversion,
    FrozenValueViolation,
    Get,
    Set,
    IndexOutOfRange,
    InherentTypeViolation,
    DepthLimitExceeded,
}

/// Reason carried by a [`Error::Set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    InherentTypeViolation,
    IndexOutOfRange,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InherentTypeViolation => f.write_str("InherentTypeViolation"),
            Self::IndexOutOfRange => f.write_str("IndexOutOfRange"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Shape or type mismatch at a conversion boundary.
    #[error("incompatible types: expected '{expected}', found '{found}'")]
    IncompatibleType { expected: String, found: String },

    /// Scalar coercion failure.
    #[error("incompatible types: '{found}' cannot be cast to '{target}'")]
    IncompatibleTypeForCasting { target: String, found: String },

    /// A nested failure annotated with the field, key or index it occurred under.
    #[error("error while mapping '{field}': {source}")]
    FieldConversion { field: String, source: Box<Error> },

    #[error("modification not allowed on frozen value of type '{type_name}'")]
    FrozenValueViolation { type_name: String },

    #[error("failed to get element from json: {detail}")]
    Get { detail: String },

    #[error("{reason}: failed to set element to json: {detail}")]
    Set { reason: ErrorReason, detail: String },

    #[error("array index out of range: index: {index}, size: {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("inherent type violation: expected '{expected}', found '{found}'")]
    InherentTypeViolation { expected: String, found: String },

    #[error("maximum conversion depth of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

impl Error {
    pub fn incompatible(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::IncompatibleType {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn cast(target: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::IncompatibleTypeForCasting {
            target: target.to_string(),
            found: found.to_string(),
        }
    }

    pub fn frozen(type_name: impl fmt::Display) -> Self {
        Self::FrozenValueViolation {
            type_name: type_name.to_string(),
        }
    }

    pub fn inherent(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::InherentTypeViolation {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompatibleType { .. } => ErrorKind::IncompatibleType,
            Self::IncompatibleTypeForCasting { .. } => ErrorKind::IncompatibleTypeForCasting,
            Self::FieldConversion { .. } => ErrorKind::FieldConversion,
            Self::FrozenValueViolation { .. } => ErrorKind::FrozenValueViolation,
            Self::Get { .. } => ErrorKind::Get,
            Self::Set { .. } => ErrorKind::Set,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::InherentTypeViolation { .. } => ErrorKind::InherentTypeViolation,
            Self::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
        }
    }

    pub fn is_frozen_violation(&self) -> bool {
        matches!(self, Self::FrozenValueViolation { .. })
    }

    /// The innermost error beneath any field annotation.
    pub fn root(&self) -> &Error {
        match self {
            Self::FieldConversion { source, .. } => source.root(),
            other => other,
        }
    }

    /// The field, key or index name this error was annotated with.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldConversion { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Attaches `field` as context.
    ///
    /// Errors that already carry a field, freeze violations and depth-limit
    /// errors pass through unchanged.
    pub fn annotate(self, field: impl Into<String>) -> Self {
        match self {
            Self::FieldConversion { .. }
            | Self::FrozenValueViolation { .. }
            | Self::DepthLimitExceeded { .. } => self,
            other => Self::FieldConversion {
                field: field.into(),
                source: Box::new(other),
            },
        }
    }

    /// Wraps a failure raised while reading an element.
    pub fn into_get(self) -> Self {
        match self {
            Self::Get { .. } => self,
            other => Self::Get {
                detail: other.to_string(),
            },
        }
    }

    /// Wraps a failure raised while writing an element. Freeze violations pass
    /// through unchanged.
    pub fn into_set(self, reason: ErrorReason) -> Self {
        match self {
            Self::FrozenValueViolation { .. } | Self::Set { .. } => self,
            other => Self::Set {
                reason,
                detail: other.to_string(),
            },
        }
    }

    /// The [`ErrorReason`] a write failure of this kind is reported under.
    pub fn set_reason(&self) -> ErrorReason {
        match self {
            Self::IndexOutOfRange { .. } => ErrorReason::IndexOutOfRange,
            _ => ErrorReason::InherentTypeViolation,
        }
    }
}
