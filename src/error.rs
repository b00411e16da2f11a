use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error as ThisError;

/// Errors returned by the accessors and the struct loader.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The variable is unset or set to the empty string.
    #[error("unable to find env variable with key {key}")]
    NotFound { key: String },
    /// The variable is set but its text does not parse as the requested type.
    #[error("unable to parse {value:?} from {key} as {kind}: {source}")]
    InvalidFormat {
        key: String,
        value: String,
        kind: &'static str,
        #[source]
        source: ParseError,
    },
    /// The load target is absent or its field descriptors are malformed.
    #[error("load expects a non-null struct target: {reason}")]
    InvalidTarget { reason: String },
    /// A field's fallback literal does not parse as the field's type.
    #[error("field {field}: invalid fallback {kind} {value:?}: {source}")]
    InvalidFallback {
        field: String,
        value: String,
        kind: &'static str,
        #[source]
        source: ParseError,
    },
    /// A tagged field's type has no parser.
    #[error("field {field}: unsupported field type {type_name}")]
    UnsupportedType {
        field: String,
        type_name: &'static str,
    },
    /// An accessor failure wrapped with the name of the field being loaded.
    #[error("field {field}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_owned(),
        }
    }

    pub(crate) fn in_field(self, field: &str) -> Self {
        Self::Field {
            field: field.to_owned(),
            source: Box::new(self),
        }
    }

    /// Classify the error, looking through field wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            Self::InvalidFallback { .. } => ErrorKind::InvalidFallback,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::Field { source, .. } => source.kind(),
        }
    }

    /// Name of the struct field the error was raised for, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidFallback { field, .. }
            | Self::UnsupportedType { field, .. }
            | Self::Field { field, .. } => Some(field),
            Self::NotFound { .. } | Self::InvalidFormat { .. } | Self::InvalidTarget { .. } => {
                None
            }
        }
    }
}

/// Classification of an [`Error`], independent of field wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidFormat,
    InvalidTarget,
    InvalidFallback,
    UnsupportedType,
}

/// Diagnostic from one of the primitive value parsers.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ParseError {
    #[error(transparent)]
    Int(#[from] ParseIntError),
    #[error(transparent)]
    Float(#[from] ParseFloatError),
    #[error("value out of range")]
    FloatRange,
    #[error("invalid syntax")]
    Bool,
    #[error(transparent)]
    Time(#[from] chrono::ParseError),
    #[error("expected uppercase `T` separator and `Z` offset")]
    TimeLayout,
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// Failure to read a compound duration literal such as `1h30m`.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} overflows")]
    Overflow(String),
    #[error("negative duration {0:?}")]
    Negative(String),
}
