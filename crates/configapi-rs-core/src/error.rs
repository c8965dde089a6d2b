//! Error types for node conversion and file formats.

use thiserror::Error;

/// Errors returned while converting between nodes and typed values.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// A required key was not present in the source map.
    #[error("missing required key: {key}")]
    MissingKey { key: String },
    /// The node kind does not match the requested type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The node has the right kind but an unusable value.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// No serializer is registered for the type.
    #[error("no serializer found for {type_name}")]
    NoSerializer { type_name: &'static str },
    /// No deserializer is registered for the type.
    #[error("no deserializer found for {type_name}")]
    NoDeserializer { type_name: &'static str },
    /// An inline field produced or received something other than a map.
    #[error("inline field {key} must be a map, found {found}")]
    NotAMap { key: String, found: &'static str },
    /// A nested conversion failed at the given key.
    #[error("failed to convert {key}: {source}")]
    Field {
        key: String,
        #[source]
        source: Box<SerializationError>,
    },
}

impl SerializationError {
    /// Wrap this error with the key it occurred at.
    pub fn at(self, key: impl Into<String>) -> Self {
        Self::Field {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// Build a [`SerializationError::TypeMismatch`].
    pub fn mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

/// Errors returned while loading or saving a file format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Reading or writing the underlying stream failed.
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    /// The input could not be parsed.
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
    /// The tree contains a node the format cannot write.
    #[error("{format} cannot represent node: {message}")]
    UnsupportedNode {
        format: &'static str,
        message: String,
    },
    /// The document root has a kind the format does not accept.
    #[error("{format} root must be a {expected}, found {found}")]
    UnsupportedRoot {
        format: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// A typed conversion failed while loading or saving.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl FormatError {
    /// Build a [`FormatError::Parse`].
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Build a [`FormatError::UnsupportedNode`].
    pub fn unsupported(format: &'static str, message: impl Into<String>) -> Self {
        Self::UnsupportedNode {
            format,
            message: message.into(),
        }
    }
}
