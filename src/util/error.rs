//! Error types for the converter.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene file does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Source text outside the Unity YAML shape
    #[error("Malformed scene text at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Document header without a `!u!<n>` type tag
    #[error("Document at line {line} has no recognizable type tag")]
    MissingTag { line: usize },

    /// Document header without an `&<anchor>` handle
    #[error("Document at line {line} has no anchor")]
    MissingAnchor { line: usize },

    /// Required key absent on an expected node
    #[error("Missing required field '{field}' on node {handle}")]
    MissingField { field: String, handle: i64 },

    /// Scalar present but not convertible to the expected numeric type
    #[error("Field '{field}' on node {handle} is not a valid number: '{value}'")]
    FieldParse {
        field: String,
        handle: i64,
        value: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization error
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed-text error at a source line.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Create a missing-field error naming the node's handle.
    pub fn missing_field(field: impl Into<String>, handle: i64) -> Self {
        Self::MissingField {
            field: field.into(),
            handle,
        }
    }

    /// Create a field-parse error naming the node's handle and the raw value.
    pub fn field_parse(field: impl Into<String>, handle: i64, value: impl Into<String>) -> Self {
        Self::FieldParse {
            field: field.into(),
            handle,
            value: value.into(),
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
