//! Error types for Schematron output.

use thiserror::Error;

use sch_core::ConstraintError;

/// Errors raised while writing Schematron documents.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OutputError {
    /// Output options are unusable.
    #[error("Invalid output configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },

    /// An element was closed that was never opened.
    #[error("No open element to close")]
    NoOpenElement,

    /// The document was finished while elements were still open.
    #[error("Element '{name}' was never closed")]
    UnclosedElement {
        /// Qualified name of the innermost open element.
        name: String,
    },

    /// Failed to write an output file.
    #[error("Failed to write '{path}': {message}")]
    WriteError {
        /// File path that failed to write.
        path: String,
        /// Detailed error message.
        message: String,
    },

    /// A constraint tree could not be flattened.
    #[error("Constraint error: {0}")]
    Constraint(#[from] ConstraintError),

    /// I/O error, including failed writes through the XML writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serialized document was not UTF-8.
    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

impl OutputError {
    /// Create a write error with path context.
    pub fn write_error(path: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::WriteError {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
