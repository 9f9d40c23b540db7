//! Error types for the santa-csv codec.

use thiserror::Error;

/// A problem found while validating an uploaded file.
///
/// These are returned as data so every problem in a file can be reported at
/// once. The `Display` form is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Line {line}: {column} is required")]
  Required { line: u64, column: &'static str },

  #[error("Line {line}: Invalid email format for {value}")]
  InvalidEmail { line: u64, value: String },

  /// The file could not be read as a table with the expected header.
  #[error("Error reading CSV file: {0}")]
  Unreadable(String),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "CSV validation errors: {}",
    .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
  )]
  Invalid(Vec<ValidationError>),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("utf-8 error: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
