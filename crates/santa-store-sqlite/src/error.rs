//! Error type for `santa-store-sqlite`.

use santa_core::assignment::Year;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] santa_core::Error),

  /// A uniqueness, reference or check constraint rejected the write. The
  /// SQLite message is kept verbatim.
  #[error("integrity error: {0}")]
  Integrity(String),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("assignment for {found} in a batch replacing {expected}")]
  YearMismatch { expected: Year, found: Year },
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        failure,
        message,
      )) if failure.code == rusqlite::ErrorCode::ConstraintViolation => {
        Error::Integrity(message.unwrap_or_else(|| failure.to_string()))
      }
      other => Error::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
