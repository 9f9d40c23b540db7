//! Error types for `santa-core`.

use thiserror::Error;

use crate::assignment::Year;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unable to generate valid assignments after {attempts} attempts")]
  GenerationFailed { attempts: u32 },

  #[error("a person cannot be their own secret child")]
  SelfPairing,

  #[error("year must be a positive integer, got {0}")]
  InvalidYear(Year),

  #[error("name is required")]
  BlankName,

  #[error("invalid email format for {0}")]
  InvalidEmail(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
