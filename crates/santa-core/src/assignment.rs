//! Assignment types — who gives to whom in which year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, person::Person};

/// Calendar year an assignment batch belongs to.
pub type Year = i32;

// ─── Pairing ─────────────────────────────────────────────────────────────────

/// A directed giver → recipient edge, without a year.
///
/// This is what the generator produces and what the prior-year exclusion set
/// is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
  pub giver_id:     Uuid,
  pub recipient_id: Uuid,
}

impl Pairing {
  pub fn new(giver_id: Uuid, recipient_id: Uuid) -> Self {
    Self { giver_id, recipient_id }
  }
}

// ─── Write model ─────────────────────────────────────────────────────────────

/// Input for a single assignment write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
  pub giver_id:     Uuid,
  pub recipient_id: Uuid,
  pub year:         Year,
}

impl NewAssignment {
  pub fn new(pairing: Pairing, year: Year) -> Self {
    Self {
      giver_id: pairing.giver_id,
      recipient_id: pairing.recipient_id,
      year,
    }
  }

  /// Invariants checkable without the store. Uniqueness per `(giver, year)`
  /// and referential integrity are the store's job.
  pub fn validate(&self) -> Result<()> {
    if self.year <= 0 {
      return Err(Error::InvalidYear(self.year));
    }
    if self.giver_id == self.recipient_id {
      return Err(Error::SelfPairing);
    }
    Ok(())
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:           Uuid,
  pub giver_id:     Uuid,
  pub recipient_id: Uuid,
  pub year:         Year,
  pub created_at:   DateTime<Utc>,
}

impl Assignment {
  pub fn pairing(&self) -> Pairing { Pairing::new(self.giver_id, self.recipient_id) }
}

/// An assignment joined with both of its endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAssignment {
  pub assignment: Assignment,
  pub giver:      Person,
  pub recipient:  Person,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn self_pairing_is_rejected() {
    let id = Uuid::new_v4();
    let err = NewAssignment::new(Pairing::new(id, id), 2024)
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::SelfPairing));
  }

  #[test]
  fn non_positive_year_is_rejected() {
    let pairing = Pairing::new(Uuid::new_v4(), Uuid::new_v4());
    assert!(matches!(
      NewAssignment::new(pairing, 0).validate(),
      Err(Error::InvalidYear(0))
    ));
    assert!(NewAssignment::new(pairing, 2024).validate().is_ok());
  }
}
