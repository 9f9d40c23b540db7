//! Person — a member of the gift exchange.
//!
//! A person is identified internally by UUID, externally by email (the
//! import dedup key) and by slug (the URL handle).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, email::is_valid_email};

/// A stored member of the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:         Uuid,
  pub name:       String,
  /// Globally unique.
  pub email:      String,
  /// Assigned once at creation from `name`; never recomputed.
  pub slug:       String,
  pub created_at: DateTime<Utc>,
}

/// Input for [`SantaStore::add_person`](crate::store::SantaStore::add_person).
/// The store assigns the id, slug and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub name:  String,
  pub email: String,
}

impl NewPerson {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into() }
  }

  /// Check the write-time invariants: a non-blank name and a syntactically
  /// valid email.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::BlankName);
    }
    if !is_valid_email(&self.email) {
      return Err(Error::InvalidEmail(self.email.clone()));
    }
    Ok(())
  }
}
