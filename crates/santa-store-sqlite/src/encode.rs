//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, years as integers.

use chrono::{DateTime, Utc};
use santa_core::{
  assignment::{Assignment, ResolvedAssignment, Year},
  person::Person,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "person_id, name, email, slug, created_at";

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:  String,
  pub name:       String,
  pub email:      String,
  pub slug:       String,
  pub created_at: String,
}

impl RawPerson {
  /// Read five person columns starting at `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:  row.get(offset)?,
      name:       row.get(offset + 1)?,
      email:      row.get(offset + 2)?,
      slug:       row.get(offset + 3)?,
      created_at: row.get(offset + 4)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         decode_uuid(&self.person_id)?,
      name:       self.name,
      email:      self.email,
      slug:       self.slug,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `assignments` row.
pub struct RawAssignment {
  pub assignment_id: String,
  pub giver_id:      String,
  pub recipient_id:  String,
  pub year:          Year,
  pub created_at:    String,
}

impl RawAssignment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id: row.get(0)?,
      giver_id:      row.get(1)?,
      recipient_id:  row.get(2)?,
      year:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      id:           decode_uuid(&self.assignment_id)?,
      giver_id:     decode_uuid(&self.giver_id)?,
      recipient_id: decode_uuid(&self.recipient_id)?,
      year:         self.year,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// An `assignments` row joined with the giver's and recipient's `people` rows.
pub struct RawResolvedAssignment {
  pub assignment: RawAssignment,
  pub giver:      RawPerson,
  pub recipient:  RawPerson,
}

impl RawResolvedAssignment {
  /// Expects the five assignment columns, then giver, then recipient.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment: RawAssignment::from_row(row)?,
      giver:      RawPerson::from_row(row, 5)?,
      recipient:  RawPerson::from_row(row, 10)?,
    })
  }

  pub fn into_resolved(self) -> Result<ResolvedAssignment> {
    Ok(ResolvedAssignment {
      assignment: self.assignment.into_assignment()?,
      giver:      self.giver.into_person()?,
      recipient:  self.recipient.into_person()?,
    })
  }
}

/// An assignment flattened into column values, ready for `INSERT`.
pub struct EncodedAssignment {
  pub assignment_id: String,
  pub giver_id:      String,
  pub recipient_id:  String,
  pub year:          Year,
  pub created_at:    String,
}

impl From<&Assignment> for EncodedAssignment {
  fn from(a: &Assignment) -> Self {
    Self {
      assignment_id: encode_uuid(a.id),
      giver_id:      encode_uuid(a.giver_id),
      recipient_id:  encode_uuid(a.recipient_id),
      year:          a.year,
      created_at:    encode_dt(a.created_at),
    }
  }
}
