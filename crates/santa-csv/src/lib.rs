//! CSV codec for the Secret Santa exchange.
//!
//! Validates, parses and writes the two tabular formats the exchange speaks:
//! a person list (`Employee_Name,Employee_EmailID`) and a pairing list that
//! adds `Secret_Child_Name,Secret_Child_EmailID`. Pure synchronous; no HTTP or
//! database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use santa_csv::{parse_people, validate_people};
//!
//! let input = b"Employee_Name,Employee_EmailID\nJohn Doe,john.doe@acme.com\n";
//! assert!(validate_people(input).is_empty());
//! let rows = parse_people(input).unwrap();
//! println!("{} people", rows.len());
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result, ValidationError};
pub use parse::{EMAIL, NAME, RECIPIENT_EMAIL, RECIPIENT_NAME, sanitize};
use santa_core::{
  assignment::{ResolvedAssignment, Year},
  person::Person,
};
use serde::{Deserialize, Serialize};

// ─── Public types ────────────────────────────────────────────────────────────

/// One row of a person file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRow {
  pub name:  String,
  pub email: String,
}

impl From<&Person> for PersonRow {
  fn from(p: &Person) -> Self {
    Self { name: p.name.clone(), email: p.email.clone() }
  }
}

/// One row of a pairing file: a giver and their secret child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRow {
  pub giver:     PersonRow,
  pub recipient: PersonRow,
}

impl From<&ResolvedAssignment> for PairingRow {
  fn from(a: &ResolvedAssignment) -> Self {
    Self {
      giver:     PersonRow::from(&a.giver),
      recipient: PersonRow::from(&a.recipient),
    }
  }
}

// ─── Constants ───────────────────────────────────────────────────────────────

/// MIME type for every file this crate produces.
pub const CONTENT_TYPE: &str = "text/csv";

/// Template person file offered to users.
pub const SAMPLE_PEOPLE_CSV: &str = "\
Employee_Name,Employee_EmailID
John Doe,john.doe@acme.com
Jane Smith,jane.smith@acme.com
Bob Johnson,bob.johnson@acme.com
";

/// Template pairing file offered to users: the sample people in a 3-cycle.
pub const SAMPLE_PAIRINGS_CSV: &str = "\
Employee_Name,Employee_EmailID,Secret_Child_Name,Secret_Child_EmailID
John Doe,john.doe@acme.com,Jane Smith,jane.smith@acme.com
Jane Smith,jane.smith@acme.com,Bob Johnson,bob.johnson@acme.com
Bob Johnson,bob.johnson@acme.com,John Doe,john.doe@acme.com
";

// ─── Public API ──────────────────────────────────────────────────────────────

/// Every problem in a person file. Empty means the file may be imported.
pub fn validate_people(input: &[u8]) -> Vec<ValidationError> {
  parse::validate(input, &parse::PERSON_COLUMNS)
}

/// Every problem in a pairing file. Empty means the file may be imported.
pub fn validate_pairings(input: &[u8]) -> Vec<ValidationError> {
  parse::validate(input, &parse::PAIRING_COLUMNS)
}

/// Parse a person file. Any validation problem fails the whole file with
/// [`Error::Invalid`] carrying every problem found.
pub fn parse_people(input: &[u8]) -> Result<Vec<PersonRow>> {
  parse::parse_people(input)
}

/// Parse a pairing file, with the same all-or-nothing validation as
/// [`parse_people`].
pub fn parse_pairings(input: &[u8]) -> Result<Vec<PairingRow>> {
  parse::parse_pairings(input)
}

/// Write `rows` in the pairing format, in the order given.
pub fn export(rows: &[PairingRow]) -> Result<String> { serialize::export(rows) }

/// Download name for an export: `<prefix>_assignments_<year>.csv`.
pub fn export_filename(prefix: &str, year: Year) -> String {
  format!("{prefix}_assignments_{year}.csv")
}

// ─── Round-trip tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod roundtrip_tests {
  use super::*;

  fn sample_rows() -> Vec<PairingRow> {
    let person = |name: &str, email: &str| PersonRow {
      name:  name.to_owned(),
      email: email.to_owned(),
    };
    let john = person("John Doe", "john.doe@acme.com");
    let jane = person("Jane Smith", "jane.smith@acme.com");
    let bob = person("Bob Johnson", "bob.johnson@acme.com");
    vec![
      PairingRow { giver: john.clone(), recipient: jane.clone() },
      PairingRow { giver: jane, recipient: bob.clone() },
      PairingRow { giver: bob, recipient: john },
    ]
  }

  #[test]
  fn export_then_parse_reproduces_pairs() {
    let rows = sample_rows();
    let csv = export(&rows).unwrap();
    assert!(validate_pairings(csv.as_bytes()).is_empty());
    assert_eq!(parse_pairings(csv.as_bytes()).unwrap(), rows);
  }

  #[test]
  fn sample_pairings_match_exported_sample_rows() {
    assert_eq!(export(&sample_rows()).unwrap(), SAMPLE_PAIRINGS_CSV);
  }

  #[test]
  fn samples_are_valid_imports() {
    assert!(validate_people(SAMPLE_PEOPLE_CSV.as_bytes()).is_empty());
    assert!(validate_pairings(SAMPLE_PAIRINGS_CSV.as_bytes()).is_empty());
    assert_eq!(parse_people(SAMPLE_PEOPLE_CSV.as_bytes()).unwrap().len(), 3);
  }

  #[test]
  fn sample_people_shape() {
    let lines: Vec<&str> = SAMPLE_PEOPLE_CSV.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Employee_Name,Employee_EmailID");
  }

  #[test]
  fn filename_convention() {
    assert_eq!(
      export_filename("secret_santa", 2025),
      "secret_santa_assignments_2025.csv"
    );
  }

  #[test]
  fn invalid_error_lists_every_problem() {
    let err = parse_people(b"Employee_Name,Employee_EmailID\n,\n").unwrap_err();
    assert_eq!(
      err.to_string(),
      "CSV validation errors: Line 2: Employee_Name is required, Line 2: \
       Employee_EmailID is required"
    );
  }
}
