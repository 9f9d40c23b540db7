//! CSV reader and row validator.
//!
//! Pipeline:
//!   raw bytes
//!     └─ sanitize()          → &str (undecodable bytes dropped)
//!          └─ read_rows()    → Vec<RawRow> projected onto expected columns
//!               └─ check_row()  → accumulate ValidationErrors
//!                    └─ into PersonRow / PairingRow

use std::borrow::Cow;

use santa_core::email::is_valid_email;

use crate::{
  PairingRow, PersonRow,
  error::{Error, Result, ValidationError},
};

// ─── Columns ─────────────────────────────────────────────────────────────────

pub const NAME: &str = "Employee_Name";
pub const EMAIL: &str = "Employee_EmailID";
pub const RECIPIENT_NAME: &str = "Secret_Child_Name";
pub const RECIPIENT_EMAIL: &str = "Secret_Child_EmailID";

#[derive(Clone, Copy)]
pub(crate) struct Column {
  pub header: &'static str,
  pub email:  bool,
}

pub(crate) const PERSON_COLUMNS: [Column; 2] = [
  Column { header: NAME, email: false },
  Column { header: EMAIL, email: true },
];

pub(crate) const PAIRING_COLUMNS: [Column; 4] = [
  Column { header: NAME, email: false },
  Column { header: EMAIL, email: true },
  Column { header: RECIPIENT_NAME, email: false },
  Column { header: RECIPIENT_EMAIL, email: true },
];

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Decode `input` as UTF-8, silently dropping any byte sequence that does not
/// decode. Valid input is borrowed unchanged.
pub fn sanitize(input: &[u8]) -> Cow<'_, str> {
  match std::str::from_utf8(input) {
    Ok(s) => Cow::Borrowed(s),
    Err(_) => Cow::Owned(input.utf8_chunks().map(|c| c.valid()).collect()),
  }
}

/// A data row projected onto the expected columns.
pub(crate) struct RawRow {
  /// 1-based physical line, header is line 1.
  pub line:   u64,
  pub fields: Vec<String>,
}

/// Read every data row of `input`, keeping only `columns` in that order.
///
/// Fails with a description if the header lacks one of the columns or the
/// reader gives up. Short rows are padded with empty fields.
pub(crate) fn read_rows(
  input: &[u8],
  columns: &[Column],
) -> std::result::Result<Vec<RawRow>, String> {
  let text = sanitize(input);
  let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(text.as_bytes());

  let headers = reader.headers().map_err(|e| e.to_string())?.clone();
  let positions = columns
    .iter()
    .map(|col| {
      headers
        .iter()
        .position(|h| h.trim() == col.header)
        .ok_or_else(|| format!("missing column {}", col.header))
    })
    .collect::<std::result::Result<Vec<_>, _>>()?;

  let mut rows = Vec::new();
  for (index, record) in reader.records().enumerate() {
    let record = record.map_err(|e| e.to_string())?;
    let fields = positions
      .iter()
      .map(|&p| record.get(p).unwrap_or_default().to_owned())
      .collect();
    // Physical line the record starts on; blank lines the reader skips still
    // count.
    let line = record
      .position()
      .map(|p| p.line())
      .unwrap_or(index as u64 + 2);
    rows.push(RawRow { line, fields });
  }

  Ok(rows)
}

/// Check every field of `row`; a blank field is `Required`, a non-blank email
/// field that fails the syntax check is `InvalidEmail`.
fn check_row(row: &RawRow, columns: &[Column], errors: &mut Vec<ValidationError>) {
  for (col, value) in columns.iter().zip(&row.fields) {
    if value.trim().is_empty() {
      errors.push(ValidationError::Required {
        line:   row.line,
        column: col.header,
      });
    } else if col.email && !is_valid_email(value) {
      errors.push(ValidationError::InvalidEmail {
        line:  row.line,
        value: value.clone(),
      });
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Every validation error in `input`, in file order. An unreadable file yields
/// a single [`ValidationError::Unreadable`].
pub(crate) fn validate(input: &[u8], columns: &[Column]) -> Vec<ValidationError> {
  match read_rows(input, columns) {
    Ok(rows) => collect_errors(&rows, columns),
    Err(detail) => vec![ValidationError::Unreadable(detail)],
  }
}

fn collect_errors(rows: &[RawRow], columns: &[Column]) -> Vec<ValidationError> {
  let mut errors = Vec::new();
  for row in rows {
    check_row(row, columns, &mut errors);
  }
  errors
}

/// Validate, then hand back the rows only if the whole file is clean.
fn checked_rows(input: &[u8], columns: &[Column]) -> Result<Vec<RawRow>> {
  let rows = read_rows(input, columns)
    .map_err(|detail| Error::Invalid(vec![ValidationError::Unreadable(detail)]))?;
  let errors = collect_errors(&rows, columns);
  if errors.is_empty() { Ok(rows) } else { Err(Error::Invalid(errors)) }
}

// ─── Typed parsing ───────────────────────────────────────────────────────────

fn person(name: String, email: String) -> PersonRow {
  PersonRow { name: name.trim().to_owned(), email }
}

pub(crate) fn parse_people(input: &[u8]) -> Result<Vec<PersonRow>> {
  Ok(
    checked_rows(input, &PERSON_COLUMNS)?
      .into_iter()
      .map(|row| {
        let mut fields = row.fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        person(next(), next())
      })
      .collect(),
  )
}

pub(crate) fn parse_pairings(input: &[u8]) -> Result<Vec<PairingRow>> {
  Ok(
    checked_rows(input, &PAIRING_COLUMNS)?
      .into_iter()
      .map(|row| {
        let mut fields = row.fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        PairingRow {
          giver:     person(next(), next()),
          recipient: person(next(), next()),
        }
      })
      .collect(),
  )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn messages(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
  }

  // ── sanitize ────────────────────────────────────────────────────────────────

  #[test]
  fn valid_utf8_is_borrowed() {
    assert!(matches!(sanitize(b"a,b"), Cow::Borrowed("a,b")));
  }

  #[test]
  fn invalid_bytes_are_dropped() {
    let input = b"Employee_Name,Employee_EmailID\nJ\xffohn,john@acme.com\n";
    assert_eq!(
      sanitize(input),
      "Employee_Name,Employee_EmailID\nJohn,john@acme.com\n"
    );
  }

  #[test]
  fn invalid_bytes_do_not_fail_validation() {
    let input = b"Employee_Name,Employee_EmailID\nJ\xc3ohn,john@acme.com\n";
    assert!(validate(input, &PERSON_COLUMNS).is_empty());
  }

  // ── person rows ─────────────────────────────────────────────────────────────

  #[test]
  fn clean_person_file_has_no_errors() {
    let input = "Employee_Name,Employee_EmailID\n\
                 John Doe,john.doe@example.com\n\
                 Jane Smith,jane.smith@example.com\n";
    assert!(validate(input.as_bytes(), &PERSON_COLUMNS).is_empty());
  }

  #[test]
  fn missing_name_and_bad_emails_are_all_reported() {
    let input = "Employee_Name,Employee_EmailID\n\
                 ,invalid-email\n\
                 Jane Smith,invalid-email\n";
    assert_eq!(messages(&validate(input.as_bytes(), &PERSON_COLUMNS)), vec![
      "Line 2: Employee_Name is required",
      "Line 2: Invalid email format for invalid-email",
      "Line 3: Invalid email format for invalid-email",
    ]);
  }

  #[test]
  fn blank_email_is_required_not_malformed() {
    let input = "Employee_Name,Employee_EmailID\n,\nJohn Doe,   \n";
    assert_eq!(messages(&validate(input.as_bytes(), &PERSON_COLUMNS)), vec![
      "Line 2: Employee_Name is required",
      "Line 2: Employee_EmailID is required",
      "Line 3: Employee_EmailID is required",
    ]);
  }

  #[test]
  fn short_row_reads_missing_fields_as_blank() {
    let input = "Employee_Name,Employee_EmailID\nJohn Doe\n";
    assert_eq!(messages(&validate(input.as_bytes(), &PERSON_COLUMNS)), vec![
      "Line 2: Employee_EmailID is required",
    ]);
  }

  #[test]
  fn columns_may_appear_in_any_order() {
    let input = "Employee_EmailID,Team,Employee_Name\njohn@acme.com,Ops,John\n";
    let rows = parse_people(input.as_bytes()).unwrap();
    assert_eq!(rows, vec![PersonRow {
      name:  "John".into(),
      email: "john@acme.com".into(),
    }]);
  }

  #[test]
  fn byte_order_mark_is_ignored() {
    let input = "\u{feff}Employee_Name,Employee_EmailID\nJohn,john@acme.com\n";
    assert!(validate(input.as_bytes(), &PERSON_COLUMNS).is_empty());
  }

  #[test]
  fn quoted_fields_are_unquoted() {
    let input = "Employee_Name,Employee_EmailID\n\"Doe, John\",john@acme.com\n";
    let rows = parse_people(input.as_bytes()).unwrap();
    assert_eq!(rows[0].name, "Doe, John");
  }

  #[test]
  fn blank_lines_still_count_towards_line_numbers() {
    let input = b"Employee_Name,Employee_EmailID\n\nJohn,bad-email\n\n\n,ann@acme.com\n";
    assert_eq!(messages(&validate(input, &PERSON_COLUMNS)), vec![
      "Line 3: Invalid email format for bad-email",
      "Line 6: Employee_Name is required",
    ]);
  }

  #[test]
  fn multi_line_field_shifts_following_rows() {
    let input =
      b"Employee_Name,Employee_EmailID\n\"John\nDoe\",john@acme.com\nJane,bad-email\n";
    assert_eq!(messages(&validate(input, &PERSON_COLUMNS)), vec![
      "Line 4: Invalid email format for bad-email",
    ]);
  }

  // ── whole-file failures ─────────────────────────────────────────────────────

  #[test]
  fn wrong_header_is_a_single_read_error() {
    let errors = validate(b"invalid,csv,data", &PERSON_COLUMNS);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().starts_with("Error reading CSV file"));
  }

  #[test]
  fn semicolon_delimited_file_is_unreadable() {
    let input = "Employee_Name;Employee_EmailID\nJohn;john@acme.com\n";
    let errors = validate(input.as_bytes(), &PERSON_COLUMNS);
    assert!(matches!(errors.as_slice(), [ValidationError::Unreadable(_)]));
  }

  #[test]
  fn empty_file_is_unreadable() {
    let errors = validate(b"", &PERSON_COLUMNS);
    assert!(matches!(errors.as_slice(), [ValidationError::Unreadable(_)]));
  }

  #[test]
  fn header_only_file_is_clean_and_empty() {
    assert!(validate(b"Employee_Name,Employee_EmailID\n", &PERSON_COLUMNS).is_empty());
    assert!(parse_people(b"Employee_Name,Employee_EmailID\n").unwrap().is_empty());
  }

  // ── pairing rows ────────────────────────────────────────────────────────────

  #[test]
  fn pairing_fields_are_checked_independently() {
    let input = "Employee_Name,Employee_EmailID,Secret_Child_Name,Secret_Child_EmailID\n\
                 John Doe,,Jane Smith,jane.smith@example.com\n\
                 Jane Smith,jane.smith@example.com,,bob.johnson@example.com\n\
                 Bob,invalid-email,Ann,invalid-email-2\n";
    assert_eq!(messages(&validate(input.as_bytes(), &PAIRING_COLUMNS)), vec![
      "Line 2: Employee_EmailID is required",
      "Line 3: Secret_Child_Name is required",
      "Line 4: Invalid email format for invalid-email",
      "Line 4: Invalid email format for invalid-email-2",
    ]);
  }

  #[test]
  fn person_header_is_not_a_pairing_header() {
    let input = "Employee_Name,Employee_EmailID\nJohn,john@acme.com\n";
    let errors = validate(input.as_bytes(), &PAIRING_COLUMNS);
    assert_eq!(messages(&errors), vec![
      "Error reading CSV file: missing column Secret_Child_Name",
    ]);
  }

  #[test]
  fn invalid_file_is_not_parsed() {
    let input = "Employee_Name,Employee_EmailID\nJohn,john@acme.com\n,bad\n";
    let Err(Error::Invalid(errors)) = parse_people(input.as_bytes()) else {
      panic!("expected Invalid")
    };
    assert_eq!(errors.len(), 2);
  }

  #[test]
  fn names_are_trimmed() {
    let input = "Employee_Name,Employee_EmailID,Secret_Child_Name,Secret_Child_EmailID\n\
                 \x20John ,john@acme.com,  Jane,jane@acme.com\n";
    let rows = parse_pairings(input.as_bytes()).unwrap();
    assert_eq!(rows[0].giver.name, "John");
    assert_eq!(rows[0].recipient.name, "Jane");
  }
}
