//! Pairing-format CSV writer.

use crate::{
  PairingRow,
  error::{Error, Result},
  parse::{EMAIL, NAME, RECIPIENT_EMAIL, RECIPIENT_NAME},
};

pub(crate) fn export(rows: &[PairingRow]) -> Result<String> {
  let mut writer = csv::WriterBuilder::new()
    .terminator(csv::Terminator::Any(b'\n'))
    .from_writer(Vec::new());

  writer.write_record([NAME, EMAIL, RECIPIENT_NAME, RECIPIENT_EMAIL])?;
  for row in rows {
    writer.write_record([
      &row.giver.name,
      &row.giver.email,
      &row.recipient.name,
      &row.recipient.email,
    ])?;
  }

  let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
  Ok(String::from_utf8(bytes)?)
}
