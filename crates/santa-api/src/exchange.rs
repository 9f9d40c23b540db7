//! [`Exchange`] — the operations the HTTP layer and the binary both drive.
//!
//! Composes the CSV codec, the generator and a [`SantaStore`]. The operative
//! year is fixed at construction; nothing in here reads the clock.

use std::{collections::HashSet, sync::Arc};

use rand::{Rng, SeedableRng, rngs::StdRng};
use santa_core::{
  assignment::{Assignment, NewAssignment, Pairing, ResolvedAssignment, Year},
  generator::Generator,
  person::{NewPerson, Person},
  store::SantaStore,
};
use santa_csv::PairingRow;

use crate::error::{Error, Result};

/// Download prefix used when none is configured.
pub const DEFAULT_EXPORT_PREFIX: &str = "secret_santa";

pub struct Exchange<S> {
  store:         Arc<S>,
  year:          Year,
  generator:     Generator,
  export_prefix: String,
}

impl<S> Clone for Exchange<S> {
  fn clone(&self) -> Self {
    Self {
      store:         Arc::clone(&self.store),
      year:          self.year,
      generator:     self.generator,
      export_prefix: self.export_prefix.clone(),
    }
  }
}

impl<S: SantaStore> Exchange<S> {
  pub fn new(store: Arc<S>, year: Year) -> Self {
    Self {
      store,
      year,
      generator: Generator::default(),
      export_prefix: DEFAULT_EXPORT_PREFIX.to_owned(),
    }
  }

  pub fn with_generator(mut self, generator: Generator) -> Self {
    self.generator = generator;
    self
  }

  pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.export_prefix = prefix.into();
    self
  }

  /// The year new assignments are generated for.
  pub fn year(&self) -> Year { self.year }

  pub fn store(&self) -> &S { &self.store }

  fn previous_year(&self) -> Result<Year> {
    match self.year.checked_sub(1) {
      Some(y) if y > 0 => Ok(y),
      _ => Err(Error::BadRequest(format!(
        "year {} has no previous year to import pairings into",
        self.year
      ))),
    }
  }

  /// Uniqueness and reference violations are the caller's doing; anything
  /// else the backend reports is a server fault.
  fn store_error(e: S::Error) -> Error {
    if S::is_conflict(&e) {
      Error::Conflict(e.to_string())
    } else {
      Error::store(e)
    }
  }

  // ─── People ──────────────────────────────────────────────────────────────

  pub async fn people(&self) -> Result<Vec<Person>> {
    self.store.list_people().await.map_err(Self::store_error)
  }

  /// Add a single person. Input is checked before the store sees it so bad
  /// input and a taken email surface as client errors.
  pub async fn add_person(&self, input: NewPerson) -> Result<Person> {
    input
      .validate()
      .map_err(|e| Error::BadRequest(e.to_string()))?;

    if self
      .store
      .find_person_by_email(&input.email)
      .await
      .map_err(Self::store_error)?
      .is_some()
    {
      return Err(Error::Conflict(format!("email {} is already taken", input.email)));
    }

    let person = self.store.add_person(input).await.map_err(Self::store_error)?;
    tracing::info!(id = %person.id, slug = %person.slug, "person added");
    Ok(person)
  }

  pub async fn person_by_slug(&self, slug: &str) -> Result<Person> {
    self
      .store
      .find_person_by_slug(slug)
      .await
      .map_err(Self::store_error)?
      .ok_or_else(|| Error::NotFound(format!("person {slug}")))
  }

  /// Remove a person and, with them, every assignment they appear in.
  pub async fn delete_person(&self, slug: &str) -> Result<Person> {
    let person = self.person_by_slug(slug).await?;
    self.store.delete_person(person.id).await.map_err(Self::store_error)?;
    tracing::info!(id = %person.id, slug = %person.slug, "person deleted");
    Ok(person)
  }

  // ─── Imports ─────────────────────────────────────────────────────────────

  /// Import a person file.
  ///
  /// The file is validated as a whole first; any bad row rejects it with
  /// every problem listed. Rows whose email is already known are matched to
  /// the existing person and otherwise ignored, so importing the same file
  /// twice is harmless. Returns the person behind each row, in file order.
  pub async fn import_people(&self, csv: &[u8]) -> Result<Vec<Person>> {
    let rows = santa_csv::parse_people(csv)?;

    let mut people = Vec::with_capacity(rows.len());
    let mut created = 0usize;
    for row in rows {
      let existing = self
        .store
        .find_person_by_email(&row.email)
        .await
        .map_err(Self::store_error)?;
      let person = match existing {
        Some(person) => person,
        None => {
          created += 1;
          self
            .store
            .add_person(NewPerson::new(row.name, row.email))
            .await
            .map_err(Self::store_error)?
        }
      };
      people.push(person);
    }

    tracing::info!(rows = people.len(), created, "people imported");
    Ok(people)
  }

  /// Import last year's pairings, recorded under `year - 1` so the next
  /// generation avoids them.
  ///
  /// The rows are written in one batch: a giver already paired for that year,
  /// or listed twice, rejects the file as [`Error::Conflict`] and nothing is
  /// stored.
  pub async fn import_pairings(&self, csv: &[u8]) -> Result<Vec<Assignment>> {
    let rows = santa_csv::parse_pairings(csv)?;
    let year = self.previous_year()?;

    let mut batch = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for PairingRow { giver, recipient } in rows {
      let giver_person = self
        .store
        .find_person_by_email(&giver.email)
        .await
        .map_err(Self::store_error)?;
      let recipient_person = self
        .store
        .find_person_by_email(&recipient.email)
        .await
        .map_err(Self::store_error)?;

      // A row naming someone who was never imported is dropped without an
      // error, unlike malformed rows which reject the whole file.
      let (Some(g), Some(r)) = (giver_person, recipient_person) else {
        tracing::warn!(
          giver = %giver.email,
          recipient = %recipient.email,
          "skipping pairing for unknown person"
        );
        skipped += 1;
        continue;
      };

      if g.id == r.id {
        return Err(Error::BadRequest(format!(
          "{} cannot be their own secret child",
          g.email
        )));
      }
      batch.push(NewAssignment::new(Pairing::new(g.id, r.id), year));
    }

    let created = self
      .store
      .insert_assignments(batch)
      .await
      .map_err(Self::store_error)?;

    tracing::info!(year, created = created.len(), skipped, "pairings imported");
    Ok(created)
  }

  // ─── Assignments ─────────────────────────────────────────────────────────

  /// Generate this year's assignments from fresh entropy.
  pub async fn generate(&self) -> Result<Vec<Assignment>> {
    let mut rng = StdRng::from_entropy();
    self.generate_with(&mut rng).await
  }

  /// Generate this year's assignments, replacing any already stored.
  ///
  /// People and last year's pairs are loaded once; the generator then runs
  /// entirely in memory. The stored set is only replaced once a valid
  /// matching exists, so a failure leaves the previous set in place.
  pub async fn generate_with<R: Rng + Send>(
    &self,
    rng: &mut R,
  ) -> Result<Vec<Assignment>> {
    if self.year <= 0 {
      return Err(Error::BadRequest(format!(
        "year must be a positive integer, got {}",
        self.year
      )));
    }

    let people = self.store.list_people().await.map_err(Self::store_error)?;
    let prior: HashSet<Pairing> = match self.previous_year() {
      Ok(previous) => self
        .store
        .list_assignments_for_year(previous)
        .await
        .map_err(Self::store_error)?
        .iter()
        .map(|r| r.assignment.pairing())
        .collect(),
      Err(_) => HashSet::new(),
    };

    let matching = match self.generator.generate(&people, &prior, rng) {
      Ok(matching) => matching,
      Err(e) => {
        tracing::warn!(year = self.year, people = people.len(), error = %e, "generation failed");
        return Err(e.into());
      }
    };

    let batch = matching
      .pairs
      .into_iter()
      .map(|pairing| NewAssignment::new(pairing, self.year))
      .collect();
    let assignments = self
      .store
      .replace_assignments_for_year(self.year, batch)
      .await
      .map_err(Self::store_error)?;

    tracing::info!(
      year = self.year,
      assignments = assignments.len(),
      attempts = matching.attempts,
      "assignments generated"
    );
    Ok(assignments)
  }

  /// Resolved assignments for `year`, in the order they were stored.
  pub async fn assignments(&self, year: Year) -> Result<Vec<ResolvedAssignment>> {
    self
      .store
      .list_assignments_for_year(year)
      .await
      .map_err(Self::store_error)
  }

  /// This year's assignments as a pairing file.
  pub async fn export_csv(&self) -> Result<String> {
    let rows: Vec<PairingRow> = self
      .assignments(self.year)
      .await?
      .iter()
      .map(PairingRow::from)
      .collect();
    Ok(santa_csv::export(&rows)?)
  }

  pub fn export_filename(&self) -> String {
    santa_csv::export_filename(&self.export_prefix, self.year)
  }

  /// Who `person` gives to this year.
  pub async fn recipient_of(&self, person: &Person) -> Result<Option<Person>> {
    Ok(
      self
        .assignments(self.year)
        .await?
        .into_iter()
        .find(|r| r.giver.id == person.id)
        .map(|r| r.recipient),
    )
  }

  /// Who gives to `person` this year.
  pub async fn giver_of(&self, person: &Person) -> Result<Option<Person>> {
    Ok(
      self
        .assignments(self.year)
        .await?
        .into_iter()
        .find(|r| r.recipient.id == person.id)
        .map(|r| r.giver),
    )
  }
}
