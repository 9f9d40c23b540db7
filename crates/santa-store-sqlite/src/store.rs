//! [`SqliteStore`] — the SQLite implementation of [`SantaStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use santa_core::{
  assignment::{Assignment, NewAssignment, ResolvedAssignment, Year},
  person::{NewPerson, Person},
  slug,
  store::SantaStore,
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    EncodedAssignment, PERSON_COLUMNS, RawPerson, RawResolvedAssignment, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Secret Santa store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch at most one person matching `column = value`.
  async fn find_person_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people WHERE {column} = ?1"),
              rusqlite::params![value],
              |row| RawPerson::from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  /// Validate `batch` and stamp ids and timestamps onto it.
  fn prepare_batch(batch: Vec<NewAssignment>) -> Result<Vec<Assignment>> {
    let now = Utc::now();
    batch
      .into_iter()
      .map(|input| {
        input.validate()?;
        Ok(Assignment {
          id:           Uuid::new_v4(),
          giver_id:     input.giver_id,
          recipient_id: input.recipient_id,
          year:         input.year,
          created_at:   now,
        })
      })
      .collect()
  }
}

fn insert_assignment_rows(
  conn: &rusqlite::Connection,
  rows: &[EncodedAssignment],
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO assignments (assignment_id, giver_id, recipient_id, year, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
  )?;
  for row in rows {
    stmt.execute(rusqlite::params![
      row.assignment_id,
      row.giver_id,
      row.recipient_id,
      row.year,
      row.created_at,
    ])?;
  }
  Ok(())
}

// ─── SantaStore impl ─────────────────────────────────────────────────────────

impl SantaStore for SqliteStore {
  type Error = Error;

  fn is_conflict(error: &Error) -> bool { matches!(error, Error::Integrity(_)) }

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    input.validate()?;

    let id = Uuid::new_v4();
    let created_at = Utc::now();
    let base = slug::base_slug(&input.name);

    let id_str = encode_uuid(id);
    let at_str = encode_dt(created_at);
    let name = input.name.clone();
    let email = input.email.clone();

    // Slug lookup and insert share a transaction so two people with the same
    // name cannot both claim the same candidate.
    let slug: String = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let slug = slug::disambiguate(&base, |candidate| {
          tx.query_row(
            "SELECT 1 FROM people WHERE slug = ?1",
            rusqlite::params![candidate],
            |_| Ok(()),
          )
          .optional()
          .map(|hit| hit.is_some())
        })?;
        tx.execute(
          "INSERT INTO people (person_id, name, email, slug, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, slug, at_str],
        )?;
        tx.commit()?;
        Ok(slug)
      })
      .await?;

    tracing::debug!(%id, %slug, "person created");

    Ok(Person {
      id,
      name: input.name,
      email: input.email,
      slug,
      created_at,
    })
  }

  async fn find_person_by_id(&self, id: Uuid) -> Result<Option<Person>> {
    self.find_person_where("person_id", encode_uuid(id)).await
  }

  async fn find_person_by_email(&self, email: &str) -> Result<Option<Person>> {
    self.find_person_where("email", email.to_owned()).await
  }

  async fn find_person_by_slug(&self, slug: &str) -> Result<Option<Person>> {
    self.find_person_where("slug", slug.to_owned()).await
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], |row| RawPerson::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM people WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn add_assignment(&self, input: NewAssignment) -> Result<Assignment> {
    let mut prepared = Self::prepare_batch(vec![input])?;
    let assignment = prepared.remove(0);
    let row = EncodedAssignment::from(&assignment);

    self
      .conn
      .call(move |conn| {
        insert_assignment_rows(conn, std::slice::from_ref(&row))?;
        Ok(())
      })
      .await?;

    Ok(assignment)
  }

  async fn list_assignments_for_year(
    &self,
    year: Year,
  ) -> Result<Vec<ResolvedAssignment>> {
    let raws: Vec<RawResolvedAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.assignment_id, a.giver_id, a.recipient_id, a.year, a.created_at,
             g.person_id, g.name, g.email, g.slug, g.created_at,
             r.person_id, r.name, r.email, r.slug, r.created_at
           FROM assignments a
           JOIN people g ON g.person_id = a.giver_id
           JOIN people r ON r.person_id = a.recipient_id
           WHERE a.year = ?1
           ORDER BY a.rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![year], RawResolvedAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawResolvedAssignment::into_resolved)
      .collect()
  }

  async fn delete_assignments_for_year(&self, year: Year) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM assignments WHERE year = ?1",
          rusqlite::params![year],
        )?)
      })
      .await?;
    Ok(removed)
  }

  async fn insert_assignments(
    &self,
    batch: Vec<NewAssignment>,
  ) -> Result<Vec<Assignment>> {
    let assignments = Self::prepare_batch(batch)?;
    let rows: Vec<EncodedAssignment> =
      assignments.iter().map(EncodedAssignment::from).collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_assignment_rows(&tx, &rows)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(assignments)
  }

  async fn replace_assignments_for_year(
    &self,
    year: Year,
    batch: Vec<NewAssignment>,
  ) -> Result<Vec<Assignment>> {
    if let Some(stray) = batch.iter().find(|a| a.year != year) {
      return Err(Error::YearMismatch { expected: year, found: stray.year });
    }

    let assignments = Self::prepare_batch(batch)?;
    let rows: Vec<EncodedAssignment> =
      assignments.iter().map(EncodedAssignment::from).collect();

    let replaced = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let replaced = tx.execute(
          "DELETE FROM assignments WHERE year = ?1",
          rusqlite::params![year],
        )?;
        insert_assignment_rows(&tx, &rows)?;
        tx.commit()?;
        Ok(replaced)
      })
      .await?;

    tracing::debug!(year, replaced, inserted = assignments.len(), "assignments replaced");

    Ok(assignments)
  }
}
