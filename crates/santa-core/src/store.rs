//! The `SantaStore` trait — the repository the exchange runs against.
//!
//! The trait is implemented by storage backends (e.g. `santa-store-sqlite`).
//! Higher layers (`santa-api`, `santa-server`) depend on this abstraction, not
//! on any concrete backend. Every query is an explicit method call; nothing is
//! lazily evaluated behind the caller's back.

use std::future::Future;

use uuid::Uuid;

use crate::{
  assignment::{Assignment, NewAssignment, ResolvedAssignment, Year},
  person::{NewPerson, Person},
};

/// Abstraction over a Secret Santa store backend.
///
/// Implementations must enforce the assignment invariants at write time: no
/// self-pairing, at most one assignment per `(giver, year)`, and both ends
/// referencing existing people.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SantaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// `true` if `error` is a write the invariants rejected (a taken email, a
  /// second assignment for a giver and year, an unknown person) rather than a
  /// backend failure.
  fn is_conflict(error: &Self::Error) -> bool {
    let _ = error;
    false
  }

  // ── People ────────────────────────────────────────────────────────────

  /// Create and persist a person. The store assigns the id and derives a
  /// unique slug from the name. Fails if the email is already taken.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn find_person_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn find_person_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  fn find_person_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// All people, in creation order.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Delete a person together with every assignment that references them.
  /// Returns `false` if no such person existed.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Persist a single assignment.
  fn add_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  /// All assignments for `year`, joined with both endpoints, in insertion
  /// order.
  fn list_assignments_for_year(
    &self,
    year: Year,
  ) -> impl Future<Output = Result<Vec<ResolvedAssignment>, Self::Error>> + Send + '_;

  /// Delete every assignment for `year`, returning how many were removed.
  fn delete_assignments_for_year(
    &self,
    year: Year,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Persist a batch in a single transaction: either every row is written or
  /// none is.
  fn insert_assignments(
    &self,
    batch: Vec<NewAssignment>,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Delete every assignment for `year` and insert `batch` in one
  /// transaction. Every entry of `batch` must carry `year`.
  fn replace_assignments_for_year(
    &self,
    year: Year,
    batch: Vec<NewAssignment>,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;
}
