//! The assignment generator.
//!
//! Produces a random giver → recipient bijection over a group with no
//! self-pairings and no repeat of last year's pairs. Givers are visited in
//! the order supplied; each draws uniformly from the recipients still
//! available. A giver left without a candidate abandons the whole attempt and
//! the generator starts over with fresh draws, up to a fixed number of
//! attempts.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use serde::Serialize;

use crate::{Error, Result, assignment::Pairing, person::Person};

/// Attempts made before giving up, unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// The outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matching {
  /// One pairing per giver, in giver order.
  pub pairs:    Vec<Pairing>,
  /// The attempt that succeeded (1-based); `0` for an empty group.
  pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
  max_attempts: u32,
}

impl Default for Generator {
  fn default() -> Self { Self { max_attempts: DEFAULT_MAX_ATTEMPTS } }
}

impl Generator {
  /// A generator giving up after `max_attempts` (at least one).
  pub fn new(max_attempts: u32) -> Self {
    Self { max_attempts: max_attempts.max(1) }
  }

  pub fn max_attempts(&self) -> u32 { self.max_attempts }

  /// Match every person in `people` to a distinct recipient.
  ///
  /// `prior` holds last year's pairings; none of them is repeated. An empty
  /// group yields an empty matching. Groups with no valid matching (a single
  /// person, two people who swapped last year, …) fail with
  /// [`Error::GenerationFailed`] once the attempt budget is spent.
  pub fn generate<R: Rng + ?Sized>(
    &self,
    people: &[Person],
    prior: &HashSet<Pairing>,
    rng: &mut R,
  ) -> Result<Matching> {
    if people.is_empty() {
      return Ok(Matching { pairs: Vec::new(), attempts: 0 });
    }

    for attempt in 1..=self.max_attempts {
      if let Some(pairs) = attempt_once(people, prior, rng) {
        return Ok(Matching { pairs, attempts: attempt });
      }
    }

    Err(Error::GenerationFailed { attempts: self.max_attempts })
  }
}

/// One greedy pass. `None` means some giver ran out of candidates.
fn attempt_once<R: Rng + ?Sized>(
  people: &[Person],
  prior: &HashSet<Pairing>,
  rng: &mut R,
) -> Option<Vec<Pairing>> {
  // Indices into `people` not yet chosen as anyone's recipient.
  let mut available: Vec<usize> = (0..people.len()).collect();
  let mut pairs = Vec::with_capacity(people.len());

  for (giver_idx, giver) in people.iter().enumerate() {
    let candidates: Vec<usize> = available
      .iter()
      .copied()
      .filter(|&idx| {
        idx != giver_idx
          && !prior.contains(&Pairing::new(giver.id, people[idx].id))
      })
      .collect();

    let &chosen = candidates.choose(rng)?;
    available.retain(|&idx| idx != chosen);
    pairs.push(Pairing::new(giver.id, people[chosen].id));
  }

  Some(pairs)
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use chrono::Utc;
  use rand::{SeedableRng, rngs::StdRng};
  use uuid::Uuid;

  use super::*;

  fn group(n: usize) -> Vec<Person> {
    (0..n)
      .map(|i| Person {
        id:         Uuid::new_v4(),
        name:       format!("Person {i}"),
        email:      format!("person{i}@acme.com"),
        slug:       format!("person-{i}"),
        created_at: Utc::now(),
      })
      .collect()
  }

  /// Panics unless `pairs` is a derangement of `people`.
  fn assert_derangement(people: &[Person], pairs: &[Pairing]) {
    assert_eq!(pairs.len(), people.len());

    let givers: HashSet<Uuid> = pairs.iter().map(|p| p.giver_id).collect();
    let recipients: HashSet<Uuid> = pairs.iter().map(|p| p.recipient_id).collect();
    let everyone: HashSet<Uuid> = people.iter().map(|p| p.id).collect();

    assert_eq!(givers, everyone, "every person gives exactly once");
    assert_eq!(recipients, everyone, "every person receives exactly once");
    assert!(pairs.iter().all(|p| p.giver_id != p.recipient_id));
  }

  #[test]
  fn empty_group_yields_empty_matching() {
    let matching = Generator::default()
      .generate(&[], &HashSet::new(), &mut StdRng::seed_from_u64(0))
      .unwrap();
    assert!(matching.pairs.is_empty());
    assert_eq!(matching.attempts, 0);
  }

  #[test]
  fn single_person_cannot_be_matched() {
    let err = Generator::default()
      .generate(&group(1), &HashSet::new(), &mut StdRng::seed_from_u64(0))
      .unwrap_err();
    assert!(matches!(err, Error::GenerationFailed { attempts: 100 }));
    assert_eq!(
      err.to_string(),
      "unable to generate valid assignments after 100 attempts"
    );
  }

  #[test]
  fn attempt_budget_is_configurable() {
    let err = Generator::new(3)
      .generate(&group(1), &HashSet::new(), &mut StdRng::seed_from_u64(0))
      .unwrap_err();
    assert!(matches!(err, Error::GenerationFailed { attempts: 3 }));
  }

  #[test]
  fn zero_attempts_is_clamped_to_one() {
    assert_eq!(Generator::new(0).max_attempts(), 1);
  }

  #[test]
  fn pair_of_people_swap() {
    let people = group(2);
    let matching = Generator::default()
      .generate(&people, &HashSet::new(), &mut StdRng::seed_from_u64(7))
      .unwrap();
    assert_eq!(matching.pairs, vec![
      Pairing::new(people[0].id, people[1].id),
      Pairing::new(people[1].id, people[0].id),
    ]);
    assert_eq!(matching.attempts, 1);
  }

  #[test]
  fn pair_that_swapped_last_year_cannot_be_matched() {
    let people = group(2);
    let prior: HashSet<Pairing> =
      [Pairing::new(people[0].id, people[1].id)].into_iter().collect();
    let result =
      Generator::default().generate(&people, &prior, &mut StdRng::seed_from_u64(1));
    assert!(matches!(result, Err(Error::GenerationFailed { .. })));
  }

  #[test]
  fn matchings_are_derangements() {
    let people = group(9);
    for seed in 0..64 {
      let matching = Generator::default()
        .generate(&people, &HashSet::new(), &mut StdRng::seed_from_u64(seed))
        .unwrap();
      assert_derangement(&people, &matching.pairs);
      assert!(matching.attempts >= 1);
    }
  }

  #[test]
  fn prior_pairs_are_never_repeated() {
    let people = group(6);
    // Last year everyone gave to the next person round the circle.
    let prior: HashSet<Pairing> = (0..people.len())
      .map(|i| Pairing::new(people[i].id, people[(i + 1) % people.len()].id))
      .collect();

    for seed in 0..64 {
      let matching = Generator::default()
        .generate(&people, &prior, &mut StdRng::seed_from_u64(seed))
        .unwrap();
      assert_derangement(&people, &matching.pairs);
      assert!(matching.pairs.iter().all(|p| !prior.contains(p)));
    }
  }

  #[test]
  fn fully_constrained_group_has_one_answer() {
    // Of the two 3-cycles, last year used a→b→c→a, leaving only a→c→b→a.
    let people = group(3);
    let (a, b, c) = (people[0].id, people[1].id, people[2].id);
    let prior: HashSet<Pairing> =
      [Pairing::new(a, b), Pairing::new(b, c), Pairing::new(c, a)]
        .into_iter()
        .collect();

    for seed in 0..16 {
      let matching = Generator::default()
        .generate(&people, &prior, &mut StdRng::seed_from_u64(seed))
        .unwrap();
      assert_eq!(matching.pairs, vec![
        Pairing::new(a, c),
        Pairing::new(b, a),
        Pairing::new(c, b),
      ]);
    }
  }

  #[test]
  fn both_cycles_of_three_are_reachable() {
    let people = group(3);
    let mut seen: HashMap<Uuid, usize> = HashMap::new();
    for seed in 0..200 {
      let matching = Generator::default()
        .generate(&people, &HashSet::new(), &mut StdRng::seed_from_u64(seed))
        .unwrap();
      *seen.entry(matching.pairs[0].recipient_id).or_default() += 1;
    }
    assert_eq!(seen.len(), 2, "first giver should reach both other people");
  }

  #[test]
  fn same_seed_same_matching() {
    let people = group(12);
    let run = |seed| {
      Generator::default()
        .generate(&people, &HashSet::new(), &mut StdRng::seed_from_u64(seed))
        .unwrap()
    };
    assert_eq!(run(42), run(42));
  }
}
