//! URL slugs for people.
//!
//! A slug is derived from the person's name exactly once, at creation. Clashes
//! are resolved by appending `-1`, `-2`, … to the base.

use unicode_normalization::{UnicodeNormalization as _, char::is_combining_mark};

/// Base used when a name contains no ASCII alphanumerics at all.
pub const FALLBACK_BASE: &str = "person";

/// Strip accents, lowercase the name, turn every run of non-alphanumeric
/// characters into a single `-`, and trim `-` from both ends.
///
/// - "John Doe" → "john-doe"
/// - "Mary-Jane O'Neil" → "mary-jane-o-neil"
/// - "José Núñez" → "jose-nunez"
pub fn base_slug(name: &str) -> String {
  let slug = name
    .nfkd()
    .filter(|c| !is_combining_mark(*c))
    .collect::<String>()
    .to_lowercase()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
    .collect::<String>()
    .split('-')
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("-");

  if slug.is_empty() { FALLBACK_BASE.to_owned() } else { slug }
}

/// The `n`-th candidate for `base`: the base itself for `0`, `base-n` after.
pub fn candidate(base: &str, n: u32) -> String {
  if n == 0 { base.to_owned() } else { format!("{base}-{n}") }
}

/// Return the first candidate for `base` that `taken` reports as free.
///
/// Candidates are scanned in increasing suffix order. `taken` is fallible so
/// stores can answer from a database query.
pub fn disambiguate<E>(
  base: &str,
  mut taken: impl FnMut(&str) -> Result<bool, E>,
) -> Result<String, E> {
  let mut n = 0;
  loop {
    let slug = candidate(base, n);
    if !taken(&slug)? {
      return Ok(slug);
    }
    n += 1;
  }
}
